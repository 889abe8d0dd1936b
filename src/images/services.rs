use anyhow::Context;
use bytes::Bytes;
use tracing::{debug, error};
use uuid::Uuid;

use crate::storage::StorageClient;

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
    /// Original client file name, only used to guess an extension.
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    pub key: String,
    pub url: String,
}

/// Stores `item` under `<prefix>/<uuid>.<ext>` and returns its key and public URL.
pub async fn upload_image(
    storage: &dyn StorageClient,
    prefix: &str,
    item: UploadItem,
) -> anyhow::Result<UploadedObject> {
    anyhow::ensure!(!item.body.is_empty(), "empty upload");

    let ext = ext_from_mime(&item.content_type)
        .or_else(|| item.file_name.as_deref().and_then(ext_from_file_name))
        .unwrap_or("bin");
    let key = format!("{}/{}.{}", prefix, Uuid::new_v4(), ext);
    storage
        .put_object(&key, item.body, &item.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    debug!(%key, "image uploaded");

    Ok(UploadedObject {
        url: storage.public_url(&key),
        key,
    })
}

/// Removes an object; failures are logged and swallowed.
pub async fn delete_image_quietly(storage: &dyn StorageClient, key: &str) {
    if let Err(e) = storage.delete_object(key).await {
        error!(error = %e, %key, "failed to delete stored image");
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

fn ext_from_file_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("jpg"),
        "png" => Some("png"),
        "webp" => Some("webp"),
        "gif" => Some("gif"),
        "svg" => Some("svg"),
        _ => None,
    }
}
