use base64::{engine::general_purpose::STANDARD, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ApiError;

pub const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid base64 image data")]
    InvalidBase64,
    #[error("image data is empty")]
    Empty,
}

impl From<ImageError> for ApiError {
    fn from(e: ImageError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

/// Binary image as kept in the database row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

lazy_static! {
    static ref DATA_URL_RE: Regex =
        Regex::new(r"^data:([A-Za-z0-9.+-]+/[A-Za-z0-9.+-]+);base64,(.*)$").unwrap();
}

/// Accepts either raw base64 or a `data:<mime>;base64,<payload>` URL.
pub fn decode_image(input: &str) -> Result<StoredImage, ImageError> {
    let input = input.trim();
    let (content_type, payload) = match DATA_URL_RE.captures(input) {
        Some(caps) => (
            caps.get(1).map_or(DEFAULT_IMAGE_TYPE, |m| m.as_str()),
            caps.get(2).map_or("", |m| m.as_str()),
        ),
        None => (DEFAULT_IMAGE_TYPE, input),
    };
    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| ImageError::InvalidBase64)?;
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    Ok(StoredImage {
        bytes,
        content_type: content_type.to_string(),
    })
}

/// Optional image field on a write request. Blank or absent means "no image".
pub fn decode_optional(input: Option<&str>) -> Result<Option<StoredImage>, ImageError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => decode_image(s).map(Some),
    }
}

pub fn to_data_url(bytes: &[u8], content_type: Option<&str>) -> String {
    let mime = content_type
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_IMAGE_TYPE);
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Read-side conversion for nullable image columns.
pub fn encode_optional(bytes: Option<&[u8]>, content_type: Option<&str>) -> Option<String> {
    bytes
        .filter(|b| !b.is_empty())
        .map(|b| to_data_url(b, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

    #[test]
    fn raw_base64_defaults_to_jpeg() {
        let encoded = STANDARD.encode(PNG_HEADER);
        let img = decode_image(&encoded).unwrap();
        assert_eq!(img.bytes, PNG_HEADER);
        assert_eq!(img.content_type, "image/jpeg");
    }

    #[test]
    fn data_url_keeps_mime() {
        let url = to_data_url(PNG_HEADER, Some("image/png"));
        assert!(url.starts_with("data:image/png;base64,"));
        let img = decode_image(&url).unwrap();
        assert_eq!(img.bytes, PNG_HEADER);
        assert_eq!(img.content_type, "image/png");
    }

    #[test]
    fn stored_bytes_come_back_identical_as_data_url() {
        let submitted = STANDARD.encode(PNG_HEADER);
        let stored = decode_image(&submitted).unwrap();
        let read = encode_optional(Some(&stored.bytes), Some(&stored.content_type)).unwrap();
        assert_eq!(read, format!("data:image/jpeg;base64,{}", submitted));
        assert_eq!(decode_image(&read).unwrap().bytes, PNG_HEADER);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(decode_image("@@not base64@@"), Err(ImageError::InvalidBase64));
        assert_eq!(decode_image("data:image/png;base64,"), Err(ImageError::Empty));
    }

    #[test]
    fn absent_image_is_none_both_ways() {
        assert_eq!(decode_optional(None).unwrap(), None);
        assert_eq!(decode_optional(Some("  ")).unwrap(), None);
        assert_eq!(encode_optional(None, Some("image/png")), None);
        assert_eq!(encode_optional(Some(&[]), None), None);
    }
}
