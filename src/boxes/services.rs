use std::fmt;

use futures::future::try_join_all;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

use super::repo_types::DonationBox;
use crate::donations::{repo::DonationRepo, repo_types::Donation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentStatus {
    Paid,
    Pending,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
        })
    }
}

/// `Paid` iff the last payment falls in the same UTC year and month as `now`.
pub fn payment_status(last_payment: Option<OffsetDateTime>, now: OffsetDateTime) -> PaymentStatus {
    let now = now.to_offset(time::UtcOffset::UTC);
    match last_payment.map(|p| p.to_offset(time::UtcOffset::UTC)) {
        Some(p) if p.year() == now.year() && p.month() == now.month() => PaymentStatus::Paid,
        _ => PaymentStatus::Pending,
    }
}

#[derive(Debug, Clone)]
pub struct BoxWithPayment {
    pub record: DonationBox,
    pub status: PaymentStatus,
    pub latest: Option<Donation>,
}

/// Attaches payment status and the latest donation to each box.
/// Lookups run concurrently; the first failure aborts the batch.
pub async fn with_latest_payments<D>(
    donations: &D,
    boxes: Vec<DonationBox>,
    now: OffsetDateTime,
) -> anyhow::Result<Vec<BoxWithPayment>>
where
    D: DonationRepo + ?Sized,
{
    debug!(count = boxes.len(), "loading latest payments");
    try_join_all(boxes.into_iter().map(|record| async move {
        let latest = donations.latest_donation_for_box(record.id).await?;
        Ok::<_, anyhow::Error>(BoxWithPayment {
            status: payment_status(record.last_payment, now),
            latest,
            record,
        })
    }))
    .await
}

pub fn pending_boxes(boxes: Vec<DonationBox>, now: OffsetDateTime) -> Vec<DonationBox> {
    boxes
        .into_iter()
        .filter(|b| payment_status(b.last_payment, now) == PaymentStatus::Pending)
        .collect()
}
