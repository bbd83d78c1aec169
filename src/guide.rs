//! Guide document projection and field validation
use crate::error::ValidationError;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

/// Title limit, counted in characters rather than bytes so multi-byte
/// scripts get the full hundred.
pub const TITLE_MAX_CHARS: usize = 100;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideStatus {
    #[n(0)]
    Draft,
    #[n(1)]
    PendingApproval,
    #[n(2)]
    Approved,
    #[n(3)]
    Rejected,
}

impl fmt::Display for GuideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GuideStatus::Draft => "draft",
            GuideStatus::PendingApproval => "pending_approval",
            GuideStatus::Approved => "approved",
            GuideStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Current-state projection of a living guide. The full edit history lives
/// in [`crate::history::GuideHistoryRecord`] entries; this struct only ever
/// reflects the latest committed version.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct GuideDocument {
    #[n(0)]
    pub id: String, // uuid7, bech32 encoded
    #[n(1)]
    pub tenant_id: String,
    #[n(2)]
    pub title: String,
    #[n(3)]
    pub content: String,
    #[n(4)]
    pub status: GuideStatus,
    #[n(5)]
    pub version: u64, // starts at 1, +1 per transition, never reused
    #[n(6)]
    pub created_by: String,
    #[n(7)]
    pub approved_by: Option<String>,
    #[n(8)]
    pub approved_at: Option<TimeStamp<Utc>>,
    #[n(9)]
    pub created_at: TimeStamp<Utc>,
    #[n(10)]
    pub updated_at: TimeStamp<Utc>,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let got = title.chars().count();
    if got > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong {
            limit: TITLE_MAX_CHARS,
            got,
        });
    }
    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(())
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
