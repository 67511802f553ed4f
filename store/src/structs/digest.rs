use chrono::{DateTime, Utc};

/// A persisted weekly digest record, unique per (user, year, week).
///
/// The record is created with `email_sent = false` right before a delivery
/// attempt. `email_sent` is only ever flipped after a confirmed gateway
/// success; a failed attempt sets `send_failed` instead so a later run can
/// tell "attempted and failed" apart from "never attempted".
#[derive(Debug, Clone, PartialEq)]
pub struct Digest {
    pub id: i64,
    pub user: i64,
    pub year: i32,
    pub week: u32,
    /// Link ids in the order they were bundled
    pub link_ids: Vec<i64>,
    pub email_sent: bool,
    pub send_failed: bool,
    pub email_opened: bool,
    pub send_date: Option<DateTime<Utc>>,
}
