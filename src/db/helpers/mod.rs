use std::convert::TryFrom;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};

pub fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn threshold_for_hours(now: DateTime<Utc>, hours: u32) -> DateTime<Utc> {
    now - Duration::hours(i64::from(hours))
}

/// Date-only lower bound one day before `threshold`.
///
/// Stored timestamps are producer text (`T` or space separated, any UTC
/// offset), so SQL can only narrow by date prefix; the exact comparison
/// happens on parsed times.
pub fn coarse_lower_bound(threshold: DateTime<Utc>) -> String {
    (threshold - Duration::days(1)).format("%Y-%m-%d").to_string()
}
