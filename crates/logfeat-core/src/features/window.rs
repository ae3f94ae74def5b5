//! Fixed-size time windows.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

/// A bucket width in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowSize(i64);

impl WindowSize {
    pub fn from_secs(secs: i64) -> Result<Self> {
        if secs <= 0 {
            return Err(Error::InvalidWindow(secs));
        }
        Ok(Self(secs))
    }

    pub fn from_minutes(minutes: u32) -> Result<Self> {
        Self::from_secs(i64::from(minutes) * 60)
    }

    pub fn secs(self) -> i64 {
        self.0
    }

    /// `floor(epoch_seconds / width) * width`, in UTC.
    pub fn floor(self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let start = ts.timestamp().div_euclid(self.0) * self.0;
        DateTime::from_timestamp(start, 0).unwrap_or(ts)
    }

    /// Short label used in output file names: `1m`, `5m`, `90s`.
    pub fn label(self) -> String {
        if self.0 % 60 == 0 {
            format!("{}m", self.0 / 60)
        } else {
            format!("{}s", self.0)
        }
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}
