//! # Enrollment Timestamps
//!
//! [`Timestamp`] is a UTC instant with whole-second resolution. Enrollment
//! records, enrollment windows and course-mode expiry all use it, and it
//! always renders as `YYYY-MM-DDTHH:MM:SSZ` (e.g. `2014-10-20T20:18:00Z`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LmsError;

const RENDER_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// UTC instant, seconds precision.
///
/// Serializes as its rendered string and parses only `Z`-suffixed
/// RFC 3339 input, so stored records never carry a local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Parse a `Z`-suffixed RFC 3339 string. Fractional seconds are dropped.
    ///
    /// # Errors
    ///
    /// [`LmsError::InvalidTimestamp`] for malformed input or an explicit
    /// offset (including `+00:00`).
    pub fn parse(s: &str) -> Result<Self, LmsError> {
        if !s.ends_with('Z') {
            return Err(LmsError::InvalidTimestamp(format!(
                "{s:?} must be UTC with a Z suffix"
            )));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self::from(dt.with_timezone(&Utc)))
            .map_err(|e| LmsError::InvalidTimestamp(format!("{s:?}: {e}")))
    }

    /// The underlying `chrono` value.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(0))
    }
}

impl FromStr for Timestamp {
    type Err = LmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = LmsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(RENDER_FORMAT))
    }
}
