// crates/gov-core/src/time.rs
// ============================================================================
// Module: Timestamps
// Description: UTC, sub-second-precision timestamp newtype used across every
//              governance entity and audit entry.
// Dependencies: time
// ============================================================================

//! ## Overview
//! All governance timestamps are UTC and serialize to RFC 3339. `Timestamp`
//! wraps `time::OffsetDateTime` rather than exposing it directly so the
//! serialization format is pinned in one place.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// A UTC point in time, serialized as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl Timestamp {
    /// Returns the current UTC time.
    #[must_use]
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Wraps an existing `OffsetDateTime`, converting it to UTC.
    #[must_use]
    pub fn from_offset(dt: OffsetDateTime) -> Self {
        Self(dt.to_offset(time::UtcOffset::UTC))
    }

    /// Parses an RFC 3339 timestamp string.
    ///
    /// # Errors
    /// Returns an error if `value` is not a valid RFC 3339 timestamp.
    pub fn parse(value: &str) -> Result<Self, time::error::Parse> {
        OffsetDateTime::parse(value, &Rfc3339).map(Self::from_offset)
    }

    /// Returns the wrapped `OffsetDateTime`.
    #[must_use]
    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    /// Returns the number of whole seconds since the Unix epoch.
    #[must_use]
    pub fn unix_timestamp(self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Returns this timestamp advanced by `seconds` (negative moves it back).
    #[must_use]
    pub fn plus_seconds(self, seconds: i64) -> Self {
        Self(self.0 + time::Duration::seconds(seconds))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.format(&Rfc3339) {
            Ok(rendered) => f.write_str(&rendered),
            Err(_) => f.write_str("<invalid-timestamp>"),
        }
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(dt: OffsetDateTime) -> Self {
        Self::from_offset(dt)
    }
}
