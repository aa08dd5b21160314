//! Parsing for the feed's timestamps.
//!
//! OpenSea serves `created_date` without a zone designator
//! (`2023-01-01T00:00:00.000`) but the instant is UTC. Parsing it as a local
//! or offset time would shift every notification timestamp, so the string is
//! read as a naive datetime and pinned to UTC here.

use chrono::{DateTime, NaiveDateTime, ParseError, Utc};

const FEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn parse_feed_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(value, FEED_TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}
