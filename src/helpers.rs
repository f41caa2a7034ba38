// Time helpers - NASA compact datetimes
//
// The close approach feed writes times as "1900-Dec-27 01:30" (UTC, minute
// resolution). Output uses "1900-12-27 01:30".

use chrono::NaiveDateTime;

use crate::error::{ModelError, Result};

/// Input format of the close approach `cd` column
pub const CD_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Output format for human-readable views and serialization
pub const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a NASA-formatted calendar date/time ("YYYY-Mon-DD HH:MM")
pub fn cd_to_datetime(calendar_date: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(calendar_date.trim(), CD_FORMAT).map_err(|_| {
        ModelError::InvalidTime {
            value: calendar_date.to_string(),
        }
    })
}

/// Format a timestamp without seconds, which the source data never has
pub fn datetime_to_str(dt: &NaiveDateTime) -> String {
    dt.format(OUTPUT_FORMAT).to_string()
}
