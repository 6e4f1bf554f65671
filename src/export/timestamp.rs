//! Timestamp parsing for export line headers.

use chrono::NaiveDateTime;

/// Accepted `date time` layouts, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%y %I:%M %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Parse the date and time captured from a message header.
///
/// Exports sometimes put a narrow no-break space before `AM`/`PM`; any
/// whitespace in the time is normalized before parsing. Returns `None` when no
/// format matches.
pub fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let time: String = time
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    let candidate = format!("{} {}", date.trim(), time.trim());

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&candidate, fmt).ok())
}
