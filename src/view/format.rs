//! Date and duration formatting for view templates.

use chrono::{DateTime, TimeDelta, Utc};

/// `Mar 18`
pub const DATE_FORMAT: &str = "%b %-d";
/// `14:05`
pub const TIME_FORMAT: &str = "%H:%M";
/// Value for `datetime` attributes.
pub const MACHINE_FORMAT: &str = "%Y-%m-%dT%H:%M";
/// Date and time inside the edit form inputs.
pub const FORM_FORMAT: &str = "%d/%m/%y %H:%M";

pub fn humanize_date(date: DateTime<Utc>, format: &str) -> String {
    date.format(format).to_string()
}

/// Compact duration: `45M`, `02H 10M` or `01D 02H 30M`.
///
/// Negative spans format as zero.
pub fn format_duration(span: TimeDelta) -> String {
    let total = span.num_minutes().max(0);
    let days = total / (24 * 60);
    let hours = total / 60 % 24;
    let minutes = total % 60;

    if days > 0 {
        format!("{days:02}D {hours:02}H {minutes:02}M")
    } else if hours > 0 {
        format!("{hours:02}H {minutes:02}M")
    } else {
        format!("{minutes:02}M")
    }
}
