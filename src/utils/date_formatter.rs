use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

use crate::data_types::ValueLabelFormat;
use crate::utils::plain_number;

pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// `"<Day> <HH>:<MM>"` in the given zone, e.g. `Tue 09:05`.
pub fn format_time_tick(t: DateTime<Utc>, tz: Tz) -> String {
    let local = t.with_timezone(&tz);
    format!(
        "{} {:02}:{:02}",
        DAY_NAMES[local.weekday().num_days_from_sunday() as usize],
        local.hour(),
        local.minute()
    )
}

/// Abbreviated value-axis label.
pub fn format_value_tick(value: f64, format: &ValueLabelFormat) -> String {
    match format {
        ValueLabelFormat::Compact => {
            if value >= 1e7 {
                format!("{}M", (value / 1e6).floor())
            } else if value >= 1e4 {
                format!("{}k", (value / 1e3).floor())
            } else {
                plain_number(value)
            }
        }
        ValueLabelFormat::Currency { symbol } => {
            if value >= 1e9 {
                format!("{symbol}{:.1}bn", value / 1e9)
            } else if value >= 1e6 {
                format!("{symbol}{:.1}m", value / 1e6)
            } else if value >= 1e3 {
                format!("{symbol}{:.1}k", value / 1e3)
            } else {
                format!("{symbol}{:.0}", value)
            }
        }
    }
}
