//! Chart axis tick labels.

use chrono::{Local, TimeZone};

use crate::traffic::types::Period;

/// Format an epoch-millisecond tick as local `HH:MM`, prefixed with
/// `MM/DD ` when the period spans several days.
pub fn format_axis_timestamp(millis: i64, period: Period) -> String {
    let Some(moment) = Local.timestamp_millis_opt(millis).earliest() else {
        return String::new();
    };

    match period {
        Period::SevenDays => moment.format("%m/%d %H:%M").to_string(),
        Period::OneDay => moment.format("%H:%M").to_string(),
    }
}
