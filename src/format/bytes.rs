//! Human readable magnitudes.

const PLAIN_UNITS: [&str; 9] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y"];
const BYTE_UNITS: [&str; 9] = ["iB", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

/// Format `value` with a decimal magnitude suffix.
///
/// Values below 0.1 render as `"0"`. Otherwise the value is divided by 1000
/// while it exceeds 1000, at most 8 times, and printed with two decimals.
/// `with_byte_unit` only switches the suffix ladder, never the magnitude.
pub fn format_byte_size(value: f64, with_byte_unit: bool) -> String {
    if value < 0.1 {
        return "0".to_string();
    }

    let mut v = value;
    let mut step = 0;
    while v > 1000.0 && step < PLAIN_UNITS.len() - 1 {
        v /= 1000.0;
        step += 1;
    }

    let unit = if with_byte_unit {
        BYTE_UNITS[step]
    } else {
        PLAIN_UNITS[step]
    };
    format!("{:.2}{}", v, unit)
}
