//! Display-string conversions for calculator values.

use crate::constants::RESULT_PRECISION;

/// Render a value the way the display shows it.
///
/// Integral values have no decimal point. Everything else keeps up to
/// eight fractional digits with trailing zeros removed. Never uses
/// scientific notation or digit grouping.
pub fn format_result(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{:.0}", value);
    }

    let formatted = format!("{:.*}", RESULT_PRECISION, value);
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Parse the display buffer, `None` if it is not a number.
pub fn parse_display(display: &str) -> Option<f64> {
    display.trim().parse::<f64>().ok()
}
