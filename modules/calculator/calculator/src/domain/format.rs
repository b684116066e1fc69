/// Distance from the nearest integer below which a result renders as one.
pub const INTEGER_EPSILON: f64 = 1e-9;

/// Render a calculation result for the display.
///
/// Integral values print without a fractional part (`5`, `-3`, never `-0`),
/// everything else with exactly two decimals (`4.50`, `0.33`). Infinities and
/// NaN keep their default rendering.
#[must_use]
pub fn format_result(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = value.round();
    if (value - rounded).abs() <= INTEGER_EPSILON {
        // adding +0.0 turns -0.0 into 0.0
        format!("{:.0}", rounded + 0.0)
    } else {
        format!("{value:.2}")
    }
}

/// Parse the display as an operand; anything unparseable counts as zero.
#[must_use]
pub fn parse_display(display: &str) -> f64 {
    display.parse::<f64>().unwrap_or(0.0)
}
