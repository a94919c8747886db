//! Display rules for numbers
//!
//! Values are truncated toward zero, never rounded: `trunc(v * 10^n) / 10^n`.
//! Missing and non-finite values render as a dash. Positive infinity is the
//! one exception and renders as `∞` (a profit factor with no losses).

/// Decimal places in the trade log
pub const TRADE_LOG_PRECISION: usize = 6;
/// Decimal places everywhere else
pub const SUMMARY_PRECISION: usize = 2;

pub const DASH: &str = "—";
pub const INFINITY_SIGN: &str = "∞";

/// Values too large to scale by `10^places` already have no fractional
/// digits at that precision and come back unchanged.
pub fn truncate(value: f64, places: usize) -> f64 {
    let factor = 10f64.powi(i32::try_from(places).unwrap_or(i32::MAX));
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled.trunc() / factor
    } else {
        value
    }
}

/// Truncated fixed-point text, or a dash for missing / non-finite input.
pub fn format_truncated(value: Option<f64>, places: usize) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => {
            let truncated = truncate(v, places);
            // -0.0 would print as "-0.00"
            let truncated = if truncated == 0.0 { 0.0 } else { truncated };
            format!("{truncated:.places$}")
        }
        None => DASH.to_string(),
    }
}

pub fn format_metric(value: Option<f64>, suffix: &str, places: usize) -> String {
    match value {
        Some(v) if v == f64::INFINITY => format!("{INFINITY_SIGN}{suffix}"),
        Some(v) if v.is_finite() => format!("{}{suffix}", format_truncated(Some(v), places)),
        _ => DASH.to_string(),
    }
}

pub fn format_percent(value: Option<f64>, places: usize) -> String {
    format_metric(value, "%", places)
}

/// Dollar amount; the dash stays bare.
pub fn format_currency(value: Option<f64>, places: usize) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("${}", format_truncated(Some(v), places)),
        None => DASH.to_string(),
    }
}

/// R:R as `x.xx : 1`.
pub fn format_ratio(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{} : 1", format_truncated(Some(v), SUMMARY_PRECISION)),
        None => DASH.to_string(),
    }
}

pub fn format_leverage(leverage: f64) -> String {
    if leverage.is_finite() {
        format!("{leverage}x")
    } else {
        DASH.to_string()
    }
}

/// Free text, or a dash when blank.
pub fn format_text(text: &str) -> String {
    if text.trim().is_empty() {
        DASH.to_string()
    } else {
        text.to_string()
    }
}
