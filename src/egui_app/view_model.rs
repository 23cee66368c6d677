//! Helpers to convert prediction data into display strings.

/// Placeholder shown while the CLV slot is empty.
pub const NO_CLV_ROWS: &str = "No CLV predictions available.";
/// Placeholder shown while the churn slot is empty.
pub const NO_CHURN_ROWS: &str = "No Churn predictions available.";

/// `"Customer N: $X.XX"` for each CLV prediction, 1-based.
pub fn clv_rows(predictions: &[f64]) -> Vec<String> {
    predictions
        .iter()
        .enumerate()
        .map(|(index, value)| format!("Customer {}: {}", index + 1, currency(*value)))
        .collect()
}

/// `"Customer N: Churn"` / `"Customer N: Not Churn"` for each churn label.
pub fn churn_rows(predictions: &[f64]) -> Vec<String> {
    predictions
        .iter()
        .enumerate()
        .map(|(index, value)| format!("Customer {}: {}", index + 1, churn_label(*value)))
        .collect()
}

/// Only an exact 1 counts as churn.
pub fn churn_label(value: f64) -> &'static str {
    if value == 1.0 { "Churn" } else { "Not Churn" }
}

pub fn currency(value: f64) -> String {
    format!("${value:.2}")
}

/// Calculator result as `"$N"`, without a fractional part for whole numbers.
pub fn calculator_result(value: f64) -> String {
    format!("${}", plain_number(value))
}

fn plain_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
