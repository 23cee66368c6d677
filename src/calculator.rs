//! Standalone CLV estimate from four business figures.
//!
//! The result only changes when [`CalculatorState::calculate`] runs, so the
//! shown value can lag behind edited inputs.

use crate::config::CalculatorDefaults;

/// Value shown before the first explicit calculation.
pub const INITIAL_RESULT: f64 = 280.0;

/// The four calculator inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalculatorInputs {
    pub acquisition_cost: f64,
    pub revenue_per_user: f64,
    pub retention_rate: f64,
    pub number_of_customers: f64,
}

impl Default for CalculatorInputs {
    fn default() -> Self {
        CalculatorDefaults::default().into()
    }
}

impl From<CalculatorDefaults> for CalculatorInputs {
    fn from(defaults: CalculatorDefaults) -> Self {
        Self {
            acquisition_cost: defaults.acquisition_cost,
            revenue_per_user: defaults.revenue_per_user,
            retention_rate: defaults.retention_rate,
            number_of_customers: defaults.number_of_customers,
        }
    }
}

/// `round(revenue_per_user * retention_rate * number_of_customers / acquisition_cost)`.
///
/// A zero acquisition cost yields 0. NaN inputs propagate.
pub fn calculate_clv(inputs: &CalculatorInputs) -> f64 {
    if inputs.acquisition_cost == 0.0 {
        return 0.0;
    }
    let value = (inputs.revenue_per_user * inputs.retention_rate * inputs.number_of_customers)
        / inputs.acquisition_cost;
    round_half_up(value)
}

/// Round to the nearest integer, ties toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Parse a numeric field; anything unparsable becomes NaN.
///
/// The whole trimmed field must be a finite decimal number. Spelled-out
/// values such as `inf` or `NaN`, and trailing junk like `12abc`, are rejected.
pub fn parse_input(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(f64::NAN)
}

/// Editable inputs plus the last explicitly computed result.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorState {
    pub inputs: CalculatorInputs,
    result: f64,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new(CalculatorInputs::default())
    }
}

impl CalculatorState {
    pub fn new(inputs: CalculatorInputs) -> Self {
        Self {
            inputs,
            result: INITIAL_RESULT,
        }
    }

    pub fn result(&self) -> f64 {
        self.result
    }

    /// Recompute the result from the current inputs.
    pub fn calculate(&mut self) -> f64 {
        self.result = calculate_clv(&self.inputs);
        self.result
    }
}
