//! Shared state types for the egui UI.

use crate::calculator::CalculatorInputs;
use crate::login::LoginGate;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub screen: Screen,
    pub login: LoginGate,
    pub calculator_fields: CalculatorFieldsState,
    pub status: StatusBarState,
}

/// Which page is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Login,
    Dashboard,
    Calculator,
}

/// One of the four calculator inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalculatorField {
    AcquisitionCost,
    RevenuePerUser,
    RetentionRate,
    NumberOfCustomers,
}

impl CalculatorField {
    pub const ALL: [CalculatorField; 4] = [
        CalculatorField::AcquisitionCost,
        CalculatorField::RevenuePerUser,
        CalculatorField::RetentionRate,
        CalculatorField::NumberOfCustomers,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::AcquisitionCost => "Acquisition Cost",
            Self::RevenuePerUser => "Revenue Per User",
            Self::RetentionRate => "Retention Rate",
            Self::NumberOfCustomers => "Number of Customers",
        }
    }

    pub(crate) fn value_mut(self, inputs: &mut CalculatorInputs) -> &mut f64 {
        match self {
            Self::AcquisitionCost => &mut inputs.acquisition_cost,
            Self::RevenuePerUser => &mut inputs.revenue_per_user,
            Self::RetentionRate => &mut inputs.retention_rate,
            Self::NumberOfCustomers => &mut inputs.number_of_customers,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::AcquisitionCost => 0,
            Self::RevenuePerUser => 1,
            Self::RetentionRate => 2,
            Self::NumberOfCustomers => 3,
        }
    }
}

/// Raw text of the calculator inputs as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CalculatorFieldsState {
    text: [String; 4],
}

impl CalculatorFieldsState {
    pub fn from_inputs(inputs: &CalculatorInputs) -> Self {
        Self {
            text: [
                inputs.acquisition_cost.to_string(),
                inputs.revenue_per_user.to_string(),
                inputs.retention_rate.to_string(),
                inputs.number_of_customers.to_string(),
            ],
        }
    }

    pub fn text(&self, field: CalculatorField) -> &str {
        &self.text[field.index()]
    }

    pub fn text_mut(&mut self, field: CalculatorField) -> &mut String {
        &mut self.text[field.index()]
    }
}

/// Tone used to color the status line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusTone {
    #[default]
    Idle,
    Busy,
    Info,
    Error,
}

/// Footer status text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusBarState {
    pub text: String,
    pub tone: StatusTone,
}

impl Default for StatusBarState {
    fn default() -> Self {
        Self::idle()
    }
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Pick a CSV file to get started".into(),
            tone: StatusTone::Idle,
        }
    }
}
