use std::fmt;
use std::str::FromStr;

/// Prediction model selected by the endpoint path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `predict-clv`: one currency-scale value per input row.
    Clv,
    /// `predict-churn`: one 0/1 label per input row.
    Churn,
}

impl Endpoint {
    /// Both endpoints, in dashboard order.
    pub const ALL: [Endpoint; 2] = [Endpoint::Clv, Endpoint::Churn];

    /// Path segment appended to the service base URL.
    pub fn name(self) -> &'static str {
        match self {
            Self::Clv => "predict-clv",
            Self::Churn => "predict-churn",
        }
    }

    /// Short label for buttons and log lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Clv => "CLV",
            Self::Churn => "Churn",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown endpoint name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown prediction endpoint {0:?} (expected predict-clv or predict-churn)")]
pub struct UnknownEndpoint(pub String);

impl FromStr for Endpoint {
    type Err = UnknownEndpoint;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().trim_start_matches('/') {
            "predict-clv" | "clv" => Ok(Self::Clv),
            "predict-churn" | "churn" => Ok(Self::Churn),
            other => Err(UnknownEndpoint(other.to_string())),
        }
    }
}
