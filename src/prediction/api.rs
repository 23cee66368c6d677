//! HTTP client for the CLV/churn prediction service.

use serde::{Deserialize, Serialize};
use url::Url;

use super::Endpoint;
use super::multipart;
use crate::config::{ConfigError, ServiceSettings};
use crate::http_client;
use crate::upload::SelectedFile;

/// Multipart field the service reads the CSV from.
pub const FILE_FIELD: &str = "file";
/// Path of the JSON-bodied manual estimate endpoint.
pub const MANUAL_PREDICT_PATH: &str = "manual-predict";

const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Failures of a single prediction request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("API error: {status} {status_text}")]
    Server {
        status: u16,
        status_text: String,
        /// Raw body, kept for diagnostics only.
        body: String,
    },
    /// The body was not valid JSON.
    #[error("Invalid JSON response: {0}")]
    Decode(String),
    /// Valid JSON without the expected fields.
    #[error("Unexpected response shape: {0}")]
    Schema(String),
}

/// Anything able to turn an uploaded CSV into a prediction list.
///
/// Implemented by [`PredictionClient`]; tests substitute in-process fakes.
pub trait PredictionService: Send + Sync {
    fn predict(&self, endpoint: Endpoint, file: &SelectedFile) -> Result<Vec<f64>, PredictError>;
}

/// Inputs for the service's manual CLV estimate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ManualPredictRequest {
    pub purchases: f64,
    pub frequency: f64,
    pub tenure: f64,
    pub avg_order_value: f64,
}

/// Manual estimate returned by the service.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ManualPrediction {
    pub clv: f64,
    pub churn: u8,
}

/// Blocking client bound to one service base URL.
#[derive(Clone, Debug)]
pub struct PredictionClient {
    base_url: Url,
    agent: ureq::Agent,
    max_response_bytes: usize,
}

impl PredictionClient {
    /// Build a client from persisted service settings.
    pub fn new(settings: &ServiceSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: settings.parsed_base_url()?,
            agent: http_client::agent(settings),
            max_response_bytes: settings.max_response_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Upload `file` to `endpoint` and return the `predictions` array verbatim.
    ///
    /// A single attempt is made. The list is not checked against the number of
    /// rows in the CSV.
    pub fn predict(
        &self,
        endpoint: Endpoint,
        file: &SelectedFile,
    ) -> Result<Vec<f64>, PredictError> {
        let url = self.endpoint_url(endpoint.name())?;
        let body = multipart::encode_file(FILE_FIELD, file.name(), file.bytes());
        tracing::debug!(
            "POST {url} with {} ({} bytes)",
            file.name(),
            file.len()
        );
        let request = self
            .agent
            .post(url.as_str())
            .set("Accept", "application/json")
            .set("Content-Type", &body.content_type);
        let bytes = self.read_success(request.send_bytes(&body.bytes))?;
        parse_predictions(&bytes)
    }

    /// Ask the service for a CLV/churn estimate from four summary figures.
    pub fn manual_predict(
        &self,
        request: &ManualPredictRequest,
    ) -> Result<ManualPrediction, PredictError> {
        let url = self.endpoint_url(MANUAL_PREDICT_PATH)?;
        let call = self
            .agent
            .post(url.as_str())
            .set("Accept", "application/json")
            .send_json(request);
        let bytes = self.read_success(call)?;
        parse_manual_prediction(&bytes)
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, PredictError> {
        self.base_url
            .join(path)
            .map_err(|err| PredictError::Transport(format!("Invalid request URL: {err}")))
    }

    fn read_success(
        &self,
        result: Result<ureq::Response, ureq::Error>,
    ) -> Result<Vec<u8>, PredictError> {
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                return Err(status_error(code, response));
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(PredictError::Transport(err.to_string()));
            }
        };
        let code = response.status();
        if !(200..300).contains(&code) {
            return Err(status_error(code, response));
        }
        http_client::read_response_bytes(response, self.max_response_bytes)
            .map_err(|err| PredictError::Transport(err.to_string()))
    }
}

impl PredictionService for PredictionClient {
    fn predict(&self, endpoint: Endpoint, file: &SelectedFile) -> Result<Vec<f64>, PredictError> {
        PredictionClient::predict(self, endpoint, file)
    }
}

/// One-off upload using default timeouts against `base_url`.
pub fn predict(
    base_url: &Url,
    endpoint: Endpoint,
    file: &SelectedFile,
) -> Result<Vec<f64>, PredictError> {
    let settings = ServiceSettings {
        base_url: base_url.to_string(),
        ..ServiceSettings::default()
    };
    let client = PredictionClient::new(&settings)
        .map_err(|err| PredictError::Transport(err.to_string()))?;
    client.predict(endpoint, file)
}

fn status_error(code: u16, response: ureq::Response) -> PredictError {
    let status_text = response.status_text().to_string();
    let body = http_client::read_response_bytes(response, MAX_ERROR_BODY_BYTES)
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_else(|err| err.to_string());
    PredictError::Server {
        status: code,
        status_text,
        body,
    }
}

pub(crate) fn parse_predictions(body: &[u8]) -> Result<Vec<f64>, PredictError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|err| PredictError::Decode(err.to_string()))?;
    let predictions = match value.get("predictions") {
        None | Some(serde_json::Value::Null) => {
            return Err(PredictError::Schema(
                "missing predictions field".to_string(),
            ));
        }
        Some(predictions) => predictions,
    };
    Vec::<f64>::deserialize(predictions)
        .map_err(|err| PredictError::Schema(format!("predictions is not a numeric list: {err}")))
}

fn parse_manual_prediction(body: &[u8]) -> Result<ManualPrediction, PredictError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|err| PredictError::Decode(err.to_string()))?;
    ManualPrediction::deserialize(&value).map_err(|err| PredictError::Schema(err.to_string()))
}
