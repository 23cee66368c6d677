//! Maintains app state and bridges the upload flow to the egui UI.

use std::path::Path;
use std::sync::Arc;

use rfd::FileDialog;

use crate::calculator::{CalculatorInputs, CalculatorState, parse_input};
use crate::config::{AppSettings, ConfigError};
use crate::prediction::{Endpoint, PredictError, PredictionClient, PredictionService};
use crate::upload::{Completion, PredictionJobs, SelectedFile, UploadController, UploadError};

use super::state::{CalculatorField, CalculatorFieldsState, Screen, StatusTone, UiState};

/// Owns every piece of dashboard state and the background upload runner.
pub struct DashboardController {
    pub ui: UiState,
    upload: UploadController,
    calculator: CalculatorState,
    jobs: PredictionJobs,
}

impl DashboardController {
    /// Build a controller that talks to the configured prediction service.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, ConfigError> {
        let client = PredictionClient::new(&settings.service)?;
        tracing::info!("Prediction service at {}", client.base_url());
        Ok(Self::new(settings, Arc::new(client)))
    }

    pub fn new(settings: &AppSettings, service: Arc<dyn PredictionService>) -> Self {
        let inputs = CalculatorInputs::from(settings.calculator);
        Self {
            ui: UiState {
                calculator_fields: CalculatorFieldsState::from_inputs(&inputs),
                ..UiState::default()
            },
            upload: UploadController::new(),
            calculator: CalculatorState::new(inputs),
            jobs: PredictionJobs::new(service),
        }
    }

    pub fn upload(&self) -> &UploadController {
        &self.upload
    }

    pub fn calculator(&self) -> &CalculatorState {
        &self.calculator
    }

    /// Navigate, sending the dashboard back to login until the gate is open.
    pub fn show_screen(&mut self, screen: Screen) {
        self.ui.screen = match screen {
            Screen::Dashboard if !self.ui.login.is_logged_in() => Screen::Login,
            other => other,
        };
    }

    pub fn submit_login(&mut self) {
        if self.ui.login.submit() {
            self.show_screen(Screen::Dashboard);
        }
    }

    /// Ask the OS for a CSV file and hold it for the next submit.
    pub fn pick_csv_file(&mut self) {
        let Some(path) = FileDialog::new().add_filter("CSV", &["csv"]).pick_file() else {
            return;
        };
        self.load_file(&path);
    }

    pub fn load_file(&mut self, path: &Path) {
        match SelectedFile::read(path) {
            Ok(file) => {
                self.set_status(format!("Selected {}", file.name()), StatusTone::Info);
                self.upload.select_file(file);
            }
            Err(err) => {
                tracing::warn!("Failed to read {}: {err}", path.display());
                self.set_status(
                    format!("Could not read {}: {err}", path.display()),
                    StatusTone::Error,
                );
            }
        }
    }

    /// Start a background upload to `endpoint`.
    pub fn submit(&mut self, endpoint: Endpoint) {
        let pending = match self.upload.begin(endpoint) {
            Ok(pending) => pending,
            Err(UploadError::NoFileSelected) => {
                self.set_status("No file selected", StatusTone::Error);
                return;
            }
            Err(UploadError::RequestInFlight(_)) => return,
        };
        if !self.jobs.begin(pending) {
            tracing::warn!("Upload runner busy; {endpoint} submit not started");
            self.upload.complete(
                endpoint,
                Err(PredictError::Transport("upload runner busy".to_string())),
            );
            return;
        }
        self.set_status(
            format!("Requesting {} predictions...", endpoint.label()),
            StatusTone::Busy,
        );
    }

    /// Apply a finished upload, if one arrived since the last frame.
    pub fn poll_jobs(&mut self) {
        let Some(message) = self.jobs.poll() else {
            return;
        };
        match self.upload.complete(message.endpoint, message.result) {
            Completion::Stored { endpoint, count } => self.set_status(
                format!("Loaded {count} {} predictions", endpoint.label()),
                StatusTone::Info,
            ),
            Completion::Failed { endpoint } => self.set_status(
                format!("{} prediction failed", endpoint.label()),
                StatusTone::Error,
            ),
            Completion::Ignored { .. } => {}
        }
    }

    /// Store the edited text and its parsed value. Does not recompute.
    pub fn set_calculator_field(&mut self, field: CalculatorField, text: String) {
        *field.value_mut(&mut self.calculator.inputs) = parse_input(&text);
        *self.ui.calculator_fields.text_mut(field) = text;
    }

    pub fn calculate(&mut self) -> f64 {
        self.calculator.calculate()
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.text = text.into();
        self.ui.status.tone = tone;
    }
}
