use crate::prediction::{Endpoint, PredictError, PredictionService};

use super::SelectedFile;

/// Shown when a submit is attempted before any file was picked.
pub const NO_FILE_MESSAGE: &str = "Please upload a CSV file.";
/// Shown when the service answered without a `predictions` list.
pub const NO_PREDICTIONS_MESSAGE: &str = "No predictions returned from the server.";
/// Shown for every other request failure.
pub const REQUEST_FAILED_MESSAGE: &str = "Error processing the request.";

/// Request lifecycle of the upload controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestPhase {
    #[default]
    Idle,
    /// One request to the given endpoint is in flight.
    Loading(Endpoint),
}

/// Reasons a submit was refused before any network call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("no file selected")]
    NoFileSelected,
    #[error("a {0} request is already in flight")]
    RequestInFlight(Endpoint),
}

/// Work handed out by [`UploadController::begin`] for the caller to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingUpload {
    pub endpoint: Endpoint,
    pub file: SelectedFile,
}

/// What [`UploadController::complete`] did with a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The list replaced the slot for `endpoint`.
    Stored { endpoint: Endpoint, count: usize },
    /// The request failed; the generic message is now set.
    Failed { endpoint: Endpoint },
    /// No request to `endpoint` was in flight, so nothing changed.
    Ignored { endpoint: Endpoint },
}

/// Holds the picked file, request phase, error message and both result slots.
#[derive(Clone, Debug, Default)]
pub struct UploadController {
    file: Option<SelectedFile>,
    phase: RequestPhase,
    error: Option<String>,
    clv: Vec<f64>,
    churn: Vec<f64>,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held file. No type or size checks are made.
    pub fn select_file(&mut self, file: SelectedFile) {
        tracing::info!("Selected {} ({} bytes)", file.name(), file.len());
        self.file = Some(file);
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, RequestPhase::Loading(_))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clv_predictions(&self) -> &[f64] {
        &self.clv
    }

    pub fn churn_predictions(&self) -> &[f64] {
        &self.churn
    }

    /// Idle → Loading. Clears the previous error and returns the upload to send.
    ///
    /// Without a file the error message is set and nothing is sent. While a
    /// request is in flight the call is refused and state is left untouched.
    pub fn begin(&mut self, endpoint: Endpoint) -> Result<PendingUpload, UploadError> {
        if let RequestPhase::Loading(active) = self.phase {
            tracing::debug!("Ignoring {endpoint} submit while {active} is in flight");
            return Err(UploadError::RequestInFlight(active));
        }
        let Some(file) = self.file.clone() else {
            self.error = Some(NO_FILE_MESSAGE.to_string());
            return Err(UploadError::NoFileSelected);
        };
        self.phase = RequestPhase::Loading(endpoint);
        self.error = None;
        Ok(PendingUpload { endpoint, file })
    }

    /// Loading → Idle, applying the result to the slot chosen by `endpoint`.
    pub fn complete(
        &mut self,
        endpoint: Endpoint,
        result: Result<Vec<f64>, PredictError>,
    ) -> Completion {
        if self.phase != RequestPhase::Loading(endpoint) {
            tracing::warn!("Dropping {endpoint} result with no matching request in flight");
            return Completion::Ignored { endpoint };
        }
        self.phase = RequestPhase::Idle;
        match result {
            Ok(predictions) => {
                let count = predictions.len();
                tracing::info!("Received {count} {} predictions", endpoint.label());
                match endpoint {
                    Endpoint::Clv => self.clv = predictions,
                    Endpoint::Churn => self.churn = predictions,
                }
                Completion::Stored { endpoint, count }
            }
            Err(err) => {
                tracing::warn!("Prediction request to {endpoint} failed: {err}");
                if let PredictError::Server { body, .. } = &err
                    && !body.is_empty()
                {
                    tracing::warn!("Service response body: {body}");
                }
                self.error = Some(user_message(&err).to_string());
                Completion::Failed { endpoint }
            }
        }
    }

    /// Begin, call `service` on this thread, then complete.
    pub fn submit_with(
        &mut self,
        service: &dyn PredictionService,
        endpoint: Endpoint,
    ) -> Result<Completion, UploadError> {
        let pending = self.begin(endpoint)?;
        let result = service.predict(pending.endpoint, &pending.file);
        Ok(self.complete(pending.endpoint, result))
    }
}

/// Collapse a request failure into the message shown to the user.
pub fn user_message(err: &PredictError) -> &'static str {
    match err {
        PredictError::Schema(_) => NO_PREDICTIONS_MESSAGE,
        PredictError::Transport(_) | PredictError::Server { .. } | PredictError::Decode(_) => {
            REQUEST_FAILED_MESSAGE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeService {
        calls: Mutex<Vec<Endpoint>>,
        result: Result<Vec<f64>, PredictError>,
    }

    impl FakeService {
        fn returning(result: Result<Vec<f64>, PredictError>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                result,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl PredictionService for FakeService {
        fn predict(
            &self,
            endpoint: Endpoint,
            _file: &SelectedFile,
        ) -> Result<Vec<f64>, PredictError> {
            self.calls.lock().unwrap().push(endpoint);
            self.result.clone()
        }
    }

    fn csv() -> SelectedFile {
        SelectedFile::new("customers.csv", b"customerid,recency\n1,2\n".to_vec())
    }

    #[test]
    fn submit_without_file_sets_message_and_skips_network() {
        let service = FakeService::returning(Ok(vec![1.0]));
        let mut controller = UploadController::new();
        let err = controller.submit_with(&service, Endpoint::Clv).unwrap_err();
        assert_eq!(err, UploadError::NoFileSelected);
        assert_eq!(controller.error(), Some(NO_FILE_MESSAGE));
        assert_eq!(service.call_count(), 0);
        assert!(!controller.is_loading());
    }

    #[test]
    fn clv_success_fills_only_clv_slot() {
        let service = FakeService::returning(Ok(vec![100.5, 200.25]));
        let mut controller = UploadController::new();
        controller.select_file(csv());
        let outcome = controller.submit_with(&service, Endpoint::Clv).unwrap();
        assert_eq!(
            outcome,
            Completion::Stored {
                endpoint: Endpoint::Clv,
                count: 2
            }
        );
        assert_eq!(controller.clv_predictions(), &[100.5, 200.25]);
        assert!(controller.churn_predictions().is_empty());
        assert_eq!(controller.error(), None);
    }

    #[test]
    fn churn_success_leaves_clv_untouched() {
        let mut controller = UploadController::new();
        controller.select_file(csv());
        controller
            .submit_with(&FakeService::returning(Ok(vec![10.0])), Endpoint::Clv)
            .unwrap();
        controller
            .submit_with(&FakeService::returning(Ok(vec![0.0, 1.0])), Endpoint::Churn)
            .unwrap();
        assert_eq!(controller.clv_predictions(), &[10.0]);
        assert_eq!(controller.churn_predictions(), &[0.0, 1.0]);
    }

    #[test]
    fn schema_failure_keeps_previous_lists() {
        let mut controller = UploadController::new();
        controller.select_file(csv());
        controller
            .submit_with(&FakeService::returning(Ok(vec![3.0, 4.0])), Endpoint::Clv)
            .unwrap();
        let failing =
            FakeService::returning(Err(PredictError::Schema("missing predictions".into())));
        let outcome = controller.submit_with(&failing, Endpoint::Clv).unwrap();
        assert_eq!(
            outcome,
            Completion::Failed {
                endpoint: Endpoint::Clv
            }
        );
        assert_eq!(controller.error(), Some(NO_PREDICTIONS_MESSAGE));
        assert_eq!(controller.clv_predictions(), &[3.0, 4.0]);
        assert!(!controller.is_loading());
    }

    #[test]
    fn transport_server_and_decode_failures_share_generic_message() {
        let failures = [
            PredictError::Transport("connection refused".into()),
            PredictError::Server {
                status: 500,
                status_text: "INTERNAL SERVER ERROR".into(),
                body: r#"{"error":"boom"}"#.into(),
            },
            PredictError::Decode("expected value".into()),
        ];
        for failure in failures {
            let mut controller = UploadController::new();
            controller.select_file(csv());
            controller
                .submit_with(&FakeService::returning(Err(failure)), Endpoint::Churn)
                .unwrap();
            assert_eq!(controller.error(), Some(REQUEST_FAILED_MESSAGE));
        }
    }

    #[test]
    fn loading_spans_begin_to_complete() {
        let mut controller = UploadController::new();
        controller.select_file(csv());
        assert!(!controller.is_loading());
        let pending = controller.begin(Endpoint::Churn).unwrap();
        assert!(controller.is_loading());
        assert_eq!(controller.phase(), RequestPhase::Loading(Endpoint::Churn));
        controller.complete(pending.endpoint, Ok(vec![1.0]));
        assert!(!controller.is_loading());
        assert_eq!(controller.phase(), RequestPhase::Idle);
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut controller = UploadController::new();
        assert!(controller.begin(Endpoint::Clv).is_err());
        assert!(controller.error().is_some());
        controller.select_file(csv());
        controller.begin(Endpoint::Clv).unwrap();
        assert_eq!(controller.error(), None);
    }

    #[test]
    fn second_submit_while_loading_is_refused() {
        let mut controller = UploadController::new();
        controller.select_file(csv());
        controller.begin(Endpoint::Clv).unwrap();
        let err = controller.begin(Endpoint::Churn).unwrap_err();
        assert_eq!(err, UploadError::RequestInFlight(Endpoint::Clv));
        assert_eq!(controller.phase(), RequestPhase::Loading(Endpoint::Clv));
    }

    #[test]
    fn stray_completion_is_ignored() {
        let mut controller = UploadController::new();
        controller.select_file(csv());
        let outcome = controller.complete(Endpoint::Clv, Ok(vec![9.0]));
        assert_eq!(
            outcome,
            Completion::Ignored {
                endpoint: Endpoint::Clv
            }
        );
        assert!(controller.clv_predictions().is_empty());

        controller.begin(Endpoint::Churn).unwrap();
        controller.complete(Endpoint::Clv, Ok(vec![9.0]));
        assert!(controller.is_loading());
        assert!(controller.clv_predictions().is_empty());
    }

    #[test]
    fn selecting_a_new_file_replaces_the_old_one() {
        let mut controller = UploadController::new();
        controller.select_file(csv());
        controller.select_file(SelectedFile::new("other.csv", b"x".to_vec()));
        assert_eq!(controller.selected_file().unwrap().name(), "other.csv");
    }
}
