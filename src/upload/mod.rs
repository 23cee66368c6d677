//! Upload flow: file selection, request state machine and background jobs.

mod controller;
mod file;
mod jobs;

pub use controller::{
    Completion, NO_FILE_MESSAGE, NO_PREDICTIONS_MESSAGE, PendingUpload, REQUEST_FAILED_MESSAGE,
    RequestPhase, UploadController, UploadError, user_message,
};
pub use file::SelectedFile;
pub use jobs::{PredictionJobResult, PredictionJobs};
