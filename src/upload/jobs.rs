use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender, TryRecvError},
    },
    thread,
};

use crate::prediction::{Endpoint, PredictError, PredictionService};

use super::PendingUpload;

/// Result of one background upload.
#[derive(Debug)]
pub struct PredictionJobResult {
    pub endpoint: Endpoint,
    pub result: Result<Vec<f64>, PredictError>,
}

/// Runs uploads off the UI thread and hands results back through a channel.
///
/// The UI loop calls [`PredictionJobs::poll`] each frame.
pub struct PredictionJobs {
    service: Arc<dyn PredictionService>,
    message_tx: Sender<PredictionJobResult>,
    message_rx: Receiver<PredictionJobResult>,
    in_progress: bool,
}

impl PredictionJobs {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        let (message_tx, message_rx) = mpsc::channel();
        Self {
            service,
            message_tx,
            message_rx,
            in_progress: false,
        }
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Start sending `upload` on a worker thread. Refused while a job runs.
    pub fn begin(&mut self, upload: PendingUpload) -> bool {
        if self.in_progress {
            return false;
        }
        self.in_progress = true;
        let tx = self.message_tx.clone();
        let service = Arc::clone(&self.service);
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                service.predict(upload.endpoint, &upload.file)
            }))
            .unwrap_or_else(|_| {
                tracing::error!("Prediction worker panicked during {} upload", upload.endpoint);
                Err(PredictError::Transport("prediction worker panicked".to_string()))
            });
            let _ = tx.send(PredictionJobResult {
                endpoint: upload.endpoint,
                result,
            });
        });
        true
    }

    /// Return the finished job, if any, without blocking.
    pub fn poll(&mut self) -> Option<PredictionJobResult> {
        match self.message_rx.try_recv() {
            Ok(message) => {
                self.in_progress = false;
                Some(message)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
