//! Remote CLV and churn predictions over HTTP.

mod endpoint;
mod multipart;

pub mod api;

pub use api::{
    ManualPredictRequest, ManualPrediction, PredictError, PredictionClient, PredictionService,
    predict,
};
pub use endpoint::{Endpoint, UnknownEndpoint};
