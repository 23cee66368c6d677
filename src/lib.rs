//! Library exports for the dashboard binary, the CLI and tests.
/// Application directory resolution.
pub mod app_dirs;
/// Standalone CLV calculator.
pub mod calculator;
/// Persisted settings.
pub mod config;
/// egui front-end.
pub mod egui_app;
mod http_client;
/// Logging setup.
pub mod logging;
/// Cosmetic login gate.
pub mod login;
/// Prediction service client.
pub mod prediction;
/// File selection and upload state machine.
pub mod upload;
