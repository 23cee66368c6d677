//! egui front-end for the prediction dashboard.
/// Dashboard controller bridging the upload flow to the UI.
pub mod controller;
/// UI state shared between the controller and renderer.
pub mod state;
/// egui renderer.
pub mod ui;
/// Display formatting for prediction rows and the calculator.
pub mod view_model;
