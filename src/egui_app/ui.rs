//! egui renderer for the dashboard, calculator and login screens.
use std::time::Duration;

use crate::config::AppSettings;
use crate::egui_app::controller::DashboardController;
use crate::egui_app::state::{CalculatorField, Screen, StatusTone};
use crate::egui_app::view_model;
use crate::prediction::Endpoint;
use eframe::egui::{self, Color32, RichText, Ui};

/// Smallest window size that keeps both prediction columns readable.
pub const MIN_VIEWPORT_SIZE: [f32; 2] = [720.0, 480.0];

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Renders the egui UI using the shared controller state.
pub struct DashboardApp {
    controller: DashboardController,
    visuals_set: bool,
}

impl DashboardApp {
    /// Create the app from loaded settings.
    pub fn new(settings: &AppSettings) -> Result<Self, String> {
        let controller = DashboardController::from_settings(settings)
            .map_err(|err| format!("Failed to configure prediction client: {err}"))?;
        Ok(Self {
            controller,
            visuals_set: false,
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = Color32::from_rgb(12, 12, 12);
        visuals.panel_fill = Color32::from_rgb(16, 16, 16);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("CUSTOMER LIFETIME VALUE PREDICTION")
                        .strong()
                        .color(Color32::WHITE),
                );
                ui.separator();
                let current = self.controller.ui.screen;
                for (screen, label) in [
                    (Screen::Dashboard, "Home"),
                    (Screen::Calculator, "Calculator"),
                ] {
                    if ui.selectable_label(current == screen, label).clicked() {
                        self.controller.show_screen(screen);
                    }
                }
            });
        });
    }

    fn render_login(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            ui.heading("LOGIN!");
            ui.add_space(12.0);
            let login = &mut self.controller.ui.login;
            ui.add(egui::TextEdit::singleline(&mut login.username).hint_text("Username"));
            ui.add(
                egui::TextEdit::singleline(&mut login.password)
                    .password(true)
                    .hint_text("Password"),
            );
            let ready = !login.username.is_empty() && !login.password.is_empty();
            if ui.add_enabled(ready, egui::Button::new("Login")).clicked() {
                self.controller.submit_login();
            }
        });
    }

    fn render_dashboard(&mut self, ui: &mut Ui) {
        ui.heading("Customer Analytics Dashboard");
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Choose CSV...").clicked() {
                self.controller.pick_csv_file();
            }
            let picked = self
                .controller
                .upload()
                .selected_file()
                .map(|file| file.name().to_string())
                .unwrap_or_else(|| "No file chosen".to_string());
            ui.label(picked);
        });
        let loading = self.controller.upload().is_loading();
        ui.horizontal(|ui| {
            for endpoint in Endpoint::ALL {
                let label = format!("Predict {}", endpoint.label());
                if ui.add_enabled(!loading, egui::Button::new(label)).clicked() {
                    self.controller.submit(endpoint);
                }
            }
        });
        if loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Processing...");
            });
        }
        if let Some(error) = self.controller.upload().error() {
            ui.colored_label(Color32::from_rgb(230, 90, 90), error);
        }
        ui.separator();
        ui.heading("Prediction Values");
        ui.columns(2, |columns| {
            let upload = self.controller.upload();
            render_rows(
                &mut columns[0],
                "CLV Prediction Values",
                view_model::clv_rows(upload.clv_predictions()),
                view_model::NO_CLV_ROWS,
            );
            render_rows(
                &mut columns[1],
                "Churn Prediction Values",
                view_model::churn_rows(upload.churn_predictions()),
                view_model::NO_CHURN_ROWS,
            );
        });
    }

    fn render_calculator(&mut self, ui: &mut Ui) {
        ui.heading("CLV Calculator");
        ui.label("Estimate your Customer Lifetime Value");
        ui.add_space(8.0);
        egui::Grid::new("calculator_inputs")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                for field in CalculatorField::ALL {
                    ui.label(field.label());
                    let mut text = self.controller.ui.calculator_fields.text(field).to_string();
                    if ui.text_edit_singleline(&mut text).changed() {
                        self.controller.set_calculator_field(field, text);
                    }
                    ui.end_row();
                }
            });
        ui.add_space(8.0);
        ui.label("Customer Lifetime Value");
        ui.label(
            RichText::new(view_model::calculator_result(
                self.controller.calculator().result(),
            ))
            .size(28.0)
            .strong(),
        );
        if ui.button("CALCULATE").clicked() {
            self.controller.calculate();
        }
        if ui.link("← Back to Home").clicked() {
            self.controller.show_screen(Screen::Dashboard);
        }
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let status = &self.controller.ui.status;
            let color = match status.tone {
                StatusTone::Idle => Color32::GRAY,
                StatusTone::Busy => Color32::from_rgb(90, 176, 255),
                StatusTone::Info => Color32::from_rgb(120, 200, 120),
                StatusTone::Error => Color32::from_rgb(230, 90, 90),
            };
            ui.colored_label(color, status.text.as_str());
        });
    }
}

fn render_rows(ui: &mut Ui, title: &str, rows: Vec<String>, empty: &str) {
    ui.label(RichText::new(title).strong());
    if rows.is_empty() {
        ui.label(empty);
        return;
    }
    egui::ScrollArea::vertical()
        .id_salt(title)
        .max_height(320.0)
        .show(ui, |ui| {
            for row in rows {
                ui.label(row);
            }
        });
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_jobs();
        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| match self.controller.ui.screen {
            Screen::Login => self.render_login(ui),
            Screen::Dashboard => self.render_dashboard(ui),
            Screen::Calculator => self.render_calculator(ui),
        });
        if self.controller.upload().is_loading() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}
