//! Headless companion to the dashboard: predictions, calculator and settings.

use std::path::PathBuf;

use clvdash::calculator::{CalculatorInputs, calculate_clv, parse_input};
use clvdash::config::{self, AppSettings};
use clvdash::egui_app::view_model;
use clvdash::logging::{self, ConsoleTarget};
use clvdash::prediction::{Endpoint, ManualPredictRequest, PredictionClient};
use clvdash::upload::{SelectedFile, UploadController, UploadError};

fn main() {
    if let Err(err) = logging::init_with(ConsoleTarget::Stderr) {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

enum Command {
    Predict {
        endpoint: Endpoint,
        file: PathBuf,
        base_url: Option<String>,
    },
    Manual {
        request: ManualPredictRequest,
        base_url: Option<String>,
    },
    Calc {
        overrides: Vec<(CalcInput, f64)>,
    },
    SetUrl {
        base_url: String,
    },
    ConfigPath,
}

#[derive(Clone, Copy)]
enum CalcInput {
    AcquisitionCost,
    RevenuePerUser,
    RetentionRate,
    Customers,
}

fn run() -> Result<(), String> {
    let cmd = parse_args(std::env::args().skip(1).collect())?;
    match cmd {
        Command::Predict {
            endpoint,
            file,
            base_url,
        } => run_predict(endpoint, &file, base_url),
        Command::Manual { request, base_url } => run_manual(&request, base_url),
        Command::Calc { overrides } => run_calc(&overrides),
        Command::SetUrl { base_url } => set_base_url(base_url),
        Command::ConfigPath => {
            let path = config::config_path().map_err(|err| err.to_string())?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn load_settings(base_url: Option<String>) -> Result<AppSettings, String> {
    let mut settings = config::load_or_default().map_err(|err| err.to_string())?;
    if let Some(url) = base_url {
        settings.service.base_url = url;
    }
    Ok(settings)
}

fn run_predict(endpoint: Endpoint, path: &PathBuf, base_url: Option<String>) -> Result<(), String> {
    let settings = load_settings(base_url)?;
    let client = PredictionClient::new(&settings.service).map_err(|err| err.to_string())?;
    let file = SelectedFile::read(path)
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;

    let mut controller = UploadController::new();
    controller.select_file(file);
    match controller.submit_with(&client, endpoint) {
        Ok(_) => {}
        Err(UploadError::NoFileSelected) | Err(UploadError::RequestInFlight(_)) => {
            return Err(controller
                .error()
                .unwrap_or("Upload could not be started.")
                .to_string());
        }
    }
    if let Some(error) = controller.error() {
        return Err(error.to_string());
    }

    let (rows, empty) = match endpoint {
        Endpoint::Clv => (
            view_model::clv_rows(controller.clv_predictions()),
            view_model::NO_CLV_ROWS,
        ),
        Endpoint::Churn => (
            view_model::churn_rows(controller.churn_predictions()),
            view_model::NO_CHURN_ROWS,
        ),
    };
    if rows.is_empty() {
        println!("{empty}");
    }
    for row in rows {
        println!("{row}");
    }
    Ok(())
}

fn run_manual(request: &ManualPredictRequest, base_url: Option<String>) -> Result<(), String> {
    let settings = load_settings(base_url)?;
    let client = PredictionClient::new(&settings.service).map_err(|err| err.to_string())?;
    let prediction = client.manual_predict(request).map_err(|err| {
        tracing::warn!("Manual prediction failed: {err}");
        "Error processing the request.".to_string()
    })?;
    println!("CLV: {}", view_model::currency(prediction.clv));
    println!("Churn: {}", view_model::churn_label(f64::from(prediction.churn)));
    Ok(())
}

fn run_calc(overrides: &[(CalcInput, f64)]) -> Result<(), String> {
    let settings = config::load_or_default().map_err(|err| err.to_string())?;
    let mut inputs = CalculatorInputs::from(settings.calculator);
    for (input, value) in overrides {
        let slot = match input {
            CalcInput::AcquisitionCost => &mut inputs.acquisition_cost,
            CalcInput::RevenuePerUser => &mut inputs.revenue_per_user,
            CalcInput::RetentionRate => &mut inputs.retention_rate,
            CalcInput::Customers => &mut inputs.number_of_customers,
        };
        *slot = *value;
    }
    println!(
        "Customer Lifetime Value: {}",
        view_model::calculator_result(calculate_clv(&inputs))
    );
    Ok(())
}

fn set_base_url(base_url: String) -> Result<(), String> {
    let parsed = config::parse_base_url(&base_url).map_err(|err| err.to_string())?;
    let path = config::config_path().map_err(|err| err.to_string())?;
    let mut settings = config::load_settings_from(&path).map_err(|err| err.to_string())?;
    settings.service.base_url = base_url.trim().to_string();
    config::save(&settings).map_err(|err| err.to_string())?;
    println!("Prediction service set to {parsed}");
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Command, String> {
    if args.is_empty() {
        return Err(help_text());
    }
    let mut idx = 0usize;
    let command = args.get(idx).map(|s| s.as_str()).unwrap_or("");
    idx += 1;

    match command {
        "predict-clv" | "predict-churn" => {
            let endpoint = command.parse::<Endpoint>().map_err(|err| err.to_string())?;
            let mut file = None;
            let mut base_url = None;
            while idx < args.len() {
                match args[idx].as_str() {
                    "--base-url" => {
                        idx += 1;
                        let value = args
                            .get(idx)
                            .ok_or_else(|| "--base-url requires a value".to_string())?;
                        base_url = Some(value.to_string());
                    }
                    flag if flag.starts_with("--") => {
                        return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
                    }
                    value => file = Some(PathBuf::from(value)),
                }
                idx += 1;
            }
            let file = file.ok_or_else(|| "Please upload a CSV file.".to_string())?;
            Ok(Command::Predict {
                endpoint,
                file,
                base_url,
            })
        }
        "manual" => {
            let mut values = Vec::new();
            let mut base_url = None;
            while idx < args.len() {
                match args[idx].as_str() {
                    "--base-url" => {
                        idx += 1;
                        let value = args
                            .get(idx)
                            .ok_or_else(|| "--base-url requires a value".to_string())?;
                        base_url = Some(value.to_string());
                    }
                    value => values.push(
                        value
                            .parse::<f64>()
                            .map_err(|_| format!("Invalid number: {value}"))?,
                    ),
                }
                idx += 1;
            }
            let [purchases, frequency, tenure, avg_order_value] = values[..] else {
                return Err(
                    "manual requires <purchases> <frequency> <tenure> <avg_order_value>"
                        .to_string(),
                );
            };
            Ok(Command::Manual {
                request: ManualPredictRequest {
                    purchases,
                    frequency,
                    tenure,
                    avg_order_value,
                },
                base_url,
            })
        }
        "calc" => {
            let mut overrides = Vec::new();
            while idx < args.len() {
                let input = match args[idx].as_str() {
                    "--acquisition-cost" => CalcInput::AcquisitionCost,
                    "--revenue-per-user" => CalcInput::RevenuePerUser,
                    "--retention-rate" => CalcInput::RetentionRate,
                    "--customers" => CalcInput::Customers,
                    unknown => {
                        return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
                    }
                };
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| format!("{} requires a value", args[idx - 1]))?;
                overrides.push((input, parse_input(value)));
                idx += 1;
            }
            Ok(Command::Calc { overrides })
        }
        "set-url" => {
            let base_url = args
                .get(idx)
                .ok_or_else(|| "set-url requires a URL".to_string())?;
            Ok(Command::SetUrl {
                base_url: base_url.to_string(),
            })
        }
        "config-path" => Ok(Command::ConfigPath),
        _ => Err(help_text()),
    }
}

fn help_text() -> String {
    [
        "Usage:",
        "  clvdash-cli predict-clv <file.csv> [--base-url URL]",
        "  clvdash-cli predict-churn <file.csv> [--base-url URL]",
        "  clvdash-cli manual <purchases> <frequency> <tenure> <avg_order_value> [--base-url URL]",
        "  clvdash-cli calc [--acquisition-cost N] [--revenue-per-user N] [--retention-rate N] [--customers N]",
        "  clvdash-cli set-url <URL>",
        "  clvdash-cli config-path",
    ]
    .join("\n")
}
