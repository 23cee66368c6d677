mod support;

use std::net::TcpListener;

use clvdash::config::{self, ServiceSettings};
use clvdash::prediction::{
    Endpoint, ManualPredictRequest, ManualPrediction, PredictError, PredictionClient, predict,
};
use clvdash::upload::{
    Completion, NO_FILE_MESSAGE, NO_PREDICTIONS_MESSAGE, REQUEST_FAILED_MESSAGE, SelectedFile,
    UploadController, UploadError,
};
use support::clvdash_env::ClvdashEnvGuard;
use support::mock_service::{MockService, closed_base_url};
use tempfile::tempdir;
use url::Url;

const CSV: &[u8] = b"customerid,recency,frequency,monetary\n17,4,12,820.5\n";

fn client_for(base_url: &str) -> PredictionClient {
    let settings = ServiceSettings {
        base_url: base_url.to_string(),
        connect_timeout_secs: 2,
        read_timeout_secs: 5,
        write_timeout_secs: 5,
        ..ServiceSettings::default()
    };
    PredictionClient::new(&settings).expect("client")
}

fn controller_with_file() -> UploadController {
    let mut controller = UploadController::new();
    controller.select_file(SelectedFile::new("customers.csv", CSV.to_vec()));
    controller
}

#[test]
fn clv_upload_posts_multipart_and_stores_predictions() {
    let service = MockService::respond("200 OK", r#"{"predictions": [120.5, 88.0]}"#);
    let client = client_for(&service.base_url);
    let mut controller = controller_with_file();

    let completion = controller.submit_with(&client, Endpoint::Clv).unwrap();
    assert_eq!(
        completion,
        Completion::Stored {
            endpoint: Endpoint::Clv,
            count: 2
        }
    );
    assert_eq!(controller.clv_predictions(), &[120.5, 88.0]);
    assert!(controller.churn_predictions().is_empty());
    assert!(controller.error().is_none());
    assert!(!controller.is_loading());

    let request = service.request();
    assert!(request.starts_with("POST /predict-clv HTTP/1.1"), "{request}");
    assert!(
        request
            .to_ascii_lowercase()
            .contains("content-type: multipart/form-data; boundary=")
    );
    assert!(request.contains(r#"name="file"; filename="customers.csv""#));
    assert!(request.contains("17,4,12,820.5"));
}

#[test]
fn churn_server_error_shows_generic_message() {
    let service = MockService::respond("500 INTERNAL SERVER ERROR", r#"{"error": "boom"}"#);
    let client = client_for(&service.base_url);

    let err = client
        .predict(Endpoint::Churn, &SelectedFile::new("customers.csv", CSV.to_vec()))
        .unwrap_err();
    match err {
        PredictError::Server {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "INTERNAL SERVER ERROR");
            assert!(body.contains("boom"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let request = service.request();
    assert!(request.starts_with("POST /predict-churn HTTP/1.1"), "{request}");
}

#[test]
fn server_error_through_controller_keeps_previous_results() {
    let service = MockService::respond("500 INTERNAL SERVER ERROR", "{}");
    let client = client_for(&service.base_url);
    let mut controller = controller_with_file();

    let completion = controller.submit_with(&client, Endpoint::Churn).unwrap();
    assert_eq!(
        completion,
        Completion::Failed {
            endpoint: Endpoint::Churn
        }
    );
    assert_eq!(controller.error(), Some(REQUEST_FAILED_MESSAGE));
    assert!(controller.churn_predictions().is_empty());
    let _ = service.request();
}

#[test]
fn missing_predictions_field_reports_no_predictions() {
    let service = MockService::respond("200 OK", r#"{"result": [1, 0]}"#);
    let client = client_for(&service.base_url);
    let mut controller = controller_with_file();

    controller.submit_with(&client, Endpoint::Churn).unwrap();
    assert_eq!(controller.error(), Some(NO_PREDICTIONS_MESSAGE));
    assert!(controller.churn_predictions().is_empty());
    let _ = service.request();
}

#[test]
fn non_json_body_is_a_decode_error() {
    let service = MockService::respond("200 OK", "<html>oops</html>");
    let client = client_for(&service.base_url);

    let err = client
        .predict(Endpoint::Clv, &SelectedFile::new("customers.csv", CSV.to_vec()))
        .unwrap_err();
    assert!(matches!(err, PredictError::Decode(_)), "{err:?}");
    let _ = service.request();
}

#[test]
fn unreachable_service_is_a_transport_error() {
    let client = client_for(&closed_base_url());
    let mut controller = controller_with_file();

    let err = client
        .predict(Endpoint::Clv, &SelectedFile::new("customers.csv", CSV.to_vec()))
        .unwrap_err();
    assert!(matches!(err, PredictError::Transport(_)), "{err:?}");

    controller.submit_with(&client, Endpoint::Clv).unwrap();
    assert_eq!(controller.error(), Some(REQUEST_FAILED_MESSAGE));
    assert!(!controller.is_loading());
}

#[test]
fn submit_without_file_never_contacts_the_service() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let client = client_for(&base_url);
    let mut controller = UploadController::new();

    let err = controller.submit_with(&client, Endpoint::Clv).unwrap_err();
    assert_eq!(err, UploadError::NoFileSelected);
    assert_eq!(controller.error(), Some(NO_FILE_MESSAGE));
    let accepted = listener.accept();
    assert!(
        matches!(&accepted, Err(err) if err.kind() == std::io::ErrorKind::WouldBlock),
        "unexpected connection"
    );
}

#[test]
fn service_url_env_overrides_stored_config() {
    let dir = tempdir().unwrap();
    let _guard = ClvdashEnvGuard::set(dir.path().to_path_buf(), Some("http://10.0.0.7:8000"));

    let mut settings = config::load_or_default().unwrap();
    assert_eq!(settings.service.base_url, "http://10.0.0.7:8000");

    settings.service.base_url = "http://127.0.0.1:6000".to_string();
    config::save(&settings).unwrap();
    let reloaded = config::load_or_default().unwrap();
    assert_eq!(reloaded.service.base_url, "http://10.0.0.7:8000");
    assert!(config::config_path().unwrap().starts_with(dir.path()));
}

#[test]
fn stored_config_is_used_without_env_override() {
    let dir = tempdir().unwrap();
    let _guard = ClvdashEnvGuard::set_config_home(dir.path().to_path_buf());

    let mut settings = config::load_or_default().unwrap();
    settings.service.base_url = "https://predict.example.com/api".to_string();
    config::save(&settings).unwrap();

    let reloaded = config::load_or_default().unwrap();
    let client = PredictionClient::new(&reloaded.service).unwrap();
    assert_eq!(client.base_url().as_str(), "https://predict.example.com/api/");
}

#[test]
fn one_off_predict_uses_default_client() {
    let service = MockService::respond("200 OK", r#"{"predictions": [1.5]}"#);
    let base_url = Url::parse(&service.base_url).unwrap();

    let predictions = predict(
        &base_url,
        Endpoint::Clv,
        &SelectedFile::new("customers.csv", CSV.to_vec()),
    )
    .unwrap();
    assert_eq!(predictions, vec![1.5]);
    assert!(service.request().starts_with("POST /predict-clv HTTP/1.1"));
}

#[test]
fn manual_predict_posts_json_figures() {
    let service = MockService::respond("200 OK", r#"{"clv": 1250.5, "churn": 1}"#);
    let client = client_for(&service.base_url);

    let prediction = client
        .manual_predict(&ManualPredictRequest {
            purchases: 5.0,
            frequency: 2.0,
            tenure: 12.0,
            avg_order_value: 40.0,
        })
        .unwrap();
    assert_eq!(
        prediction,
        ManualPrediction {
            clv: 1250.5,
            churn: 1
        }
    );

    let request = service.request();
    assert!(request.starts_with("POST /manual-predict HTTP/1.1"), "{request}");
    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(request.contains(r#""avg_order_value":40.0"#), "{request}");
}

#[test]
fn zero_timeouts_in_config_disable_them() {
    let service = MockService::respond("200 OK", r#"{"predictions": [1.0]}"#);
    let dir = tempdir().unwrap();
    let path = dir.path().join(config::CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        format!(
            "[service]\nbase_url = \"{}\"\nconnect_timeout_secs = 0\nread_timeout_secs = 0\nwrite_timeout_secs = 0\n",
            service.base_url
        ),
    )
    .unwrap();

    let settings = config::load_settings_from(&path).unwrap();
    assert_eq!(settings.service.connect_timeout_secs, 0);
    let client = PredictionClient::new(&settings.service).unwrap();
    let predictions = client
        .predict(Endpoint::Clv, &SelectedFile::new("customers.csv", CSV.to_vec()))
        .unwrap();
    assert_eq!(predictions, vec![1.0]);
    let _ = service.request();
}
