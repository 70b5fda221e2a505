mod error;
mod multipart;
mod state;

pub use state::AppState;

use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{dev::Server, get, middleware, post, web, App, HttpResponse, HttpServer};
use futures::StreamExt;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::application::UploadedFile;
use crate::domain::analytics::{CorrelationRequest, StatsRequest};
use crate::domain::error::{AppError, Result};
use crate::domain::table::Record;
use crate::infrastructure::config::ServiceConfig;

#[derive(Serialize)]
pub struct UploadResponse {
    pub data: Vec<Record>,
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

#[post("/upload")]
async fn upload(data: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    let use_case = &data.upload_use_case;
    let file: UploadedFile =
        multipart::read_file_field(payload, data.max_upload_bytes, |filename| {
            use_case.accept(filename).map(|_| ())
        })
        .await?;

    info!(file = %file.filename, bytes = file.bytes.len(), "upload received");

    let records = use_case.execute(file).await?;
    Ok(HttpResponse::Ok().json(UploadResponse { data: records }))
}

#[post("/stats")]
async fn column_stats(data: web::Data<AppState>, payload: web::Payload) -> Result<HttpResponse> {
    let body = read_json_body(payload, data.max_json_bytes).await?;
    let request = StatsRequest::from_json(body)?;

    info!(column = %request.column, rows = request.rows.len(), "computing column stats");

    let result = data.stats_use_case.execute(&request)?;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/correlation")]
async fn correlation(data: web::Data<AppState>, payload: web::Payload) -> Result<HttpResponse> {
    let body = read_json_body(payload, data.max_json_bytes).await?;
    let request = CorrelationRequest::from_json(body)?;

    info!(len = request.column1.len(), "computing correlation");

    let result = data.correlation_use_case.execute(&request)?;
    Ok(HttpResponse::Ok().json(result))
}

/// Buffer the body up to `limit` bytes and decode it as JSON. A body that is
/// empty or not JSON yields `None`; the caller decides how to report that.
async fn read_json_body(mut payload: web::Payload, limit: usize) -> Result<Option<Value>> {
    let mut body = web::BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            AppError::ValidationError(format!("Failed to read request body: {}", e))
        })?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge("Request body too large".to_string()));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(serde_json::from_slice(&body).ok())
}

/// Route table, shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(upload).service(
        web::scope("/api")
            .service(column_stats)
            .service(correlation),
    );
}

pub fn start_server(state: AppState, config: &ServiceConfig) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let mut server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Any origin may call the API

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    });

    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    let server = server.bind((config.host.as_str(), config.port))?.run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::bootstrap;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;
    use serde_json::json;

    const BOUNDARY: &str = "sheetstats-test-boundary";

    fn test_config(dir: &std::path::Path) -> ServiceConfig {
        ServiceConfig {
            upload_dir: dir.join("uploads"),
            max_upload_bytes: 1024,
            ..ServiceConfig::default()
        }
    }

    fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
        let disposition = match filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", field),
        };

        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
    }

    macro_rules! app {
        ($config:expr) => {{
            let state = bootstrap::setup(&$config).unwrap();
            test::init_service(
                App::new()
                    .wrap(Cors::permissive())
                    .app_data(web::Data::new(state))
                    .configure(configure),
            )
            .await
        }};
    }

    macro_rules! call_json {
        ($app:expr, $req:expr) => {{
            let resp = test::call_service(&$app, $req.to_request()).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    fn post_json(uri: &str, body: Value) -> test::TestRequest {
        test::TestRequest::post().uri(uri).set_json(body)
    }

    #[actix_web::test]
    async fn test_health() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(&test::read_body(resp).await[..], b"OK");
    }

    #[actix_web::test]
    async fn test_upload_csv_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let app = app!(config);

        let body = multipart_body("file", Some("data.csv"), b"A,B\n1,2\n");
        let (status, json) = call_json!(app, upload_request(body));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"data": [{"A": 1, "B": 2}]}));
        assert!(config.upload_dir.join("data.csv").exists());
    }

    #[actix_web::test]
    async fn test_upload_drops_empty_and_unnamed_columns() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let csv = b"A,,blank,B\n1,x,,2\n3,y,,4\n";
        let body = multipart_body("file", Some("prune.csv"), csv);
        let (status, json) = call_json!(app, upload_request(body));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"data": [{"A": 1, "B": 2}, {"A": 3, "B": 4}]}));
    }

    #[actix_web::test]
    async fn test_upload_rejects_invalid_type_without_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let app = app!(config);

        let body = multipart_body("file", Some("notes.txt"), b"hello");
        let (status, json) = call_json!(app, upload_request(body));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({"error": "Invalid file type"}));
        assert_eq!(std::fs::read_dir(&config.upload_dir).unwrap().count(), 0);
    }

    #[actix_web::test]
    async fn test_upload_without_file_part() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let body = multipart_body("other", None, b"value");
        let (status, json) = call_json!(app, upload_request(body));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({"error": "No file part"}));
    }

    #[actix_web::test]
    async fn test_upload_with_empty_filename() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let body = multipart_body("file", Some(""), b"");
        let (status, json) = call_json!(app, upload_request(body));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({"error": "No selected file"}));
    }

    #[actix_web::test]
    async fn test_upload_over_limit() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let big = vec![b'1'; 4096];
        let body = multipart_body("file", Some("big.csv"), &big);
        let (status, json) = call_json!(app, upload_request(body));

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json, json!({"error": "File too large"}));
    }

    #[actix_web::test]
    async fn test_upload_traversal_name_stays_in_upload_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let app = app!(config);

        let body = multipart_body("file", Some("../escape.csv"), b"a\n1\n");
        let (status, _) = call_json!(app, upload_request(body));

        assert_eq!(status, StatusCode::OK);
        assert!(config.upload_dir.join("escape.csv").exists());
        assert!(!tmp.path().join("escape.csv").exists());
    }

    #[actix_web::test]
    async fn test_upload_unreadable_excel() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let body = multipart_body("file", Some("book.xls"), b"garbage");
        let (status, json) = call_json!(app, upload_request(body));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = json["error"].as_str().unwrap();
        assert!(message.starts_with("Unable to read Excel file: "));
    }

    #[actix_web::test]
    async fn test_stats_of_numeric_column() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let req = post_json(
            "/api/stats",
            json!({"column": "x", "data": [{"x": 1}, {"x": 2}, {"x": 3}, {"x": 4}]}),
        );
        let (status, json) = call_json!(app, req);

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "mean": 2.5,
                "median": 2.5,
                "min": 1,
                "max": 4,
                "quartiles": [1.75, 2.5, 3.25]
            })
        );
    }

    #[actix_web::test]
    async fn test_stats_without_numeric_data_is_404() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let req = post_json("/api/stats", json!({"column": "x", "data": [{"x": "a"}, {"x": "b"}]}));
        let (status, json) = call_json!(app, req);

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json,
            json!({"error": "Column not found in data or contains no valid numeric data"})
        );
    }

    #[actix_web::test]
    async fn test_stats_validation_messages() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let cases = [
            (json!({"data": [{"x": 1}]}), "Column is required"),
            (json!({"column": "x"}), "Data is required"),
            (json!({"column": "x", "data": {"x": 1}}), "Data should be a list"),
            (json!({"column": "x", "data": [{"x": 1}, "row"]}), "All items in data should be dictionaries"),
        ];

        for (body, expected) in cases {
            let (status, json) = call_json!(app, post_json("/api/stats", body));
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json, json!({"error": expected}));
        }
    }

    #[actix_web::test]
    async fn test_stats_rejects_non_json_body() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let req = test::TestRequest::post()
            .uri("/api/stats")
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .set_payload("column=x");
        let (status, json) = call_json!(app, req);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({"error": "Request data is empty or not JSON"}));
    }

    #[actix_web::test]
    async fn test_correlation_of_identical_columns() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let req = post_json("/api/correlation", json!({"column1": [1, 2, 3], "column2": [1, 2, 3]}));
        let (status, json) = call_json!(app, req);

        assert_eq!(status, StatusCode::OK);
        let r = json["correlation"].as_f64().unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[actix_web::test]
    async fn test_correlation_length_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let req = post_json("/api/correlation", json!({"column1": [1, 2, 3], "column2": [1, 2]}));
        let (status, json) = call_json!(app, req);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({"error": "Columns must be of the same length"}));
    }

    #[actix_web::test]
    async fn test_correlation_degenerate_input_is_500() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let req = post_json("/api/correlation", json!({"column1": [5, 5, 5], "column2": [1, 2, 3]}));
        let (status, json) = call_json!(app, req);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("constant"));
    }

    #[actix_web::test]
    async fn test_correlation_of_repeated_fraction_is_500() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let req = post_json(
            "/api/correlation",
            json!({"column1": [0.1, 0.1, 0.1], "column2": [1, 2, 4]}),
        );
        let (status, json) = call_json!(app, req);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json,
            json!({"error": "An input array is constant; the correlation coefficient is not defined."})
        );
    }

    #[actix_web::test]
    async fn test_cors_allows_any_origin() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app!(test_config(tmp.path()));

        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header((header::ORIGIN, "http://example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
