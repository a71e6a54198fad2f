// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::analysis::ReportParser;
use crate::core::{AtsServiceClient, ConfigManager};
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/ats-check", data = "<upload>")]
pub async fn ats_check(
    upload: Form<AtsCheckForm<'_>>,
    client: &State<AtsServiceClient>,
    parser: &State<ReportParser>,
) -> Result<Json<DataResponse<AtsCheckData>>, Json<StandardErrorResponse>> {
    handlers::ats_check_handler(upload, client, parser).await
}

#[post("/ats-parse", format = "json", data = "<request>")]
pub async fn parse_report(
    request: Json<StandardRequest<ParseReportRequest>>,
    parser: &State<ReportParser>,
) -> Result<Json<DataResponse<AtsCheckData>>, Json<StandardErrorResponse>> {
    handlers::parse_report_handler(request, parser).await
}

#[get("/health")]
pub async fn health() -> Json<&'static str> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    handlers::file_too_large(None)
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be read".to_string(),
        "UNPROCESSABLE_ENTITY".to_string(),
        vec!["Send the report as JSON: {\"report\": \"...\"}".to_string()],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

/// Assemble the server without launching it.
pub fn build_rocket(config: &ConfigManager) -> Result<Rocket<Build>> {
    let client = AtsServiceClient::from_config(&config.service)?;

    // Accept files past MAX_RESUME_SIZE so the handler can report them as too large
    let limits = Limits::default()
        .limit("file", 20.mebibytes())
        .limit("data-form", 21.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("port", config.port))
        .merge(("limits", limits));

    Ok(rocket::custom(figment)
        .attach(Cors)
        .manage(client)
        .manage(ReportParser::new())
        .register(
            "/api",
            catchers![bad_request, payload_too_large, unprocessable, internal_error],
        )
        .mount("/api", routes![ats_check, parse_report, health, options]))
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    let rocket = build_rocket(&config)?;

    info!("Starting ATS Checker API server");
    info!("Server: http://0.0.0.0:{}", config.port);
    info!("ATS service: {}", config.service.service_url);

    rocket
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::http::ContentType;
    use rocket::local::blocking::Client;
    use rocket::serde::json::Value;

    const BOUNDARY: &str = "X-ATS-BOUNDARY";

    fn client() -> Client {
        client_with(ConfigManager::defaults("local"))
    }

    fn client_with(config: ConfigManager) -> Client {
        let rocket = build_rocket(&config).unwrap();
        Client::tracked(rocket).unwrap()
    }

    fn multipart_type() -> ContentType {
        ContentType::new("multipart", "form-data").with_params(("boundary", BOUNDARY))
    }

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
            b = BOUNDARY
        )
    }

    fn file_part(file_name: &str, content_type: &str, body: &str) -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n{body}\r\n",
            b = BOUNDARY
        )
    }

    fn post_form(client: &Client, parts: &[String]) -> Value {
        post_body(client, parts.concat().into_bytes())
    }

    /// Close the multipart body and post it
    fn post_body(client: &Client, mut body: Vec<u8>) -> Value {
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        let response = client
            .post("/api/ats-check")
            .header(multipart_type())
            .body(body)
            .dispatch();
        assert_eq!(response.status(), Status::Ok);
        response.into_json().unwrap()
    }

    #[test]
    fn test_health() {
        let client = client();
        let response = client.get("/api/health").dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_string().unwrap(), "\"OK\"");
    }

    #[test]
    fn test_parse_report_endpoint() {
        let client = client();
        let response = client
            .post("/api/ats-parse")
            .header(ContentType::JSON)
            .body(
                r#"{"report": "Combat Rating (0-100): 87\nStrengths:\n- Rust\n", "conversation_id": "c-1"}"#,
            )
            .dispatch();
        assert_eq!(response.status(), Status::Ok);

        let json: Value = response.into_json().unwrap();
        assert_eq!(json["type"], "data");
        assert_eq!(json["success"], true);
        assert_eq!(json["conversation_id"], "c-1");
        assert_eq!(json["data"]["analysis"]["score"], 87);
        assert_eq!(json["data"]["analysis"]["strengths"][0], "Rust");
        assert_eq!(json["data"]["remaining"], 13);
        assert_eq!(json["display_format"]["sections"][0]["content"], "87/100");
    }

    #[test]
    fn test_parse_report_endpoint_defaults_on_noise() {
        let client = client();
        let response = client
            .post("/api/ats-parse")
            .header(ContentType::JSON)
            .body(r#"{"report": ""}"#)
            .dispatch();
        let json: Value = response.into_json().unwrap();
        assert_eq!(json["data"]["analysis"]["score"], 50);
        assert!(json["data"]["analysis"]["weaknesses"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_ats_check_requires_job_description() {
        let client = client();
        let json = post_form(
            &client,
            &[
                text_part("job_description", "   "),
                file_part("cv.pdf", "application/pdf", "%PDF-1.4"),
            ],
        );
        assert_eq!(json["success"], false);
        assert_eq!(json["error_code"], "MISSING_JOB_DESCRIPTION");
    }

    #[test]
    fn test_ats_check_requires_resume() {
        let client = client();
        let json = post_form(
            &client,
            &[
                text_part("job_description", "Rust developer"),
                text_part("conversation_id", "c-2"),
            ],
        );
        assert_eq!(json["error_code"], "MISSING_RESUME");
        assert_eq!(json["conversation_id"], "c-2");
    }

    #[test]
    fn test_ats_check_rejects_non_pdf() {
        let client = client();
        let json = post_form(
            &client,
            &[
                text_part("job_description", "Rust developer"),
                file_part("notes.txt", "text/plain", "hello"),
            ],
        );
        assert_eq!(json["error_code"], "INVALID_FORMAT");
    }

    #[test]
    fn test_options_preflight() {
        let client = client();
        let response = client.options("/api/ats-check").dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("*")
        );
    }

    #[test]
    fn test_ats_check_rejects_oversized_resume() {
        let client = client();

        let mut body = text_part("job_description", "Rust developer").into_bytes();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\n\
                 Content-Type: application/pdf\r\n\r\n",
                b = BOUNDARY
            )
            .as_bytes(),
        );
        body.extend(std::iter::repeat(b'a').take(10 * 1024 * 1024 + 100));
        body.extend_from_slice(b"\r\n");

        let json = post_body(&client, body);
        assert_eq!(json["success"], false);
        assert_eq!(json["error_code"], "FILE_TOO_LARGE");
    }

    #[test]
    fn test_ats_check_reports_unreachable_service() {
        let mut config = ConfigManager::defaults("local");
        // Nothing listens on port 1
        config.service.service_url = "http://127.0.0.1:1".to_string();
        config.service.timeout_seconds = 5;
        let client = client_with(config);

        let json = post_form(
            &client,
            &[
                text_part("job_description", "Rust developer"),
                text_part("conversation_id", "c-3"),
                file_part("cv.pdf", "application/pdf", "%PDF-1.4"),
            ],
        );
        assert_eq!(json["success"], false);
        assert_eq!(json["error_code"], "ANALYSIS_FAILED");
        assert_eq!(json["error"], "Failed to analyze resume. Please try again.");
        assert_eq!(json["conversation_id"], "c-3");
    }
}
