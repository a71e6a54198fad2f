// src/core/service_client.rs
//! HTTP client for the remote resume analysis service

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use std::path::Path;
use tracing::{error, info, trace, warn};

use crate::core::config_manager::ServiceConfig;
use crate::types::response::{AtsCheckResponse, AtsServiceError};

const ATS_CHECK_ENDPOINT: &str = "/api/ats-check";

pub struct AtsServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl AtsServiceClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(config.service_url.clone(), config.timeout_seconds)
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url, ATS_CHECK_ENDPOINT)
    }

    /// Send a resume and job description; returns the free-text report.
    pub async fn check_resume(
        &self,
        resume: Vec<u8>,
        file_name: &str,
        job_description: &str,
    ) -> Result<String> {
        let content_type = content_type_for(file_name)?;
        let url = self.endpoint_url();

        let form = Form::new()
            .part(
                "file",
                Part::bytes(resume)
                    .file_name(file_name.to_string())
                    .mime_str(content_type)
                    .context("Failed to create multipart")?,
            )
            .text("job_description", job_description.to_string());

        info!("Calling ATS analysis service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Failed to send request to ATS analysis service")?;

        let status = response.status();
        trace!("Response status: {}", status);

        let response_text = response
            .text()
            .await
            .context("Failed to read response body")?;

        if status.is_success() {
            Ok(extract_report(&response_text))
        } else {
            let message = error_message(&response_text);

            error!("ATS analysis service error {}: {}", status, message);
            anyhow::bail!("ATS analysis service returned error {}: {}", status, message)
        }
    }

    /// Read a resume from disk and check it.
    pub async fn check_resume_file(&self, path: &Path, job_description: &str) -> Result<String> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid resume path: {}", path.display()))?
            .to_string();

        let resume = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        self.check_resume(resume, &file_name, job_description).await
    }
}

/// The service wraps the report as `{"analysis": ...}`; fall back to the raw body.
fn extract_report(body: &str) -> String {
    match serde_json::from_str::<AtsCheckResponse>(body) {
        Ok(parsed) => parsed.analysis,
        Err(_) => {
            warn!("Failed to parse ATS response as JSON, using raw response");
            body.to_string()
        }
    }
}

/// Error text from a non-2xx body: `detail`, then `error`, then the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<AtsServiceError>(body)
        .ok()
        .and_then(|e| e.message().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn content_type_for(file_name: &str) -> Result<&'static str> {
    match crate::utils::get_file_extension(file_name).as_deref() {
        Some("pdf") => Ok("application/pdf"),
        _ => anyhow::bail!("Unsupported file format: {}", file_name),
    }
}
