// src/web/handlers/ats_handlers.rs
//! ATS check and report parsing handlers

use crate::analysis::{AnalysisResult, ReportParser, Section};
use crate::core::AtsServiceClient;
use crate::utils::{normalize_job_description, resume_file_name, MAX_RESUME_SIZE};
use crate::web::types::{
    AtsCheckData, AtsCheckForm, DataResponse, DisplayFormat, DisplaySection, ParseReportRequest,
    StandardErrorResponse, StandardRequest, WithConversationId,
};

use rocket::form::error::ErrorKind;
use rocket::form::{Errors, Form};
use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket::State;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

type HandlerResult = Result<Json<DataResponse<AtsCheckData>>, Json<StandardErrorResponse>>;

pub async fn ats_check_handler(
    upload: Form<AtsCheckForm<'_>>,
    client: &State<AtsServiceClient>,
    parser: &State<ReportParser>,
) -> HandlerResult {
    let conversation_id = upload.conversation_id();

    let job_description = match upload
        .job_description
        .as_deref()
        .and_then(normalize_job_description)
    {
        Some(text) => text,
        None => {
            return Err(Json(StandardErrorResponse::new(
                "Please provide a job description".to_string(),
                "MISSING_JOB_DESCRIPTION".to_string(),
                vec!["Paste the job description text".to_string()],
                conversation_id,
            )))
        }
    };

    let file = match upload.file.as_ref() {
        Ok(file) if file.len() > 0 => file,
        Ok(_) => return Err(missing_resume(conversation_id)),
        Err(errors) if exceeds_limit(errors) => return Err(file_too_large(conversation_id)),
        Err(errors) => {
            info!("Resume field rejected: {}", errors);
            return Err(missing_resume(conversation_id));
        }
    };

    if !is_pdf(file) {
        let received_type = file
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        return Err(Json(StandardErrorResponse::new(
            format!("Only PDF resumes are supported. Received: {}", received_type),
            "INVALID_FORMAT".to_string(),
            vec!["Upload a PDF file (.pdf)".to_string()],
            conversation_id,
        )));
    }

    if file.len() > MAX_RESUME_SIZE {
        return Err(file_too_large(conversation_id));
    }

    let file_name = resume_file_name(file.name());

    let resume = match read_upload(file).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to read uploaded resume: {}", e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to process uploaded file".to_string(),
                "FILE_READ_ERROR".to_string(),
                vec!["Try uploading the file again".to_string()],
                conversation_id,
            )));
        }
    };

    info!(
        "Running ATS check for {} ({} bytes, {} chars of job description)",
        file_name,
        resume.len(),
        job_description.len()
    );

    let report = match client
        .check_resume(resume, &file_name, &job_description)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            error!("ATS analysis failed: {:#}", e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to analyze resume. Please try again.".to_string(),
                "ANALYSIS_FAILED".to_string(),
                vec![
                    "The analysis service is temporarily unavailable".to_string(),
                    "Try again in a few moments".to_string(),
                ],
                conversation_id,
            )));
        }
    };

    let analysis = parser.parse(&report);
    info!("ATS check completed with score {}", analysis.score);

    Ok(analysis_response(
        analysis,
        "ATS analysis completed successfully",
        conversation_id,
    ))
}

pub async fn parse_report_handler(
    request: Json<StandardRequest<ParseReportRequest>>,
    parser: &State<ReportParser>,
) -> HandlerResult {
    let conversation_id = request.conversation_id();
    let analysis = parser.parse(&request.data.report);

    Ok(analysis_response(
        analysis,
        "Report parsed successfully",
        conversation_id,
    ))
}

fn analysis_response(
    analysis: AnalysisResult,
    message: &str,
    conversation_id: Option<String>,
) -> Json<DataResponse<AtsCheckData>> {
    let display_format = create_analysis_display_format(&analysis);

    Json(
        DataResponse::success(
            message.to_string(),
            AtsCheckData::new(analysis),
            conversation_id,
        )
        .with_display_format(display_format),
    )
}

fn missing_resume(conversation_id: Option<String>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Please upload a resume".to_string(),
        "MISSING_RESUME".to_string(),
        vec!["Upload your resume as a PDF file".to_string()],
        conversation_id,
    ))
}

pub fn file_too_large(conversation_id: Option<String>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "File size exceeds 10MB limit".to_string(),
        "FILE_TOO_LARGE".to_string(),
        vec!["Use a smaller file size (max 10MB)".to_string()],
        conversation_id,
    ))
}

/// True when Rocket cut the upload off at its data limit
fn exceeds_limit(errors: &Errors<'_>) -> bool {
    errors
        .iter()
        .any(|e| matches!(e.kind, ErrorKind::InvalidLength { max: Some(_), .. }))
}

fn is_pdf(file: &TempFile<'_>) -> bool {
    let by_type = file.content_type().map_or(false, |ct| ct.is_pdf());
    let by_name = file
        .raw_name()
        .map(|n| n.dangerous_unsafe_unsanitized_raw().as_str().to_lowercase())
        .map_or(false, |n| n.ends_with(".pdf"));

    by_type || by_name
}

async fn read_upload(file: &TempFile<'_>) -> std::io::Result<Vec<u8>> {
    let reader = file.open().await?;
    tokio::pin!(reader);
    let mut bytes = Vec::with_capacity(file.len() as usize);
    reader.read_to_end(&mut bytes).await?;
    Ok(bytes)
}

/// Score gauge first, then one section per non-empty list.
pub fn create_analysis_display_format(analysis: &AnalysisResult) -> DisplayFormat {
    let mut sections = vec![DisplaySection {
        title: "ATS Score".to_string(),
        content: format!("{}/100", analysis.score),
        score: Some(score_band(analysis.score).to_string()),
        points: None,
    }];

    for section in Section::ALL {
        let items = analysis.items(section);
        if items.is_empty() {
            continue;
        }

        sections.push(DisplaySection {
            title: section.title().to_string(),
            content: format!("{} item(s)", items.len()),
            score: None,
            points: Some(items.to_vec()),
        });
    }

    DisplayFormat {
        format_type: "analysis".to_string(),
        sections: Some(sections),
    }
}

pub fn score_band(score: u8) -> &'static str {
    match score {
        80..=u8::MAX => "excellent",
        60..=79 => "good",
        40..=59 => "fair",
        _ => "poor",
    }
}
