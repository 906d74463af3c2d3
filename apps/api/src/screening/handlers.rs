//! Axum route handlers for the Screening API.

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::documents::{self, UploadedDocument};
use crate::errors::AppError;
use crate::llm_client::{ChatModel, LlmClient};
use crate::screening::export::{self, CSV_FILENAME, DETAILED_JSON_FILENAME};
use crate::screening::extractor::LlmExtractor;
use crate::screening::models::ScreeningReport;
use crate::screening::pipeline::Screener;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Full `ScreeningReport` as JSON.
    #[default]
    Report,
    /// Ranked table as a CSV attachment.
    Csv,
    /// Ranked results with analyses as a JSON attachment.
    Detailed,
}

#[derive(Debug, Deserialize)]
pub struct ScreeningQuery {
    #[serde(default)]
    pub format: ReportFormat,
}

/// Parsed multipart body of a screening request.
#[derive(Debug, Default)]
struct ScreeningForm {
    job_description: String,
    job_description_file: Option<UploadedDocument>,
    resumes: Vec<UploadedDocument>,
    api_key: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings?format=report|csv|detailed
///
/// Multipart parts: `job_description` (text), `job_description_file` (file),
/// `resumes` (files, repeatable), `resume_text` (text, repeatable), `api_key` (text).
/// Screens every resume against the job description and returns the ranked results.
pub async fn handle_screening(
    State(state): State<AppState>,
    Query(query): Query<ScreeningQuery>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_form(multipart).await?;
    let job_text = resolve_job_text(&form).await;

    validate_inputs(
        &job_text,
        form.resumes.len(),
        form.api_key.is_some() || state.chat.is_some(),
    )?;

    let chat: Arc<dyn ChatModel> = match (&form.api_key, &state.chat) {
        (Some(key), _) => Arc::new(
            LlmClient::new(key.clone(), state.config.llm_max_attempts)
                .map_err(|e| AppError::Llm(format!("Failed to build LLM client: {e}")))?,
        ),
        (None, Some(chat)) => Arc::clone(chat),
        (None, None) => return Err(AppError::Validation(MISSING_CREDENTIAL.to_string())),
    };

    info!(
        resumes = form.resumes.len(),
        format = ?query.format,
        "Screening request accepted"
    );

    let settings = &state.config.screening;
    let extractor = LlmExtractor::new(chat.as_ref(), settings.extract_max_chars);
    let screener = Screener {
        extractor: &extractor,
        chat: chat.as_ref(),
        embedder: state.embedder.as_deref(),
        settings,
    };

    let report = screener.run(&job_text, &form.resumes).await;
    render_report(report, query.format)
}

const MISSING_JOB_DESCRIPTION: &str = "Please provide a job description";
const MISSING_RESUMES: &str = "Please upload at least one resume";
const MISSING_CREDENTIAL: &str = "Please provide an API key";

/// Blocks the run before any processing when a required input is missing.
fn validate_inputs(
    job_text: &str,
    resume_count: usize,
    has_credential: bool,
) -> Result<(), AppError> {
    if job_text.trim().is_empty() {
        return Err(AppError::Validation(MISSING_JOB_DESCRIPTION.to_string()));
    }
    if resume_count == 0 {
        return Err(AppError::Validation(MISSING_RESUMES.to_string()));
    }
    if !has_credential {
        return Err(AppError::Validation(MISSING_CREDENTIAL.to_string()));
    }
    Ok(())
}

/// Pasted text wins; otherwise the uploaded JD file is read.
async fn resolve_job_text(form: &ScreeningForm) -> String {
    if !form.job_description.trim().is_empty() {
        return form.job_description.clone();
    }
    match &form.job_description_file {
        Some(document) => {
            let text = documents::read_text(document).await;
            debug!(chars = text.chars().count(), "Job description extracted from upload");
            text
        }
        None => String::new(),
    }
}

async fn read_form(mut multipart: Multipart) -> Result<ScreeningForm, AppError> {
    let mut form = ScreeningForm::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => {
                form.job_description = field.text().await.map_err(invalid_multipart)?;
            }
            "job_description_file" => {
                if let Some(document) = read_upload(field, "job-description").await? {
                    form.job_description_file = Some(document);
                }
            }
            "resumes" => {
                let fallback = format!("resume-{}", form.resumes.len() + 1);
                if let Some(document) = read_upload(field, &fallback).await? {
                    form.resumes.push(document);
                }
            }
            "resume_text" => {
                let text = field.text().await.map_err(invalid_multipart)?;
                if !text.trim().is_empty() {
                    let filename = format!("pasted-resume-{}.txt", form.resumes.len() + 1);
                    form.resumes.push(UploadedDocument::from_text(filename, text));
                }
            }
            "api_key" => {
                let key = field.text().await.map_err(invalid_multipart)?;
                let key = key.trim();
                if !key.is_empty() {
                    form.api_key = Some(key.to_string());
                }
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(form)
}

/// Reads one file part. An empty part with no filename (an unused file input) yields `None`.
async fn read_upload(
    field: Field<'_>,
    fallback_name: &str,
) -> Result<Option<UploadedDocument>, AppError> {
    let filename = field
        .file_name()
        .filter(|f| !f.is_empty())
        .map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(invalid_multipart)?;

    if filename.is_none() && bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadedDocument {
        filename: filename.unwrap_or_else(|| fallback_name.to_string()),
        content_type,
        bytes,
    }))
}

fn invalid_multipart(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {e}"))
}

fn render_report(report: ScreeningReport, format: ReportFormat) -> Result<Response, AppError> {
    let response = match format {
        ReportFormat::Report => Json(report).into_response(),
        ReportFormat::Csv => attachment(
            "text/csv; charset=utf-8",
            CSV_FILENAME,
            export::to_csv(&report.results)?,
        ),
        ReportFormat::Detailed => attachment(
            "application/json",
            DETAILED_JSON_FILENAME,
            export::to_detailed_json(&report.results)?,
        ),
    };
    Ok(response)
}

fn attachment(content_type: &str, filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
