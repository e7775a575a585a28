//! `POST /simplify`: lab report text or photo in, patient summary out.
//!
//! Accepts a JSON body `{"text": ...}`, a urlencoded form with a `text`
//! field, or multipart form data carrying `text` or an `image` file. When a
//! multipart request carries both, the image wins.

use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::{Form, Json};
use tracing::Instrument;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ReportInput, SimplifyRequest};
use crate::pipeline::extraction::OcrError;
use crate::pipeline::PipelineOutcome;

pub async fn simplify(
    State(ctx): State<ApiContext>,
    request: Request,
) -> Result<(StatusCode, Json<PipelineOutcome>), ApiError> {
    let span = tracing::info_span!("simplify", request_id = %Uuid::new_v4());
    handle(ctx, request).instrument(span).await
}

async fn handle(
    ctx: ApiContext,
    request: Request,
) -> Result<(StatusCode, Json<PipelineOutcome>), ApiError> {
    let text = match read_input(request).await? {
        ReportInput::Text(text) => text,
        ReportInput::Image(bytes) => run_ocr(&ctx, bytes).await?,
    };

    let outcome = run_pipeline(&ctx, text).await?;
    let status = match &outcome {
        PipelineOutcome::Completed(output) => {
            tracing::info!(tests = output.tests().len(), "Report simplified");
            StatusCode::OK
        }
        PipelineOutcome::Unprocessed { reason } => {
            tracing::info!(reason = %reason, "Report left unprocessed");
            StatusCode::BAD_REQUEST
        }
    };
    Ok((status, Json(outcome)))
}

async fn read_input(request: Request) -> Result<ReportInput, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        read_multipart(request).await
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(body) = Form::<SimplifyRequest>::from_request(request, &())
            .await
            .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
        text_input(body.text)
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<SimplifyRequest>::from_request(request, &())
            .await
            .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
        text_input(body.text)
    } else {
        Err(ApiError::MissingInput)
    }
}

async fn read_multipart(request: Request) -> Result<ReportInput, ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;

    let mut text = None;
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                image = Some(bytes.to_vec());
            }
            "text" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                text = Some(value);
            }
            _ => {}
        }
    }

    match image {
        Some(bytes) if bytes.is_empty() => Err(ApiError::EmptyImage),
        Some(bytes) => Ok(ReportInput::Image(bytes)),
        None => text_input(text),
    }
}

fn text_input(text: Option<String>) -> Result<ReportInput, ApiError> {
    match text {
        None => Err(ApiError::MissingInput),
        Some(text) if text.trim().is_empty() => Err(ApiError::EmptyText),
        Some(text) => Ok(ReportInput::Text(text)),
    }
}

/// Pipeline run on the blocking pool, inside the request span.
async fn run_pipeline(ctx: &ApiContext, text: String) -> Result<PipelineOutcome, ApiError> {
    let pipeline = Arc::clone(&ctx.pipeline);
    let span = tracing::Span::current();
    let outcome = tokio::task::spawn_blocking(move || span.in_scope(|| pipeline.process(&text)))
        .await
        .map_err(|join| ApiError::Internal(format!("Pipeline task failed: {join}")))??;
    Ok(outcome)
}

/// OCR on the blocking pool, bounded by the context's timeout.
async fn run_ocr(ctx: &ApiContext, bytes: Vec<u8>) -> Result<String, ApiError> {
    let engine = Arc::clone(&ctx.ocr);
    let size = bytes.len();
    let task = tokio::task::spawn_blocking(move || engine.extract_text(&bytes));

    let result = match tokio::time::timeout(ctx.ocr_timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join)) => return Err(ApiError::Internal(format!("OCR task failed: {join}"))),
        Err(_) => Err(OcrError::Timeout(ctx.ocr_timeout.as_secs())),
    };

    match result {
        Ok(text) if !text.trim().is_empty() => {
            tracing::debug!(bytes = size, chars = text.len(), "Image text extracted");
            Ok(text)
        }
        Ok(_) => {
            tracing::warn!(bytes = size, "OCR returned blank text");
            Err(ApiError::OcrFailed)
        }
        Err(e) => {
            tracing::warn!(bytes = size, error = %e, "OCR failed");
            Err(ApiError::OcrFailed)
        }
    }
}
