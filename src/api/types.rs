//! Shared types for the HTTP API layer.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::config::DEFAULT_OCR_TIMEOUT_SECS;
use crate::pipeline::extraction::OcrEngine;
use crate::pipeline::ReportPipeline;

/// Shared context for all API routes.
/// Cloned per request.
#[derive(Clone)]
pub struct ApiContext {
    pub pipeline: Arc<ReportPipeline>,
    pub ocr: Arc<dyn OcrEngine + Send + Sync>,
    pub ocr_timeout: Duration,
}

impl ApiContext {
    pub fn new(pipeline: Arc<ReportPipeline>, ocr: Arc<dyn OcrEngine + Send + Sync>) -> Self {
        Self {
            pipeline,
            ocr,
            ocr_timeout: Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS),
        }
    }

    pub fn with_ocr_timeout(mut self, timeout: Duration) -> Self {
        self.ocr_timeout = timeout;
        self
    }
}

/// JSON body accepted by `POST /simplify`.
#[derive(Debug, Deserialize)]
pub struct SimplifyRequest {
    pub text: Option<String>,
}

/// What a simplify request carried, after decoding.
#[derive(Debug)]
pub enum ReportInput {
    Text(String),
    Image(Vec<u8>),
}
