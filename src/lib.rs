pub mod api; // HTTP surface: /simplify, /health
pub mod config;
pub mod knowledge; // Known-test reference table
pub mod models;
pub mod pipeline;
pub mod pipeline_config;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use api::{start_api_server, ApiContext, ServerError};
use config::{ConfigError, ServiceConfig};
use knowledge::{KnowledgeBase, KnowledgeBaseError};
use pipeline::extraction::TesseractCli;
use pipeline::ReportPipeline;

/// Failures that stop the service before it can serve requests.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    if let Err(e) = serve() {
        tracing::error!("{} failed: {e}", config::APP_NAME);
        std::process::exit(1);
    }
}

/// Build the service from the environment and serve until Ctrl-C.
fn serve() -> Result<(), StartupError> {
    let config = ServiceConfig::from_env()?;
    let ctx = build_context(&config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let server = start_api_server(ctx, config.bind_addr).await?;
        tracing::info!(
            addr = %server.session.server_addr,
            session_id = %server.session.session_id,
            "Listening"
        );

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
        }

        server.stop().await;
        Ok(())
    })
}

fn build_context(config: &ServiceConfig) -> Result<ApiContext, StartupError> {
    let kb = match &config.knowledge_base_path {
        Some(path) => KnowledgeBase::load(path)?,
        None => KnowledgeBase::builtin()?,
    };
    tracing::info!(
        known_tests = kb.len(),
        threshold = config.pipeline.match_threshold,
        "Knowledge base ready"
    );

    let pipeline = ReportPipeline::new(Arc::new(kb), config.pipeline);
    let ocr = TesseractCli::new(config.tesseract_binary.clone()).with_timeout(config.ocr_timeout);
    Ok(ApiContext::new(Arc::new(pipeline), Arc::new(ocr)).with_ocr_timeout(config.ocr_timeout))
}
