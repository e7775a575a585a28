//! HTTP router for the report simplifier.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Every response carries `Cache-Control: no-store`.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Maximum accepted request body (photos included).
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the API router over a prepared context.
pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/simplify", post(endpoints::simplify::simplify))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
