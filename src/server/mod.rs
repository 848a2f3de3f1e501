pub mod handlers;
pub mod pool;

use crate::config::ServerConfig;
use crate::core::engine::FixEngine;
use crate::core::LanguageModel;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, StatusCode};
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub const FIX_PATH: &str = "/api/fix";

#[derive(Debug, Clone, Copy)]
pub struct HttpSettings {
    pub max_upload_bytes: usize,
    pub request_timeout: Option<Duration>,
}

impl From<&ServerConfig> for HttpSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes(),
            request_timeout: config.request_timeout(),
        }
    }
}

/// Builds the HTTP surface around a fix engine.
///
/// Layer order, inside out: body limit, optional timeout, CORS origin header,
/// tracing. Timeouts therefore still carry the CORS header.
pub fn router<M: LanguageModel + 'static>(
    engine: Arc<FixEngine<M>>,
    settings: &HttpSettings,
) -> Router {
    let mut router = Router::new()
        .route(
            FIX_PATH,
            post(handlers::fix_code::<M>).options(handlers::preflight),
        )
        .with_state(engine)
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes));

    if let Some(timeout) = settings.request_timeout {
        router = router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ));
    }

    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
}
