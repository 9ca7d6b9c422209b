use std::any::Any;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::AppError;
use crate::handlers::{
    fallback_handler, health_handler, info_handler, redirect_handler, shorten_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    /// The complete application: routes plus middleware.
    pub fn router(state: AppState) -> Router {
        Self::layered(Self::routes(state))
    }

    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/api/health", get(health_handler))
            .route("/api/shorten", post(shorten_handler))
            .route("/api/info", get(info_handler))
            .route("/{code}", get(redirect_handler))
            .fallback(fallback_handler)
            .with_state(state)
    }

    /// Wraps a router with request tracing and panic containment.
    pub fn layered(router: Router) -> Router {
        router
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TraceLayer::new_for_http())
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(panic = %detail, "recovered from panic in request handler");
    AppError::Unclassified(detail).into_response()
}
