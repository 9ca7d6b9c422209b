use crate::error::{AppError, Result};
use crate::model::{InfoQuery, ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use shortlink_core::{ShortCode, ShortlinkDetail};
use tracing::{debug, info};

/// Parses a code from the request, treating malformed codes as unknown.
fn parse_code(raw: String) -> Result<ShortCode> {
    ShortCode::parse(raw.as_str()).map_err(|_| AppError::NotFound(raw))
}

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>)> {
    let Json(request) = payload?;
    let params = request.into_params()?;

    let code = state.shortener().shorten(params).await?;
    info!(code = %code, "shortened url");

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            shortlink: code.to_string(),
        }),
    ))
}

pub async fn info_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<InfoQuery>, QueryRejection>,
) -> Result<Json<ShortlinkDetail>> {
    let Query(query) = query?;
    let code = parse_code(query.shortlink.unwrap_or_default())?;

    let detail = state.shortener().info(&code).await?;
    Ok(Json(detail))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response> {
    let code = parse_code(code)?;

    let url = state.shortener().unshorten(&code).await?;
    let location = HeaderValue::try_from(url.as_str()).map_err(|e| {
        AppError::Unclassified(format!("stored url for '{code}' is not a valid Location: {e}"))
    })?;
    debug!(code = %code, url = %url, "redirecting");
    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}

pub async fn fallback_handler(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
