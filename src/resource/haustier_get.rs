use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;

use super::{check_accept, parse_id, AppState};
use crate::error::{AppError, AppResult};
use crate::extractors::QueryParams;
use crate::parser::{Page, Pageable, Suchkriterien};

/// `GET /rest/{id}` with `ETag` and `If-None-Match` support
pub async fn get_haustier(
    State((service, _)): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    check_accept(&headers)?;
    let id = parse_id(&id)?;

    let haustier = service.find_by_id(id, false).await?;
    let etag = haustier.etag().unwrap_or_default();

    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|h| h.to_str().ok());
    if if_none_match == Some(etag.as_str()) {
        tracing::debug!("get_haustier: {} not modified", id);
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let etag = HeaderValue::from_str(&etag)
        .map_err(|e| AppError::Internal(format!("Invalid ETag: {}", e)))?;
    Ok(([(header::ETAG, etag)], Json(haustier)).into_response())
}

/// `GET /rest?name=...&page=0&size=5`
pub async fn search_haustiere(
    State((service, _)): State<AppState>,
    QueryParams(mut params): QueryParams<HashMap<String, String>>,
    headers: HeaderMap,
) -> AppResult<Response> {
    check_accept(&headers)?;

    let pageable = Pageable::from_params(
        params.remove("page").as_deref(),
        params.remove("size").as_deref(),
    );
    let criteria = Suchkriterien::from_params(&params)?;

    let slice = service.find(&criteria, &pageable).await?;
    Ok(Json(Page::from_slice(slice, &pageable)).into_response())
}

/// `GET /rest/file/{id}` delivers the stored attachment inline
pub async fn get_file(
    State((service, _)): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;

    let file = service
        .find_file(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Keine Datei zum Haustier {}.", id)))?;

    let content_type = HeaderValue::from_str(&file.mimetype)
        .map_err(|e| AppError::Internal(format!("Invalid mimetype: {}", e)))?;
    let disposition = HeaderValue::from_str(&format!(
        "inline; filename=\"{}\"",
        file.filename.replace('"', "")
    ))
    .map_err(|e| AppError::Internal(format!("Invalid filename: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.data,
    )
        .into_response())
}
