use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use super::{base_url, parse_id, AppState, REST_PATH};
use crate::auth::{Principal, Role};
use crate::error::{AppError, AppResult};
use crate::extractors::JsonBody;
use crate::models::{HaustierDto, HaustierDtoOhneRef};

const FILE_FIELD: &str = "file";

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| AppError::Internal(format!("Invalid header: {}", e)))
}

/// `POST /rest` creates a pet with description and photos
pub async fn create_haustier(
    State((service, app_config)): State<AppState>,
    principal: Principal,
    headers: HeaderMap,
    JsonBody(dto): JsonBody<HaustierDto>,
) -> AppResult<Response> {
    principal.require_any(&[Role::Admin, Role::User])?;

    let id = service.create(&dto).await?;
    let location = format!("{}{}/{}", base_url(&app_config, &headers), REST_PATH, id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, header_value(&location)?)],
    )
        .into_response())
}

/// `POST /rest/{id}` stores the multipart field `file` as attachment
pub async fn upload_file(
    State((service, app_config)): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Response> {
    principal.require_any(&[Role::Admin, Role::User])?;
    let id = parse_id(&id)?;
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let max_file_size = service.max_file_size();
    let multipart_error = |e: axum::extract::multipart::MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(max_file_size)
        } else {
            AppError::BadRequest(e.body_text())
        }
    };

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let mimetype = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, mimetype, data.to_vec()));
    }

    let (filename, mimetype, data) =
        upload.ok_or_else(|| AppError::BadRequest("Keine Datei vorhanden".to_string()))?;
    service
        .add_file(id, data, &filename, mimetype.as_deref())
        .await?;

    let location = format!(
        "{}{}/file/{}",
        base_url(&app_config, &headers),
        REST_PATH,
        id
    );
    Ok((
        StatusCode::NO_CONTENT,
        [(header::LOCATION, header_value(&location)?)],
    )
        .into_response())
}

/// `PUT /rest/{id}` updates the scalar fields; requires `If-Match`
pub async fn update_haustier(
    State((service, _)): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    headers: HeaderMap,
    JsonBody(dto): JsonBody<HaustierDtoOhneRef>,
) -> AppResult<Response> {
    principal.require_any(&[Role::Admin, Role::User])?;

    let version = headers
        .get(header::IF_MATCH)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::PreconditionRequired("Header \"If-Match\" fehlt".to_string()))?;
    let id = parse_id(&id)?;

    let new_version = service.update(id, &dto, version).await?;

    Ok((
        StatusCode::NO_CONTENT,
        [(header::ETAG, header_value(&format!("\"{}\"", new_version))?)],
    )
        .into_response())
}

/// `DELETE /rest/{id}` answers 204 whether or not the pet existed
pub async fn delete_haustier(
    State((service, _)): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    principal.require_any(&[Role::Admin])?;

    if let Ok(id) = id.parse::<i64>() {
        let deleted = service.delete(id).await?;
        tracing::debug!("delete_haustier: id={}, deleted={}", id, deleted);
    }

    Ok(StatusCode::NO_CONTENT)
}
