use axum::http::{header, HeaderMap};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::service::HaustierService;

pub mod haustier_get;
pub mod haustier_write;

pub const REST_PATH: &str = "/rest";

pub type AppState = (Arc<HaustierService>, Arc<AppConfig>);

/// External base URL of the server, e.g. `https://example.com:8443`
///
/// The configured `server.base_url` wins; otherwise `X-Forwarded-Proto`,
/// `X-Forwarded-Host` and `Host` are consulted.
pub fn base_url(config: &AppConfig, headers: &HeaderMap) -> String {
    if let Some(base_url) = &config.server.base_url {
        return base_url.trim_end_matches('/').to_string();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}:{}", config.server.host, config.server.port));

    format!("{}://{}", scheme, host)
}

/// Succeeds if the `Accept` header admits JSON or HTML
pub fn check_accept(headers: &HeaderMap) -> AppResult<()> {
    let Some(accept) = headers.get(header::ACCEPT).and_then(|h| h.to_str().ok()) else {
        return Ok(());
    };

    let acceptable = accept
        .split(',')
        .map(|media_range| {
            media_range
                .split(';')
                .next()
                .unwrap_or("")
                .trim()
                .to_lowercase()
        })
        .any(|media_type| {
            matches!(
                media_type.as_str(),
                "" | "*/*" | "application/*" | "application/json" | "text/*" | "text/html"
            )
        });

    if acceptable {
        Ok(())
    } else {
        tracing::debug!("not acceptable: {}", accept);
        Err(AppError::NotAcceptable)
    }
}

/// Path IDs that are not integers address no pet
pub fn parse_id(id: &str) -> AppResult<i64> {
    id.parse::<i64>()
        .map_err(|_| AppError::NotFound(format!("Es gibt kein Haustier mit der ID {}.", id)))
}
