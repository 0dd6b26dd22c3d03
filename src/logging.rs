use axum::{
    extract::Request,
    http::{Method, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

const DEFAULT_FILTER: &str = "haustier_server=info,access_log=info,mail=info";

/// Initialize the global subscriber; `RUST_LOG` overrides the default filter
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// One access log line per request with the response time in milliseconds
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let remote_addr = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
        })
        .unwrap_or("-")
        .to_string();

    let response = next.run(request).await;

    let duration = start.elapsed();

    info!(
        target: "access_log",
        "{} \"{}\" {} {} {}ms \"{}\"",
        remote_addr,
        format_request(&method, &uri),
        response.status().as_u16(),
        response
            .headers()
            .get("content-length")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("-"),
        duration.as_millis(),
        user_agent,
    );

    response
}

fn format_request(method: &Method, uri: &Uri) -> String {
    format!("{} {}", method, uri)
}

/// Log the startup banner
pub fn log_banner(config: &AppConfig) {
    let db_type = config
        .backend
        .database
        .as_ref()
        .map(|db| db.db_type.as_str())
        .unwrap_or("-");
    let base = format!("http://{}:{}", config.server.host, config.server.port);

    info!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("OS: {} ({})", std::env::consts::OS, std::env::consts::ARCH);
    info!("Database: {}", db_type);
    info!("Upload limit: {} bytes", config.upload.max_file_size);
    info!("Mail notifications: {}", if config.mail.enabled { "on" } else { "off" });
    info!("REST:     {}/rest", base);
    info!("GraphQL:  {}/graphql", base);
    info!("Health:   {}/health", base);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::Html, routing::get, Router};
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_logging_middleware_passes_response_through() {
        let app = Router::new()
            .route("/test", get(|| async { Html("Hallo") }))
            .layer(axum::middleware::from_fn(logging_middleware));

        let server = TestServer::new(app).unwrap();
        let response = server.get("/test").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "Hallo");
    }

    #[test]
    fn test_format_request() {
        let uri: Uri = "/rest?art=HUND".parse().unwrap();
        assert_eq!(format_request(&Method::GET, &uri), "GET /rest?art=HUND");
    }
}
