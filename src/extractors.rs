use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::error_body;

/// JSON body extractor that requires `application/json` and reports
/// failures in the service's error format
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .ok_or(JsonBodyRejection::InvalidContentType)?;

        // Media type without parameters such as charset
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        if media_type != "application/json" {
            return Err(JsonBodyRejection::InvalidContentType);
        }

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(JsonBodyRejection::JsonRejection(rejection)),
        }
    }
}

pub enum JsonBodyRejection {
    InvalidContentType,
    JsonRejection(JsonRejection),
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        match self {
            JsonBodyRejection::InvalidContentType => error_body(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                json!("Content-Type muss application/json sein"),
            )
            .into_response(),
            JsonBodyRejection::JsonRejection(rejection) => {
                error_body(StatusCode::BAD_REQUEST, json!(rejection.body_text())).into_response()
            }
        }
    }
}

/// Query string extractor reporting parse failures in the service's error format
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = QueryParamsRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(QueryParamsRejection)?;
        Ok(QueryParams(value))
    }
}

pub struct QueryParamsRejection(QueryRejection);

impl IntoResponse for QueryParamsRejection {
    fn into_response(self) -> Response {
        error_body(StatusCode::BAD_REQUEST, json!(self.0.body_text())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        routing::{get, post},
        Router,
    };
    use axum_test::TestServer;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        name: String,
    }

    fn server() -> TestServer {
        let app = Router::new().route(
            "/",
            post(|JsonBody(body): JsonBody<Body>| async move { body.name }),
        );
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_accepts_json() {
        let response = server()
            .post("/")
            .text(r#"{"name":"Luna"}"#)
            .content_type("application/json; charset=utf-8")
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "Luna");
    }

    #[tokio::test]
    async fn test_rejects_other_content_types() {
        let response = server()
            .post("/")
            .content_type("text/plain")
            .text(r#"{"name":"Luna"}"#)
            .await;
        assert_eq!(response.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(response.json::<serde_json::Value>()["statusCode"], 415);
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let response = server()
            .post("/")
            .text(r#"{"nam":"Luna"}"#)
            .content_type("application/json")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[derive(Deserialize)]
    struct Paging {
        page: u32,
    }

    #[tokio::test]
    async fn test_invalid_query_is_bad_request_with_error_body() {
        let app = Router::new().route(
            "/",
            get(|QueryParams(paging): QueryParams<Paging>| async move { paging.page.to_string() }),
        );
        let server = TestServer::new(app).unwrap();

        let response = server.get("/").add_query_param("page", "2").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "2");

        let response = server.get("/").add_query_param("page", "zwei").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["error"], "Bad Request");
        assert!(body["message"].is_string());
    }
}
