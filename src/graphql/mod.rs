use async_graphql::{
    http::GraphiQLSource, Context, EmptySubscription, Error, ErrorExtensions, Schema,
};
use axum::{
    response::{Html, IntoResponse},
    Extension, Json,
};
use std::sync::Arc;

use crate::auth::Principal;
use crate::error::AppError;
use crate::service::HaustierService;

pub mod mutation;
pub mod query;
pub mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub const GRAPHQL_PATH: &str = "/graphql";

pub type HaustierSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(service: Arc<HaustierService>) -> HaustierSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

fn service<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Arc<HaustierService>> {
    ctx.data::<Arc<HaustierService>>()
}

fn principal(ctx: &Context<'_>) -> Principal {
    ctx.data_opt::<Principal>().cloned().unwrap_or_default()
}

/// Error with `extensions.code` derived from the service error
pub fn to_graphql_error(error: AppError) -> Error {
    let code = match &error {
        AppError::Unauthorized => "UNAUTHENTICATED",
        AppError::Forbidden => "FORBIDDEN",
        e if e.is_client_error() => "BAD_USER_INPUT",
        _ => "INTERNAL_SERVER_ERROR",
    };

    let message = if error.is_client_error() {
        error.to_string()
    } else {
        tracing::error!("{}", error);
        "Interner Fehler".to_string()
    };

    Error::new(message).extend_with(|_, extensions| extensions.set("code", code))
}

/// `POST /graphql`
pub async fn graphql_handler(
    Extension(schema): Extension<HaustierSchema>,
    principal: Principal,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(schema.execute(request.data(principal)).await)
}

/// `GET /graphql` serves GraphiQL
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let code = |error: AppError| {
            serde_json::to_value(to_graphql_error(error).extensions).unwrap()["code"].clone()
        };

        assert_eq!(code(AppError::Unauthorized), "UNAUTHENTICATED");
        assert_eq!(code(AppError::Forbidden), "FORBIDDEN");
        assert_eq!(code(AppError::NotFound("x".to_string())), "BAD_USER_INPUT");
        assert_eq!(
            code(AppError::Internal("x".to_string())),
            "INTERNAL_SERVER_ERROR"
        );
    }

    #[test]
    fn test_internal_error_message_is_hidden() {
        let error = to_graphql_error(AppError::Database("dsn".to_string()));
        assert_eq!(error.message, "Interner Fehler");
    }
}
