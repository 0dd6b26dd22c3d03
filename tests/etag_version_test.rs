use http::StatusCode;
use serde_json::Value;

mod common;

use common::{
    bearer, create_haustier, etag, haustier_payload, setup_test_server, update_payload,
    USER_TOKEN,
};

#[tokio::test]
async fn test_if_none_match_returns_not_modified() {
    let server = setup_test_server().await;
    let id = create_haustier(&server, &haustier_payload("Bello")).await;

    let response = server
        .get(&format!("/rest/{}", id))
        .add_header(http::header::IF_NONE_MATCH, "\"0\"")
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_MODIFIED);
    assert!(response.as_bytes().is_empty());

    let response = server
        .get(&format!("/rest/{}", id))
        .add_header(http::header::IF_NONE_MATCH, "\"7\"")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_increments_version() {
    let server = setup_test_server().await;
    let id = create_haustier(&server, &haustier_payload("Bello")).await;

    let response = server
        .put(&format!("/rest/{}", id))
        .add_header(http::header::AUTHORIZATION, bearer(USER_TOKEN))
        .add_header(http::header::IF_MATCH, "\"0\"")
        .json(&update_payload("Bello", 4))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(etag(&response).as_deref(), Some("\"1\""));

    let response = server.get(&format!("/rest/{}", id)).await;
    assert_eq!(etag(&response).as_deref(), Some("\"1\""));

    let haustier: Value = response.json();
    assert_eq!(haustier["alter"], 4);
    assert_eq!(haustier["vermittelt"], true);
    // Description is not part of an update
    assert_eq!(haustier["beschreibung"]["beschreibung"], "Freundlicher Hund");
}

#[tokio::test]
async fn test_update_without_if_match() {
    let server = setup_test_server().await;
    let id = create_haustier(&server, &haustier_payload("Bello")).await;

    let response = server
        .put(&format!("/rest/{}", id))
        .add_header(http::header::AUTHORIZATION, bearer(USER_TOKEN))
        .json(&update_payload("Bello", 4))
        .await;
    assert_eq!(response.status_code(), StatusCode::PRECONDITION_REQUIRED);
}

#[tokio::test]
async fn test_update_invalid_version() {
    let server = setup_test_server().await;
    let id = create_haustier(&server, &haustier_payload("Bello")).await;

    for version in ["0", "\"abc\"", "\"1234\""] {
        let response = server
            .put(&format!("/rest/{}", id))
            .add_header(http::header::AUTHORIZATION, bearer(USER_TOKEN))
            .add_header(http::header::IF_MATCH, version)
            .json(&update_payload("Bello", 4))
            .await;
        assert_eq!(response.status_code(), StatusCode::PRECONDITION_FAILED, "{}", version);
    }
}

#[tokio::test]
async fn test_update_outdated_version() {
    let server = setup_test_server().await;
    let id = create_haustier(&server, &haustier_payload("Bello")).await;

    let first = server
        .put(&format!("/rest/{}", id))
        .add_header(http::header::AUTHORIZATION, bearer(USER_TOKEN))
        .add_header(http::header::IF_MATCH, "\"0\"")
        .json(&update_payload("Bello", 4))
        .await;
    assert_eq!(first.status_code(), StatusCode::NO_CONTENT);

    let second = server
        .put(&format!("/rest/{}", id))
        .add_header(http::header::AUTHORIZATION, bearer(USER_TOKEN))
        .add_header(http::header::IF_MATCH, "\"0\"")
        .json(&update_payload("Bello", 5))
        .await;
    assert_eq!(second.status_code(), StatusCode::PRECONDITION_FAILED);
    assert_eq!(
        second.json::<Value>()["message"],
        "Die Versionsnummer 0 ist nicht aktuell."
    );
}

#[tokio::test]
async fn test_update_unknown_pet() {
    let server = setup_test_server().await;

    let response = server
        .put("/rest/999")
        .add_header(http::header::AUTHORIZATION, bearer(USER_TOKEN))
        .add_header(http::header::IF_MATCH, "\"0\"")
        .json(&update_payload("Bello", 4))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_to_name_of_other_pet() {
    let server = setup_test_server().await;
    create_haustier(&server, &haustier_payload("Bello")).await;
    let id = create_haustier(&server, &haustier_payload("Rex")).await;

    let response = server
        .put(&format!("/rest/{}", id))
        .add_header(http::header::AUTHORIZATION, bearer(USER_TOKEN))
        .add_header(http::header::IF_MATCH, "\"0\"")
        .json(&update_payload("Bello", 4))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}
