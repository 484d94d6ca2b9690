#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use rust_actuality_backend::config::AppConfig;
use rust_actuality_backend::entities::photos;
use rust_actuality_backend::infrastructure::database::setup_database;
use rust_actuality_backend::utils::global_id::{self, encode_global_id};
use rust_actuality_backend::{AppState, create_app};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::{Value, json};
use tower::ServiceExt;

pub async fn setup_test_db() -> DatabaseConnection {
    setup_database(&AppConfig::default())
        .await
        .expect("in-memory database")
}

pub async fn setup_app() -> (Router, DatabaseConnection) {
    let db = setup_test_db().await;
    let app = create_app(AppState::new(db.clone(), AppConfig::default()));
    (app, db)
}

pub async fn graphql(app: &Router, query: &str, variables: Value) -> Value {
    let body = json!({ "query": query, "variables": variables });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/graphql")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `code` extension of the first error, if any.
pub fn error_code(response: &Value) -> Option<&str> {
    response["errors"][0]["extensions"]["code"].as_str()
}

pub async fn insert_photo(db: &DatabaseConnection, name: &str) -> photos::Model {
    photos::ActiveModel {
        link: Set(format!("https://cdn.example.org/{name}.jpg")),
        name: Set(Some(name.to_string())),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub fn photo_gid(photo: &photos::Model) -> String {
    encode_global_id(global_id::PHOTO, photo.id)
}

/// A valid `ActualityInput` previewed by the given photo.
pub fn actuality_input(slug: &str, preview_photo_gid: &str, tags: &[&str]) -> Value {
    json!({
        "title": format!("Title of {slug}"),
        "subTitle": "Season 2024",
        "summary": "Opening night of the new season",
        "activeSince": "2024-03-01T10:00:00Z",
        "status": "ACTIVE",
        "isPinned": false,
        "isExternal": false,
        "slug": slug,
        "tags": tags,
        "preview": { "previewPhotoId": preview_photo_gid }
    })
}

pub const CREATE_ACTUALITY: &str = r#"
    mutation Create($input: ActualityInput!) {
        createActuality(input: $input) {
            id slug title isPinned status href
            tags { name }
            video { id source videoId }
            previewPhoto { id }
            preview {
                __typename
                ... on ImagePreview { src href }
                ... on YouTubePreview { embedUrl }
            }
        }
    }
"#;
