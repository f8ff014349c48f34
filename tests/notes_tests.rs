use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::DateTime;
use http_body_util::BodyExt;
use notekeeper::api::AppState;
use notekeeper::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> (Arc<AppState>, Router) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = notekeeper::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let session_store = state.store().session_store();
    let router = notekeeper::api::router(state.clone(), session_store);
    (state, router)
}

async fn login_cookie(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/signup")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({ "username": "writer", "email": "writer@x.com", "password": "pw" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("signup should set a session cookie")
        .to_string()
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_notes_require_session() {
    let (_, app) = spawn_app().await;
    let id = uuid::Uuid::new_v4().to_string();
    let note_uri = format!("/api/notes/{id}");

    let cases = [
        ("GET", "/api/notes", None),
        ("GET", "/api/notes/", None),
        ("POST", "/api/notes/", Some(json!({ "title": "t" }))),
        ("GET", note_uri.as_str(), None),
        ("PATCH", note_uri.as_str(), Some(json!({ "title": "t" }))),
        ("DELETE", note_uri.as_str(), None),
    ];

    for (method, uri, body) in cases {
        let (status, json) = request(&app, method, uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(json["error"], "User not authenticated");
    }
}

#[tokio::test]
async fn test_create_requires_title() {
    let (state, app) = spawn_app().await;
    let cookie = login_cookie(&app).await;

    for body in [json!({ "text": "no title" }), json!({ "title": "", "text": "empty" })] {
        let (status, json) = request(&app, "POST", "/api/notes/", Some(&cookie), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Note must have a title");
    }

    assert_eq!(state.store().note_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_get_round_trip() {
    let (_, app) = spawn_app().await;
    let cookie = login_cookie(&app).await;

    let (status, created) = request(
        &app,
        "POST",
        "/api/notes/",
        Some(&cookie),
        Some(json!({ "title": "Groceries", "text": "eggs" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Groceries");
    assert_eq!(created["text"], "eggs");
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) =
        request(&app, "GET", &format!("/api/notes/{id}"), Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_note_without_text_omits_field() {
    let (_, app) = spawn_app().await;
    let cookie = login_cookie(&app).await;

    let (status, created) = request(
        &app,
        "POST",
        "/api/notes",
        Some(&cookie),
        Some(json!({ "title": "Title only" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("text").is_none());
}

#[tokio::test]
async fn test_list_is_oldest_first() {
    let (_, app) = spawn_app().await;
    let cookie = login_cookie(&app).await;

    for title in ["first", "second", "third"] {
        let (status, _) = request(
            &app,
            "POST",
            "/api/notes/",
            Some(&cookie),
            Some(json!({ "title": title })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, list) = request(&app, "GET", "/api/notes", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_update_bumps_updated_at() {
    let (_, app) = spawn_app().await;
    let cookie = login_cookie(&app).await;

    let (_, created) = request(
        &app,
        "POST",
        "/api/notes/",
        Some(&cookie),
        Some(json!({ "title": "Draft", "text": "v1" })),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/notes/{id}");

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let (status, updated) = request(
        &app,
        "PATCH",
        &uri,
        Some(&cookie),
        Some(json!({ "title": "Final" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["title"], "Final");
    assert!(updated.get("text").is_none());
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let created_at = DateTime::parse_from_rfc3339(updated["createdAt"].as_str().unwrap()).unwrap();
    let updated_at = DateTime::parse_from_rfc3339(updated["updatedAt"].as_str().unwrap()).unwrap();
    assert!(updated_at >= created_at);
}

#[tokio::test]
async fn test_update_validation() {
    let (_, app) = spawn_app().await;
    let cookie = login_cookie(&app).await;

    let (status, json) = request(
        &app,
        "PATCH",
        "/api/notes/not-an-id",
        Some(&cookie),
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid noteId");

    let missing = format!("/api/notes/{}", uuid::Uuid::new_v4());
    let (status, json) = request(&app, "PATCH", &missing, Some(&cookie), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Note must have a title");

    let (status, json) = request(
        &app,
        "PATCH",
        &missing,
        Some(&cookie),
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Note not found");
}

#[tokio::test]
async fn test_malformed_note_id() {
    let (_, app) = spawn_app().await;
    let cookie = login_cookie(&app).await;

    for method in ["GET", "DELETE"] {
        let (status, json) =
            request(&app, method, "/api/notes/not-an-id", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(json, json!({ "error": "invalid noteId" }));
    }
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let (state, app) = spawn_app().await;
    let cookie = login_cookie(&app).await;

    let (_, created) = request(
        &app,
        "POST",
        "/api/notes/",
        Some(&cookie),
        Some(json!({ "title": "Temporary" })),
    )
    .await;
    let uri = format!("/api/notes/{}", created["id"].as_str().unwrap());

    let (status, body) = request(&app, "DELETE", &uri, Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(state.store().note_count().await.unwrap(), 0);

    let (status, json) = request(&app, "GET", &uri, Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Note not found");

    let (status, _) = request(&app, "DELETE", &uri, Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notes_are_shared_between_accounts() {
    let (_, app) = spawn_app().await;
    let writer = login_cookie(&app).await;

    let (_, created) = request(
        &app,
        "POST",
        "/api/notes/",
        Some(&writer),
        Some(json!({ "title": "Shared" })),
    )
    .await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/users/signup",
        None,
        Some(json!({ "username": "reader", "email": "reader@x.com", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, list) = request(&app, "GET", "/api/notes", Some(&writer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], created["id"]);
}
