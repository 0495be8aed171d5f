//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint of the development
//! backend.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use program_discovery::{create_router, AppState, MockBackend};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::new(MockBackend::seeded()))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn login(app: &Router) -> String {
    let (status, json) = send(
        app,
        with_json(
            "POST",
            "/api/auth/login",
            json!({"email": "john.doe@example.com", "password": "password"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["data"]["token"].as_str().unwrap().to_string()
}

// == Search Endpoint Tests ==

#[tokio::test]
async fn test_search_degree_level_scenario() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/api/programs/search?q=&degree_level=phd")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["has_next"], false);
    assert_eq!(json["data"]["programs"][0]["id"], "2");
}

#[tokio::test]
async fn test_search_repeated_country_keys() {
    let app = create_test_app();

    let (_, json) = send(
        &app,
        get("/api/programs/search?country=United%20Kingdom&country=Canada"),
    )
    .await;

    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["programs"][0]["university"]["name"], "University of Oxford");
}

#[tokio::test]
async fn test_search_pagination_and_sort() {
    let app = create_test_app();

    let (_, first) = send(
        &app,
        get("/api/programs/search?sort_by=tuition_desc&page=1&limit=2"),
    )
    .await;
    assert_eq!(first["data"]["programs"][0]["id"], "3");
    assert_eq!(first["data"]["total_pages"], 2);
    assert_eq!(first["data"]["has_next"], true);

    let (_, second) = send(
        &app,
        get("/api/programs/search?sort_by=tuition_desc&page=2&limit=2"),
    )
    .await;
    assert_eq!(second["data"]["programs"][0]["id"], "2");
    assert_eq!(second["data"]["has_next"], false);
}

#[tokio::test]
async fn test_search_rejects_malformed_values() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/api/programs/search?sort_by=cheapest")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("cheapest"));

    let (status, _) = send(&app, get("/api/programs/search?tuition_min=lots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Program Endpoint Tests ==

#[tokio::test]
async fn test_program_details_and_similar() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/api/programs/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["degree_level"], "master");

    let (_, similar) = send(&app, get("/api/programs/1/similar")).await;
    let ids: Vec<&str> = similar["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["2", "3"]);
}

#[tokio::test]
async fn test_program_not_found() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/api/programs/404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

// == Auth Endpoint Tests ==

#[tokio::test]
async fn test_login_and_me() {
    let app = create_test_app();
    let token = login(&app).await;
    assert!(token.starts_with("mock-token-"));

    let (status, json) = send(&app, authed("GET", "/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["email"], "john.doe@example.com");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        with_json(
            "POST",
            "/api/auth/login",
            json!({"email": "john.doe@example.com", "password": "guess"}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_register_then_profile_update() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        with_json(
            "POST",
            "/api/auth/register",
            json!({
                "email": "ada@example.com",
                "password": "secret",
                "first_name": "Ada",
                "last_name": "Lovelace"
            }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["user"]["id"].as_str().unwrap().starts_with("user-"));
    let token = json["data"]["token"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        with_json(
            "PUT",
            "/api/users/profile",
            json!({"budget_usd": 30000, "interests": ["Robotics"]}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["budget_usd"], 30000);
    assert_eq!(json["data"]["interests"][0], "Robotics");
}

// == Shortlist Endpoint Tests ==

#[tokio::test]
async fn test_shortlist_requires_session() {
    let app = create_test_app();

    let (status, _) = send(&app, get("/api/shortlist")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, authed("GET", "/api/shortlist", "mock-token-forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_shortlist_lifecycle() {
    let app = create_test_app();
    let token = login(&app).await;

    let (_, listed) = send(&app, authed("GET", "/api/shortlist", &token)).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 2);

    let (status, added) = send(
        &app,
        with_json(
            "POST",
            "/api/shortlist",
            json!({"program_id": "2", "notes": "apply early", "tags": ["uk"]}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let item_id = added["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(added["data"]["notes"], "apply early");

    let (status, updated) = send(
        &app,
        with_json(
            "PUT",
            &format!("/api/shortlist/{}", item_id),
            json!({"tags": ["uk", "phd"]}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["tags"], json!(["uk", "phd"]));
    assert_eq!(updated["data"]["notes"], "apply early");

    let (status, removed) = send(
        &app,
        authed("DELETE", &format!("/api/shortlist/{}", item_id), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["message"], "Removed from shortlist");

    let (_, listed) = send(&app, authed("GET", "/api/shortlist", &token)).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_shortlist_add_unknown_program() {
    let app = create_test_app();
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        with_json("POST", "/api/shortlist", json!({"program_id": "999"}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        with_json("POST", "/api/shortlist", json!({"program_id": " "}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Assistance Endpoint Tests ==

#[tokio::test]
async fn test_recommendations_respect_filters() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        with_json(
            "POST",
            "/api/recommendations",
            json!({"current_filters": {"country": ["United Kingdom"]}}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let programs = json["data"].as_array().unwrap();
    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0]["id"], "2");
}

#[tokio::test]
async fn test_ai_chat_reply() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        with_json("POST", "/api/ai/chat", json!({"message": "hello"}), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["role"], "assistant");
    let references = json["data"]["program_references"].as_array().unwrap();
    assert_eq!(references.len(), 2);
    assert!(references[0]["url"]
        .as_str()
        .unwrap()
        .starts_with("/program/united-states/harvard-university/"));
}

#[tokio::test]
async fn test_lead_submission() {
    let app = create_test_app();

    let lead = json!({
        "first_name": "Grace",
        "last_name": "Hopper",
        "email": "grace@example.com",
        "country": "United States",
        "interested_programs": ["1", "3"]
    });
    let (status, json) = send(&app, with_json("POST", "/api/leads", lead, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let invalid = json!({
        "first_name": "Grace",
        "last_name": "Hopper",
        "email": "no-at-sign",
        "country": "United States"
    });
    let (status, _) = send(&app, with_json("POST", "/api/leads", invalid, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Metadata Endpoint Tests ==

#[tokio::test]
async fn test_metadata_lists() {
    let app = create_test_app();

    let (_, countries) = send(&app, get("/api/metadata/countries")).await;
    assert_eq!(countries["data"].as_array().unwrap().len(), 12);

    let (_, disciplines) = send(&app, get("/api/metadata/disciplines")).await;
    assert_eq!(disciplines["data"].as_array().unwrap().len(), 15);

    let (_, all) = send(&app, get("/api/metadata/universities")).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 3);

    let (_, us) = send(&app, get("/api/metadata/universities?country=United%20States")).await;
    assert_eq!(us["data"].as_array().unwrap().len(), 2);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
