use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, DEMO_EMAIL, DEMO_GOOGLE_ID_TOKEN, DEMO_PASSWORD};
use serde_json::Value;
use tower::{Service, ServiceExt};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn authed_get(uri: &str, token: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(String::new())
        .unwrap()
}

fn login_body() -> String {
    format!(r#"{{"email":"{DEMO_EMAIL}","password":"{DEMO_PASSWORD}"}}"#)
}

// --- health ---

#[tokio::test]
async fn health_is_public() {
    let resp = app()
        .oneshot(Request::builder().uri("/health").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

// --- login ---

#[tokio::test]
async fn login_returns_snake_case_user_and_token() {
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/login", &login_body()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["user"]["_id"], "u-1");
    assert_eq!(body["data"]["user"]["landlord_profile"]["verification_status"], "verified");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn login_with_wrong_password_is_401_envelope() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &format!(r#"{{"email":"{DEMO_EMAIL}","password":"wrong"}}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_malformed_body_is_rejected() {
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/login", r#"{"email":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn google_login_accepts_demo_token_only() {
    let body = format!(r#"{{"id_token":"{DEMO_GOOGLE_ID_TOKEN}"}}"#);
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/firebase", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["user"]["email"], DEMO_EMAIL);

    let resp = app()
        .oneshot(json_request("POST", "/api/auth/firebase", r#"{"id_token":"forged"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"]["message"], "Invalid Google token");
}

// --- protected routes ---

#[tokio::test]
async fn properties_without_token_is_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/properties").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["message"], "Authentication required");
}

#[tokio::test]
async fn properties_with_unknown_token_is_401() {
    let resp = app()
        .oneshot(authed_get("/api/properties", "not-a-session"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["message"], "Invalid or expired token");
}

// --- full session ---

#[tokio::test]
async fn session_lifecycle() {
    let mut app = app().into_service();

    // login
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/auth/login", &login_body()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let token = body_json(resp).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    // me
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed_get("/api/auth/me", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["email"], DEMO_EMAIL);

    // list all
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed_get("/api/properties", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["properties"].as_array().unwrap().len(), 2);

    // list filtered
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed_get("/api/properties?status=vacant&city=Pune", &token))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let properties = body["data"]["properties"].as_array().unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0]["_id"], "p-1");

    // get one
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed_get("/api/properties/p-2", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["property"]["specs"]["bhk"], "1RK");

    // profile update keeps untouched fields
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("PUT")
                .uri("/api/auth/profile")
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"landlord_profile":{"upi_id":"new@upi"}}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["data"]["landlord_profile"]["upi_id"], "new@upi");
    assert_eq!(body["data"]["landlord_profile"]["verification_status"], "verified");

    // get missing
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed_get("/api/properties/nope", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["message"], "Property not found");
}
