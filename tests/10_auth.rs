mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

use common::{link_labels, TestServer, ADMIN_EMAIL, DEMO_PASSWORD, OWNER_EMAIL, TENANT_EMAIL};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn login_returns_tokens_roles_and_navigation() -> Result<()> {
    let server = TestServer::spawn().await?;

    let session = server.login(OWNER_EMAIL, DEMO_PASSWORD).await?;
    assert!(session["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(session["refresh_token"].as_str().is_some());
    assert_eq!(session["user"]["email"], OWNER_EMAIL);
    assert_eq!(session["roles"]["owner"], true);
    assert_eq!(session["roles"]["admin"], false);

    let labels = link_labels(&session["nav"]);
    assert!(labels.contains(&"Dashboard".to_string()), "labels: {:?}", labels);
    assert!(!labels.contains(&"Admin".to_string()), "labels: {:?}", labels);
    Ok(())
}

#[tokio::test]
async fn admin_login_carries_both_roles() -> Result<()> {
    let server = TestServer::spawn().await?;

    let session = server.login(ADMIN_EMAIL, DEMO_PASSWORD).await?;
    assert_eq!(session["roles"]["owner"], true);
    assert_eq!(session["roles"]["admin"], true);
    let labels = link_labels(&session["nav"]);
    assert!(labels.contains(&"Admin".to_string()));
    assert!(labels.contains(&"Dashboard".to_string()));
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server
        .send_json(
            Method::POST,
            "/auth/login",
            None,
            &json!({ "email": TENANT_EMAIL, "password": "wrong" }),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn missing_credentials_are_a_validation_error() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server
        .send_json(Method::POST, "/auth/login", None, &json!({ "email": " ", "password": "" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn signup_signs_in_as_tenant_and_rejects_duplicates() -> Result<()> {
    let server = TestServer::spawn().await?;
    let request = json!({
        "email": "new.tenant@rentease.test",
        "password": "secret-pass",
        "name": "Nila",
        "phone": "+91 90000 00000"
    });

    let (status, body) = server.send_json(Method::POST, "/auth/signup", None, &request).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notice"], "Account created successfully");
    assert_eq!(body["data"]["status"], "signed_in");
    assert_eq!(body["data"]["roles"]["owner"], false);
    assert_eq!(body["data"]["roles"]["admin"], false);

    let (status, _) = server.send_json(Method::POST, "/auth/signup", None, &request).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn signup_requires_a_name() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server
        .send_json(
            Method::POST,
            "/auth/signup",
            None,
            &json!({ "email": "x@rentease.test", "password": "pw", "name": "  " }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "name");
    Ok(())
}

#[tokio::test]
async fn refresh_token_is_single_use() -> Result<()> {
    let server = TestServer::spawn().await?;
    let session = server.login(TENANT_EMAIL, DEMO_PASSWORD).await?;
    let refresh = json!({ "refresh_token": session["refresh_token"] });

    let (status, body) = server.send_json(Method::POST, "/auth/refresh", None, &refresh).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access_token"].as_str().is_some());

    let (status, _) = server.send_json(Method::POST, "/auth/refresh", None, &refresh).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn logout_needs_a_bearer_and_revokes_refresh() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.send_json(Method::POST, "/auth/logout", None, &json!({})).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["redirect"], "/auth");

    let session = server.login(TENANT_EMAIL, DEMO_PASSWORD).await?;
    let token = session["access_token"].as_str().unwrap_or_default().to_string();
    let (status, _) = server
        .send_json(Method::POST, "/auth/logout", Some(&token), &json!({}))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = server
        .send_json(
            Method::POST,
            "/auth/refresh",
            None,
            &json!({ "refresh_token": session["refresh_token"] }),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn garbage_bearer_is_rejected_not_downgraded() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/properties", Some("not-a-jwt")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
    Ok(())
}

#[tokio::test]
async fn stale_bearer_does_not_block_login() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/auth/login"))
        .bearer_auth("expired.or.garbage")
        .json(&json!({ "email": OWNER_EMAIL, "password": DEMO_PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["user"]["email"], OWNER_EMAIL);

    let (status, _) = server.get("/nav", Some("expired.or.garbage")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
