mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

use common::{link_labels, TestServer, ADMIN_EMAIL, TENANT_EMAIL};

#[tokio::test]
async fn contact_message_is_stored_and_visible_to_admin() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server
        .send_json(
            Method::POST,
            "/contact",
            None,
            &json!({ "name": "Kiran", "email": "kiran@example.com", "message": "Do you list in Goa?" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notice"], "Message sent successfully");

    let token = server.token_for(ADMIN_EMAIL).await?;
    let (_, body) = server.get("/admin/dashboard", Some(&token)).await?;
    assert_eq!(body["data"]["counts"]["messages"], 2);
    assert_eq!(body["data"]["data"]["contacts"][0]["name"], "Kiran");
    Ok(())
}

#[tokio::test]
async fn contact_rejects_bad_email() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server
        .send_json(
            Method::POST,
            "/contact",
            None,
            &json!({ "name": "Kiran", "email": "not-an-email", "message": "Hello" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");
    Ok(())
}

#[tokio::test]
async fn navigation_follows_the_session() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/nav", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(link_labels(&body["data"]), vec!["Home", "Properties", "About", "Contact"]);
    assert_eq!(body["data"]["session"]["kind"], "signed_out");
    assert_eq!(body["data"]["session"]["sign_up"]["href"], "/auth?mode=signup");

    let token = server.token_for(TENANT_EMAIL).await?;
    let (_, body) = server.get("/nav", Some(&token)).await?;
    assert_eq!(link_labels(&body["data"]), vec!["Home", "Properties", "About", "Contact"]);
    assert_eq!(body["data"]["session"]["kind"], "signed_in");
    assert_eq!(body["data"]["session"]["email"], TENANT_EMAIL);

    let token = server.token_for(ADMIN_EMAIL).await?;
    let (_, body) = server.get("/nav", Some(&token)).await?;
    assert_eq!(
        link_labels(&body["data"]),
        vec!["Home", "Properties", "About", "Contact", "Dashboard", "Admin"]
    );
    Ok(())
}

#[tokio::test]
async fn home_and_about_render_for_anyone() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "RentEase");
    assert_eq!(body["data"]["features"].as_array().map(Vec::len), Some(3));

    let (status, body) = server.get("/about", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "About RentEase");
    Ok(())
}
