mod common;

use anyhow::Result;
use reqwest::StatusCode;

use common::{TestServer, ADMIN_EMAIL, OWNER_EMAIL};

#[tokio::test]
async fn owner_without_admin_role_is_denied() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.token_for(OWNER_EMAIL).await?;

    let (status, body) = server.get("/admin/dashboard", Some(&token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied. Admin role required.");
    assert!(body.get("data").is_none(), "denied response leaked data: {}", body);
    Ok(())
}

#[tokio::test]
async fn admin_dashboard_counts_every_collection() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.token_for(ADMIN_EMAIL).await?;

    let (status, body) = server.get("/admin/dashboard", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "ready");
    assert_eq!(body["data"]["counts"]["users"], 3);
    assert_eq!(body["data"]["counts"]["properties"], 4);
    assert_eq!(body["data"]["counts"]["messages"], 1);
    assert_eq!(body["data"]["data"]["listings"][0]["owner"]["name"], "Asha Owner");
    Ok(())
}

#[tokio::test]
async fn admin_delete_removes_exactly_one_listing() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.token_for(ADMIN_EMAIL).await?;
    let (_, body) = server.get("/admin/dashboard", Some(&token)).await?;
    let id = body["data"]["data"]["listings"][1]["id"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    let (status, _) = server
        .delete(&format!("/admin/properties/{}", id), Some(&token))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = server
        .delete(&format!("/admin/properties/{}?confirm=true", id), Some(&token))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notice"], "Property deleted successfully");
    assert_eq!(body["data"]["counts"]["properties"], 3);
    let remaining = body["data"]["data"]["listings"].as_array().cloned().unwrap_or_default();
    assert!(remaining.iter().all(|listing| listing["id"] != id.as_str()));

    let (status, body) = server.get(&format!("/properties/{}", id), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["redirect"], "/properties");
    Ok(())
}

#[tokio::test]
async fn deleting_a_missing_listing_reports_failure() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.token_for(ADMIN_EMAIL).await?;

    let (status, body) = server
        .delete(
            "/admin/properties/6f1c2c44-0000-4000-8000-000000000000?confirm=true",
            Some(&token),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Failed to delete property");
    Ok(())
}
