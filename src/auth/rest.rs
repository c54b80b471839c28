use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::{AccessToken, AuthError, AuthService, AuthSession, SignUp};
use crate::backend::client::{error_message, BackendClient};
use crate::models::Identity;

/// Auth service reached over the hosted REST interface (`/auth/v1`).
#[derive(Clone)]
pub struct RestAuth {
    client: BackendClient,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: UserBody,
}

impl From<TokenBody> for AuthSession {
    fn from(body: TokenBody) -> Self {
        AuthSession {
            access_token: AccessToken::new(body.access_token),
            refresh_token: body.refresh_token,
            expires_in: body.expires_in,
            identity: Identity::new(body.user.id, body.user.email),
        }
    }
}

impl RestAuth {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn url(&self, path: &str) -> Result<url::Url, AuthError> {
        self.client
            .endpoint(&format!("auth/v1/{}", path))
            .map_err(AuthError::Config)
    }

    async fn token_grant(&self, grant: &str, body: serde_json::Value) -> Result<AuthSession, AuthError> {
        let response = self
            .client
            .request(Method::POST, self.url("token")?, None)
            .query(&[("grant_type", grant)])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::grant_error(response).await);
        }
        Ok(response.json::<TokenBody>().await?.into())
    }

    async fn grant_error(response: Response) -> AuthError {
        let (status, message) = error_message(response).await;
        match status {
            400 | 401 => AuthError::InvalidCredentials,
            _ => AuthError::Rejected { status, message },
        }
    }
}

#[async_trait]
impl AuthService for RestAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        debug!("password sign-in for {}", email);
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    async fn sign_up(&self, request: &SignUp) -> Result<Option<AuthSession>, AuthError> {
        let body = json!({
            "email": request.email,
            "password": request.password,
            "data": { "name": request.name, "phone": request.phone },
        });
        let response = self
            .client
            .request(Method::POST, self.url("signup")?, None)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = error_message(response).await;
            return Err(match status {
                422 if message.to_ascii_lowercase().contains("registered") => {
                    AuthError::AlreadyRegistered(request.email.clone())
                }
                _ => AuthError::Rejected { status, message },
            });
        }

        // Without a session in the body the address must be confirmed first.
        let value = response.json::<serde_json::Value>().await?;
        if value.get("access_token").is_some() {
            let body: TokenBody = serde_json::from_value(value).map_err(|e| AuthError::Rejected {
                status: 200,
                message: e.to_string(),
            })?;
            Ok(Some(body.into()))
        } else {
            Ok(None)
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
            .map_err(|e| match e {
                AuthError::InvalidCredentials => AuthError::InvalidToken("refresh token rejected".to_string()),
                other => other,
            })
    }

    async fn current_identity(&self, token: &AccessToken) -> Result<Identity, AuthError> {
        let response = self
            .client
            .request(Method::GET, self.url("user")?, Some(token.as_str()))
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = error_message(response).await;
            return Err(match status {
                401 | 403 => AuthError::InvalidToken(message),
                _ => AuthError::Rejected { status, message },
            });
        }
        let user = response.json::<UserBody>().await?;
        Ok(Identity::new(user.id, user.email))
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthError> {
        let response = self
            .client
            .request(Method::POST, self.url("logout")?, Some(token.as_str()))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let (status, message) = error_message(response).await;
            Err(AuthError::Rejected { status, message })
        }
    }
}
