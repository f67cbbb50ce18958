// src/auth.rs
use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Identity as reported by the auth service. User lifecycle (passwords,
/// confirmation, refresh) lives entirely on that side; we only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    #[serde(default, rename = "user_metadata")]
    pub metadata: UserMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Client for the external GoTrue-style auth HTTP API.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Exchange credentials for a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let response = self
            .http
            .post(format!("{}/token?grant_type=password", self.base_url))
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        into_json(response, AppError::Unauthenticated).await
    }

    /// Create an account. The display name rides along as user metadata.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AppError> {
        let response = self
            .http
            .post(format!("{}/signup", self.base_url))
            .header("apikey", &self.api_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            }))
            .send()
            .await?;

        into_json(response, AppError::Validation).await
    }

    /// Revoke the session behind `token`.
    pub async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(format!("{}/logout", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::Unauthenticated(read_error(response).await))
        }
    }

    /// Resolve a bearer token to the user it belongs to.
    pub async fn get_user(&self, token: &str) -> Result<AuthUser, AppError> {
        let response = self
            .http
            .get(format!("{}/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        into_json(response, AppError::Unauthenticated).await
    }
}

async fn into_json<T>(
    response: reqwest::Response,
    reject: impl FnOnce(String) -> AppError,
) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if response.status().is_success() {
        Ok(response.json::<T>().await?)
    } else {
        Err(reject(read_error(response).await))
    }
}

/// The auth service reports errors under a few different keys depending on
/// the endpoint.
async fn read_error(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<AuthErrorBody>().await {
        Ok(body) => body.into_message(status),
        Err(_) => format!("auth service returned status {status}"),
    }
}

#[derive(Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl AuthErrorBody {
    fn into_message(self, status: reqwest::StatusCode) -> String {
        self.error_description
            .or(self.msg)
            .or(self.error)
            .unwrap_or_else(|| format!("auth service returned status {status}"))
    }
}

/// Extractor for handlers that require a signed-in caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthenticated("You must be logged in".to_string()))?;
        let user = state.auth.get_user(&token).await?;
        Ok(CurrentUser(user))
    }
}

/// Optional form: a missing or unresolvable token reads as an anonymous
/// caller, matching the auth service's "no user" answer.
impl OptionalFromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(None);
        };
        match state.auth.get_user(&token).await {
            Ok(user) => Ok(Some(CurrentUser(user))),
            Err(_) => Ok(None),
        }
    }
}

/// Raw bearer token, for the endpoints that forward it to the auth service
/// (logout, session introspection).
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(parts)
            .map(BearerToken)
            .ok_or_else(|| AppError::Unauthenticated("You must be logged in".to_string()))
    }
}

impl<S> OptionalFromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(bearer_token(parts).map(BearerToken))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = http::Request::builder();
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn extracts_bearer_token() {
        let parts = parts_with_auth(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc123"));
    }

    #[test]
    fn rejects_non_bearer_schemes() {
        assert_eq!(bearer_token(&parts_with_auth(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts_with_auth(None)), None);
    }

    #[test]
    fn user_metadata_defaults_when_absent() {
        let user: AuthUser = serde_json::from_value(serde_json::json!({
            "id": "4f9bd1d4-6aee-4a2a-9047-f22bd0063f4f",
            "email": "voter@example.com",
        }))
        .unwrap();
        assert!(user.metadata.name.is_none());
        assert!(user.metadata.role.is_none());
    }

    #[test]
    fn reads_role_from_user_metadata() {
        let user: AuthUser = serde_json::from_value(serde_json::json!({
            "id": "4f9bd1d4-6aee-4a2a-9047-f22bd0063f4f",
            "email": "ops@example.com",
            "user_metadata": { "name": "Ops", "role": "admin" },
        }))
        .unwrap();
        assert_eq!(user.metadata.role.as_deref(), Some("admin"));
    }
}
