//! REST client for the hosted backend.
//!
//! One client speaks to all three services of the project: auth
//! (`/auth/v1`), the relational store (`/rest/v1`, PostgREST-style query
//! operators), and object storage (`/storage/v1`). Every request carries
//! the project API key; authenticated requests additionally carry the
//! session's bearer token. The client holds the active session in an
//! interior slot so one instance can be shared across the app.

use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use super::{AuthError, AuthProvider, ObjectStore, ProfileStore, RecipeStore, StorageError, StoreError};
use crate::config::{BackendConfig, ConfigError};
use crate::types::{NewRecipe, Profile, ProfilePatch, Recipe, RecipeFilter, RecipeSummary, Session};

/// Columns fetched for the browsing list.
const LIST_COLUMNS: &str = "id,title,description,image_url,category";

pub struct RestBackend {
    http: reqwest::Client,
    config: BackendConfig,
    session: RwLock<Option<Session>>,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

/// Sign-up response shape varies with the project's confirmation setting:
/// auto-confirm returns a full token response, confirmation-required
/// returns just the pending user object.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<Uuid>,
}

impl RestBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session: RwLock::new(None),
        }
    }

    /// Build a client from `POTLUCK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(BackendConfig::from_env()?))
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session.read().unwrap().clone()
    }

    /// Adopt a previously saved session (e.g. restored from disk by a CLI).
    pub fn restore_session(&self, session: Session) {
        *self.session.write().unwrap() = Some(session);
    }

    fn bearer(&self) -> String {
        self.session
            .read()
            .unwrap()
            .as_ref()
            .and_then(|s| s.access_token.clone())
            .unwrap_or_else(|| self.config.api_key.clone())
    }

    /// Start a request with the project key and the strongest available
    /// authorization attached.
    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(self.bearer())
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.base_url, path)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, table)
    }
}

/// Pull a human-readable message out of an error response body.
///
/// The services disagree on the field name, so try the common ones before
/// falling back to the status line.
async fn error_parts(resp: reqwest::Response) -> (u16, String) {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            ["message", "error_description", "msg", "error"]
                .iter()
                .find_map(|key| v.get(key).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| format!("HTTP {}", status));

    (status, message)
}

#[async_trait]
impl AuthProvider for RestBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let resp = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let (status, message) = error_parts(resp).await;
            return Err(AuthError::Api { status, message });
        }

        let token: TokenResponse = resp.json().await?;
        let session = Session {
            user_id: token.user.id,
            access_token: Some(token.access_token),
        };
        *self.session.write().unwrap() = Some(session.clone());
        tracing::debug!(user_id = %session.user_id, "signed in");
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let resp = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.config.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let (status, message) = error_parts(resp).await;
            return Err(AuthError::Api { status, message });
        }

        let body: SignUpResponse = resp.json().await?;
        let user_id = body
            .user
            .map(|u| u.id)
            .or(body.id)
            .ok_or_else(|| AuthError::Api {
                status: 200,
                message: "Sign-up response carried no user id".to_string(),
            })?;

        let session = Session {
            user_id,
            access_token: body.access_token,
        };
        if session.access_token.is_some() {
            *self.session.write().unwrap() = Some(session.clone());
        }
        tracing::debug!(user_id = %session.user_id, confirmed = session.access_token.is_some(), "signed up");
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self
            .session
            .write()
            .unwrap()
            .take()
            .and_then(|s| s.access_token);

        // The local session is gone either way; the server call just
        // revokes the token.
        if let Some(token) = token {
            let resp = self
                .http
                .post(self.auth_url("logout"))
                .header("apikey", &self.config.api_key)
                .bearer_auth(token)
                .send()
                .await?;
            if !resp.status().is_success() {
                tracing::debug!(status = resp.status().as_u16(), "logout rejected by auth service");
            }
        }
        Ok(())
    }

    async fn reset_password(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        let resp = self
            .http
            .post(self.auth_url("recover"))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.config.api_key)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let (status, message) = error_parts(resp).await;
            return Err(AuthError::Api { status, message });
        }
        Ok(())
    }

    async fn current_user_id(&self) -> Option<Uuid> {
        // A session without a token (sign-up pending confirmation) cannot
        // authorize writes, so it does not count as signed in.
        self.session
            .read()
            .unwrap()
            .as_ref()
            .filter(|s| s.access_token.is_some())
            .map(|s| s.user_id)
    }
}

#[async_trait]
impl RecipeStore for RestBackend {
    async fn insert(&self, recipe: &NewRecipe) -> Result<(), StoreError> {
        let resp = self
            .request(reqwest::Method::POST, self.table_url("recipes"))
            .header("Prefer", "return=minimal")
            .json(&[recipe])
            .send()
            .await?;

        if !resp.status().is_success() {
            let (status, message) = error_parts(resp).await;
            return Err(StoreError::Api { status, message });
        }
        tracing::debug!(title = %recipe.title, "recipe inserted");
        Ok(())
    }

    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<RecipeSummary>, StoreError> {
        let mut query: Vec<(&str, String)> = vec![("select", LIST_COLUMNS.to_string())];

        if let Some(category) = filter.category {
            query.push(("category", format!("eq.{}", category.as_str())));
        }
        if let Some(search) = filter.search.as_deref() {
            let search = search.trim();
            if !search.is_empty() {
                query.push(("title", format!("ilike.*{}*", search)));
            }
        }

        let resp = self
            .request(reqwest::Method::GET, self.table_url("recipes"))
            .query(&query)
            .send()
            .await?;

        if !resp.status().is_success() {
            let (status, message) = error_parts(resp).await;
            return Err(StoreError::Api { status, message });
        }

        Ok(resp.json().await?)
    }

    async fn get(&self, id: Uuid) -> Result<Recipe, StoreError> {
        let resp = self
            .request(reqwest::Method::GET, self.table_url("recipes"))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
            .send()
            .await?;

        if !resp.status().is_success() {
            let (status, message) = error_parts(resp).await;
            return Err(StoreError::Api { status, message });
        }

        let rows: Vec<Recipe> = resp.json().await?;
        rows.into_iter().next().ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl ProfileStore for RestBackend {
    async fn get(&self, user_id: Uuid) -> Result<Profile, StoreError> {
        let resp = self
            .request(reqwest::Method::GET, self.table_url("profiles"))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", user_id))])
            .send()
            .await?;

        if !resp.status().is_success() {
            let (status, message) = error_parts(resp).await;
            return Err(StoreError::Api { status, message });
        }

        let rows: Vec<Profile> = resp.json().await?;
        rows.into_iter().next().ok_or(StoreError::NotFound)
    }

    async fn update(&self, user_id: Uuid, patch: &ProfilePatch) -> Result<(), StoreError> {
        let resp = self
            .request(reqwest::Method::PATCH, self.table_url("profiles"))
            .query(&[("id", format!("eq.{}", user_id))])
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;

        if !resp.status().is_success() {
            let (status, message) = error_parts(resp).await;
            return Err(StoreError::Api { status, message });
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for RestBackend {
    async fn put(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.config.base_url, bucket, name);
        let resp = self
            .request(reqwest::Method::POST, url)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        if !resp.status().is_success() {
            let (status, message) = error_parts(resp).await;
            return Err(StorageError::Api { status, message });
        }
        tracing::debug!(bucket, name, "object stored");
        Ok(())
    }

    async fn public_url(&self, bucket: &str, name: &str) -> Result<String, StorageError> {
        if bucket.is_empty() || name.is_empty() {
            return Err(StorageError::InvalidLocation(
                "bucket and object name must be non-empty".to_string(),
            ));
        }

        let url = format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.base_url, bucket, name
        );
        reqwest::Url::parse(&url).map_err(|e| StorageError::InvalidLocation(e.to_string()))?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> RestBackend {
        RestBackend::new(BackendConfig::new("https://example.supabase.co/", "anon-key"))
    }

    #[tokio::test]
    async fn public_url_is_derived_from_bucket_and_name() {
        let url = backend().public_url("images", "pie.jpg").await.unwrap();
        assert_eq!(
            url,
            "https://example.supabase.co/storage/v1/object/public/images/pie.jpg"
        );
    }

    #[tokio::test]
    async fn public_url_rejects_empty_name() {
        assert!(matches!(
            backend().public_url("images", "").await,
            Err(StorageError::InvalidLocation(_))
        ));
    }

    #[tokio::test]
    async fn current_user_requires_an_access_token() {
        let backend = backend();
        assert_eq!(backend.current_user_id().await, None);

        let user_id = Uuid::new_v4();
        backend.restore_session(Session {
            user_id,
            access_token: None,
        });
        assert_eq!(backend.current_user_id().await, None);

        backend.restore_session(Session {
            user_id,
            access_token: Some("token".to_string()),
        });
        assert_eq!(backend.current_user_id().await, Some(user_id));
    }
}
