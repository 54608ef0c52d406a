//! Mock backend collaborators for testing.
//!
//! Configured builder-style, these record every call so tests can assert
//! exactly what the pipeline did (and did not) touch. Failures are scripted
//! per operation.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use super::{AuthError, AuthProvider, ObjectStore, ProfileStore, RecipeStore, StorageError, StoreError};
use crate::types::{NewRecipe, Profile, ProfilePatch, Recipe, RecipeFilter, RecipeSummary, Session};

/// Auth provider with a fixed identity.
#[derive(Default)]
pub struct MockAuth {
    user_id: Option<Uuid>,
}

impl MockAuth {
    /// Signed out.
    pub fn signed_out() -> Self {
        Self { user_id: None }
    }

    /// Signed in as the given user.
    pub fn signed_in(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, AuthError> {
        match self.user_id {
            Some(user_id) => Ok(Session {
                user_id,
                access_token: Some("mock-token".to_string()),
            }),
            None => Err(AuthError::Api {
                status: 400,
                message: "Invalid login credentials".to_string(),
            }),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.sign_in(email, password).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }

    async fn reset_password(&self, _email: &str, _redirect_to: &str) -> Result<(), AuthError> {
        Ok(())
    }

    async fn current_user_id(&self) -> Option<Uuid> {
        self.user_id
    }
}

/// Recipe store that records inserts and serves canned rows.
#[derive(Default)]
pub struct MockRecipeStore {
    inserted: Mutex<Vec<NewRecipe>>,
    rows: Vec<Recipe>,
    fail_insert: Option<String>,
    /// When set, `insert` waits for a notification before completing, so
    /// tests can hold a submission in its persisting phase.
    insert_gate: Option<Arc<Notify>>,
}

impl MockRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these rows from `list`/`get`.
    pub fn with_rows(mut self, rows: Vec<Recipe>) -> Self {
        self.rows = rows;
        self
    }

    /// Make every insert fail with the given message.
    pub fn with_insert_error(mut self, message: &str) -> Self {
        self.fail_insert = Some(message.to_string());
        self
    }

    /// Block inserts until the gate is notified.
    pub fn with_insert_gate(mut self, gate: Arc<Notify>) -> Self {
        self.insert_gate = Some(gate);
        self
    }

    /// Everything inserted so far.
    pub fn inserted(&self) -> Vec<NewRecipe> {
        self.inserted.lock().unwrap().clone()
    }

    pub fn insert_count(&self) -> usize {
        self.inserted.lock().unwrap().len()
    }
}

#[async_trait]
impl RecipeStore for MockRecipeStore {
    async fn insert(&self, recipe: &NewRecipe) -> Result<(), StoreError> {
        if let Some(gate) = &self.insert_gate {
            gate.notified().await;
        }
        if let Some(message) = &self.fail_insert {
            return Err(StoreError::Other(message.clone()));
        }
        self.inserted.lock().unwrap().push(recipe.clone());
        Ok(())
    }

    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<RecipeSummary>, StoreError> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Ok(self
            .rows
            .iter()
            .filter(|r| filter.category.is_none() || r.category == filter.category)
            .filter(|r| match &search {
                Some(q) => r.title.to_lowercase().contains(q),
                None => true,
            })
            .map(|r| RecipeSummary {
                id: r.id,
                title: r.title.clone(),
                description: r.description.clone(),
                image_url: r.image_url.clone(),
                category: r.category,
            })
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Recipe, StoreError> {
        self.rows
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

/// Object store that records uploads in memory.
#[derive(Default)]
pub struct MockObjectStore {
    uploads: Mutex<Vec<StoredObject>>,
    fail_put: Option<String>,
    fail_public_url: Option<String>,
}

/// One object written to the mock store.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub name: String,
    pub content_type: String,
    pub len: usize,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail with the given message.
    pub fn with_put_error(mut self, message: &str) -> Self {
        self.fail_put = Some(message.to_string());
        self
    }

    /// Make URL resolution fail with the given message.
    pub fn with_public_url_error(mut self, message: &str) -> Self {
        self.fail_public_url = Some(message.to_string());
        self
    }

    /// Every object written so far.
    pub fn uploads(&self) -> Vec<StoredObject> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        if let Some(message) = &self.fail_put {
            return Err(StorageError::Other(message.clone()));
        }
        self.uploads.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            name: name.to_string(),
            content_type: content_type.to_string(),
            len: bytes.len(),
        });
        Ok(())
    }

    async fn public_url(&self, bucket: &str, name: &str) -> Result<String, StorageError> {
        if let Some(message) = &self.fail_public_url {
            return Err(StorageError::Other(message.clone()));
        }
        Ok(format!("mock://{}/{}", bucket, name))
    }
}

/// Profile store over an in-memory row.
#[derive(Default)]
pub struct MockProfileStore {
    profile: Mutex<Option<Profile>>,
}

impl MockProfileStore {
    pub fn with_profile(profile: Profile) -> Self {
        Self {
            profile: Mutex::new(Some(profile)),
        }
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn get(&self, user_id: Uuid) -> Result<Profile, StoreError> {
        self.profile
            .lock()
            .unwrap()
            .clone()
            .filter(|p| p.id == user_id)
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, user_id: Uuid, patch: &ProfilePatch) -> Result<(), StoreError> {
        let mut slot = self.profile.lock().unwrap();
        let profile = slot
            .as_mut()
            .filter(|p| p.id == user_id)
            .ok_or(StoreError::NotFound)?;

        if let Some(username) = &patch.username {
            profile.username = Some(username.clone());
        }
        if let Some(website) = &patch.website {
            profile.website = Some(website.clone());
        }
        if let Some(avatar_url) = &patch.avatar_url {
            profile.avatar_url = Some(avatar_url.clone());
        }
        Ok(())
    }
}
