//! Boundary contracts for the hosted backend.
//!
//! The core consumes three capabilities it does not implement: the auth
//! service, the relational data store, and object storage. Each is a trait
//! so tests can swap in the mocks from [`mock`] and the app wires in
//! [`RestBackend`](rest::RestBackend).

pub mod mock;
pub mod rest;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::types::{NewRecipe, Profile, ProfilePatch, Recipe, RecipeFilter, RecipeSummary, Session};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Auth service returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Data store returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Record not found")]
    NotFound,

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Object storage returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid object location: {0}")]
    InvalidLocation(String),

    #[error("{0}")]
    Other(String),
}

/// The authentication service.
///
/// `current_user_id` is resolved at call time from whatever session the
/// implementation holds; callers must not cache it across a submission.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Register a new account. The returned session has no access token
    /// when the backend requires email confirmation first.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Request a password-reset email. `redirect_to` is where the emailed
    /// link sends the user to finish the reset.
    async fn reset_password(&self, email: &str, redirect_to: &str) -> Result<(), AuthError>;

    /// The authenticated user's id, or `None` when signed out or the
    /// session cannot authorize writes.
    async fn current_user_id(&self) -> Option<Uuid>;
}

/// The recipes table.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Insert one recipe record. Single round trip, no retry.
    async fn insert(&self, recipe: &NewRecipe) -> Result<(), StoreError>;

    /// List recipes matching the filter.
    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<RecipeSummary>, StoreError>;

    /// Fetch one recipe by id.
    async fn get(&self, id: Uuid) -> Result<Recipe, StoreError>;
}

/// The profiles table.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Profile, StoreError>;

    async fn update(&self, user_id: Uuid, patch: &ProfilePatch) -> Result<(), StoreError>;
}

/// Object storage for recipe images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write one object. Overwrites are the caller's problem; the uploader
    /// avoids them by generating collision-resistant names.
    async fn put(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Resolve the publicly reachable URL for an object.
    async fn public_url(&self, bucket: &str, name: &str) -> Result<String, StorageError>;
}

// Delegation through Arc, so one shared backend instance can serve as
// several of the coordinator's collaborators at once.

#[async_trait]
impl<T: AuthProvider + ?Sized> AuthProvider for std::sync::Arc<T> {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        (**self).sign_in(email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        (**self).sign_up(email, password).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        (**self).sign_out().await
    }

    async fn reset_password(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        (**self).reset_password(email, redirect_to).await
    }

    async fn current_user_id(&self) -> Option<Uuid> {
        (**self).current_user_id().await
    }
}

#[async_trait]
impl<T: RecipeStore + ?Sized> RecipeStore for std::sync::Arc<T> {
    async fn insert(&self, recipe: &NewRecipe) -> Result<(), StoreError> {
        (**self).insert(recipe).await
    }

    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<RecipeSummary>, StoreError> {
        (**self).list(filter).await
    }

    async fn get(&self, id: Uuid) -> Result<Recipe, StoreError> {
        (**self).get(id).await
    }
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for std::sync::Arc<T> {
    async fn put(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        (**self).put(bucket, name, bytes, content_type).await
    }

    async fn public_url(&self, bucket: &str, name: &str) -> Result<String, StorageError> {
        (**self).public_url(bucket, name).await
    }
}
