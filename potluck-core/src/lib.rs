//! Client core for the Potluck recipe-sharing app.
//!
//! Holds everything the screens need that is not rendering: the recipe
//! draft and its mutation operations, draft validation, the submission
//! pipeline (validate, optional image upload, persist), and the client for
//! the hosted backend's auth, data, and storage services. The backend is a
//! set of traits so every flow is testable without a network.

pub mod backend;
pub mod config;
pub mod draft;
pub mod error;
pub mod submit;
pub mod types;
pub mod upload;
pub mod validate;

pub use backend::{
    AuthError, AuthProvider, ObjectStore, ProfileStore, RecipeStore, StorageError, StoreError,
};
pub use backend::rest::RestBackend;
pub use config::BackendConfig;
pub use draft::{IngredientField, RecipeDraft};
pub use error::SubmitError;
pub use submit::{SubmissionCoordinator, SubmitPhase};
pub use types::{
    Category, Ingredient, NewRecipe, Profile, ProfilePatch, Recipe, RecipeFilter, RecipeSummary,
    Session,
};
pub use upload::{ImageUploader, UploadError, MAX_FILE_SIZE};
pub use validate::{validate, ValidationError};
