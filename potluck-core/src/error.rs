use thiserror::Error;

use crate::backend::StoreError;
use crate::upload::UploadError;
use crate::validate::ValidationError;

/// Everything one submission attempt can fail with.
///
/// All variants return the coordinator to idle; nothing here is fatal.
/// Persistence failures are deliberately uniform — the app shows one
/// generic message whether the store rejected a constraint or the transport
/// dropped, and the underlying error stays attached for logs.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Failed to save the recipe.")]
    Persist(#[source] StoreError),

    #[error("You must be signed in to submit a recipe.")]
    AuthRequired,

    #[error("A submission is already in progress.")]
    InFlight,
}
