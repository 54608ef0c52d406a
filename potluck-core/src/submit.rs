//! The submission coordinator.
//!
//! One attempt is a strictly sequential chain: validate the draft, upload
//! the image if one is attached, then persist the record under the
//! currently authenticated user. The coordinator's phase is an explicit
//! enum; a second `submit` while an attempt is in flight is rejected before
//! any collaborator is touched, which is the only re-entrancy guard this
//! flow has or needs. Every exit path, success or failure, lands back in
//! `Idle` so the user can correct and retry.

use std::sync::Mutex;

use crate::backend::{AuthProvider, ObjectStore, RecipeStore};
use crate::draft::RecipeDraft;
use crate::error::SubmitError;
use crate::types::NewRecipe;
use crate::upload::ImageUploader;
use crate::validate::validate;

/// Where the coordinator currently is in an attempt.
///
/// `Uploading` and `Persisting` are the busy span: the submit control stays
/// disabled for both so a second tap cannot start a duplicate attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Validating,
    Uploading,
    Persisting,
}

pub struct SubmissionCoordinator<A, R, S> {
    auth: A,
    recipes: R,
    uploader: ImageUploader<S>,
    phase: Mutex<SubmitPhase>,
}

impl<A, R, S> SubmissionCoordinator<A, R, S>
where
    A: AuthProvider,
    R: RecipeStore,
    S: ObjectStore,
{
    /// Build a coordinator over its three collaborators. They are explicit
    /// dependencies rather than ambient globals so tests can swap in mocks.
    pub fn new(auth: A, recipes: R, uploader: ImageUploader<S>) -> Self {
        Self {
            auth,
            recipes,
            uploader,
            phase: Mutex::new(SubmitPhase::Idle),
        }
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn recipes(&self) -> &R {
        &self.recipes
    }

    pub fn uploader(&self) -> &ImageUploader<S> {
        &self.uploader
    }

    pub fn phase(&self) -> SubmitPhase {
        *self.phase.lock().unwrap()
    }

    /// True from the moment an upload or persist starts until the attempt
    /// resolves. The UI disables the submit control while this holds.
    pub fn is_busy(&self) -> bool {
        !matches!(self.phase(), SubmitPhase::Idle)
    }

    /// Run one submission attempt against the current draft.
    ///
    /// Returns [`SubmitError::InFlight`] without touching any collaborator
    /// if an attempt is already running.
    pub async fn submit(&self, draft: &RecipeDraft) -> Result<(), SubmitError> {
        self.begin()?;
        let result = self.run_attempt(draft).await;
        self.set_phase(SubmitPhase::Idle);
        result
    }

    /// Claim the coordinator for one attempt, or refuse if busy.
    fn begin(&self) -> Result<(), SubmitError> {
        let mut phase = self.phase.lock().unwrap();
        if *phase != SubmitPhase::Idle {
            return Err(SubmitError::InFlight);
        }
        *phase = SubmitPhase::Validating;
        Ok(())
    }

    fn set_phase(&self, next: SubmitPhase) {
        *self.phase.lock().unwrap() = next;
    }

    async fn run_attempt(&self, draft: &RecipeDraft) -> Result<(), SubmitError> {
        validate(draft)?;

        let image_url = match draft.image() {
            Some(path) => {
                self.set_phase(SubmitPhase::Uploading);
                Some(self.uploader.upload(Some(path), draft.title()).await?)
            }
            None => None,
        };

        self.set_phase(SubmitPhase::Persisting);

        // Resolved now, not when the form opened: an expired session must
        // fail here instead of persisting a record with no owner.
        let user_id = self
            .auth
            .current_user_id()
            .await
            .ok_or(SubmitError::AuthRequired)?;

        let record = NewRecipe {
            title: draft.title().to_string(),
            description: draft.description().to_string(),
            category: draft.category(),
            ingredients: draft.ingredients().to_vec(),
            steps: draft.steps().to_vec(),
            image_url,
            user_id,
        };

        match self.recipes.insert(&record).await {
            Ok(()) => {
                tracing::info!(title = %record.title, "recipe submitted");
                Ok(())
            }
            Err(e) => {
                if let Some(url) = &record.image_url {
                    // No compensating delete; the stored object is orphaned.
                    tracing::warn!(image_url = %url, "recipe insert failed after image upload");
                }
                Err(SubmitError::Persist(e))
            }
        }
    }
}
