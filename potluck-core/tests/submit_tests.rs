//! End-to-end tests of the submission pipeline over mock collaborators.
//!
//! These exercise the coordinator's ordering guarantees: validation runs
//! before any network collaborator, an upload failure blocks the persist,
//! and a busy coordinator refuses a second attempt instead of inserting
//! twice.

use std::sync::Arc;

use potluck_core::backend::mock::{MockAuth, MockObjectStore, MockRecipeStore};
use potluck_core::{
    Category, ImageUploader, IngredientField, RecipeDraft, SubmissionCoordinator, SubmitError,
    SubmitPhase, UploadError, ValidationError,
};
use tokio::sync::Notify;
use uuid::Uuid;

/// PNG file signature; enough for format detection.
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

type MockCoordinator = SubmissionCoordinator<MockAuth, MockRecipeStore, MockObjectStore>;

fn coordinator(auth: MockAuth, recipes: MockRecipeStore, store: MockObjectStore) -> MockCoordinator {
    SubmissionCoordinator::new(auth, recipes, ImageUploader::new(store, "images"))
}

fn valid_draft() -> RecipeDraft {
    let mut draft = RecipeDraft::new();
    draft.set_title("Pancakes");
    draft.set_description("Fluffy breakfast pancakes");
    draft.set_category(Some(Category::Breakfast));
    draft.update_ingredient(0, IngredientField::Name, "flour");
    draft.update_ingredient(0, IngredientField::Quantity, "2");
    draft.update_ingredient(0, IngredientField::Unit, "cups");
    draft.update_step(0, "Mix all ingredients together well.");
    draft
}

async fn draft_with_image(dir: &tempfile::TempDir) -> RecipeDraft {
    let path = dir.path().join("photo.png");
    tokio::fs::write(&path, PNG_MAGIC).await.unwrap();
    let mut draft = valid_draft();
    draft.set_image(path);
    draft
}

#[tokio::test]
async fn submit_without_image_persists_and_never_uploads() {
    let user_id = Uuid::new_v4();
    let c = coordinator(
        MockAuth::signed_in(user_id),
        MockRecipeStore::new(),
        MockObjectStore::new(),
    );

    c.submit(&valid_draft()).await.unwrap();

    assert!(c.uploader().store().uploads().is_empty());
    let inserted = c.recipes().inserted();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].title, "Pancakes");
    assert_eq!(inserted[0].category, Some(Category::Breakfast));
    assert_eq!(inserted[0].image_url, None);
    assert_eq!(inserted[0].user_id, user_id);
    assert_eq!(c.phase(), SubmitPhase::Idle);
    assert!(!c.is_busy());
}

#[tokio::test]
async fn submit_with_image_persists_the_resolved_url() {
    let dir = tempfile::tempdir().unwrap();
    let draft = draft_with_image(&dir).await;
    let c = coordinator(
        MockAuth::signed_in(Uuid::new_v4()),
        MockRecipeStore::new(),
        MockObjectStore::new(),
    );

    c.submit(&draft).await.unwrap();

    let uploads = c.uploader().store().uploads();
    assert_eq!(uploads.len(), 1);
    let inserted = c.recipes().inserted();
    assert_eq!(
        inserted[0].image_url.as_deref(),
        Some(format!("mock://images/{}", uploads[0].name).as_str())
    );
}

#[tokio::test]
async fn invalid_draft_touches_no_collaborator() {
    // Even the auth lookup must not run: the signed-out auth would report
    // AuthRequired, but validation fails first.
    let mut draft = valid_draft();
    draft.update_ingredient(0, IngredientField::Quantity, "two");

    let c = coordinator(MockAuth::signed_out(), MockRecipeStore::new(), MockObjectStore::new());
    let err = c.submit(&draft).await.unwrap_err();

    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::IngredientQuantityNotNumeric { index: 0 })
    ));
    assert_eq!(c.recipes().insert_count(), 0);
    assert!(c.uploader().store().uploads().is_empty());
    assert_eq!(c.phase(), SubmitPhase::Idle);
}

#[tokio::test]
async fn upload_failure_blocks_the_persist() {
    let dir = tempfile::tempdir().unwrap();
    let draft = draft_with_image(&dir).await;
    let c = coordinator(
        MockAuth::signed_in(Uuid::new_v4()),
        MockRecipeStore::new(),
        MockObjectStore::new().with_put_error("storage is down"),
    );

    let err = c.submit(&draft).await.unwrap_err();

    assert!(matches!(err, SubmitError::Upload(UploadError::StorageWrite(_))));
    assert_eq!(c.recipes().insert_count(), 0);
    assert_eq!(c.phase(), SubmitPhase::Idle);
    assert!(!c.is_busy());
}

#[tokio::test]
async fn signed_out_submission_fails_before_the_insert() {
    let c = coordinator(MockAuth::signed_out(), MockRecipeStore::new(), MockObjectStore::new());

    let err = c.submit(&valid_draft()).await.unwrap_err();

    assert!(matches!(err, SubmitError::AuthRequired));
    assert_eq!(c.recipes().insert_count(), 0);
}

#[tokio::test]
async fn persist_failure_returns_to_idle_and_leaves_the_upload_behind() {
    let dir = tempfile::tempdir().unwrap();
    let draft = draft_with_image(&dir).await;
    let c = coordinator(
        MockAuth::signed_in(Uuid::new_v4()),
        MockRecipeStore::new().with_insert_error("row level security violation"),
        MockObjectStore::new(),
    );

    let err = c.submit(&draft).await.unwrap_err();

    assert!(matches!(err, SubmitError::Persist(_)));
    // The image was already stored; no compensating delete happens.
    assert_eq!(c.uploader().store().uploads().len(), 1);
    assert_eq!(c.phase(), SubmitPhase::Idle);

    // The user can correct nothing here, but a retry is allowed and builds
    // a fresh attempt.
    let err = c.submit(&draft).await.unwrap_err();
    assert!(matches!(err, SubmitError::Persist(_)));
}

#[tokio::test]
async fn second_submit_while_persisting_is_refused() {
    let gate = Arc::new(Notify::new());
    let c = Arc::new(coordinator(
        MockAuth::signed_in(Uuid::new_v4()),
        MockRecipeStore::new().with_insert_gate(gate.clone()),
        MockObjectStore::new(),
    ));

    let first = {
        let c = Arc::clone(&c);
        let draft = valid_draft();
        tokio::spawn(async move { c.submit(&draft).await })
    };

    // Let the first attempt run until it is parked inside the insert.
    while c.phase() != SubmitPhase::Persisting {
        tokio::task::yield_now().await;
    }
    assert!(c.is_busy());

    let second = c.submit(&valid_draft()).await;
    assert!(matches!(second, Err(SubmitError::InFlight)));

    gate.notify_one();
    first.await.unwrap().unwrap();

    assert_eq!(c.recipes().insert_count(), 1);
    assert_eq!(c.phase(), SubmitPhase::Idle);
}
