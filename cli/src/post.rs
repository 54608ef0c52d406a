//! Submit a recipe from a JSON file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use potluck_core::{
    Category, ImageUploader, Ingredient, IngredientField, RecipeDraft, RestBackend,
    SubmissionCoordinator,
};
use serde::Deserialize;

/// On-disk shape of a recipe to post.
#[derive(Debug, Deserialize)]
struct DraftFile {
    title: String,
    description: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    ingredients: Vec<Ingredient>,
    #[serde(default)]
    steps: Vec<String>,
}

/// Build a draft from the file (and optional image) and run the full
/// submission pipeline against the backend.
pub async fn post(backend: Arc<RestBackend>, file: &Path, image: Option<PathBuf>) -> Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let parsed: DraftFile =
        serde_json::from_str(&data).with_context(|| format!("Invalid recipe in {}", file.display()))?;

    let draft = build_draft(parsed, image)?;

    let bucket = backend.config().image_bucket.clone();
    let coordinator = SubmissionCoordinator::new(
        Arc::clone(&backend),
        Arc::clone(&backend),
        ImageUploader::new(backend, bucket),
    );

    coordinator.submit(&draft).await?;
    println!("Recipe submitted successfully!");
    Ok(())
}

fn build_draft(file: DraftFile, image: Option<PathBuf>) -> Result<RecipeDraft> {
    let mut draft = RecipeDraft::default();
    draft.set_title(file.title);
    draft.set_description(file.description);

    if let Some(name) = file.category.as_deref() {
        let Some(category) = Category::from_str(name) else {
            bail!(
                "Unknown category {:?}; valid categories: {}",
                name,
                Category::ALL
                    .iter()
                    .map(Category::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        };
        draft.set_category(Some(category));
    }

    for (index, ingredient) in file.ingredients.into_iter().enumerate() {
        draft.add_ingredient();
        draft.update_ingredient(index, IngredientField::Name, ingredient.name);
        draft.update_ingredient(index, IngredientField::Quantity, ingredient.quantity);
        draft.update_ingredient(index, IngredientField::Unit, ingredient.unit);
    }

    for (index, step) in file.steps.into_iter().enumerate() {
        draft.add_step();
        draft.update_step(index, step);
    }

    if let Some(path) = image {
        draft.set_image(path);
    }

    Ok(draft)
}
