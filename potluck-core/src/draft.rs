//! The in-memory recipe draft backing the submission form.
//!
//! The draft owns all form state and exposes named operations for every
//! mutation the form can perform. Row edits go through these operations
//! rather than direct index manipulation, so the ingredient sub-fields can
//! never drift out of sync with each other.

use std::path::{Path, PathBuf};

use crate::types::{Category, Ingredient};

/// Which field of an ingredient row an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientField {
    Name,
    Quantity,
    Unit,
}

/// A recipe being composed, not yet persisted.
///
/// Created empty when the form opens and discarded when the form closes,
/// whether or not a submission happened in between. A new draft starts with
/// one blank ingredient row and one blank step, matching what the form
/// renders initially.
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft {
    title: String,
    description: String,
    category: Option<Category>,
    ingredients: Vec<Ingredient>,
    steps: Vec<String>,
    image: Option<PathBuf>,
}

impl RecipeDraft {
    /// An empty draft with one blank ingredient row and one blank step.
    pub fn new() -> Self {
        Self {
            ingredients: vec![Ingredient::default()],
            steps: vec![String::new()],
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    pub fn set_image(&mut self, path: impl Into<PathBuf>) {
        self.image = Some(path.into());
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    /// Append a blank ingredient row.
    pub fn add_ingredient(&mut self) {
        self.ingredients.push(Ingredient::default());
    }

    /// Remove the ingredient row at `index`.
    ///
    /// Indices come from rendering the current list, so an out-of-range
    /// index is a caller bug; this panics like any slice access would.
    pub fn remove_ingredient(&mut self, index: usize) {
        self.ingredients.remove(index);
    }

    /// Replace one field of the ingredient row at `index`, leaving every
    /// other row and field untouched.
    pub fn update_ingredient(&mut self, index: usize, field: IngredientField, value: impl Into<String>) {
        let row = &mut self.ingredients[index];
        let value = value.into();
        match field {
            IngredientField::Name => row.name = value,
            IngredientField::Quantity => row.quantity = value,
            IngredientField::Unit => row.unit = value,
        }
    }

    /// Append a blank step.
    pub fn add_step(&mut self) {
        self.steps.push(String::new());
    }

    /// Remove the step at `index`.
    pub fn remove_step(&mut self, index: usize) {
        self.steps.remove(index);
    }

    /// Replace the text of the step at `index`.
    pub fn update_step(&mut self, index: usize, value: impl Into<String>) {
        self.steps[index] = value.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_has_one_blank_row_of_each() {
        let draft = RecipeDraft::new();
        assert_eq!(draft.ingredients(), &[Ingredient::default()]);
        assert_eq!(draft.steps(), &[String::new()]);
        assert!(draft.image().is_none());
        assert!(draft.category().is_none());
    }

    #[test]
    fn update_ingredient_touches_only_the_targeted_field() {
        let mut draft = RecipeDraft::new();
        draft.add_ingredient();
        draft.update_ingredient(0, IngredientField::Name, "flour");
        draft.update_ingredient(0, IngredientField::Quantity, "2");
        draft.update_ingredient(1, IngredientField::Unit, "cups");

        assert_eq!(draft.ingredients()[0].name, "flour");
        assert_eq!(draft.ingredients()[0].quantity, "2");
        assert_eq!(draft.ingredients()[0].unit, "");
        assert_eq!(draft.ingredients()[1].name, "");
        assert_eq!(draft.ingredients()[1].unit, "cups");
    }

    #[test]
    fn remove_ingredient_preserves_the_other_rows() {
        let mut draft = RecipeDraft::new();
        draft.update_ingredient(0, IngredientField::Name, "first");
        draft.add_ingredient();
        draft.update_ingredient(1, IngredientField::Name, "second");
        draft.add_ingredient();
        draft.update_ingredient(2, IngredientField::Name, "third");

        draft.remove_ingredient(1);

        let names: Vec<_> = draft.ingredients().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["first", "third"]);
    }

    #[test]
    fn interleaved_adds_and_removes_keep_exactly_the_surviving_rows() {
        let mut draft = RecipeDraft::new();
        draft.update_ingredient(0, IngredientField::Name, "row0");
        for i in 1..6 {
            draft.add_ingredient();
            draft.update_ingredient(i, IngredientField::Name, format!("row{i}"));
        }
        assert_eq!(draft.ingredients().len(), 6);

        draft.remove_ingredient(4);
        draft.remove_ingredient(0);
        draft.remove_ingredient(2); // originally row3

        let names: Vec<_> = draft.ingredients().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["row1", "row2", "row5"]);
    }

    #[test]
    fn step_operations_mirror_ingredient_operations() {
        let mut draft = RecipeDraft::new();
        draft.update_step(0, "Preheat the oven.");
        draft.add_step();
        draft.update_step(1, "Mix the batter.");
        draft.add_step();
        draft.update_step(2, "Bake for twenty minutes.");
        draft.remove_step(0);

        assert_eq!(draft.steps(), &["Mix the batter.", "Bake for twenty minutes."]);
    }
}
