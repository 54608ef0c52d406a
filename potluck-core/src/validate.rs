//! Pure validation of a recipe draft.
//!
//! `validate` makes the decision; it never talks to the user. The returned
//! error carries which rule failed and where, so any front end can render
//! its own message (the `Display` impls match the app's wording).
//!
//! Rules run in a fixed order and stop at the first failure: title,
//! description, then each ingredient in index order (name, quantity, unit
//! within a row), then each step in index order. A later invalid row never
//! shadows an earlier one.

use thiserror::Error;

use crate::draft::RecipeDraft;

/// Minimum trimmed length of the recipe title.
pub const MIN_TITLE_LEN: usize = 3;

/// Minimum trimmed length of the description.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Minimum trimmed length of a single step.
pub const MIN_STEP_LEN: usize = 5;

/// First rule a draft violated. Indices are zero-based; the display strings
/// number rows from one the way the form labels them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Recipe title must be at least {MIN_TITLE_LEN} characters.")]
    TitleTooShort,

    #[error("Description must be at least {MIN_DESCRIPTION_LEN} characters.")]
    DescriptionTooShort,

    #[error("At least one ingredient is required.")]
    NoIngredients,

    #[error("Ingredient {} name is required.", .index + 1)]
    IngredientNameRequired { index: usize },

    #[error("Ingredient {} quantity must be a number.", .index + 1)]
    IngredientQuantityNotNumeric { index: usize },

    #[error("Ingredient {} unit is required.", .index + 1)]
    IngredientUnitRequired { index: usize },

    #[error("At least one step is required.")]
    NoSteps,

    #[error("Step {} must be at least {MIN_STEP_LEN} characters.", .index + 1)]
    StepTooShort { index: usize },
}

/// Check a draft against the submission rules, reporting the first failure.
pub fn validate(draft: &RecipeDraft) -> Result<(), ValidationError> {
    if draft.title().trim().chars().count() < MIN_TITLE_LEN {
        return Err(ValidationError::TitleTooShort);
    }

    if draft.description().trim().chars().count() < MIN_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooShort);
    }

    if draft.ingredients().is_empty() {
        return Err(ValidationError::NoIngredients);
    }

    for (index, ingredient) in draft.ingredients().iter().enumerate() {
        if ingredient.name.trim().is_empty() {
            return Err(ValidationError::IngredientNameRequired { index });
        }
        if !is_numeric(&ingredient.quantity) {
            return Err(ValidationError::IngredientQuantityNotNumeric { index });
        }
        if ingredient.unit.trim().is_empty() {
            return Err(ValidationError::IngredientUnitRequired { index });
        }
    }

    if draft.steps().is_empty() {
        return Err(ValidationError::NoSteps);
    }

    for (index, step) in draft.steps().iter().enumerate() {
        if step.trim().chars().count() < MIN_STEP_LEN {
            return Err(ValidationError::StepTooShort { index });
        }
    }

    Ok(())
}

/// A quantity is numeric when its trimmed form parses as a finite float.
/// "2", "0.5", and "1e2" pass; "", "two", and "1/2" do not.
fn is_numeric(quantity: &str) -> bool {
    let trimmed = quantity.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{IngredientField, RecipeDraft};

    /// A draft that passes every rule.
    fn valid_draft() -> RecipeDraft {
        let mut draft = RecipeDraft::new();
        draft.set_title("Pancakes");
        draft.set_description("Fluffy breakfast pancakes");
        draft.update_ingredient(0, IngredientField::Name, "flour");
        draft.update_ingredient(0, IngredientField::Quantity, "2");
        draft.update_ingredient(0, IngredientField::Unit, "cups");
        draft.update_step(0, "Mix all ingredients together well.");
        draft
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(validate(&valid_draft()), Ok(()));
    }

    #[test]
    fn short_title_fails_first_regardless_of_other_fields() {
        let mut draft = valid_draft();
        draft.set_title("  ab  ");
        draft.update_ingredient(0, IngredientField::Quantity, "two");
        assert_eq!(validate(&draft), Err(ValidationError::TitleTooShort));
    }

    #[test]
    fn short_description_fails_after_title() {
        let mut draft = valid_draft();
        draft.set_description("Too short");
        assert_eq!(validate(&draft), Err(ValidationError::DescriptionTooShort));
    }

    #[test]
    fn non_numeric_quantity_fails_for_that_row() {
        let mut draft = valid_draft();
        draft.update_ingredient(0, IngredientField::Quantity, "two");
        assert_eq!(
            validate(&draft),
            Err(ValidationError::IngredientQuantityNotNumeric { index: 0 })
        );
    }

    #[test]
    fn first_invalid_ingredient_wins_over_later_ones() {
        let mut draft = valid_draft();
        // Row 1: missing unit. Row 2: missing name. Row 1 must be reported.
        draft.add_ingredient();
        draft.update_ingredient(1, IngredientField::Name, "sugar");
        draft.update_ingredient(1, IngredientField::Quantity, "1");
        draft.add_ingredient();
        assert_eq!(
            validate(&draft),
            Err(ValidationError::IngredientUnitRequired { index: 1 })
        );
    }

    #[test]
    fn fields_within_a_row_check_name_then_quantity_then_unit() {
        let mut draft = valid_draft();
        draft.add_ingredient();
        // Row 1 has every field invalid; name is reported.
        assert_eq!(
            validate(&draft),
            Err(ValidationError::IngredientNameRequired { index: 1 })
        );
    }

    #[test]
    fn whitespace_only_fields_count_as_empty() {
        let mut draft = valid_draft();
        draft.update_ingredient(0, IngredientField::Unit, "   ");
        assert_eq!(
            validate(&draft),
            Err(ValidationError::IngredientUnitRequired { index: 0 })
        );
    }

    #[test]
    fn short_step_is_reported_with_its_index() {
        let mut draft = valid_draft();
        draft.add_step();
        draft.update_step(1, "Stir");
        assert_eq!(validate(&draft), Err(ValidationError::StepTooShort { index: 1 }));
    }

    #[test]
    fn empty_lists_are_rejected() {
        let mut draft = valid_draft();
        draft.remove_ingredient(0);
        assert_eq!(validate(&draft), Err(ValidationError::NoIngredients));

        let mut draft = valid_draft();
        draft.remove_step(0);
        assert_eq!(validate(&draft), Err(ValidationError::NoSteps));
    }

    #[test]
    fn quantity_accepts_decimals_and_rejects_fractions() {
        for good in ["2", "0.5", " 3 ", "1e2"] {
            let mut draft = valid_draft();
            draft.update_ingredient(0, IngredientField::Quantity, good);
            assert_eq!(validate(&draft), Ok(()), "quantity {good:?} should pass");
        }
        for bad in ["", "  ", "two", "1/2", "NaN", "inf"] {
            let mut draft = valid_draft();
            draft.update_ingredient(0, IngredientField::Quantity, bad);
            assert_eq!(
                validate(&draft),
                Err(ValidationError::IngredientQuantityNotNumeric { index: 0 }),
                "quantity {bad:?} should fail"
            );
        }
    }
}
