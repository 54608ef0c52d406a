use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recipe categories available in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Breakfast,
    Lunch,
    Snacks,
    Healthy,
    Dinner,
    Dessert,
    Cocktails,
}

impl Category {
    /// All categories in display order.
    pub const ALL: &'static [Category] = &[
        Category::Breakfast,
        Category::Lunch,
        Category::Snacks,
        Category::Healthy,
        Category::Dinner,
        Category::Dessert,
        Category::Cocktails,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Lunch => "Lunch",
            Category::Snacks => "Snacks",
            Category::Healthy => "Healthy",
            Category::Dinner => "Dinner",
            Category::Dessert => "Dessert",
            Category::Cocktails => "Cocktails",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Breakfast" => Some(Category::Breakfast),
            "Lunch" => Some(Category::Lunch),
            "Snacks" => Some(Category::Snacks),
            "Healthy" => Some(Category::Healthy),
            "Dinner" => Some(Category::Dinner),
            "Dessert" => Some(Category::Dessert),
            "Cocktails" => Some(Category::Cocktails),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ingredient row as entered in the form and as stored in the recipe
/// record's JSON column. All three fields are free text; validation decides
/// what counts as well-formed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

/// Slim recipe row for the browsing/search list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

/// Full recipe record as returned by the detail query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<Category>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub user_id: Uuid,
}

/// Payload for inserting one recipe, built by the submission coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub image_url: Option<String>,
    pub user_id: Uuid,
}

/// Filter for the recipe listing. `category: None` means all categories;
/// `search` matches the title case-insensitively as a substring.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub category: Option<Category>,
    pub search: Option<String>,
}

/// An authenticated (or pending-confirmation) session.
///
/// `access_token` is `None` for sign-ups that still await email
/// confirmation; such a session cannot authorize writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub access_token: Option<String>,
}

/// A user profile row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for cat in Category::ALL {
            assert_eq!(Category::from_str(cat.as_str()), Some(*cat));
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert_eq!(Category::from_str("Brunch"), None);
        assert_eq!(Category::from_str(""), None);
    }
}
