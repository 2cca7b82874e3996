//! Fixed catalogue of known recipes.

use once_cell::sync::Lazy;
use serde_json::json;
use shared::dto::Recipe;

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

static CORPUS: Lazy<Vec<Recipe>> = Lazy::new(|| {
    vec![
        Recipe::new(
            "Spaghetti Bolognese",
            owned(&["spaghetti", "tomato sauce", "ground beef", "onion", "garlic"]),
            owned(&["Boil pasta", "Cook sauce", "Mix and serve"]),
            json!({"calories": 400}),
            "Contains gluten",
            owned(&["stove"]),
        ),
        Recipe::new(
            "Chicken Salad",
            owned(&["chicken", "lettuce", "tomatoes", "cucumber", "dressing"]),
            owned(&["Grill chicken", "Mix vegetables", "Add dressing"]),
            json!({"calories": 300}),
            "None",
            owned(&["grill"]),
        ),
    ]
});

/// The process-wide corpus. Built on first access and never modified.
pub fn corpus() -> &'static [Recipe] {
    CORPUS.as_slice()
}
