use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

/// Canonical recipe as returned by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    /// No schema is enforced; whatever the source provides is passed through.
    pub nutritional_info: Value,
    pub allergy_disclaimer: String,
    pub appliances: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Creates a recipe with a fresh identifier, stamped with the current time.
    pub fn new(
        title: impl Into<String>,
        ingredients: Vec<String>,
        steps: Vec<String>,
        nutritional_info: Value,
        allergy_disclaimer: impl Into<String>,
        appliances: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            ingredients,
            steps,
            nutritional_info,
            allergy_disclaimer: allergy_disclaimer.into(),
            appliances,
            created_at: now,
            updated_at: now,
        }
    }

    /// Placeholder returned when nothing matched and generation failed.
    pub fn fallback(query: &str) -> Self {
        Self::new(
            query,
            Vec::new(),
            Vec::new(),
            Value::Object(Default::default()),
            "",
            Vec::new(),
        )
    }
}

/// Recipe shape as produced by a generation provider.
///
/// Every field is optional and loosely typed; [`GeneratedRecipes::normalize`]
/// turns it into a [`Recipe`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderRecipe {
    #[serde(default, deserialize_with = "loose_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub steps: Vec<String>,
    #[serde(default)]
    pub nutritional_info: Value,
    #[serde(default, deserialize_with = "loose_text")]
    pub allergy_disclaimer: Option<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub appliances: Vec<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub updated_at: Option<String>,
}

/// The `{primary_recipe, alternative_recipes}` envelope every provider
/// response is coerced into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedRecipes {
    pub primary_recipe: ProviderRecipe,
    #[serde(default, deserialize_with = "nullable_list")]
    pub alternative_recipes: Vec<ProviderRecipe>,
}

impl GeneratedRecipes {
    /// Converts the provider shape into canonical recipes.
    ///
    /// Identifiers stay unique across primary and alternatives: blank or
    /// repeated ids are replaced with fresh ones.
    pub fn normalize(self) -> (Recipe, Vec<Recipe>) {
        let now = Utc::now();
        let mut seen = HashSet::new();
        let primary = self.primary_recipe.into_recipe(now, &mut seen);
        let alternatives = self
            .alternative_recipes
            .into_iter()
            .map(|r| r.into_recipe(now, &mut seen))
            .collect();
        (primary, alternatives)
    }
}

impl ProviderRecipe {
    fn into_recipe(self, now: DateTime<Utc>, seen: &mut HashSet<String>) -> Recipe {
        let id = self
            .id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && !seen.contains(s))
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        seen.insert(id.clone());
        Recipe {
            id,
            title: self.title.unwrap_or_default(),
            ingredients: self.ingredients,
            steps: self.steps,
            nutritional_info: self.nutritional_info,
            allergy_disclaimer: self.allergy_disclaimer.unwrap_or_default(),
            appliances: self.appliances,
            created_at: self.created_at.as_deref().and_then(parse_timestamp).unwrap_or(now),
            updated_at: self.updated_at.as_deref().and_then(parse_timestamp).unwrap_or(now),
        }
    }
}

/// Parses a provider timestamp: RFC 3339, then a naive `date time`, then a
/// bare date at midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn scalar_text(v: Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn loose_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(de)?))
}

// Models regularly return a single string or structured items instead of a
// list of strings.
fn text_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    })
}

fn nullable_list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

/// Body of `POST /resolve`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub primary_recipe: Recipe,
    pub alternative_recipes: Vec<Recipe>,
}
