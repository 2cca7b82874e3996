//! Three-tier resolution: exact corpus hit, close corpus hit, generation.

use async_trait::async_trait;
use shared::dto::{GeneratedRecipes, Recipe, ResolveResponse};
use shared::error::GenerationError;
use shared::openai_client::GenerationClient;
use std::sync::Arc;
use tracing::{info, warn};

use crate::matcher::{match_query, CorpusMatch};

/// Source of freshly generated recipes.
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    async fn generate(&self, query: &str) -> Result<GeneratedRecipes, GenerationError>;
}

#[async_trait]
impl RecipeGenerator for GenerationClient {
    async fn generate(&self, query: &str) -> Result<GeneratedRecipes, GenerationError> {
        GenerationClient::generate(self, query).await
    }
}

/// Which tier produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Exact,
    Close,
    Generated,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub tier: Tier,
    pub primary: Recipe,
    pub alternatives: Vec<Recipe>,
    /// Set when generation failed and `primary` is the fallback recipe.
    pub fallback: bool,
}

impl From<Resolution> for ResolveResponse {
    fn from(r: Resolution) -> Self {
        ResolveResponse {
            primary_recipe: r.primary,
            alternative_recipes: r.alternatives,
        }
    }
}

/// Resolves queries against a read-only corpus, falling back to generation.
///
/// Holds no mutable state; one instance serves all requests concurrently.
#[derive(Clone)]
pub struct Resolver {
    corpus: &'static [Recipe],
    generator: Arc<dyn RecipeGenerator>,
}

impl Resolver {
    pub fn new(corpus: &'static [Recipe], generator: Arc<dyn RecipeGenerator>) -> Self {
        Self { corpus, generator }
    }

    /// Resolve `query` to a primary recipe and alternatives.
    ///
    /// Never fails: generation errors are logged and answered with a
    /// fallback recipe titled after the query.
    pub async fn resolve(&self, query: &str) -> Resolution {
        match match_query(query, self.corpus) {
            CorpusMatch::Exact(recipe) => {
                info!(%query, id = %recipe.id, "exact corpus match");
                Resolution {
                    tier: Tier::Exact,
                    primary: recipe,
                    alternatives: Vec::new(),
                    fallback: false,
                }
            }
            CorpusMatch::Close { recipe, score } => {
                info!(%query, id = %recipe.id, score, "close corpus match");
                Resolution {
                    tier: Tier::Close,
                    primary: recipe,
                    alternatives: Vec::new(),
                    fallback: false,
                }
            }
            CorpusMatch::None { best_score } => {
                info!(%query, best_score, "no corpus match, generating");
                self.generate(query).await
            }
        }
    }

    async fn generate(&self, query: &str) -> Resolution {
        match self.generator.generate(query).await {
            Ok(envelope) => {
                let (primary, alternatives) = envelope.normalize();
                info!(
                    %query,
                    id = %primary.id,
                    alternatives = alternatives.len(),
                    "generated recipe"
                );
                Resolution {
                    tier: Tier::Generated,
                    primary,
                    alternatives,
                    fallback: false,
                }
            }
            Err(e) => {
                warn!(%query, error = %e, "generation failed, returning fallback recipe");
                Resolution {
                    tier: Tier::Generated,
                    primary: Recipe::fallback(query),
                    alternatives: Vec::new(),
                    fallback: true,
                }
            }
        }
    }
}
