//! Classifies a query against the corpus: exact title, close match or none.

use shared::dto::Recipe;

use crate::similarity::jaccard_similarity;

/// Minimum similarity for a close match.
pub const CLOSE_MATCH_THRESHOLD: f64 = 0.3;

/// Appended to the title of a close match.
pub const CLOSE_MATCH_MARKER: &str = " (Close Match)";

#[derive(Debug, Clone, PartialEq)]
pub enum CorpusMatch {
    Exact(Recipe),
    /// Best scoring entry with [`CLOSE_MATCH_MARKER`] added to its title.
    Close { recipe: Recipe, score: f64 },
    None { best_score: f64 },
}

/// Match `query` against `corpus`.
///
/// Exact matches compare titles case-insensitively; otherwise the highest
/// Jaccard score decides, ties going to the earlier entry. Corpus entries
/// are cloned, never modified.
pub fn match_query(query: &str, corpus: &[Recipe]) -> CorpusMatch {
    let needle = query.trim().to_lowercase();
    if let Some(hit) = corpus.iter().find(|r| r.title.to_lowercase() == needle) {
        return CorpusMatch::Exact(hit.clone());
    }

    let mut best: Option<(&Recipe, f64)> = None;
    for recipe in corpus {
        let score = jaccard_similarity(query, &recipe.title);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((recipe, score));
        }
    }

    match best {
        Some((recipe, score)) if score >= CLOSE_MATCH_THRESHOLD => {
            let mut annotated = recipe.clone();
            annotated.title.push_str(CLOSE_MATCH_MARKER);
            CorpusMatch::Close {
                recipe: annotated,
                score,
            }
        }
        Some((_, score)) => CorpusMatch::None { best_score: score },
        None => CorpusMatch::None { best_score: 0.0 },
    }
}
