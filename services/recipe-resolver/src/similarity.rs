//! Word-set similarity used to compare queries with recipe titles.

use std::collections::HashSet;

/// Lowercases `s` and splits it on whitespace into a set of words.
pub fn tokenize(s: &str) -> HashSet<String> {
    s.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Jaccard index of the word sets of `a` and `b`, in `[0, 1]`.
///
/// Two inputs without any words score 0.0.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let set_a = tokenize(a);
    let set_b = tokenize(b);
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}
