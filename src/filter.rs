//! Ingredient inclusion/exclusion matching.
//!
//! Cuisine and diet-tag predicates are handled by [`RecipeQuery`] at the
//! store level; this module only decides ingredient membership. It never
//! re-sorts: callers keep whatever ordering the store returned.

use crate::recipes::Recipe;
use std::collections::HashSet;

/// Split a comma-separated list into trimmed, lowercased, non-empty entries.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// True when every `include` entry is present among the recipe's ingredient
/// names and no `exclude` entry is. Empty sets are vacuous.
///
/// Ingredient names are lowercased again here even though the store already
/// normalizes them; the filter does not assume its input came from our own
/// insert path.
pub fn matches(recipe: &Recipe, include: &[String], exclude: &[String]) -> bool {
    let names: HashSet<String> = recipe
        .ingredients
        .iter()
        .map(|i| i.name.trim().to_lowercase())
        .collect();

    if !include.is_empty() && !include.iter().all(|ing| names.contains(ing)) {
        return false;
    }

    !exclude.iter().any(|ing| names.contains(ing))
}
