//! The retrieval service: recipe creation plus the two read-only search
//! modes (structured ingredient filtering and semantic ranking).
//!
//! The service is stateless per request; the only shared mutable state in
//! the whole pipeline is the embedder's lazily-loaded model handle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::filter;
use crate::recipes::{
    embedding_text, NewRecipe, Recipe, RecipeCreate, RecipeQuery, RecipeStore, StoreError,
};
use crate::semantic::{cosine_similarities, round3, Embedder, EmbeddingError};

#[derive(thiserror::Error, Debug)]
pub enum RetrievalError {
    /// Missing or empty required input. Caller error, never retried.
    #[error("{0}")]
    Validation(String),

    /// The embedder returned no vector for a non-empty query.
    #[error("could not compute query embedding")]
    NoQueryEmbedding,

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Structured-search input, request-shaped: comma lists and optional
/// cuisine/diet-tag equality filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientSearch {
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub cuisine: Option<String>,
    pub diet_tag: Option<String>,
}

/// A recipe with its similarity score attached, response-shaped.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub similarity: f64,
}

pub struct RetrievalService {
    store: Arc<dyn RecipeStore>,
    embedder: Arc<dyn Embedder>,
}

impl RetrievalService {
    pub fn new(store: Arc<dyn RecipeStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self { store, embedder }
    }

    /// Validate and normalize a recipe, compute its embedding from the
    /// canonical text, and insert it.
    pub fn create(&self, create: RecipeCreate) -> Result<Recipe, RetrievalError> {
        let title = create.title.as_deref().unwrap_or_default().trim().to_string();
        if title.is_empty() {
            return Err(RetrievalError::Validation("Title is required".to_string()));
        }

        let description = create
            .description
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string();
        let cuisine = create.cuisine.as_deref().unwrap_or_default().trim().to_string();
        let difficulty = create
            .difficulty
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string();

        // trimmed, case preserved for display
        let diet_tags: Vec<String> = create
            .diet_tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let ingredients = create.normalized_ingredients();
        let steps = create.steps.clone().into_steps();

        let text = embedding_text(&title, &description, &cuisine, &ingredients);
        let embedding = self.embedder.embed(&text)?;

        let recipe = self.store.insert(NewRecipe {
            title,
            description,
            cuisine,
            difficulty,
            cook_time: create.cook_time,
            diet_tags,
            ingredients,
            steps,
            embedding,
        })?;

        Ok(recipe)
    }

    /// Structured search: store-level cuisine/diet-tag predicates, then the
    /// ingredient filter. Ordering is inherited from the store (newest
    /// first); the filter never re-sorts.
    pub fn search_ingredients(
        &self,
        search: IngredientSearch,
    ) -> Result<Vec<Recipe>, RetrievalError> {
        let include = filter::parse_list(search.include.as_deref().unwrap_or_default());
        let exclude = filter::parse_list(search.exclude.as_deref().unwrap_or_default());

        let query = RecipeQuery {
            cuisine: non_empty(search.cuisine),
            diet_tag: non_empty(search.diet_tag),
        };

        let candidates = self.store.query(query)?;

        Ok(candidates
            .into_iter()
            .filter(|r| filter::matches(r, &include, &exclude))
            .collect())
    }

    /// Semantic search: embed the query, score every stored recipe, return
    /// the full list sorted by similarity descending. The sort is stable, so
    /// tied scores keep the store's fetch order. No top-k truncation here;
    /// that policy belongs to the boundary.
    pub fn search_semantic(&self, q: &str) -> Result<Vec<ScoredRecipe>, RetrievalError> {
        let q = q.trim();
        if q.is_empty() {
            // rejected before any store access
            return Err(RetrievalError::Validation("Query 'q' is required".to_string()));
        }

        let query_embedding = self
            .embedder
            .embed(q)?
            .ok_or(RetrievalError::NoQueryEmbedding)?;

        let recipes = self.store.query(RecipeQuery::default())?;

        let scores = cosine_similarities(
            Some(&query_embedding),
            recipes.iter().map(|r| r.embedding.as_deref()),
        );

        let mut scored: Vec<ScoredRecipe> = recipes
            .into_iter()
            .zip(scores)
            .map(|(recipe, score)| ScoredRecipe {
                recipe,
                similarity: round3(score),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(scored)
    }

    /// All recipes, newest first (history view).
    pub fn recent(&self) -> Result<Vec<Recipe>, RetrievalError> {
        Ok(self.store.query(RecipeQuery::default())?)
    }

    pub fn total(&self) -> Result<usize, RetrievalError> {
        Ok(self.store.count_all()?)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
