//! Integration tests for the store, the retrieval service, and the bulk
//! importer. Pure-logic tests live next to their modules; everything here
//! exercises components wired together, with stub embedders so no model
//! download is needed.

mod import;
mod recipes;

use crate::semantic::{Embedder, EmbeddingError};

/// Deterministic embedder: three axes counting keyword hits. Enough to make
/// similarity ranking predictable without a real model.
pub struct StubEmbedder;

impl Embedder for StubEmbedder {
    fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbeddingError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let t = text.to_lowercase();
        Ok(Some(vec![
            t.matches("tomato").count() as f32,
            t.matches("chocolate").count() as f32,
            1.0,
        ]))
    }
}

/// Embedder whose model can never be loaded.
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Option<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::InitFailed("model unavailable".to_string()))
    }
}
