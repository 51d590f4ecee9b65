//! Embedding provider with guarded lazy initialization.
//!
//! The fastembed model is expensive to load, so it is initialized at most
//! once per process, on first use, behind a mutex. After initialization the
//! handle is only ever read.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::EmbeddingConfig;
use crate::semantic::embeddings::{EmbeddingError, EmbeddingModel};

/// Seam for embedding generation.
///
/// `Ok(None)` means the text was empty after trimming; that is a defined
/// "no embedding" signal, not a failure.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbeddingError>;

    /// Positional batch variant; empty texts map to `None` in place.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Option<Vec<f32>>>, EmbeddingError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Lazily-initialized fastembed-backed [`Embedder`].
pub struct EmbeddingProvider {
    config: EmbeddingConfig,
    cache_dir: PathBuf,
    /// Lazily-initialized model. Uses Mutex<Option<_>> instead of OnceLock
    /// because get_or_try_init is unstable.
    model: Mutex<Option<EmbeddingModel>>,
}

impl EmbeddingProvider {
    /// Create a provider in an uninitialized state; the model is loaded on
    /// first embed.
    ///
    /// # Arguments
    /// * `config` - Embedding model configuration
    /// * `cache_dir` - Base directory for the model cache (models/)
    pub fn new(config: EmbeddingConfig, cache_dir: PathBuf) -> Self {
        Self {
            config,
            cache_dir,
            model: Mutex::new(None),
        }
    }

    /// Check if the model has been loaded.
    pub fn is_initialized(&self) -> bool {
        self.model
            .lock()
            .ok()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Force initialization of the model.
    ///
    /// Normally the model loads lazily on the first embed. The daemon calls
    /// this eagerly so the first semantic request does not pay the load.
    pub fn initialize(&self) -> Result<(), EmbeddingError> {
        self.ensure_initialized()
    }

    /// Ensure the model is loaded, loading it if needed. The lock is held
    /// across the load so concurrent first calls initialize exactly once.
    fn ensure_initialized(&self) -> Result<(), EmbeddingError> {
        let mut guard = self.model.lock().map_err(|e| {
            EmbeddingError::EmbeddingFailed(format!("Model lock poisoned: {}", e))
        })?;

        if guard.is_none() {
            log::info!("Loading embedding model '{}'", self.config.model);
            let timeout = Duration::from_secs(self.config.download_timeout_secs);
            let model =
                EmbeddingModel::new(&self.config.model, self.cache_dir.clone(), Some(timeout))?;
            log::info!(
                "Embedding model '{}' loaded ({} dimensions)",
                model.name(),
                model.dimensions()
            );
            *guard = Some(model);
        }

        Ok(())
    }
}

impl Embedder for EmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbeddingError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        self.ensure_initialized()?;

        let guard = self.model.lock().map_err(|e| {
            EmbeddingError::EmbeddingFailed(format!("Model lock poisoned: {}", e))
        })?;
        let model = guard
            .as_ref()
            .ok_or_else(|| EmbeddingError::InitFailed("model not initialized".to_string()))?;

        model.embed(text).map(Some)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Option<Vec<f32>>>, EmbeddingError> {
        // embed non-empty texts in one model call, scatter back by position
        let trimmed: Vec<Option<&str>> = texts
            .iter()
            .map(|t| {
                let t = t.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t)
                }
            })
            .collect();

        let to_embed: Vec<String> = trimmed
            .iter()
            .filter_map(|t| t.map(|s| s.to_string()))
            .collect();

        if to_embed.is_empty() {
            return Ok(vec![None; texts.len()]);
        }

        self.ensure_initialized()?;

        let guard = self.model.lock().map_err(|e| {
            EmbeddingError::EmbeddingFailed(format!("Model lock poisoned: {}", e))
        })?;
        let model = guard
            .as_ref()
            .ok_or_else(|| EmbeddingError::InitFailed("model not initialized".to_string()))?;

        let mut embeddings = model.embed_batch(&to_embed)?.into_iter();

        Ok(trimmed
            .into_iter()
            .map(|t| t.and_then(|_| embeddings.next()))
            .collect())
    }
}
