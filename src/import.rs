//! One-time bulk import of a seed recipe dataset.
//!
//! Runs only against an empty store; any existing document makes the whole
//! run a no-op, so restarting the daemon never duplicates the dataset.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;

use crate::recipes::{
    embedding_text, Ingredient, IngredientInput, NewRecipe, RecipeStore, StepsInput,
};
use crate::semantic::Embedder;

/// Dataset record shape. Unlike the create-recipe request, diet tags arrive
/// as an explicit list.
#[derive(Debug, Deserialize)]
struct DatasetRecord {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    cuisine: String,
    #[serde(default)]
    difficulty: String,
    #[serde(default)]
    cook_time: Option<u32>,
    #[serde(default)]
    diet_tags: Vec<String>,
    #[serde(default)]
    ingredients: Vec<IngredientInput>,
    #[serde(default)]
    steps: StepsInput,
}

impl DatasetRecord {
    fn normalized_ingredients(&self) -> Vec<Ingredient> {
        self.ingredients
            .iter()
            .filter_map(|ing| {
                let name = ing
                    .name
                    .as_deref()
                    .unwrap_or_default()
                    .trim()
                    .to_lowercase();
                if name.is_empty() {
                    return None;
                }
                Some(Ingredient {
                    name,
                    quantity: ing.quantity.as_deref().unwrap_or_default().trim().to_string(),
                    unit: ing.unit.as_deref().unwrap_or_default().trim().to_string(),
                })
            })
            .collect()
    }
}

/// Seed the store from a JSON dataset file. Returns the number of recipes
/// inserted; 0 when the store already has documents or the file is absent.
pub fn run(
    store: &Arc<dyn RecipeStore>,
    embedder: &Arc<dyn Embedder>,
    dataset_path: &str,
) -> anyhow::Result<usize> {
    if store.count_all()? > 0 {
        log::info!("Recipes already exist, skipping dataset import");
        return Ok(0);
    }

    let raw = match std::fs::read(dataset_path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Dataset file {dataset_path} not found, nothing to import");
            return Ok(0);
        }
        Err(err) => return Err(err.into()),
    };

    let records: Vec<DatasetRecord> = serde_json::from_slice(&raw)?;
    log::info!("Importing {} recipes from {dataset_path}", records.len());

    // one model call for the whole dataset
    let texts: Vec<String> = records
        .iter()
        .map(|r| {
            embedding_text(
                r.title.trim(),
                r.description.trim(),
                r.cuisine.trim(),
                &r.normalized_ingredients(),
            )
        })
        .collect();
    let embeddings = embedder.embed_batch(&texts)?;

    let bar = ProgressBar::new(records.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{wide_bar} {pos}/{len} {msg}")
            .expect("static progress template"),
    );

    let mut inserted = 0;
    for (record, embedding) in records.into_iter().zip(embeddings) {
        let title = record.title.trim().to_string();
        if title.is_empty() {
            log::warn!("Skipping dataset record with empty title");
            bar.inc(1);
            continue;
        }

        let ingredients = record.normalized_ingredients();

        store.insert(NewRecipe {
            title,
            description: record.description.trim().to_string(),
            cuisine: record.cuisine.trim().to_string(),
            difficulty: record.difficulty.trim().to_string(),
            cook_time: record.cook_time,
            diet_tags: record
                .diet_tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            ingredients,
            steps: record.steps.into_steps(),
            embedding,
        })?;

        inserted += 1;
        bar.inc(1);
    }
    bar.finish_and_clear();

    log::info!("Imported {inserted} recipes");

    Ok(inserted)
}
