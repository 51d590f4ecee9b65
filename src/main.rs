use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;

mod cli;
mod config;
mod filter;
mod id;
mod import;
mod recipes;
mod retrieval;
mod semantic;
mod storage;
#[cfg(test)]
mod tests;
mod web;

use config::Config;
use recipes::{BackendJson, IngredientInput, RecipeCreate, RecipeStore, StepsInput};
use retrieval::{IngredientSearch, RetrievalService};
use semantic::{Embedder, EmbeddingProvider};

fn base_path() -> String {
    std::env::var("LADLE_BASE_PATH").unwrap_or_else(|_| {
        let home = homedir::my_home()
            .expect("Could not determine home directory")
            .expect("Home directory path is empty");
        format!("{}/.local/share/ladle", home.to_string_lossy())
    })
}

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let base_path = base_path();
    std::fs::create_dir_all(&base_path)
        .context("Failed to create application base directory")?;

    let config = Config::load_with(&base_path);

    let store: Arc<dyn RecipeStore> =
        Arc::new(BackendJson::load(&format!("{base_path}/recipes.json"))?);
    let provider = Arc::new(EmbeddingProvider::new(
        config.embedding.clone(),
        PathBuf::from(&base_path),
    ));
    let embedder: Arc<dyn Embedder> = provider.clone();
    let service = Arc::new(RetrievalService::new(store.clone(), embedder.clone()));

    match args.command {
        cli::Command::Daemon {} => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .init();

            import::run(&store, &embedder, &config.dataset_path())?;

            // load the model now so the first semantic request doesn't pay
            // for it; filter search works either way
            if let Err(err) = provider.initialize() {
                log::warn!("Embedding model unavailable, semantic search will fail: {err}");
            }

            web::start_daemon(service, config.listen_addr.clone());
            Ok(())
        }

        cli::Command::Add {
            title,
            description,
            cuisine,
            difficulty,
            cook_time,
            diet_tags,
            ingredients,
            steps,
        } => {
            let recipe_create = RecipeCreate {
                title: Some(title),
                description,
                cuisine,
                difficulty,
                cook_time,
                diet_tags,
                ingredients: ingredients
                    .map(|list| {
                        filter::parse_list(&list)
                            .into_iter()
                            .map(|name| IngredientInput {
                                name: Some(name),
                                ..Default::default()
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                steps: StepsInput::Text(steps.unwrap_or_default()),
            };

            let recipe = service.create(recipe_create)?;
            println!("{}", serde_json::to_string_pretty(&recipe).unwrap());
            Ok(())
        }

        cli::Command::Search {
            include,
            exclude,
            cuisine,
            diet_tag,
            count,
        } => {
            let results = service.search_ingredients(IngredientSearch {
                include,
                exclude,
                cuisine,
                diet_tag,
            })?;

            if count {
                println!("{} recipes found", results.len());
                return Ok(());
            }

            println!("{}", serde_json::to_string_pretty(&results).unwrap());
            Ok(())
        }

        cli::Command::Semantic { query, count } => {
            let results = service.search_semantic(&query)?;

            if count {
                println!("{} recipes ranked", results.len());
                return Ok(());
            }

            println!("{}", serde_json::to_string_pretty(&results).unwrap());
            Ok(())
        }

        cli::Command::Import {} => {
            let inserted = import::run(&store, &embedder, &config.dataset_path())?;
            println!("{inserted} recipes imported");
            Ok(())
        }

        cli::Command::Total {} => {
            println!("{} recipes stored", service.total()?);
            Ok(())
        }
    }
}
