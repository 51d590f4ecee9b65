use std::sync::Arc;

use crate::import;
use crate::recipes::{BackendJson, RecipeQuery, RecipeStore};
use crate::semantic::Embedder;
use crate::tests::StubEmbedder;

const DATASET: &str = r#"[
    {
        "title": "Tomato Soup",
        "description": "A simple soup",
        "cuisine": "Italian",
        "difficulty": "easy",
        "cook_time": 30,
        "diet_tags": ["vegan"],
        "ingredients": [
            {"name": " Tomato ", "quantity": "4"},
            {"name": "basil"},
            {"name": ""}
        ],
        "steps": ["Chop tomatoes", "Simmer"]
    },
    {
        "title": "Chocolate Cake",
        "ingredients": [{"name": "chocolate"}, {"name": "flour"}],
        "steps": "Mix everything\nBake for 40 minutes"
    }
]"#;

fn setup(dir: &tempfile::TempDir) -> (Arc<dyn RecipeStore>, Arc<dyn Embedder>, String) {
    let store_path = dir.path().join("recipes.json");
    let dataset_path = dir.path().join("dataset.json");
    std::fs::write(&dataset_path, DATASET).unwrap();

    let store: Arc<dyn RecipeStore> =
        Arc::new(BackendJson::load(store_path.to_str().unwrap()).unwrap());
    let embedder: Arc<dyn Embedder> = Arc::new(StubEmbedder);

    (store, embedder, dataset_path.to_str().unwrap().to_string())
}

#[test]
fn test_import_populates_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let (store, embedder, dataset_path) = setup(&dir);

    let inserted = import::run(&store, &embedder, &dataset_path).unwrap();
    assert_eq!(inserted, 2);
    assert_eq!(store.count_all().unwrap(), 2);

    let recipes = store.query(RecipeQuery::default()).unwrap();
    let soup = recipes.iter().find(|r| r.title == "Tomato Soup").unwrap();

    // normalized on the way in: empty name dropped, rest lowercased
    assert_eq!(soup.ingredients.len(), 2);
    assert_eq!(soup.ingredients[0].name, "tomato");
    assert!(soup.embedding.is_some());

    // newline-delimited steps variant
    let cake = recipes.iter().find(|r| r.title == "Chocolate Cake").unwrap();
    assert_eq!(cake.steps.len(), 2);
    assert_eq!(cake.steps[0], "Mix everything");
}

#[test]
fn test_import_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let (store, embedder, dataset_path) = setup(&dir);

    assert_eq!(import::run(&store, &embedder, &dataset_path).unwrap(), 2);

    // second run inserts nothing and does not error
    assert_eq!(import::run(&store, &embedder, &dataset_path).unwrap(), 0);
    assert_eq!(store.count_all().unwrap(), 2);
}

#[test]
fn test_import_skips_non_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let (store, embedder, dataset_path) = setup(&dir);

    store
        .insert(crate::recipes::NewRecipe {
            title: "Pre-existing".to_string(),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(import::run(&store, &embedder, &dataset_path).unwrap(), 0);
    assert_eq!(store.count_all().unwrap(), 1);
}

#[test]
fn test_import_missing_dataset_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let (store, embedder, _) = setup(&dir);

    let missing = dir.path().join("nope.json");
    let inserted = import::run(&store, &embedder, missing.to_str().unwrap()).unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(store.count_all().unwrap(), 0);
}
