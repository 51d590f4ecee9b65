use crate::recipes::{
    BackendJson, Ingredient, NewRecipe, RecipeQuery, RecipeStore,
};

fn new_recipe(title: &str, cuisine: &str, diet_tags: &[&str]) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        cuisine: cuisine.to_string(),
        diet_tags: diet_tags.iter().map(|t| t.to_string()).collect(),
        ingredients: vec![Ingredient {
            name: "salt".to_string(),
            quantity: String::new(),
            unit: String::new(),
        }],
        ..Default::default()
    }
}

fn temp_store(dir: &tempfile::TempDir) -> BackendJson {
    let path = dir.path().join("recipes.json");
    BackendJson::load(path.to_str().unwrap()).unwrap()
}

#[test]
fn test_insert_assigns_id_and_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);

    let recipe = store.insert(new_recipe("Pasta", "Italian", &[])).unwrap();

    assert!(!recipe.id.is_empty());
    assert_eq!(recipe.title, "Pasta");

    let other = store.insert(new_recipe("Salad", "", &[])).unwrap();
    assert_ne!(recipe.id, other.id);
}

#[test]
fn test_inserts_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipes.json");

    {
        let store = BackendJson::load(path.to_str().unwrap()).unwrap();
        store.insert(new_recipe("Pasta", "Italian", &[])).unwrap();
        store.insert(new_recipe("Salad", "", &["vegan"])).unwrap();
    }

    let store = BackendJson::load(path.to_str().unwrap()).unwrap();
    assert_eq!(store.count_all().unwrap(), 2);

    let all = store.query(RecipeQuery::default()).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|r| r.title == "Pasta"));
}

#[test]
fn test_query_cuisine_is_exact_equality() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);

    store.insert(new_recipe("Pasta", "Italian", &[])).unwrap();
    store.insert(new_recipe("Curry", "Indian", &[])).unwrap();

    let results = store
        .query(RecipeQuery {
            cuisine: Some("Italian".to_string()),
            diet_tag: None,
        })
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Pasta");

    // equality, not substring or case-folding
    let results = store
        .query(RecipeQuery {
            cuisine: Some("italian".to_string()),
            diet_tag: None,
        })
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_query_diet_tag_is_membership() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);

    store
        .insert(new_recipe("Salad", "", &["vegan", "gluten-free"]))
        .unwrap();
    store.insert(new_recipe("Steak", "", &[])).unwrap();

    let results = store
        .query(RecipeQuery {
            cuisine: None,
            diet_tag: Some("vegan".to_string()),
        })
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Salad");
}

#[test]
fn test_query_returns_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);

    store.insert(new_recipe("Oldest", "", &[])).unwrap();
    store.insert(new_recipe("Middle", "", &[])).unwrap();
    store.insert(new_recipe("Newest", "", &[])).unwrap();

    // spread the timestamps out so ordering is unambiguous
    {
        let list = store.list();
        let mut recipes = list.write().unwrap();
        recipes[0].created_at = chrono::Utc::now() - chrono::Duration::hours(2);
        recipes[1].created_at = chrono::Utc::now() - chrono::Duration::hours(1);
    }

    let results = store.query(RecipeQuery::default()).unwrap();
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);
}

#[test]
fn test_count_all() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);

    assert_eq!(store.count_all().unwrap(), 0);
    store.insert(new_recipe("Pasta", "", &[])).unwrap();
    assert_eq!(store.count_all().unwrap(), 1);
}
