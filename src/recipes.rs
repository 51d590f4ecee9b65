use crate::id::RecipeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    hash::Hash,
    io::ErrorKind,
    sync::{Arc, RwLock},
    time::Instant,
};

/// One entry of a recipe's ingredient list. Names are stored trimmed and
/// lowercased; entries with empty names never reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,

    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub diet_tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,

    /// Embedding of [`embedding_text`] computed at insert time. Never
    /// recomputed on read; there is no edit path that could make it stale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    pub created_at: DateTime<Utc>,
}

impl Hash for Recipe {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Recipe {}

/// A fully normalized recipe waiting for the store to assign an id and a
/// creation timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub diet_tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

/// Steps arrive either as one newline-delimited block or as an explicit list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StepsInput {
    Text(String),
    List(Vec<String>),
}

impl Default for StepsInput {
    fn default() -> Self {
        StepsInput::Text(String::new())
    }
}

impl StepsInput {
    /// Split into non-empty trimmed steps.
    pub fn into_steps(self) -> Vec<String> {
        match self {
            StepsInput::Text(text) => text
                .split('\n')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect(),
            StepsInput::List(steps) => steps
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IngredientInput {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

/// Request-shaped recipe input, as accepted by the HTTP and CLI boundaries.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecipeCreate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub difficulty: Option<String>,
    pub cook_time: Option<u32>,
    /// Comma-separated list
    pub diet_tags: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientInput>,
    #[serde(default)]
    pub steps: StepsInput,
}

impl RecipeCreate {
    /// Normalize the raw ingredient entries: trim and lowercase names,
    /// drop entries whose name ends up empty.
    pub fn normalized_ingredients(&self) -> Vec<Ingredient> {
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

/// Canonical text a recipe's embedding is computed from.
pub fn embedding_text(
    title: &str,
    description: &str,
    cuisine: &str,
    ingredients: &[Ingredient],
) -> String {
    let names = ingredients
        .iter()
        .map(|i| i.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{title}. {description}. Cuisine: {cuisine}. Ingredients: {names}.")
}

/// Field-level predicates the store applies before returning documents.
/// Cuisine is exact equality, diet tag is membership in the tag list.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecipeQuery {
    pub cuisine: Option<String>,
    pub diet_tag: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("store io error: {0:?}")]
    Io(#[from] std::io::Error),

    #[error("store codec error: {0:?}")]
    Codec(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

pub trait RecipeStore: Send + Sync {
    /// Insert a recipe, assigning its id and creation timestamp.
    fn insert(&self, recipe: NewRecipe) -> Result<Recipe, StoreError>;
    /// Fetch documents matching the query, newest first.
    fn query(&self, query: RecipeQuery) -> Result<Vec<Recipe>, StoreError>;
    fn count_all(&self) -> Result<usize, StoreError>;
}

/// JSON-file document store. The whole working set lives in memory and is
/// rewritten atomically (temp file + rename) on every insert.
#[derive(Debug, Clone, Default)]
pub struct BackendJson {
    list: Arc<RwLock<Vec<Recipe>>>,
    path: String,
}

impl BackendJson {
    pub fn load(path: &str) -> Result<Self, StoreError> {
        if let Err(err) = std::fs::metadata(path) {
            match err.kind() {
                ErrorKind::NotFound => {
                    log::info!("Creating new database at {path}");
                    std::fs::write(path, b"[]")?;
                }
                _ => Err(err)?,
            }
        }

        let now = Instant::now();
        let raw = std::fs::read(path)?;
        let recipes: Vec<Recipe> = serde_json::from_slice(&raw)?;

        log::debug!(
            "took {}ms to read {} recipes",
            now.elapsed().as_micros() as f64 / 1000.0,
            recipes.len()
        );

        Ok(BackendJson {
            list: Arc::new(RwLock::new(recipes)),
            path: path.to_string(),
        })
    }

    fn save(&self) -> Result<(), StoreError> {
        let recipes = self.list.read().map_err(|_| StoreError::Poisoned)?;

        let temp_path = format!("{}-tmp", &self.path);
        std::fs::write(&temp_path, serde_json::to_vec(&*recipes)?)?;
        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

}

impl RecipeStore for BackendJson {
    fn insert(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let recipe = Recipe {
            id: RecipeId::new(),
            title: recipe.title,
            description: recipe.description,
            cuisine: recipe.cuisine,
            difficulty: recipe.difficulty,
            cook_time: recipe.cook_time,
            diet_tags: recipe.diet_tags,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            embedding: recipe.embedding,
            created_at: Utc::now(),
        };

        self.list
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .push(recipe.clone());

        self.save()?;

        Ok(recipe)
    }

    fn query(&self, query: RecipeQuery) -> Result<Vec<Recipe>, StoreError> {
        let recipes = self.list.read().map_err(|_| StoreError::Poisoned)?;

        let mut output: Vec<Recipe> = recipes
            .iter()
            .filter(|r| {
                if let Some(cuisine) = &query.cuisine {
                    if &r.cuisine != cuisine {
                        return false;
                    }
                }
                if let Some(diet_tag) = &query.diet_tag {
                    if !r.diet_tags.iter().any(|t| t == diet_tag) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        // stable sort keeps insertion order for equal timestamps
        output.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(output)
    }

    fn count_all(&self) -> Result<usize, StoreError> {
        Ok(self.list.read().map_err(|_| StoreError::Poisoned)?.len())
    }
}

#[cfg(test)]
impl BackendJson {
    pub fn list(&self) -> Arc<RwLock<Vec<Recipe>>> {
        self.list.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_from_text_block() {
        let steps = StepsInput::Text("  Chop onions \n\n Fry them \n".to_string()).into_steps();
        assert_eq!(steps, vec!["Chop onions".to_string(), "Fry them".to_string()]);
    }

    #[test]
    fn test_steps_from_list() {
        let steps = StepsInput::List(vec![
            " Boil water ".to_string(),
            "".to_string(),
            "Add pasta".to_string(),
        ])
        .into_steps();
        assert_eq!(steps, vec!["Boil water".to_string(), "Add pasta".to_string()]);
    }

    #[test]
    fn test_ingredient_normalization_drops_empty_names() {
        let create = RecipeCreate {
            ingredients: vec![
                IngredientInput {
                    name: Some("  Egg ".to_string()),
                    quantity: Some("2".to_string()),
                    unit: None,
                },
                IngredientInput {
                    name: Some("   ".to_string()),
                    quantity: Some("1".to_string()),
                    unit: Some("cup".to_string()),
                },
                IngredientInput::default(),
            ],
            ..Default::default()
        };

        let ingredients = create.normalized_ingredients();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].name, "egg");
        assert_eq!(ingredients[0].quantity, "2");
        assert_eq!(ingredients[0].unit, "");
    }

    #[test]
    fn test_embedding_text_shape() {
        let ingredients = vec![
            Ingredient {
                name: "tomato".to_string(),
                quantity: String::new(),
                unit: String::new(),
            },
            Ingredient {
                name: "garlic".to_string(),
                quantity: String::new(),
                unit: String::new(),
            },
        ];

        let text = embedding_text("Pasta", "Quick dinner", "Italian", &ingredients);
        assert_eq!(
            text,
            "Pasta. Quick dinner. Cuisine: Italian. Ingredients: tomato, garlic."
        );
    }
}
