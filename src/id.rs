use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;
use std::{fmt::Display, ops::Deref};

/// ULID-backed recipe identifier. Assigned by the store on insert,
/// immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct RecipeId(String);

impl Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecipeId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RecipeId(s.to_string()))
    }
}

impl Deref for RecipeId {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for RecipeId {
    fn from(fr: &str) -> Self {
        RecipeId(fr.to_string())
    }
}

impl From<String> for RecipeId {
    fn from(fr: String) -> Self {
        RecipeId(fr)
    }
}

impl From<RecipeId> for String {
    fn from(fr: RecipeId) -> Self {
        fr.0
    }
}

impl RecipeId {
    #[inline]
    pub fn new() -> RecipeId {
        RecipeId(rusty_ulid::generate_ulid_string())
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}
