use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One recipe as the board works with it.
///
/// Decoding goes through [`ApiRecipe`], so the same code accepts API results,
/// normalized cache entries and legacy cache shapes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "ApiRecipe")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub ready_in_minutes: f64,
    pub popularity: f64,
    pub cuisines: Vec<String>,
    pub ingredients: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipeDecodeError {
    #[error("recipe has no usable id")]
    MissingId,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiIngredient {
    #[serde(default)]
    pub name: Option<String>,
}

/// Wire shape of a recipe. Everything is optional; [`Recipe::try_from`]
/// decides what is acceptable.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiRecipe {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<Value>,
    #[serde(default)]
    pub aggregate_likes: Option<Value>,
    #[serde(default)]
    pub popularity: Option<Value>,
    #[serde(default, rename = "popularityL")]
    pub popularity_l: Option<Value>,
    #[serde(default)]
    pub cuisines: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub extended_ingredients: Option<Vec<ApiIngredient>>,
    #[serde(default)]
    pub ingredients: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl TryFrom<ApiRecipe> for Recipe {
    type Error = RecipeDecodeError;

    fn try_from(raw: ApiRecipe) -> Result<Self, Self::Error> {
        let id = raw.id.as_ref().and_then(id_string).ok_or(RecipeDecodeError::MissingId)?;

        let mut seen = HashSet::new();
        let ingredients: Vec<String> = raw
            .extended_ingredients
            .unwrap_or_default()
            .into_iter()
            .filter_map(|i| i.name)
            .chain(raw.ingredients.unwrap_or_default().into_iter().flatten())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();

        // aggregateLikes, then popularity, then popularityL
        let popularity = raw
            .aggregate_likes
            .or(raw.popularity)
            .or(raw.popularity_l);

        Ok(Recipe {
            id,
            title: raw.title.map(|t| t.trim().to_string()).unwrap_or_default(),
            image_url: raw.image.or(raw.image_url).unwrap_or_default(),
            ready_in_minutes: raw.ready_in_minutes.as_ref().map(to_num).unwrap_or(0.0),
            popularity: popularity.as_ref().map(to_num).unwrap_or(0.0),
            cuisines: raw
                .cuisines
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .filter(|c| !c.trim().is_empty())
                .collect(),
            ingredients,
            summary: raw.summary.unwrap_or_default(),
        })
    }
}

/// Ids compare as strings whatever type the source used.
pub fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Numeric coercion: numbers and numeric strings, anything else is 0.
pub fn to_num(v: &Value) -> f64 {
    let n = match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if n.is_finite() {
        n
    } else {
        0.0
    }
}
