use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::model::category::Cuisine;
use crate::model::recipe::Recipe;
use crate::services::classifier;

/// Render payload of one recipe card. Also kept as the favorite snapshot,
/// so it must be enough to redisplay the card without the source record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub cuisine: Cuisine,
    pub cuisine_label: String,
    pub cooking_minutes: f64,
    pub popularity: f64,
    pub ingredients: Vec<String>,
}

impl Card {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        let cuisine = classifier::classify(recipe);

        Card {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            image_url: recipe.image_url.clone(),
            cuisine,
            cuisine_label: cuisine.label().to_string(),
            cooking_minutes: recipe.ready_in_minutes,
            popularity: recipe.popularity,
            ingredients: recipe.ingredients.clone(),
        }
    }

    /// Data attributes the filter and sort controls address by name.
    pub fn data(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "cuisine" => Some(self.cuisine.key().to_string()),
            "cooking" => Some(format_num(self.cooking_minutes)),
            "popularity" => Some(format_num(self.popularity)),
            _ => None,
        }
    }
}

fn format_num(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Quota,
    Unauthorized,
    Network,
    Empty,
    Generic,
    RandomUnavailable,
    NothingToPick,
}

impl From<&FetchError> for PlaceholderKind {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::QuotaExceeded { .. } => PlaceholderKind::Quota,
            FetchError::Unauthorized => PlaceholderKind::Unauthorized,
            FetchError::Network(_) => PlaceholderKind::Network,
            FetchError::EmptyResult => PlaceholderKind::Empty,
            FetchError::Http { .. } | FetchError::Decode(_) => PlaceholderKind::Generic,
        }
    }
}

/// Synthetic card shown in place of real records.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub title: String,
    pub message: String,
}

impl Placeholder {
    pub fn new(kind: PlaceholderKind) -> Self {
        let (title, message) = match kind {
            PlaceholderKind::Quota => (
                "🍰 Oops! API limit reached 😅",
                "Looks like we've hit the maximum number of requests for today. Try again later or use local recipes!",
            ),
            PlaceholderKind::Unauthorized => (
                "🔒 Recipes unavailable",
                "The recipe service rejected our API key. Check the configuration and try again.",
            ),
            PlaceholderKind::Network => (
                "📡 No connection",
                "We couldn't reach the recipe service. Check your network and try again.",
            ),
            PlaceholderKind::Empty => (
                "🥣 Nothing here yet",
                "The recipe service returned no recipes for this section.",
            ),
            PlaceholderKind::Generic => (
                "🍰 Oops! Something went wrong",
                "Recipes could not be loaded right now. Try again later.",
            ),
            PlaceholderKind::RandomUnavailable => (
                "⏳ Random unavailable",
                "API limit reached. Try again after reset.",
            ),
            PlaceholderKind::NothingToPick => ("😕 Nothing to pick", "Load some recipes first."),
        };

        Placeholder {
            kind,
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_map_to_placeholder_kinds() {
        assert_eq!(
            PlaceholderKind::from(&FetchError::QuotaExceeded { status: 429 }),
            PlaceholderKind::Quota
        );
        assert_eq!(PlaceholderKind::from(&FetchError::Unauthorized), PlaceholderKind::Unauthorized);
        assert_eq!(
            PlaceholderKind::from(&FetchError::Network("reset".into())),
            PlaceholderKind::Network
        );
        assert_eq!(
            PlaceholderKind::from(&FetchError::Http { status: 500, message: String::new() }),
            PlaceholderKind::Generic
        );
    }

    #[test]
    fn data_attributes_render_integers_plainly() {
        let card = Card {
            id: "7".into(),
            title: "Mocha".into(),
            image_url: String::new(),
            cuisine: Cuisine::Other,
            cuisine_label: "Other".into(),
            cooking_minutes: 30.0,
            popularity: 2.5,
            ingredients: vec![],
        };

        assert_eq!(card.data("cooking").as_deref(), Some("30"));
        assert_eq!(card.data("popularity").as_deref(), Some("2.5"));
        assert_eq!(card.data("cuisine").as_deref(), Some("other"));
        assert_eq!(card.data("color"), None);
    }
}
