use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Themed section of the board. Tea has a panel but no feed.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Coffee,
    Juice,
    Tea,
}

impl Category {
    pub const FEEDS: [Category; 2] = [Category::Coffee, Category::Juice];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Coffee => "coffee",
            Category::Juice => "juice",
            Category::Tea => "tea",
        }
    }

    /// Storage slot holding the cached records of this category.
    pub fn cache_key(self) -> Option<&'static str> {
        match self {
            Category::Coffee => Some("coffeeData"),
            Category::Juice => Some("juiceData"),
            Category::Tea => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coffee" => Ok(Category::Coffee),
            "juice" => Ok(Category::Juice),
            "tea" => Ok(Category::Tea),
            _ => Err(SessionError::UnknownCategory(s.to_string())),
        }
    }
}

/// Visible panel of the board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Coffee,
    Juice,
    Tea,
    Favorites,
}

impl Panel {
    pub fn category(self) -> Option<Category> {
        match self {
            Panel::Coffee => Some(Category::Coffee),
            Panel::Juice => Some(Category::Juice),
            Panel::Tea => Some(Category::Tea),
            Panel::Favorites => None,
        }
    }
}

impl FromStr for Panel {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coffee" => Ok(Panel::Coffee),
            "juice" => Ok(Panel::Juice),
            "tea" => Ok(Panel::Tea),
            "favorites" => Ok(Panel::Favorites),
            _ => Err(SessionError::UnknownPanel(s.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Cuisine {
    Italian,
    Asian,
    MiddleEastern,
    Other,
}

impl Cuisine {
    /// Key used in card data and filter values.
    pub fn key(self) -> &'static str {
        match self {
            Cuisine::Italian => "italian",
            Cuisine::Asian => "asian",
            Cuisine::MiddleEastern => "middle_eastern",
            Cuisine::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cuisine::Italian => "Italy",
            Cuisine::Asian => "Asian",
            Cuisine::MiddleEastern => "Middle East",
            Cuisine::Other => "Other",
        }
    }
}

/// Filter values arrive as `middle eastern`, `middle-eastern` or `middle_eastern`.
pub fn normalize_cuisine_key(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuisine_keys_normalize() {
        assert_eq!(normalize_cuisine_key("Middle  Eastern"), "middle_eastern");
        assert_eq!(normalize_cuisine_key("middle-eastern"), "middle_eastern");
        assert_eq!(normalize_cuisine_key(" ALL "), "all");
        assert_eq!(normalize_cuisine_key(Cuisine::MiddleEastern.key()), "middle_eastern");
    }

    #[test]
    fn tea_has_no_cache_slot() {
        assert_eq!(Category::Tea.cache_key(), None);
        assert_eq!(Category::Coffee.cache_key(), Some("coffeeData"));
        assert_eq!("Juice".parse::<Category>().ok(), Some(Category::Juice));
        assert!("soda".parse::<Category>().is_err());
    }
}
