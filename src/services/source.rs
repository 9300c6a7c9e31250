use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::model::category::Category;
use crate::model::recipe::Recipe;

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";

const FEED_PAGE_SIZE: u32 = 15;
pub const RANDOM_OFFSET_SPAN: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub include_ingredients: Option<String>,
    pub number: u32,
    pub offset: u32,
}

impl SearchQuery {
    /// Query that fills a category feed.
    pub fn feed(category: Category) -> Option<Self> {
        let ingredient = match category {
            Category::Coffee => "coffee",
            Category::Juice => "fruit",
            Category::Tea => return None,
        };

        Some(SearchQuery {
            query: "cake".into(),
            include_ingredients: Some(ingredient.into()),
            number: FEED_PAGE_SIZE,
            offset: 0,
        })
    }

    /// Single-item query at the given offset, used by the random pick.
    pub fn random_pick(category: Category, offset: u32) -> Option<Self> {
        let query = match category {
            Category::Coffee => "cake",
            Category::Juice => "dessert",
            Category::Tea => return None,
        };

        Some(SearchQuery {
            query: query.into(),
            include_ingredients: None,
            number: 1,
            offset,
        })
    }

    /// Tags for the true-random endpoint.
    pub fn random_tags(category: Category) -> Option<&'static str> {
        match category {
            Category::Coffee => Some("cake"),
            Category::Juice => Some("dessert"),
            Category::Tea => None,
        }
    }
}

/// Where fresh recipes come from. Fallible, rate-limited, slow.
pub trait RecipeSource {
    fn search(&self, query: &SearchQuery) -> Result<Vec<Recipe>, FetchError>;
    fn random(&self, tags: &str, number: u32) -> Result<Vec<Recipe>, FetchError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<Value>>,
    #[serde(default, rename = "totalResults")]
    total_results: Option<u64>,
}

#[derive(Deserialize)]
struct RandomResponse {
    #[serde(default)]
    recipes: Option<Vec<Value>>,
}

pub struct SpoonacularClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SpoonacularClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(SpoonacularClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn get_text(&self, path: &str, params: &[(&str, String)]) -> Result<String, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();

        // Read as text first so error bodies survive a failed JSON parse.
        let text = resp.text().map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_status(status, &text));
        }

        Ok(text)
    }
}

impl RecipeSource for SpoonacularClient {
    fn search(&self, query: &SearchQuery) -> Result<Vec<Recipe>, FetchError> {
        let mut params = vec![
            ("query", query.query.clone()),
            ("addRecipeInformation", "true".to_string()),
            ("number", query.number.to_string()),
            ("offset", query.offset.to_string()),
        ];
        if let Some(ing) = &query.include_ingredients {
            params.push(("includeIngredients", ing.clone()));
        }

        let text = self.get_text("/recipes/complexSearch", &params)?;
        let body: SearchResponse =
            serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))?;

        debug!(
            query = %query.query,
            total = body.total_results.unwrap_or(0),
            "search answered"
        );

        Ok(decode_records(body.results.unwrap_or_default()))
    }

    fn random(&self, tags: &str, number: u32) -> Result<Vec<Recipe>, FetchError> {
        let params = vec![("tags", tags.to_string()), ("number", number.to_string())];

        let text = self.get_text("/recipes/random", &params)?;
        let body: RandomResponse =
            serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(decode_records(body.recipes.unwrap_or_default()))
    }
}

/// Validates each record; malformed ones are dropped, not fatal.
pub fn decode_records(values: Vec<Value>) -> Vec<Recipe> {
    let mut out = Vec::with_capacity(values.len());

    for (i, v) in values.into_iter().enumerate() {
        match serde_json::from_value::<Recipe>(v) {
            Ok(r) => out.push(r),
            Err(e) => warn!(index = i, error = %e, "skipping malformed recipe"),
        }
    }

    out
}

pub fn classify_status(status: StatusCode, body_text: &str) -> FetchError {
    match status.as_u16() {
        402 | 429 => FetchError::QuotaExceeded {
            status: status.as_u16(),
        },
        401 => FetchError::Unauthorized,
        code => FetchError::Http {
            status: code,
            message: extract_error_message(body_text),
        },
    }
}

fn extract_error_message(body_text: &str) -> String {
    // { "error": { "message": "..." } } or { "message": "..." }
    if let Ok(v) = serde_json::from_str::<Value>(body_text) {
        if let Some(msg) = v
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return msg.to_string();
        }
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }

    let trimmed = body_text.trim();
    if trimmed.chars().count() > 400 {
        format!("{}...", trimmed.chars().take(400).collect::<String>())
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_classification() {
        assert!(matches!(
            classify_status(StatusCode::PAYMENT_REQUIRED, ""),
            FetchError::QuotaExceeded { status: 402 }
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            FetchError::QuotaExceeded { status: 429 }
        ));
        assert!(matches!(classify_status(StatusCode::UNAUTHORIZED, ""), FetchError::Unauthorized));

        match classify_status(StatusCode::BAD_GATEWAY, r#"{"message":"upstream down"}"#) {
            FetchError::Http { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(1000);
        match classify_status(StatusCode::INTERNAL_SERVER_ERROR, &body) {
            FetchError::Http { message, .. } => assert_eq!(message.len(), 403),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decode_drops_invalid_records() {
        let recs = decode_records(vec![json!({ "id": 1 }), json!({ "title": "orphan" }), json!("x")]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, "1");
    }

    #[test]
    fn category_queries() {
        let coffee = SearchQuery::feed(Category::Coffee).unwrap();
        assert_eq!(coffee.include_ingredients.as_deref(), Some("coffee"));
        assert_eq!(coffee.number, 15);
        assert_eq!(SearchQuery::random_pick(Category::Juice, 7).unwrap().query, "dessert");
        assert!(SearchQuery::feed(Category::Tea).is_none());
    }
}
