use serde::Serialize;

use crate::services::filter::SortField;

/// What a filter control press resolves to.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FilterAction {
    Sort { field: SortField },
    Random,
    Cuisine { value: String },
    Data { key: String, value: String },
}

type Handler = fn(&str) -> FilterAction;

fn sort_speed(_: &str) -> FilterAction {
    FilterAction::Sort {
        field: SortField::Cooking,
    }
}

fn sort_popular(_: &str) -> FilterAction {
    FilterAction::Sort {
        field: SortField::Popularity,
    }
}

fn random(_: &str) -> FilterAction {
    FilterAction::Random
}

fn cuisine(value: &str) -> FilterAction {
    let value = value.trim();
    FilterAction::Cuisine {
        value: if value.is_empty() { "all".into() } else { value.to_lowercase() },
    }
}

/// (control type, control value or any, handler). First row that matches wins.
const TABLE: &[(&str, Option<&str>, Handler)] = &[
    ("sort", Some("speed"), sort_speed),
    ("sort", Some("popular"), sort_popular),
    ("sort", Some("random"), random),
    ("cuisine", None, cuisine),
];

pub fn resolve(kind: &str, value: &str) -> FilterAction {
    TABLE
        .iter()
        .find(|(k, v, _)| *k == kind && v.map_or(true, |v| v == value))
        .map(|(_, _, handler)| handler(value))
        .unwrap_or_else(|| FilterAction::Data {
            key: kind.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_routes() {
        assert_eq!(resolve("sort", "speed"), FilterAction::Sort { field: SortField::Cooking });
        assert_eq!(resolve("sort", "popular"), FilterAction::Sort { field: SortField::Popularity });
        assert_eq!(resolve("sort", "random"), FilterAction::Random);
        assert_eq!(resolve("cuisine", "Italian"), FilterAction::Cuisine { value: "italian".into() });
        assert_eq!(resolve("cuisine", ""), FilterAction::Cuisine { value: "all".into() });
    }

    #[test]
    fn unknown_controls_fall_back_to_data_filter() {
        assert_eq!(
            resolve("popularity", "12"),
            FilterAction::Data {
                key: "popularity".into(),
                value: "12".into()
            }
        );
    }
}
