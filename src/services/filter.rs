use serde::{Deserialize, Serialize};

use crate::model::card::Card;
use crate::model::category::normalize_cuisine_key;
use crate::model::section::{Section, Slot};
use crate::view::View;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Cooking,
    Popularity,
}

impl SortField {
    pub fn value(self, card: &Card) -> f64 {
        match self {
            SortField::Cooking => card.cooking_minutes,
            SortField::Popularity => card.popularity,
        }
    }
}

/// Direction state of the two sort controls. Each press flips first, then sorts.
#[derive(Debug, Clone, Copy)]
pub struct SortToggles {
    speed_descending: bool,
    popularity_descending: bool,
}

impl Default for SortToggles {
    fn default() -> Self {
        SortToggles {
            speed_descending: true,
            popularity_descending: true,
        }
    }
}

impl SortToggles {
    pub fn flip(&mut self, field: SortField) -> bool {
        let slot = match field {
            SortField::Cooking => &mut self.speed_descending,
            SortField::Popularity => &mut self.popularity_descending,
        };
        *slot = !*slot;
        *slot
    }

    pub fn label(field: SortField, descending: bool) -> &'static str {
        match (field, descending) {
            (SortField::Cooking, true) => "Descending",
            (SortField::Cooking, false) => "Ascending",
            (SortField::Popularity, true) => "More popular",
            (SortField::Popularity, false) => "Less popular",
        }
    }
}

/// `tags` may hold several pipe-delimited cuisine keys.
pub fn matches_category(tags: &str, wanted: &str) -> bool {
    let wanted = normalize_cuisine_key(wanted);
    if wanted.is_empty() || wanted == "all" {
        return true;
    }

    tags.split('|')
        .map(normalize_cuisine_key)
        .filter(|t| !t.is_empty())
        .any(|t| t == wanted)
}

pub fn filter_by_category(section: &mut Section, wanted: &str, view: &mut dyn View) {
    section.retain_visible(|card| matches_category(card.cuisine.key(), wanted), view);
    section.refresh_no_match(view);
}

/// Fallback for any other card data key: `all` or an exact value match.
pub fn filter_by_data(section: &mut Section, key: &str, value: &str, view: &mut dyn View) {
    section.retain_visible(
        |card| value == "all" || card.data(key).as_deref() == Some(value),
        view,
    );
    section.refresh_no_match(view);
}

/// Stable numeric sort of the slots.
pub fn sort_slots(slots: &mut [Slot], field: SortField, descending: bool) {
    slots.sort_by(|a, b| {
        let (x, y) = (field.value(&a.card), field.value(&b.card));
        if descending {
            y.total_cmp(&x)
        } else {
            x.total_cmp(&y)
        }
    });
}

/// Sorts and re-lays out the whole section.
pub fn sort(section: &mut Section, field: SortField, descending: bool, view: &mut dyn View) {
    sort_slots(&mut section.slots, field, descending);
    view.reorder(section.category, &section.ids());
}
