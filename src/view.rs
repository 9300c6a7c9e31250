//! Boundary to whatever draws the board.
//!
//! The core keeps the displayed state itself (see [`crate::model::section`])
//! and tells the view what changed. [`RecordingView`] turns those calls into
//! serializable events for the host process and for tests.

use serde::Serialize;

use crate::model::card::{Card, Placeholder};
use crate::model::category::Category;
use crate::model::favorite::FavoriteEntry;

pub trait View {
    fn render_item(&mut self, category: Category, card: &Card, favorite: bool);
    fn render_placeholder(&mut self, category: Category, placeholder: &Placeholder);
    /// Drops cards, placeholders and the no-match banner of a category.
    fn remove_all_items(&mut self, category: Category);
    fn set_visible(&mut self, category: Category, id: &str, visible: bool);
    /// Re-appends every card in the given order.
    fn reorder(&mut self, category: Category, ids: &[String]);
    fn mark_favorite(&mut self, category: Category, id: &str, active: bool);
    fn pulse(&mut self, category: Category, id: &str);
    fn set_no_match_banner(&mut self, category: Category, shown: bool);
    fn render_favorites(&mut self, entries: &[FavoriteEntry]);
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ViewEvent {
    RenderItem {
        category: Category,
        card: Card,
        favorite: bool,
    },
    RenderPlaceholder {
        category: Category,
        placeholder: Placeholder,
    },
    RemoveAllItems {
        category: Category,
    },
    SetVisible {
        category: Category,
        id: String,
        visible: bool,
    },
    Reorder {
        category: Category,
        ids: Vec<String>,
    },
    MarkFavorite {
        category: Category,
        id: String,
        active: bool,
    },
    Pulse {
        category: Category,
        id: String,
    },
    NoMatchBanner {
        category: Category,
        shown: bool,
    },
    RenderFavorites {
        entries: Vec<FavoriteEntry>,
    },
}

#[derive(Debug, Default)]
pub struct RecordingView {
    events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }
}

impl View for RecordingView {
    fn render_item(&mut self, category: Category, card: &Card, favorite: bool) {
        self.events.push(ViewEvent::RenderItem {
            category,
            card: card.clone(),
            favorite,
        });
    }

    fn render_placeholder(&mut self, category: Category, placeholder: &Placeholder) {
        self.events.push(ViewEvent::RenderPlaceholder {
            category,
            placeholder: placeholder.clone(),
        });
    }

    fn remove_all_items(&mut self, category: Category) {
        self.events.push(ViewEvent::RemoveAllItems { category });
    }

    fn set_visible(&mut self, category: Category, id: &str, visible: bool) {
        self.events.push(ViewEvent::SetVisible {
            category,
            id: id.to_string(),
            visible,
        });
    }

    fn reorder(&mut self, category: Category, ids: &[String]) {
        self.events.push(ViewEvent::Reorder {
            category,
            ids: ids.to_vec(),
        });
    }

    fn mark_favorite(&mut self, category: Category, id: &str, active: bool) {
        self.events.push(ViewEvent::MarkFavorite {
            category,
            id: id.to_string(),
            active,
        });
    }

    fn pulse(&mut self, category: Category, id: &str) {
        self.events.push(ViewEvent::Pulse {
            category,
            id: id.to_string(),
        });
    }

    fn set_no_match_banner(&mut self, category: Category, shown: bool) {
        self.events.push(ViewEvent::NoMatchBanner { category, shown });
    }

    fn render_favorites(&mut self, entries: &[FavoriteEntry]) {
        self.events.push(ViewEvent::RenderFavorites {
            entries: entries.to_vec(),
        });
    }
}
