use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::model::card::{Card, Placeholder, PlaceholderKind};
use crate::model::category::Category;
use crate::model::recipe::Recipe;
use crate::model::section::Section;
use crate::services::cache::KeyValueCache;
use crate::services::favorites::FavoritesStore;
use crate::services::source::{RecipeSource, SearchQuery};
use crate::view::View;

/// Collaborators a feed works against, borrowed from the session per call.
pub struct FeedContext<'a> {
    pub cache: &'a mut KeyValueCache,
    pub source: &'a dyn RecipeSource,
    pub view: &'a mut dyn View,
    pub favorites: &'a FavoritesStore,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedState {
    Unloaded,
    Loading,
    /// Fresh records arrived and were cached.
    Loaded,
    /// The network failed but cached records are on display.
    LoadedFromCacheOnly,
    /// Nothing to show; a placeholder explains why.
    Empty,
}

/// Cache-first controller of one category.
#[derive(Debug)]
pub struct CategoryFeed {
    category: Category,
    rendered: bool,
    state: FeedState,
    section: Section,
}

impl CategoryFeed {
    pub fn new(category: Category) -> Self {
        CategoryFeed {
            category,
            rendered: false,
            state: FeedState::Unloaded,
            section: Section::new(category),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn section_mut(&mut self) -> &mut Section {
        &mut self.section
    }

    /// Lets the next activation render again.
    pub fn invalidate(&mut self) {
        self.rendered = false;
    }

    pub fn show_recipe(&mut self, recipe: &Recipe, ctx: &mut FeedContext<'_>) {
        let favorite = ctx.favorites.contains(&recipe.id);
        self.section.push(Card::from_recipe(recipe), favorite, ctx.view);
    }

    /// Renders cached records at once, then refreshes from the network.
    /// At most one pass per session unless [`invalidate`](Self::invalidate)d.
    pub fn activate(&mut self, ctx: &mut FeedContext<'_>) -> FeedState {
        if self.rendered {
            debug!(category = %self.category, "feed already rendered");
            return self.state;
        }

        let (Some(key), Some(query)) = (self.category.cache_key(), SearchQuery::feed(self.category))
        else {
            return self.state;
        };

        self.rendered = true;
        self.state = FeedState::Loading;
        self.section.clear(ctx.view);

        let cached = ctx.cache.records(key);
        for r in &cached {
            self.show_recipe(r, ctx);
        }
        debug!(category = %self.category, cached = cached.len(), "optimistic cache render");

        let fetched = ctx.source.search(&query).and_then(|recs| {
            if recs.is_empty() {
                Err(FetchError::EmptyResult)
            } else {
                Ok(recs)
            }
        });

        self.state = match fetched {
            Ok(fresh) => {
                if let Err(e) = ctx.cache.set(key, &fresh) {
                    warn!(category = %self.category, error = %e, "failed to cache fresh records");
                }

                // A warm cache stays on screen; redrawing would flicker.
                if cached.is_empty() {
                    self.section.clear(ctx.view);
                    for r in &fresh {
                        self.show_recipe(r, ctx);
                    }
                }

                info!(category = %self.category, fresh = fresh.len(), "feed refreshed");
                FeedState::Loaded
            }
            Err(e) if !cached.is_empty() => {
                warn!(category = %self.category, error = %e, "refresh failed, keeping cache");
                FeedState::LoadedFromCacheOnly
            }
            Err(e) => {
                warn!(category = %self.category, error = %e, "refresh failed with empty cache");
                self.section
                    .show_placeholder(Placeholder::new(PlaceholderKind::from(&e)), ctx.view);
                FeedState::Empty
            }
        };

        self.section.refresh_no_match(ctx.view);
        self.state
    }
}
