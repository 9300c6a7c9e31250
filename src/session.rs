use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::SessionError;
use crate::model::card::Card;
use crate::model::category::{Category, Panel};
use crate::model::favorite::FavoriteEntry;
use crate::model::section::Section;
use crate::services::cache::KeyValueCache;
use crate::services::demo;
use crate::services::dispatch::{self, FilterAction};
use crate::services::favorites::FavoritesStore;
use crate::services::feed::{CategoryFeed, FeedContext, FeedState};
use crate::services::filter::{self, SortToggles};
use crate::services::random::{self, RandomFetch, RandomOutcome};
use crate::services::source::RecipeSource;
use crate::view::View;

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub seed_demo: bool,
    pub random_fetch: RandomFetch,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FilterReport {
    pub category: Category,
    #[serde(flatten)]
    pub action: FilterAction,
    /// New caption of a sort control.
    pub label: Option<String>,
    pub outcome: Option<RandomOutcome>,
    pub visible: usize,
}

/// Everything one page lifetime owns: feeds with their render guards,
/// favorites, sort directions and the visible panel.
pub struct Session<V: View> {
    cache: KeyValueCache,
    source: Box<dyn RecipeSource>,
    view: V,
    favorites: FavoritesStore,
    feeds: BTreeMap<Category, CategoryFeed>,
    sorts: SortToggles,
    panel: Panel,
    options: SessionOptions,
}

impl<V: View> Session<V> {
    pub fn new(
        cache: KeyValueCache,
        source: impl RecipeSource + 'static,
        view: V,
        options: SessionOptions,
    ) -> Self {
        let feeds = Category::FEEDS
            .iter()
            .map(|&c| (c, CategoryFeed::new(c)))
            .collect();

        Session {
            cache,
            source: Box::new(source),
            view,
            favorites: FavoritesStore::default(),
            feeds,
            sorts: SortToggles::default(),
            panel: Panel::Coffee,
            options,
        }
    }

    /// Seeds demo data if enabled, restores favorites and eagerly loads coffee.
    pub fn start(&mut self) -> Option<FeedState> {
        if self.options.seed_demo {
            for c in Category::FEEDS {
                demo::seed_if_empty(&mut self.cache, c);
            }
        }

        self.favorites = FavoritesStore::load(&self.cache);
        self.view.render_favorites(self.favorites.entries());

        self.show_panel(Panel::Coffee)
    }

    /// Switches panel; a feed panel activates its feed on first show.
    pub fn show_panel(&mut self, panel: Panel) -> Option<FeedState> {
        self.panel = panel;
        debug!(?panel, "panel shown");

        let category = panel.category()?;
        self.activate(category).ok()
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    /// Category that filter controls act on when none is named.
    pub fn current_category(&self) -> Category {
        self.panel.category().unwrap_or(Category::Coffee)
    }

    pub fn activate(&mut self, category: Category) -> Result<FeedState, SessionError> {
        let (feed, mut ctx) = self.split(category)?;
        Ok(feed.activate(&mut ctx))
    }

    pub fn invalidate(&mut self, category: Category) -> Result<(), SessionError> {
        self.feeds
            .get_mut(&category)
            .ok_or(SessionError::NoFeed(category))?
            .invalidate();
        Ok(())
    }

    pub fn feed(&self, category: Category) -> Option<&CategoryFeed> {
        self.feeds.get(&category)
    }

    pub fn section(&self, category: Category) -> Option<&Section> {
        self.feeds.get(&category).map(|f| f.section())
    }

    pub fn favorites(&self) -> &[FavoriteEntry] {
        self.favorites.entries()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Toggles favorite membership of `id`. Removal works from the favorites
    /// panel by id alone; adding needs the card on display somewhere.
    pub fn toggle_favorite(
        &mut self,
        id: &str,
        category: Option<Category>,
    ) -> Result<bool, SessionError> {
        let now = if self.favorites.remove(id) {
            false
        } else {
            let card = self
                .find_card(id, category)
                .cloned()
                .ok_or_else(|| SessionError::UnknownRecipe(id.to_string()))?;
            self.favorites.toggle(&card)
        };

        for feed in self.feeds.values_mut() {
            let cat = feed.category();
            if let Some(slot) = feed.section_mut().slot_mut(id) {
                slot.favorite = now;
                self.view.mark_favorite(cat, id, now);
            }
        }

        self.favorites.persist(&mut self.cache);
        self.view.render_favorites(self.favorites.entries());

        info!(id, favorite = now, "favorite toggled");
        Ok(now)
    }

    fn find_card(&self, id: &str, category: Option<Category>) -> Option<&Card> {
        match category {
            Some(c) => self.section(c).and_then(|s| s.card(id)),
            None => self.feeds.values().find_map(|f| f.section().card(id)),
        }
    }

    /// Handles a filter control press through the dispatch table.
    pub fn apply_filter(
        &mut self,
        kind: &str,
        value: &str,
        category: Option<Category>,
    ) -> Result<FilterReport, SessionError> {
        let category = category.unwrap_or_else(|| self.current_category());
        if !self.feeds.contains_key(&category) {
            return Err(SessionError::NoFeed(category));
        }

        let action = dispatch::resolve(kind, value);
        let mut label = None;
        let mut outcome = None;

        match &action {
            FilterAction::Sort { field } => {
                let descending = self.sorts.flip(*field);
                label = Some(SortToggles::label(*field, descending).to_string());
                let (feed, ctx) = self.split(category)?;
                filter::sort(feed.section_mut(), *field, descending, ctx.view);
            }
            FilterAction::Random => {
                outcome = Some(self.pick_random(category)?);
            }
            FilterAction::Cuisine { value } => {
                let (feed, ctx) = self.split(category)?;
                filter::filter_by_category(feed.section_mut(), value, ctx.view);
            }
            FilterAction::Data { key, value } => {
                let (feed, ctx) = self.split(category)?;
                filter::filter_by_data(feed.section_mut(), key, value, ctx.view);
            }
        }

        let visible = self.section(category).map(|s| s.visible_count()).unwrap_or(0);

        Ok(FilterReport {
            category,
            action,
            label,
            outcome,
            visible,
        })
    }

    pub fn pick_random(&mut self, category: Category) -> Result<RandomOutcome, SessionError> {
        let strategy = self.options.random_fetch;
        let (feed, mut ctx) = self.split(category)?;
        Ok(random::pick(feed, &mut ctx, strategy, &mut rand::thread_rng()))
    }

    fn split(
        &mut self,
        category: Category,
    ) -> Result<(&mut CategoryFeed, FeedContext<'_>), SessionError> {
        let feed = self
            .feeds
            .get_mut(&category)
            .ok_or(SessionError::NoFeed(category))?;

        let ctx = FeedContext {
            cache: &mut self.cache,
            source: self.source.as_ref(),
            view: &mut self.view,
            favorites: &self.favorites,
        };

        Ok((feed, ctx))
    }
}
