use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::model::card::{Placeholder, PlaceholderKind};
use crate::model::recipe::Recipe;
use crate::services::feed::{CategoryFeed, FeedContext};
use crate::services::source::{SearchQuery, RANDOM_OFFSET_SPAN};

/// How the network leg of a random pick asks for a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomFetch {
    /// Keyword search, one item, random offset.
    #[default]
    SearchOffset,
    /// Dedicated random endpoint.
    Endpoint,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PickOrigin {
    Cache,
    Network,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RandomOutcome {
    Picked { id: String, origin: PickOrigin },
    Unavailable,
    Emphasized { id: String },
    NothingToPick,
}

/// Uniform choice among items whose id differs from `exclude_id`.
pub fn pick_excluding<'a, R: Rng + ?Sized>(
    items: &'a [Recipe],
    exclude_id: Option<&str>,
    rng: &mut R,
) -> Option<&'a Recipe> {
    let pool: Vec<&Recipe> = items
        .iter()
        .filter(|r| Some(r.id.as_str()) != exclude_id)
        .collect();

    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}

/// Replaces the section with exactly one recipe other than the one on display.
/// Cache first, then one network request, then a pulse on the current card.
pub fn pick<R: Rng + ?Sized>(
    feed: &mut CategoryFeed,
    ctx: &mut FeedContext<'_>,
    strategy: RandomFetch,
    rng: &mut R,
) -> RandomOutcome {
    let category = feed.category();

    let visible: Vec<String> = feed.section().visible().map(|s| s.card.id.clone()).collect();
    let current = if visible.len() == 1 { Some(visible[0].clone()) } else { None };

    let cached = category.cache_key().map(|k| ctx.cache.records(k)).unwrap_or_default();
    if let Some(r) = pick_excluding(&cached, current.as_deref(), rng) {
        let r = r.clone();
        show_only(feed, ctx, &r);
        debug!(category = %category, id = %r.id, "random pick from cache");
        return RandomOutcome::Picked {
            id: r.id,
            origin: PickOrigin::Cache,
        };
    }

    let fetched = match strategy {
        RandomFetch::SearchOffset => SearchQuery::random_pick(category, rng.gen_range(0..RANDOM_OFFSET_SPAN))
            .map(|q| ctx.source.search(&q)),
        RandomFetch::Endpoint => SearchQuery::random_tags(category).map(|t| ctx.source.random(t, 1)),
    };

    match fetched {
        Some(Ok(recs)) => {
            if let Some(r) = recs.into_iter().next().filter(|r| Some(r.id.as_str()) != current.as_deref()) {
                show_only(feed, ctx, &r);
                info!(category = %category, id = %r.id, "random pick from network");
                return RandomOutcome::Picked {
                    id: r.id,
                    origin: PickOrigin::Network,
                };
            }
        }
        Some(Err(e)) if e.is_access_denied() => {
            warn!(category = %category, error = %e, "random pick unavailable");
            let section = feed.section_mut();
            section.clear(ctx.view);
            section.show_placeholder(Placeholder::new(PlaceholderKind::RandomUnavailable), ctx.view);
            return RandomOutcome::Unavailable;
        }
        Some(Err(e)) => {
            warn!(category = %category, error = %e, "random fetch failed");
        }
        None => {}
    }

    match visible.first() {
        Some(id) => {
            ctx.view.pulse(category, id);
            RandomOutcome::Emphasized { id: id.clone() }
        }
        None => {
            let section = feed.section_mut();
            section.clear(ctx.view);
            section.show_placeholder(Placeholder::new(PlaceholderKind::NothingToPick), ctx.view);
            RandomOutcome::NothingToPick
        }
    }
}

fn show_only(feed: &mut CategoryFeed, ctx: &mut FeedContext<'_>, recipe: &Recipe) {
    feed.section_mut().clear(ctx.view);
    feed.show_recipe(recipe, ctx);
    ctx.view.pulse(feed.category(), &recipe.id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn recipes(ids: &[&str]) -> Vec<Recipe> {
        ids.iter()
            .map(|id| serde_json::from_value(json!({ "id": id })).unwrap())
            .collect()
    }

    #[test]
    fn never_picks_the_excluded_id() {
        let items = recipes(&["1", "2", "3", "4", "5"]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let got = pick_excluding(&items, Some("3"), &mut rng).unwrap();
            assert_ne!(got.id, "3");
        }
    }

    #[test]
    fn empty_pool_yields_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_excluding(&recipes(&["only"]), Some("only"), &mut rng).is_none());
        assert!(pick_excluding(&[], None, &mut rng).is_none());
    }

    #[test]
    fn covers_every_candidate() {
        let items = recipes(&["a", "b", "c"]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..300 {
            seen.insert(pick_excluding(&items, None, &mut rng).unwrap().id.clone());
        }
        assert_eq!(seen.len(), 3);
    }
}
