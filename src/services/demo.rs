use serde_json::{json, Value};
use tracing::{info, warn};

use crate::model::category::Category;
use crate::model::recipe::Recipe;
use crate::services::cache::KeyValueCache;
use crate::services::source::decode_records;

fn demo_values(category: Category) -> Vec<Value> {
    let (title, images): (&str, [&str; 5]) = match category {
        Category::Coffee => (
            "Tiramisu",
            [
                "https://plus.unsplash.com/premium_photo-1713447395823-2e0b40b75a89",
                "https://images.unsplash.com/photo-1495147466023-ac5c588e2e94",
                "https://plus.unsplash.com/premium_photo-1667824363471-733bbbca0d0d",
                "https://plus.unsplash.com/premium_photo-1663924211686-677f4114cef1",
                "https://images.unsplash.com/photo-1476887334197-56adbf254e1a",
            ],
        ),
        Category::Juice => (
            "Fruit dessert",
            [
                "https://images.unsplash.com/photo-1591626505027-a4992d84d28b",
                "https://images.unsplash.com/photo-1750680230074-a2046d59ba02",
                "https://plus.unsplash.com/premium_photo-1661266841331-e2169199de65",
                "https://plus.unsplash.com/premium_photo-1714662390686-eacb5268b41c",
                "https://plus.unsplash.com/premium_photo-1714146022660-d9c01e9e6c8c",
            ],
        ),
        Category::Tea => return Vec::new(),
    };

    let shapes = [
        (30, "Asian"),
        (20, "middle eastern"),
        (10, "Italian"),
        (15, "Italian"),
        (25, "Italian"),
    ];

    images
        .iter()
        .zip(shapes)
        .enumerate()
        .map(|(i, (image, (minutes, cuisine)))| {
            json!({
                "id": format!("demo_{}", i + 1),
                "title": title,
                "image": image,
                "readyInMinutes": minutes,
                "extendedIngredients": [{ "name": "mascarpone" }, { "name": "espresso" }],
                "cuisines": [cuisine],
                "popularity": minutes,
            })
        })
        .collect()
}

pub fn demo_recipes(category: Category) -> Vec<Recipe> {
    decode_records(demo_values(category))
}

/// Writes demo records into a category slot that is missing or empty.
/// Returns whether anything was written.
pub fn seed_if_empty(cache: &mut KeyValueCache, category: Category) -> bool {
    let Some(key) = category.cache_key() else {
        return false;
    };

    if !cache.records(key).is_empty() {
        return false;
    }

    match cache.set(key, &demo_recipes(category)) {
        Ok(()) => {
            info!(category = %category, "seeded demo recipes");
            true
        }
        Err(e) => {
            warn!(category = %category, error = %e, "failed to seed demo recipes");
            false
        }
    }
}
