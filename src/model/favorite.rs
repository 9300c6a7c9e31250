use serde::{Deserialize, Serialize};

use crate::model::card::Card;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FavoriteEntry {
    pub id: String,
    pub snapshot: Card,
}

impl FavoriteEntry {
    pub fn from_card(card: &Card) -> Self {
        FavoriteEntry {
            id: card.id.clone(),
            snapshot: card.clone(),
        }
    }
}
