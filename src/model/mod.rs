pub mod card;
pub mod category;
pub mod favorite;
pub mod recipe;
pub mod section;
