use serde::Serialize;

use crate::model::card::{Card, Placeholder};
use crate::model::category::Category;
use crate::view::View;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Slot {
    pub card: Card,
    pub visible: bool,
    pub favorite: bool,
}

/// What a category currently displays. Every mutation is mirrored to the view.
#[derive(Debug, Serialize, Clone)]
pub struct Section {
    pub category: Category,
    pub slots: Vec<Slot>,
    pub placeholder: Option<Placeholder>,
    pub no_match: bool,
}

impl Section {
    pub fn new(category: Category) -> Self {
        Section {
            category,
            slots: Vec::new(),
            placeholder: None,
            no_match: false,
        }
    }

    pub fn clear(&mut self, view: &mut dyn View) {
        self.slots.clear();
        self.placeholder = None;
        self.no_match = false;
        view.remove_all_items(self.category);
    }

    pub fn push(&mut self, card: Card, favorite: bool, view: &mut dyn View) {
        view.render_item(self.category, &card, favorite);
        self.slots.push(Slot {
            card,
            visible: true,
            favorite,
        });
    }

    pub fn show_placeholder(&mut self, placeholder: Placeholder, view: &mut dyn View) {
        view.render_placeholder(self.category, &placeholder);
        self.placeholder = Some(placeholder);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    pub fn ids(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.card.id.clone()).collect()
    }

    pub fn slot_mut(&mut self, id: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.card.id == id)
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.slots.iter().find(|s| s.card.id == id).map(|s| &s.card)
    }

    /// Applies a visibility predicate, notifying the view only for slots that changed.
    pub fn retain_visible<F>(&mut self, mut keep: F, view: &mut dyn View)
    where
        F: FnMut(&Card) -> bool,
    {
        for slot in self.slots.iter_mut() {
            let visible = keep(&slot.card);
            if slot.visible != visible {
                slot.visible = visible;
                view.set_visible(self.category, &slot.card.id, visible);
            }
        }
    }

    /// Shows the no-match banner iff no card is visible. Returns the banner state.
    pub fn refresh_no_match(&mut self, view: &mut dyn View) -> bool {
        let none_visible = self.visible_count() == 0;
        if none_visible != self.no_match {
            self.no_match = none_visible;
            view.set_no_match_banner(self.category, none_visible);
        }
        self.no_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::category::Cuisine;
    use crate::view::{RecordingView, ViewEvent};

    fn card(id: &str) -> Card {
        Card {
            id: id.into(),
            title: format!("Recipe {id}"),
            image_url: String::new(),
            cuisine: Cuisine::Other,
            cuisine_label: "Other".into(),
            cooking_minutes: 0.0,
            popularity: 0.0,
            ingredients: vec![],
        }
    }

    #[test]
    fn banner_follows_visibility() {
        let mut view = RecordingView::new();
        let mut section = Section::new(Category::Coffee);

        assert!(section.refresh_no_match(&mut view));
        section.push(card("1"), false, &mut view);
        assert!(!section.refresh_no_match(&mut view));

        section.retain_visible(|_| false, &mut view);
        assert!(section.refresh_no_match(&mut view));

        let banners: Vec<bool> = view
            .events()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::NoMatchBanner { shown, .. } => Some(*shown),
                _ => None,
            })
            .collect();
        assert_eq!(banners, vec![true, false, true]);
    }

    #[test]
    fn unchanged_visibility_emits_nothing() {
        let mut view = RecordingView::new();
        let mut section = Section::new(Category::Juice);
        section.push(card("1"), false, &mut view);
        view.take_events();

        section.retain_visible(|_| true, &mut view);
        assert!(view.events().is_empty());
    }
}
