#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    SessionStart,
    PanelShow,
    FeedActivate,
    FeedInvalidate,
    FavoritesToggle,
    FavoritesList,
    FilterApply,
    RandomPick,
    Classify,
    SectionState,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "session.start" => Command::SessionStart,
            "panel.show" => Command::PanelShow,
            "feed.activate" => Command::FeedActivate,
            "feed.invalidate" => Command::FeedInvalidate,
            "favorites.toggle" => Command::FavoritesToggle,
            "favorites.list" => Command::FavoritesList,
            "filter.apply" => Command::FilterApply,
            "random.pick" => Command::RandomPick,
            "classify" => Command::Classify,
            "section.state" => Command::SectionState,
            _ => Command::Unknown,
        }
    }
}
