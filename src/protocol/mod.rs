use std::panic::{self, AssertUnwindSafe};

use serde_json::{json, Value};
use tracing::{debug, error};

use crate::model::category::{Category, Panel};
use crate::model::recipe::{id_string, Recipe};
use crate::services::classifier;
use crate::session::Session;
use crate::view::RecordingView;

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn get_str<'a>(payload: &'a Value, field: &str) -> &'a str {
    payload.get(field).and_then(|v| v.as_str()).unwrap_or("")
}

fn ok(id: Value, mut payload: Value, session: &mut Session<RecordingView>) -> String {
    let events = session.view_mut().take_events();
    if let Value::Object(map) = &mut payload {
        map.insert("events".into(), json!(events));
    }

    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>, session: &mut Session<RecordingView>) -> String {
    let dropped = session.view_mut().take_events().len();
    if dropped > 0 {
        debug!(dropped, "discarding view events of failed request");
    }

    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn required_category(payload: &Value) -> Result<Category, String> {
    let raw = get_str(payload, "category");
    if raw.is_empty() {
        return Err("payload.category is required".into());
    }
    raw.parse::<Category>().map_err(|e| e.to_string())
}

fn optional_category(payload: &Value) -> Result<Option<Category>, String> {
    match get_str(payload, "category") {
        "" => Ok(None),
        raw => raw.parse::<Category>().map(Some).map_err(|e| e.to_string()),
    }
}

pub fn handle(session: &mut Session<RecordingView>, input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let payload = get_payload(&req);

    match dispatch(session, Command::from(get_cmd(&req)), payload) {
        Ok(body) => ok(id, body, session),
        Err(e) => err(id, e, session),
    }
}

/// [`handle`] with panics turned into an error response. View events
/// recorded before the panic are dropped with the failed request.
pub fn handle_guarded(session: &mut Session<RecordingView>, input: &str) -> String {
    match panic::catch_unwind(AssertUnwindSafe(|| handle(session, input))) {
        Ok(resp) => resp,
        Err(_) => {
            error!("request handler panicked");
            session.view_mut().take_events();
            json!({
                "status": "error",
                "message": "internal core error"
            })
            .to_string()
        }
    }
}

fn dispatch(
    session: &mut Session<RecordingView>,
    cmd: Command,
    payload: &Value,
) -> Result<Value, String> {
    match cmd {
        Command::Ping => Ok(json!({ "message": "recipe-core alive" })),

        Command::SessionStart => {
            let state = session.start();
            Ok(json!({ "panel": session.panel(), "state": state }))
        }

        Command::PanelShow => {
            let raw = get_str(payload, "panel");
            if raw.is_empty() {
                return Err("payload.panel is required".into());
            }
            let panel = raw.parse::<Panel>().map_err(|e| e.to_string())?;
            let state = session.show_panel(panel);
            Ok(json!({ "panel": panel, "state": state }))
        }

        Command::FeedActivate => {
            let category = required_category(payload)?;
            let state = session.activate(category).map_err(|e| e.to_string())?;
            Ok(json!({ "category": category, "state": state }))
        }

        Command::FeedInvalidate => {
            let category = required_category(payload)?;
            session.invalidate(category).map_err(|e| e.to_string())?;
            Ok(json!({ "category": category }))
        }

        Command::FavoritesToggle => {
            let recipe_id = payload
                .get("id")
                .and_then(id_string)
                .ok_or("payload.id is required")?;
            let category = optional_category(payload)?;
            let favorite = session
                .toggle_favorite(&recipe_id, category)
                .map_err(|e| e.to_string())?;
            Ok(json!({ "id": recipe_id, "favorite": favorite }))
        }

        Command::FavoritesList => Ok(json!({ "favorites": session.favorites() })),

        Command::FilterApply => {
            let kind = get_str(payload, "type");
            if kind.is_empty() {
                return Err("payload.type is required".into());
            }
            let value = get_str(payload, "value");
            let category = optional_category(payload)?;
            let report = session
                .apply_filter(kind, value, category)
                .map_err(|e| e.to_string())?;
            Ok(json!({ "report": report }))
        }

        Command::RandomPick => {
            let category = required_category(payload)?;
            let outcome = session.pick_random(category).map_err(|e| e.to_string())?;
            Ok(json!({ "category": category, "result": outcome }))
        }

        Command::Classify => {
            let record = payload.get("record").cloned().unwrap_or(Value::Null);
            if record.is_null() {
                return Err("payload.record is required".into());
            }
            let recipe: Recipe = serde_json::from_value(record)
                .map_err(|e| format!("invalid payload.record: {e}"))?;
            let cuisine = classifier::classify(&recipe);
            Ok(json!({ "cuisine": cuisine, "label": cuisine.label() }))
        }

        Command::SectionState => {
            let category = required_category(payload)?;
            let feed = session
                .feed(category)
                .ok_or_else(|| format!("category '{category}' has no feed"))?;
            Ok(json!({
                "state": feed.state(),
                "rendered": feed.is_rendered(),
                "section": feed.section()
            }))
        }

        Command::Unknown => Err("unknown command".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::services::cache::{KeyValueCache, MemoryStorage};
    use crate::services::source::{RecipeSource, SearchQuery};
    use crate::session::SessionOptions;

    struct Offline;

    impl RecipeSource for Offline {
        fn search(&self, _: &SearchQuery) -> Result<Vec<Recipe>, FetchError> {
            Err(FetchError::Network("offline".into()))
        }

        fn random(&self, _: &str, _: u32) -> Result<Vec<Recipe>, FetchError> {
            Err(FetchError::Network("offline".into()))
        }
    }

    fn session() -> Session<RecordingView> {
        let cache = KeyValueCache::new(
            MemoryStorage::new().with_slot("coffeeData", r#"[{"id":1,"title":"Mocha cake"}]"#),
        );
        Session::new(cache, Offline, RecordingView::new(), SessionOptions::default())
    }

    fn call(s: &mut Session<RecordingView>, line: &str) -> Value {
        serde_json::from_str(&handle(s, line)).unwrap()
    }

    #[test]
    fn rejects_garbage() {
        let mut s = session();
        let v = call(&mut s, "not json");
        assert_eq!(v["status"], "error");
        assert_eq!(v["message"], "invalid json");

        let v = call(&mut s, r#"{"id":3,"cmd":"nope"}"#);
        assert_eq!(v["id"], 3);
        assert_eq!(v["message"], "unknown command");
    }

    #[test]
    fn start_renders_cache_and_reports_events() {
        let mut s = session();
        let v = call(&mut s, r#"{"id":1,"cmd":"session.start"}"#);

        assert_eq!(v["status"], "ok");
        assert_eq!(v["payload"]["state"], "loaded_from_cache_only");
        let events = v["payload"]["events"].as_array().unwrap();
        assert!(events.iter().any(|e| e["op"] == "render_item" && e["card"]["id"] == "1"));
    }

    #[test]
    fn missing_fields_are_reported() {
        let mut s = session();
        let v = call(&mut s, r#"{"id":1,"cmd":"random.pick","payload":{}}"#);
        assert_eq!(v["message"], "payload.category is required");

        let v = call(&mut s, r#"{"id":2,"cmd":"feed.activate","payload":{"category":"tea"}}"#);
        assert_eq!(v["message"], "category 'tea' has no feed");
    }

    #[test]
    fn classify_command() {
        let mut s = session();
        let v = call(
            &mut s,
            r#"{"id":1,"cmd":"classify","payload":{"record":{"id":5,"title":"Pistachio baklava"}}}"#,
        );
        assert_eq!(v["payload"]["cuisine"], "middle_eastern");
        assert_eq!(v["payload"]["label"], "Middle East");
    }

    #[test]
    fn filter_through_protocol() {
        let mut s = session();
        call(&mut s, r#"{"id":1,"cmd":"session.start"}"#);

        let v = call(
            &mut s,
            r#"{"id":2,"cmd":"filter.apply","payload":{"type":"cuisine","value":"asian"}}"#,
        );
        assert_eq!(v["payload"]["report"]["action"], "cuisine");
        assert_eq!(v["payload"]["report"]["visible"], 0);

        let v = call(
            &mut s,
            r#"{"id":3,"cmd":"section.state","payload":{"category":"coffee"}}"#,
        );
        assert_eq!(v["payload"]["section"]["no_match"], true);
    }

    struct Broken;

    impl RecipeSource for Broken {
        fn search(&self, _: &SearchQuery) -> Result<Vec<Recipe>, FetchError> {
            panic!("source exploded");
        }

        fn random(&self, _: &str, _: u32) -> Result<Vec<Recipe>, FetchError> {
            panic!("source exploded");
        }
    }

    #[test]
    fn panic_drops_events_of_the_failed_request() {
        let cache = KeyValueCache::new(
            MemoryStorage::new().with_slot("coffeeData", r#"[{"id":1,"title":"Mocha cake"}]"#),
        );
        let mut s = Session::new(cache, Broken, RecordingView::new(), SessionOptions::default());

        let v: Value = serde_json::from_str(&handle_guarded(
            &mut s,
            r#"{"id":1,"cmd":"feed.activate","payload":{"category":"coffee"}}"#,
        ))
        .unwrap();
        assert_eq!(v["message"], "internal core error");
        assert!(s.view().events().is_empty());

        let v: Value = serde_json::from_str(&handle_guarded(&mut s, r#"{"id":2,"cmd":"ping"}"#)).unwrap();
        assert_eq!(v["status"], "ok");
        assert!(v["payload"]["events"].as_array().unwrap().is_empty());
    }

    #[test]
    fn panel_show_validates_and_switches() {
        let mut s = session();

        let v = call(&mut s, r#"{"id":1,"cmd":"panel.show","payload":{}}"#);
        assert_eq!(v["message"], "payload.panel is required");

        let v = call(&mut s, r#"{"id":2,"cmd":"panel.show","payload":{"panel":"cocoa"}}"#);
        assert_eq!(v["status"], "error");

        let v = call(&mut s, r#"{"id":3,"cmd":"panel.show","payload":{"panel":"favorites"}}"#);
        assert_eq!(v["status"], "ok");
        assert_eq!(v["payload"]["panel"], "favorites");
        assert!(v["payload"]["state"].is_null());
        assert_eq!(s.panel(), Panel::Favorites);

        let v = call(&mut s, r#"{"id":4,"cmd":"panel.show","payload":{"panel":"coffee"}}"#);
        assert_eq!(v["payload"]["state"], "loaded_from_cache_only");
    }

    #[test]
    fn invalidate_allows_another_render() {
        let mut s = session();
        call(&mut s, r#"{"id":1,"cmd":"feed.activate","payload":{"category":"coffee"}}"#);

        let v = call(&mut s, r#"{"id":2,"cmd":"feed.activate","payload":{"category":"coffee"}}"#);
        assert!(v["payload"]["events"].as_array().unwrap().is_empty());

        let v = call(&mut s, r#"{"id":3,"cmd":"feed.invalidate","payload":{"category":"coffee"}}"#);
        assert_eq!(v["status"], "ok");
        let v = call(&mut s, r#"{"id":4,"cmd":"section.state","payload":{"category":"coffee"}}"#);
        assert_eq!(v["payload"]["rendered"], false);

        let v = call(&mut s, r#"{"id":5,"cmd":"feed.activate","payload":{"category":"coffee"}}"#);
        let events = v["payload"]["events"].as_array().unwrap();
        assert!(events.iter().any(|e| e["op"] == "render_item"));

        let v = call(&mut s, r#"{"id":6,"cmd":"feed.invalidate","payload":{}}"#);
        assert_eq!(v["message"], "payload.category is required");
    }

    #[test]
    fn toggle_accepts_numeric_and_string_ids() {
        let mut s = session();
        call(&mut s, r#"{"id":1,"cmd":"session.start"}"#);

        let v = call(&mut s, r#"{"id":2,"cmd":"favorites.toggle","payload":{"id":1}}"#);
        assert_eq!(v["status"], "ok");
        assert_eq!(v["payload"]["id"], "1");
        assert_eq!(v["payload"]["favorite"], true);

        let v = call(&mut s, r#"{"id":3,"cmd":"favorites.list"}"#);
        let favs = v["payload"]["favorites"].as_array().unwrap();
        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0]["id"], "1");

        let v = call(&mut s, r#"{"id":4,"cmd":"favorites.toggle","payload":{"id":"1"}}"#);
        assert_eq!(v["payload"]["favorite"], false);

        let v = call(&mut s, r#"{"id":5,"cmd":"favorites.list"}"#);
        assert!(v["payload"]["favorites"].as_array().unwrap().is_empty());
    }

    #[test]
    fn toggle_rejects_missing_or_undisplayed_ids() {
        let mut s = session();
        call(&mut s, r#"{"id":1,"cmd":"session.start"}"#);

        let v = call(&mut s, r#"{"id":2,"cmd":"favorites.toggle","payload":{}}"#);
        assert_eq!(v["message"], "payload.id is required");

        let v = call(&mut s, r#"{"id":3,"cmd":"favorites.toggle","payload":{"id":true}}"#);
        assert_eq!(v["message"], "payload.id is required");

        let v = call(&mut s, r#"{"id":4,"cmd":"favorites.toggle","payload":{"id":999}}"#);
        assert_eq!(v["status"], "error");
        assert!(v.get("payload").is_none());
    }
}
