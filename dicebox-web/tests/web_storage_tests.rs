use dicebox_core::{DiceSession, Face, KeyValueStore, ManualClock};
use dicebox_web::{WebStorage, WebStorageError};

#[test]
fn detached_storage_reports_unavailable() {
    let store = WebStorage::detached();
    assert!(!store.is_attached());
    assert_eq!(store.get_item("rollHistory"), Err(WebStorageError::Unavailable));
    assert_eq!(store.set_item("k", "v"), Err(WebStorageError::Unavailable));
    assert_eq!(store.remove_item("k"), Err(WebStorageError::Unavailable));
}

#[test]
fn session_runs_in_memory_without_storage() {
    let mut session = DiceSession::load(WebStorage::detached(), ManualClock::at_ms(1_000));
    let report = session.on_roll_outcome(Face::WINNING);
    assert!(report.daily.is_some_and(|d| d.won));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.streak().streak_count(), 2);
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::*;
    use dicebox_web::DiceApp;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fresh_storage() -> WebStorage {
        let store = WebStorage::open();
        for key in [
            "rollHistory",
            "streakCount",
            "lastRollDate",
            "unlockedSkins",
            "currentSkin",
            "darkTheme",
            "diceSoundEnabled",
            "hasVisited",
        ] {
            store.remove_item(key).expect("clear key");
        }
        store
    }

    #[wasm_bindgen_test]
    fn local_storage_roundtrips_items() {
        let store = fresh_storage();
        assert!(store.is_attached());
        store.set_item("streakCount", "7").expect("write");
        assert_eq!(store.get_item("streakCount").expect("read").as_deref(), Some("7"));
        store.remove_item("streakCount").expect("remove");
        assert_eq!(store.get_item("streakCount").expect("read"), None);
    }

    #[wasm_bindgen_test]
    fn root_data_attribute_is_set() {
        dicebox_web::dom::set_root_data("skin", "neon");
        let html = web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| doc.document_element())
            .expect("html element");
        assert_eq!(html.get_attribute("data-skin").as_deref(), Some("neon"));
    }

    #[wasm_bindgen_test]
    fn app_persists_rolls_and_theme() {
        let store = fresh_storage();
        let mut app = DiceApp::new();
        app.record_roll(6).expect("valid face");
        assert!(app.record_roll(9).is_err());
        assert!(app.toggle_dark_theme());
        assert!(app.first_visit());
        assert!(!app.first_visit());

        assert_eq!(store.get_item("darkTheme").expect("read").as_deref(), Some("true"));
        assert!(store.get_item("rollHistory").expect("read").is_some());
        assert_eq!(app.current_skin(), "classic");
        assert!(app.select_skin("galaxy").is_err());
        assert_eq!(app.available_skins(), vec!["classic".to_string()]);
        assert!(app.claim_reward().expect("claim").is_null());

        app.clear_history();
        assert_eq!(store.get_item("rollHistory").expect("read"), None);
    }
}
