//! User preferences: sound, theme, active skin and the first-run flag.
use std::collections::BTreeSet;

use serde::Serialize;

use crate::KeyValueStore;
use crate::constants::{
    FLAG_FALSE, FLAG_TRUE, KEY_CURRENT_SKIN, KEY_DARK_THEME, KEY_HAS_VISITED, KEY_SOUND_ENABLED,
};
use crate::skins::{Skin, SkinError};
use crate::storage::{read_string, write_string};

/// Plain snapshot of the preferences for the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSnapshot {
    pub sound_enabled: bool,
    pub dark_theme: bool,
    pub current_skin: Skin,
    pub has_visited: bool,
}

#[derive(Debug)]
pub struct Preferences<S> {
    store: S,
    sound_enabled: bool,
    dark_theme: bool,
    current_skin: Skin,
    has_visited: bool,
}

const fn flag(value: bool) -> &'static str {
    if value { FLAG_TRUE } else { FLAG_FALSE }
}

impl<S: KeyValueStore> Preferences<S> {
    /// Load preferences. A stored skin that is neither free nor in
    /// `unlocked` falls back to the default skin.
    pub fn load(store: S, unlocked: &BTreeSet<Skin>) -> Self {
        // Sound is opt-out, theme is opt-in.
        let sound_enabled = read_string(&store, KEY_SOUND_ENABLED).as_deref() != Some(FLAG_FALSE);
        let dark_theme = read_string(&store, KEY_DARK_THEME).as_deref() == Some(FLAG_TRUE);
        let has_visited = read_string(&store, KEY_HAS_VISITED).as_deref() == Some(FLAG_TRUE);
        let current_skin = read_string(&store, KEY_CURRENT_SKIN)
            .and_then(|id| Skin::from_id(&id))
            .filter(|skin| skin.is_free() || unlocked.contains(skin))
            .unwrap_or_default();
        Self {
            store,
            sound_enabled,
            dark_theme,
            current_skin,
            has_visited,
        }
    }

    #[must_use]
    pub const fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    #[must_use]
    pub const fn dark_theme(&self) -> bool {
        self.dark_theme
    }

    #[must_use]
    pub const fn current_skin(&self) -> Skin {
        self.current_skin
    }

    #[must_use]
    pub const fn has_visited(&self) -> bool {
        self.has_visited
    }

    #[must_use]
    pub const fn snapshot(&self) -> PreferenceSnapshot {
        PreferenceSnapshot {
            sound_enabled: self.sound_enabled,
            dark_theme: self.dark_theme,
            current_skin: self.current_skin,
            has_visited: self.has_visited,
        }
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        write_string(&self.store, KEY_SOUND_ENABLED, flag(enabled));
    }

    pub fn set_dark_theme(&mut self, enabled: bool) {
        self.dark_theme = enabled;
        write_string(&self.store, KEY_DARK_THEME, flag(enabled));
    }

    /// Flip the theme and return the new value.
    pub fn toggle_dark_theme(&mut self) -> bool {
        self.set_dark_theme(!self.dark_theme);
        self.dark_theme
    }

    /// Wear `skin` if it is free or already unlocked.
    ///
    /// # Errors
    ///
    /// Returns `SkinError::Locked` when the skin has not been unlocked.
    pub fn select_skin(&mut self, skin: Skin, unlocked: &BTreeSet<Skin>) -> Result<(), SkinError> {
        if !skin.is_free() && !unlocked.contains(&skin) {
            return Err(SkinError::Locked(skin));
        }
        self.apply_unlocked_skin(skin);
        Ok(())
    }

    /// Wear a skin the caller has just unlocked.
    pub(crate) fn apply_unlocked_skin(&mut self, skin: Skin) {
        self.current_skin = skin;
        write_string(&self.store, KEY_CURRENT_SKIN, skin.id());
    }

    /// Record the visit; true only on the very first run.
    pub fn mark_visited(&mut self) -> bool {
        if self.has_visited {
            return false;
        }
        self.has_visited = true;
        write_string(&self.store, KEY_HAS_VISITED, FLAG_TRUE);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_on_empty_store() {
        let prefs = Preferences::load(MemoryStore::new(), &BTreeSet::new());
        assert!(prefs.sound_enabled());
        assert!(!prefs.dark_theme());
        assert_eq!(prefs.current_skin(), Skin::Classic);
        assert!(!prefs.has_visited());
    }

    #[test]
    fn only_literal_flags_flip_defaults() {
        let store = MemoryStore::new();
        store.set_item(KEY_SOUND_ENABLED, "0").unwrap();
        store.set_item(KEY_DARK_THEME, "yes").unwrap();
        let prefs = Preferences::load(store.clone(), &BTreeSet::new());
        assert!(prefs.sound_enabled());
        assert!(!prefs.dark_theme());

        store.set_item(KEY_SOUND_ENABLED, "false").unwrap();
        store.set_item(KEY_DARK_THEME, "true").unwrap();
        let prefs = Preferences::load(store, &BTreeSet::new());
        assert!(!prefs.sound_enabled());
        assert!(prefs.dark_theme());
    }

    #[test]
    fn setters_persist() {
        let store = MemoryStore::new();
        let mut prefs = Preferences::load(store.clone(), &BTreeSet::new());
        prefs.set_sound_enabled(false);
        assert!(prefs.toggle_dark_theme());
        assert_eq!(store.get_item(KEY_SOUND_ENABLED).unwrap().as_deref(), Some("false"));
        assert_eq!(store.get_item(KEY_DARK_THEME).unwrap().as_deref(), Some("true"));
        assert!(!prefs.toggle_dark_theme());
        assert_eq!(store.get_item(KEY_DARK_THEME).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn locked_skins_cannot_be_selected() {
        let store = MemoryStore::new();
        let mut prefs = Preferences::load(store.clone(), &BTreeSet::new());
        assert_eq!(
            prefs.select_skin(Skin::Gold, &BTreeSet::new()),
            Err(SkinError::Locked(Skin::Gold))
        );
        let unlocked: BTreeSet<Skin> = [Skin::Gold].into_iter().collect();
        prefs.select_skin(Skin::Gold, &unlocked).unwrap();
        assert_eq!(store.get_item(KEY_CURRENT_SKIN).unwrap().as_deref(), Some("gold"));
        prefs.select_skin(Skin::Classic, &BTreeSet::new()).unwrap();
        assert_eq!(prefs.current_skin(), Skin::Classic);
    }

    #[test]
    fn stored_skin_must_still_be_unlocked() {
        let store = MemoryStore::new();
        store.set_item(KEY_CURRENT_SKIN, "galaxy").unwrap();
        let prefs = Preferences::load(store.clone(), &BTreeSet::new());
        assert_eq!(prefs.current_skin(), Skin::Classic);

        let unlocked: BTreeSet<Skin> = [Skin::Galaxy].into_iter().collect();
        let prefs = Preferences::load(store, &unlocked);
        assert_eq!(prefs.current_skin(), Skin::Galaxy);
    }

    #[test]
    fn first_visit_is_reported_once() {
        let store = MemoryStore::new();
        let mut prefs = Preferences::load(store.clone(), &BTreeSet::new());
        assert!(prefs.mark_visited());
        assert!(!prefs.mark_visited());
        let mut reloaded = Preferences::load(store, &BTreeSet::new());
        assert!(reloaded.has_visited());
        assert!(!reloaded.mark_visited());
    }
}
