//! JavaScript-facing session handle.
//!
//! The page script owns rendering, sound and animation. It creates one
//! `DiceApp` at load and calls into it whenever a roll lands, the reward
//! area is tapped or a setting changes.

use dicebox_core::{DiceSession, Face, Milestone, RelativeAge, Skin};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::dom;
use crate::storage::WebStorage;

const DARK_THEME_CLASS: &str = "dark-theme";

/// One history row ready for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub number: u8,
    pub timestamp: i64,
    pub age: RelativeAge,
    pub age_label: String,
}

/// Payload returned after a successful claim.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardClaim {
    pub skin: Skin,
    pub threshold_day: u32,
}

impl From<Milestone> for RewardClaim {
    fn from(milestone: Milestone) -> Self {
        Self {
            skin: milestone.skin,
            threshold_day: milestone.threshold_day,
        }
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

#[wasm_bindgen]
pub struct DiceApp {
    session: DiceSession<WebStorage>,
    rng: SmallRng,
}

#[wasm_bindgen]
impl DiceApp {
    /// Load persisted state and apply the saved theme and skin to the page.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        let session = DiceSession::load_default(WebStorage::open());
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let seed = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
        let app = Self {
            session,
            rng: SmallRng::seed_from_u64(seed ^ js_sys::Date::now().to_bits()),
        };
        app.apply_appearance();
        app
    }

    /// Roll the die and return the `RollReport`.
    ///
    /// # Errors
    /// Returns an error if the report cannot be converted to a JS value.
    pub fn roll(&mut self) -> Result<JsValue, JsValue> {
        let report = self.session.roll(&mut self.rng);
        to_js(&report)
    }

    /// Apply a roll decided by the page, e.g. an animation already in flight.
    ///
    /// # Errors
    /// Returns an error for values outside `1..=6`.
    #[wasm_bindgen(js_name = recordRoll)]
    pub fn record_roll(&mut self, number: u8) -> Result<JsValue, JsValue> {
        let face = Face::new(number).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let report = self.session.on_roll_outcome(face);
        to_js(&report)
    }

    /// Newest-first history with relative ages.
    ///
    /// # Errors
    /// Returns an error if the rows cannot be converted to a JS value.
    pub fn history(&self) -> Result<JsValue, JsValue> {
        let rows: Vec<HistoryRow> = self
            .session
            .history()
            .all()
            .iter()
            .map(|event| {
                let age = self.session.relative_age(event);
                HistoryRow {
                    number: event.face.value(),
                    timestamp: event.occurred_at,
                    age,
                    age_label: age.to_string(),
                }
            })
            .collect();
        to_js(&rows)
    }

    #[wasm_bindgen(js_name = clearHistory)]
    pub fn clear_history(&mut self) {
        self.session.clear_history();
    }

    /// # Errors
    /// Returns an error if the status cannot be converted to a JS value.
    #[wasm_bindgen(js_name = dailyStatus)]
    pub fn daily_status(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.daily_status())
    }

    /// # Errors
    /// Returns an error if the statuses cannot be converted to a JS value.
    pub fn milestones(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.milestone_statuses())
    }

    /// Claim the reward on offer. Resolves to `null` when nothing is claimable.
    ///
    /// # Errors
    /// Returns an error if the claim cannot be converted to a JS value.
    #[wasm_bindgen(js_name = claimReward)]
    pub fn claim_reward(&mut self) -> Result<JsValue, JsValue> {
        match self.session.on_reward_area_activated() {
            Some(milestone) => {
                self.apply_appearance();
                to_js(&RewardClaim::from(milestone))
            }
            None => Ok(JsValue::NULL),
        }
    }

    /// # Errors
    /// Returns an error for unknown or locked skins.
    #[wasm_bindgen(js_name = selectSkin)]
    pub fn select_skin(&mut self, id: &str) -> Result<(), JsValue> {
        let skin = id
            .parse::<Skin>()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.session
            .select_skin(skin)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.apply_appearance();
        Ok(())
    }

    #[wasm_bindgen(js_name = currentSkin)]
    #[must_use]
    pub fn current_skin(&self) -> String {
        self.session.prefs().current_skin().id().to_string()
    }

    #[wasm_bindgen(js_name = availableSkins)]
    #[must_use]
    pub fn available_skins(&self) -> Vec<String> {
        self.session
            .available_skins()
            .into_iter()
            .map(|skin| skin.id().to_string())
            .collect()
    }

    #[wasm_bindgen(js_name = soundEnabled)]
    #[must_use]
    pub fn sound_enabled(&self) -> bool {
        self.session.prefs().sound_enabled()
    }

    #[wasm_bindgen(js_name = setSoundEnabled)]
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.session.prefs_mut().set_sound_enabled(enabled);
    }

    #[wasm_bindgen(js_name = darkTheme)]
    #[must_use]
    pub fn dark_theme(&self) -> bool {
        self.session.prefs().dark_theme()
    }

    #[wasm_bindgen(js_name = setDarkTheme)]
    pub fn set_dark_theme(&mut self, enabled: bool) {
        self.session.prefs_mut().set_dark_theme(enabled);
        dom::set_root_class(DARK_THEME_CLASS, enabled);
    }

    #[wasm_bindgen(js_name = toggleDarkTheme)]
    pub fn toggle_dark_theme(&mut self) -> bool {
        let enabled = self.session.prefs_mut().toggle_dark_theme();
        dom::set_root_class(DARK_THEME_CLASS, enabled);
        enabled
    }

    /// True exactly once per device, for the onboarding popup.
    #[wasm_bindgen(js_name = firstVisit)]
    pub fn first_visit(&mut self) -> bool {
        self.session.first_visit()
    }
}

impl DiceApp {
    fn apply_appearance(&self) {
        let prefs = self.session.prefs();
        dom::set_root_class(DARK_THEME_CLASS, prefs.dark_theme());
        dom::set_root_data("skin", prefs.current_skin().id());
    }
}

impl Default for DiceApp {
    fn default() -> Self {
        Self::new()
    }
}
