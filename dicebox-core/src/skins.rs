//! Cosmetic dice skins and the streak milestones that unlock them.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MILESTONES;

/// Errors raised when selecting or parsing a skin.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkinError {
    #[error("unknown skin `{0}`")]
    Unknown(String),
    #[error("skin `{0}` has not been unlocked")]
    Locked(Skin),
}

/// Visual theme applied to the dice.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Skin {
    #[default]
    Classic,
    Neon,
    Gold,
    Galaxy,
}

impl Skin {
    pub const ALL: [Self; 4] = [Self::Classic, Self::Neon, Self::Gold, Self::Galaxy];

    /// Stable identifier used in storage and across the JS boundary.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Neon => "neon",
            Self::Gold => "gold",
            Self::Galaxy => "galaxy",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|skin| skin.id() == id.trim())
    }

    /// The milestone that unlocks this skin, if it is a reward skin.
    #[must_use]
    pub fn milestone(self) -> Option<Milestone> {
        MILESTONES.iter().copied().find(|m| m.skin == self)
    }

    /// Skins that need no unlock.
    #[must_use]
    pub const fn is_free(self) -> bool {
        matches!(self, Self::Classic)
    }
}

impl fmt::Display for Skin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Skin {
    type Err = SkinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| SkinError::Unknown(s.to_string()))
    }
}

/// A streak threshold that unlocks a skin exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub skin: Skin,
    pub threshold_day: u32,
}

impl Milestone {
    /// Threshold of the milestone immediately before this one, or 0 for the first.
    #[must_use]
    pub fn previous_threshold(&self) -> u32 {
        MILESTONES
            .iter()
            .position(|m| m == self)
            .and_then(|idx| idx.checked_sub(1))
            .and_then(|idx| MILESTONES.get(idx))
            .map_or(0, |m| m.threshold_day)
    }
}
