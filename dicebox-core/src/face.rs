//! Die faces and the uniform roll.
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{FACE_MAX, FACE_MIN, WINNING_FACE};

/// Raised when an integer cannot be a face of a six-sided die.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FaceError {
    #[error("face value {0} is outside 1..=6")]
    OutOfRange(i64),
}

/// A single face of a six-sided die, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Face(u8);

impl Face {
    pub const WINNING: Self = Self(WINNING_FACE);

    /// Validate a face value.
    ///
    /// # Errors
    ///
    /// Returns `FaceError::OutOfRange` when `value` is not in `1..=6`.
    pub const fn new(value: u8) -> Result<Self, FaceError> {
        if value >= FACE_MIN && value <= FACE_MAX {
            Ok(Self(value))
        } else {
            Err(FaceError::OutOfRange(value as i64))
        }
    }

    /// Draw a uniformly distributed face.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(FACE_MIN..=FACE_MAX))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this face advances the daily streak.
    #[must_use]
    pub const fn is_winning(self) -> bool {
        self.0 == WINNING_FACE
    }

    /// Every face in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (FACE_MIN..=FACE_MAX).map(Self)
    }
}

impl TryFrom<u8> for Face {
    type Error = FaceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Face {
    type Error = FaceError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| FaceError::OutOfRange(value))
            .and_then(Self::new)
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> Self {
        face.0
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
