//! Rating value object for post-completion feedback.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Integer rating on a 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Creates a rating, validating the 1-5 bounds.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` for values outside 1-5.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(1..=5).contains(&value) {
            return Err(ValidationError::out_of_range("rating", 1, 5, value as i64));
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    pub fn value(&self) -> u8 {
        self.0
    }
}
