use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

/// The number of credits every new profile receives at signup.
pub const STARTING_CREDITS: Credits = Credits(10);

//--------------------------------------      Credits        ---------------------------------------------------------
/// The credit balance attached to a profile.
///
/// Credits are informational only. Nothing in the engine debits or credits a balance; the value is stored at signup and
/// carried on the profile record.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Credits(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a credit balance: {0}")]
pub struct CreditsConversionError(String);

impl From<i64> for Credits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for Credits {
    type Error = CreditsConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(CreditsConversionError(format!("Value {value} is too large to convert to Credits")))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Credits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            1 => write!(f, "1 credit"),
            n => write!(f, "{n} credits"),
        }
    }
}

impl Credits {
    pub fn value(&self) -> i64 {
        self.0
    }
}
