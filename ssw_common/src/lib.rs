mod credits;
mod helpers;
mod secret;

pub use credits::{Credits, CreditsConversionError, STARTING_CREDITS};
pub use helpers::{env_flag, parse_boolean_flag};
pub use secret::Secret;
