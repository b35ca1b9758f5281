use rand::{distributions::Alphanumeric, Rng};

/// The length of generated conversation and message ids.
pub const RECORD_ID_LENGTH: usize = 20;

/// Generates a random alphanumeric record id, in the style of document-store auto ids.
pub fn new_record_id() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(RECORD_ID_LENGTH).map(char::from).collect()
}
