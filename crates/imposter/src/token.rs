//! Short random identifier tokens for sessions and players.
//!
//! Tokens double as the opaque identity a client holds, so they only need
//! enough entropy to avoid collisions across one process lifetime — they are
//! not meant to be unguessable credentials.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Token length in characters.
///
/// Lowercase alphanumeric at this length gives 36^8 (~2.8e12) distinct
/// tokens, comfortably beyond the number of sessions or players one process
/// will ever hold.
pub const TOKEN_LEN: usize = 8;

/// Generate a random lowercase alphanumeric token.
pub fn generate() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}
