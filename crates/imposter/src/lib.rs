//! Session registry and game-state transitions for the Imposter party game.
//!
//! Players join a shared session, all but one receive a secret word while
//! the imposter receives none, everyone discusses and votes on who the
//! imposter is, and scores accrue round over round. This crate is the game
//! core only: a transport layer (HTTP handlers or similar) resolves identity
//! and rendering while the registry owns validation, phase-gated mutation,
//! verdict computation and scoring.
//!
//! # Example
//!
//! ```
//! use imposter::registry::SessionRegistry;
//!
//! let registry = SessionRegistry::new();
//! let session = registry.create_session();
//!
//! let ada = registry.join_session(&session.id, "Ada").unwrap();
//! let anon = registry.join_session(&session.id, "").unwrap();
//! assert_eq!(anon.name, "Player 2");
//!
//! registry.start_game(&session.id).unwrap();
//! let word = registry.word_for_player(&session.id, &ada.id).unwrap();
//! assert!(!word.is_empty());
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod registry;
pub mod session;
pub mod testing;
pub mod token;
pub mod types;
pub mod words;

/// Prelude module for convenient glob imports.
pub mod prelude {
    pub use crate::error::GameError;
    pub use crate::registry::SessionRegistry;
    pub use crate::session::{GamePhase, Player, Session, SessionView, Verdict};
    pub use crate::types::{PlayerId, SessionId};
    pub use crate::words::{ImposterPicker, WordSource};
}
