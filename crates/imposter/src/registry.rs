//! Process-wide registry of live game sessions.
//!
//! Construct one [`SessionRegistry`] at service start and hand it by
//! reference to request handlers. Mutating operations hold the session's
//! exclusive map guard for their whole duration, so concurrent votes on one
//! session cannot race the "votes complete, compute verdict" check; reads
//! clone a consistent snapshot under the shared guard. No operation blocks
//! on I/O.

use dashmap::DashMap;

use crate::error::GameError;
use crate::session::{Player, Session, SessionView};
use crate::types::{PlayerId, SessionId};
use crate::words::{BuiltinWords, ImposterPicker, UniformPicker, WordSource};

/// Shared table of live sessions, keyed by session id.
///
/// Entries are never deleted by game logic; the registry lives as long as
/// the host process.
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Session>,
    words: Box<dyn WordSource>,
    picker: Box<dyn ImposterPicker>,
}

impl SessionRegistry {
    /// Registry with the built-in word list and uniform imposter selection.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sources(Box::new(BuiltinWords), Box::new(UniformPicker))
    }

    /// Registry with injected word and seat sources.
    #[must_use]
    pub fn with_sources(words: Box<dyn WordSource>, picker: Box<dyn ImposterPicker>) -> Self {
        Self {
            sessions: DashMap::new(),
            words,
            picker,
        }
    }

    /// Create a new lobby session and insert it into the registry.
    pub fn create_session(&self) -> Session {
        let session = Session::new();
        tracing::info!(session = %session.id, "session created");
        self.sessions.insert(session.id.clone(), session.clone());
        session
    }

    fn with_session_mut<T>(
        &self,
        session_id: &SessionId,
        op: impl FnOnce(&mut Session) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut entry =
            self.sessions
                .get_mut(session_id)
                .ok_or_else(|| GameError::SessionNotFound {
                    session_id: session_id.clone(),
                })?;
        op(entry.value_mut())
    }

    /// Add a player to a lobby session. Returns the created player, whose id
    /// is the identity token the client holds from then on.
    pub fn join_session(&self, session_id: &SessionId, name: &str) -> Result<Player, GameError> {
        let player = self.with_session_mut(session_id, |session| session.join(name))?;
        tracing::info!(session = %session_id, player = %player.id, name = %player.name, "player joined");
        Ok(player)
    }

    /// Begin play: assign a random imposter and draw a word. Requires at
    /// least two players.
    pub fn start_game(&self, session_id: &SessionId) -> Result<(), GameError> {
        self.with_session_mut(session_id, |session| {
            session.start(self.words.as_ref(), self.picker.as_ref())?;
            tracing::info!(session = %session_id, round = session.current_round, "round started");
            Ok(())
        })
    }

    /// The word to show one player. This is the only operation that carries
    /// secret information across the boundary, and it is scoped to a single
    /// player id so the general session reads can stay redacted.
    pub fn word_for_player(
        &self,
        session_id: &SessionId,
        player_id: &PlayerId,
    ) -> Result<String, GameError> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| GameError::SessionNotFound {
                session_id: session_id.clone(),
            })?;
        Ok(session.word_for(player_id))
    }

    /// Record a vote. When the last expected vote arrives, the verdict is
    /// computed and scores applied before this call returns.
    pub fn submit_vote(
        &self,
        session_id: &SessionId,
        voter_id: &PlayerId,
        target_id: &PlayerId,
    ) -> Result<(), GameError> {
        self.with_session_mut(session_id, |session| {
            let resolved = session.submit_vote(voter_id.clone(), target_id.clone())?;
            tracing::debug!(session = %session_id, voter = %voter_id, "vote recorded");
            if resolved {
                tracing::info!(session = %session_id, round = session.current_round, "verdict computed");
            }
            Ok(())
        })
    }

    /// Advance a resolved session to a fresh round.
    pub fn next_round(&self, session_id: &SessionId) -> Result<(), GameError> {
        self.with_session_mut(session_id, |session| {
            session.next_round(self.words.as_ref(), self.picker.as_ref())?;
            tracing::info!(session = %session_id, round = session.current_round, "round started");
            Ok(())
        })
    }

    /// Full trusted snapshot, secret fields included. Never hand this across
    /// a trust boundary; use [`public_session`](Self::public_session) there.
    pub fn get_session(&self, session_id: &SessionId) -> Result<Session, GameError> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| GameError::SessionNotFound {
                session_id: session_id.clone(),
            })
    }

    /// Redacted snapshot for untrusted readers.
    pub fn public_session(&self, session_id: &SessionId) -> Result<SessionView, GameError> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().public_view())
            .ok_or_else(|| GameError::SessionNotFound {
                session_id: session_id.clone(),
            })
    }

    /// Whether a player has voted this round.
    pub fn has_voted(
        &self,
        session_id: &SessionId,
        player_id: &PlayerId,
    ) -> Result<bool, GameError> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| GameError::SessionNotFound {
                session_id: session_id.clone(),
            })?;
        Ok(session.has_voted(player_id))
    }

    /// Whether every player has voted this round.
    pub fn all_voted(&self, session_id: &SessionId) -> Result<bool, GameError> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| GameError::SessionNotFound {
                session_id: session_id.clone(),
            })?;
        Ok(session.all_voted())
    }

    /// Record a vote to end the game; unanimity returns the session to the
    /// lobby with scores retained.
    pub fn submit_end_game_vote(
        &self,
        session_id: &SessionId,
        player_id: &PlayerId,
    ) -> Result<(), GameError> {
        self.with_session_mut(session_id, |session| {
            let ended = session.submit_end_game_vote(player_id.clone())?;
            if ended {
                tracing::info!(session = %session_id, "game ended by unanimous vote");
            }
            Ok(())
        })
    }

    /// Record a vote to kick a player; a strict majority of the other
    /// players removes the target.
    pub fn submit_kick_vote(
        &self,
        session_id: &SessionId,
        voter_id: &PlayerId,
        target_id: &PlayerId,
    ) -> Result<(), GameError> {
        self.with_session_mut(session_id, |session| {
            let removed = session.submit_kick_vote(voter_id.clone(), target_id.clone())?;
            if let Some(player) = removed {
                tracing::info!(session = %session_id, kicked = %player.id, name = %player.name, "player kicked");
            }
            Ok(())
        })
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
