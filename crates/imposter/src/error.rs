use crate::session::GamePhase;
use crate::types::{PlayerId, SessionId};

/// Errors that can occur in the game core.
///
/// Every operation signals failure through one of these variants rather than
/// panicking, and no failure path leaves a session partially mutated. The
/// transport layer maps each variant onto its own status convention, so the
/// variants stay distinguishable end to end.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("session {session_id} not found")]
    SessionNotFound { session_id: SessionId },

    #[error("operation not allowed in the {actual} phase")]
    InvalidPhase { actual: GamePhase },

    #[error("player {player_id} is not in this session")]
    UnknownPlayer { player_id: PlayerId },

    #[error("at least 2 players are required to start, have {actual}")]
    NotEnoughPlayers { actual: usize },

    #[error("players cannot vote to kick themselves")]
    SelfKick,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = GameError::SessionNotFound {
            session_id: SessionId::new("abcd1234"),
        };
        assert_eq!(err.to_string(), "session abcd1234 not found");

        let err = GameError::InvalidPhase {
            actual: GamePhase::Lobby,
        };
        assert_eq!(err.to_string(), "operation not allowed in the lobby phase");

        let err = GameError::UnknownPlayer {
            player_id: PlayerId::new("p1"),
        };
        assert_eq!(err.to_string(), "player p1 is not in this session");

        let err = GameError::NotEnoughPlayers { actual: 1 };
        assert_eq!(
            err.to_string(),
            "at least 2 players are required to start, have 1"
        );
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GameError>();
    }
}
