//! Session state machine: players, rounds, votes and verdicts.
//!
//! A [`Session`] moves through three phases. Players may only join in
//! `Lobby`; starting a round assigns a secret word to everyone except one
//! randomly chosen imposter and moves to `Playing`; once every player has
//! voted, the verdict is computed, scores are applied and the session sits
//! in `Verdict` until the next round (or an end-game vote) resets it.
//!
//! All methods here are phase-gated and return [`GameError`] without
//! mutating anything on failure. Session lookup and locking live in
//! [`crate::registry`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::types::{PlayerId, SessionId};
use crate::words::{ImposterPicker, WordSource};

/// Minimum players for a round. A 1-player imposter game is degenerate:
/// there is no one to deceive and no one to vote.
pub const MIN_PLAYERS: usize = 2;

/// The sentinel handed to the imposter instead of the secret word.
pub const IMPOSTER_WORD: &str = "???";

/// State-machine position of a session.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Lobby,
    Playing,
    Verdict,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lobby => "lobby",
            Self::Playing => "playing",
            Self::Verdict => "verdict",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A participant in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Cumulative score across rounds. Unsigned, so it can never decrease
    /// through a round delta.
    pub score: u32,
}

/// Frozen outcome of one completed round.
///
/// Captured at verdict time and retained until the next round starts. The
/// imposter's name is copied out because the `Player` entry itself lives on
/// and may later be removed by a kick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub imposter_id: PlayerId,
    pub imposter_name: String,
    /// Copy of the round's votes at the moment of computation.
    pub votes_by_player: HashMap<PlayerId, PlayerId>,
    /// Votes received per player, zeros included.
    pub vote_counts: HashMap<PlayerId, u32>,
    /// Whether at least one non-imposter voter voted for the imposter.
    pub imposter_guessed_right: bool,
    /// Score delta earned this round per player, zeros included.
    pub round_scores: HashMap<PlayerId, u32>,
}

/// One game instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Insertion order is join order; it drives default naming and display.
    pub players: Vec<Player>,
    pub phase: GamePhase,
    /// Incremented each time play begins, starting from 0 in the lobby.
    pub current_round: u32,
    /// Secret word for the active round; empty outside active rounds.
    pub current_word: String,
    pub imposter_id: Option<PlayerId>,
    /// Voter id to target id, one entry per voter this round.
    pub votes: HashMap<PlayerId, PlayerId>,
    pub verdict: Option<Verdict>,
    pub created_at: DateTime<Utc>,
    /// Players who have voted to end the game; unanimity resets to lobby.
    pub end_game_votes: HashSet<PlayerId>,
    /// Kick target to the set of players voting for the kick.
    pub kick_votes: HashMap<PlayerId, HashSet<PlayerId>>,
}

/// Redacted read view safe to hand to any player.
///
/// `current_word` and `imposter_id` do not exist on this type, so a call
/// site cannot forget to strip them. Word delivery goes through
/// [`Session::word_for`] instead, scoped to one player's own identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: SessionId,
    pub players: Vec<Player>,
    pub phase: GamePhase,
    pub current_round: u32,
    pub votes: HashMap<PlayerId, PlayerId>,
    pub verdict: Option<Verdict>,
    pub created_at: DateTime<Utc>,
    pub end_game_votes: HashSet<PlayerId>,
    pub kick_votes: HashMap<PlayerId, HashSet<PlayerId>>,
}

impl Session {
    /// Create an empty lobby session with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SessionId::generate(),
            players: Vec::new(),
            phase: GamePhase::Lobby,
            current_round: 0,
            current_word: String::new(),
            imposter_id: None,
            votes: HashMap::new(),
            verdict: None,
            created_at: Utc::now(),
            end_game_votes: HashSet::new(),
            kick_votes: HashMap::new(),
        }
    }

    fn ensure_phase(&self, expected: GamePhase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase { actual: self.phase })
        }
    }

    fn ensure_player(&self, player_id: &PlayerId) -> Result<(), GameError> {
        if self.players.iter().any(|p| p.id == *player_id) {
            Ok(())
        } else {
            Err(GameError::UnknownPlayer {
                player_id: player_id.clone(),
            })
        }
    }

    /// Append a new player. Lobby only.
    ///
    /// A blank name (after trimming) defaults to `Player N`, N being the
    /// 1-based join order.
    pub fn join(&mut self, name: &str) -> Result<Player, GameError> {
        self.ensure_phase(GamePhase::Lobby)?;
        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            format!("Player {}", self.players.len() + 1)
        } else {
            trimmed.to_string()
        };
        let player = Player {
            id: PlayerId::generate(),
            name,
            score: 0,
        };
        self.players.push(player.clone());
        Ok(player)
    }

    /// Start play. Requires at least [`MIN_PLAYERS`] players.
    ///
    /// Not phase-gated: a start request during play re-rolls the imposter
    /// and word for a fresh round.
    pub fn start(
        &mut self,
        words: &dyn WordSource,
        picker: &dyn ImposterPicker,
    ) -> Result<(), GameError> {
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers {
                actual: self.players.len(),
            });
        }
        self.begin_round(words, picker);
        Ok(())
    }

    /// Advance from a resolved round to a fresh one. Verdict phase only.
    pub fn next_round(
        &mut self,
        words: &dyn WordSource,
        picker: &dyn ImposterPicker,
    ) -> Result<(), GameError> {
        self.ensure_phase(GamePhase::Verdict)?;
        self.begin_round(words, picker);
        Ok(())
    }

    fn begin_round(&mut self, words: &dyn WordSource, picker: &dyn ImposterPicker) {
        self.phase = GamePhase::Playing;
        self.current_round += 1;
        self.votes.clear();
        self.verdict = None;
        self.end_game_votes.clear();
        self.kick_votes.clear();
        // Clamp so a misbehaving picker cannot index out of bounds.
        let seat = picker.pick(self.players.len()).min(self.players.len() - 1);
        self.imposter_id = Some(self.players[seat].id.clone());
        self.current_word = words.draw();
    }

    /// The word to show `player_id`: the sentinel for the imposter, the
    /// session word for everyone else, and the empty string before any
    /// round has started.
    #[must_use]
    pub fn word_for(&self, player_id: &PlayerId) -> String {
        if self.imposter_id.as_ref() == Some(player_id) {
            IMPOSTER_WORD.to_string()
        } else {
            self.current_word.clone()
        }
    }

    /// Record `voter`'s vote against `target`, overwriting any earlier vote
    /// by the same voter this round. Playing phase only; both ids must name
    /// current players (self-votes are permitted).
    ///
    /// When the vote set covers every player the verdict is computed in the
    /// same call. Returns whether that happened.
    pub fn submit_vote(&mut self, voter: PlayerId, target: PlayerId) -> Result<bool, GameError> {
        self.ensure_phase(GamePhase::Playing)?;
        self.ensure_player(&voter)?;
        self.ensure_player(&target)?;
        self.votes.insert(voter, target);
        if self.votes.len() == self.players.len() {
            self.compute_verdict();
            return Ok(true);
        }
        Ok(false)
    }

    /// Whether `player_id` has voted this round.
    #[must_use]
    pub fn has_voted(&self, player_id: &PlayerId) -> bool {
        self.votes.contains_key(player_id)
    }

    /// Whether every current player has voted this round.
    #[must_use]
    pub fn all_voted(&self) -> bool {
        self.votes.len() == self.players.len()
    }

    /// Record `player_id`'s vote to end the game. Allowed outside the lobby.
    ///
    /// Once every current player has voted to end, the session returns to
    /// the lobby with scores and the round counter retained. Returns whether
    /// the game ended.
    pub fn submit_end_game_vote(&mut self, player_id: PlayerId) -> Result<bool, GameError> {
        if self.phase == GamePhase::Lobby {
            return Err(GameError::InvalidPhase { actual: self.phase });
        }
        self.ensure_player(&player_id)?;
        self.end_game_votes.insert(player_id);
        if self.all_voted_to_end() {
            self.reset_to_lobby();
            return Ok(true);
        }
        Ok(false)
    }

    /// Record `voter`'s vote to kick `target`. Any phase; both ids must name
    /// current players and a player cannot kick themselves.
    ///
    /// The kick lands once a strict majority of the *other* players agrees.
    /// Returns the removed player when that happens.
    pub fn submit_kick_vote(
        &mut self,
        voter: PlayerId,
        target: PlayerId,
    ) -> Result<Option<Player>, GameError> {
        if voter == target {
            return Err(GameError::SelfKick);
        }
        self.ensure_player(&voter)?;
        self.ensure_player(&target)?;
        let eligible = self.players.len() - 1;
        let voters = self.kick_votes.entry(target.clone()).or_default();
        voters.insert(voter);
        if voters.len() * 2 > eligible {
            return Ok(self.remove_player(&target));
        }
        Ok(None)
    }

    /// Redacted snapshot for untrusted readers.
    #[must_use]
    pub fn public_view(&self) -> SessionView {
        SessionView {
            id: self.id.clone(),
            players: self.players.clone(),
            phase: self.phase,
            current_round: self.current_round,
            votes: self.votes.clone(),
            verdict: self.verdict.clone(),
            created_at: self.created_at,
            end_game_votes: self.end_game_votes.clone(),
            kick_votes: self.kick_votes.clone(),
        }
    }

    fn all_voted_to_end(&self) -> bool {
        !self.players.is_empty()
            && self
                .players
                .iter()
                .all(|p| self.end_game_votes.contains(&p.id))
    }

    /// Back to the lobby: secret state and every vote book cleared, scores
    /// and the round counter kept.
    fn reset_to_lobby(&mut self) {
        self.phase = GamePhase::Lobby;
        self.current_word.clear();
        self.imposter_id = None;
        self.votes.clear();
        self.verdict = None;
        self.end_game_votes.clear();
        self.kick_votes.clear();
    }

    /// Remove `target` and every trace of them from the live vote books,
    /// then settle whatever their departure decides: a mid-round kick of the
    /// imposter (or a drop below [`MIN_PLAYERS`]) aborts the round back to
    /// the lobby; otherwise the verdict fires if the kick completed the vote
    /// set, and an end-game unanimity reached by the departure also lands.
    /// A frozen verdict is a historical snapshot and is never edited.
    fn remove_player(&mut self, target: &PlayerId) -> Option<Player> {
        let seat = self.players.iter().position(|p| p.id == *target)?;
        let removed = self.players.remove(seat);
        self.votes
            .retain(|voter, voted_for| *voter != *target && *voted_for != *target);
        self.end_game_votes.remove(target);
        self.kick_votes.remove(target);
        for voters in self.kick_votes.values_mut() {
            voters.remove(target);
        }
        self.kick_votes.retain(|_, voters| !voters.is_empty());

        match self.phase {
            GamePhase::Lobby => {}
            GamePhase::Playing => {
                if self.players.len() < MIN_PLAYERS || self.imposter_id.as_ref() == Some(target) {
                    self.reset_to_lobby();
                } else if self.votes.len() == self.players.len() {
                    self.compute_verdict();
                } else if self.all_voted_to_end() {
                    self.reset_to_lobby();
                }
            }
            GamePhase::Verdict => {
                if self.players.len() < MIN_PLAYERS || self.all_voted_to_end() {
                    self.reset_to_lobby();
                }
            }
        }
        Some(removed)
    }

    /// Resolve the round: tally votes, score, freeze the [`Verdict`] and
    /// move to the verdict phase.
    ///
    /// Scoring: each non-imposter voter earns +1 for voting the imposter;
    /// a miss credits the imposter +1 instead. The imposter's own vote earns
    /// nothing either way. If no innocent found the imposter, the imposter
    /// takes a flat +2 on top.
    fn compute_verdict(&mut self) {
        // Unreachable through phase gating, but a session without an
        // imposter must never produce a verdict.
        let Some(imposter_id) = self.imposter_id.clone() else {
            return;
        };
        let Some(imposter_name) = self
            .players
            .iter()
            .find(|p| p.id == imposter_id)
            .map(|p| p.name.clone())
        else {
            return;
        };

        let mut vote_counts: HashMap<PlayerId, u32> =
            self.players.iter().map(|p| (p.id.clone(), 0)).collect();
        for voted_for in self.votes.values() {
            *vote_counts.entry(voted_for.clone()).or_insert(0) += 1;
        }

        let imposter_guessed_right = self
            .votes
            .iter()
            .any(|(voter, voted_for)| *voter != imposter_id && *voted_for == imposter_id);

        let mut round_scores: HashMap<PlayerId, u32> =
            self.players.iter().map(|p| (p.id.clone(), 0)).collect();
        for (voter, voted_for) in &self.votes {
            if *voter == imposter_id {
                continue;
            }
            if *voted_for == imposter_id {
                *round_scores.entry(voter.clone()).or_insert(0) += 1;
            } else {
                *round_scores.entry(imposter_id.clone()).or_insert(0) += 1;
            }
        }
        if !imposter_guessed_right {
            *round_scores.entry(imposter_id.clone()).or_insert(0) += 2;
        }

        for player in &mut self.players {
            player.score += round_scores.get(&player.id).copied().unwrap_or(0);
        }

        self.verdict = Some(Verdict {
            imposter_id,
            imposter_name,
            votes_by_player: self.votes.clone(),
            vote_counts,
            imposter_guessed_right,
            round_scores,
        });
        self.phase = GamePhase::Verdict;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
