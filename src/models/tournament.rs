//! Tournament record, settings, and tournament-level errors.

use crate::models::game::{BracketError, GameMatch, ResultType};
use crate::models::participant::{InsertParticipant, Participant, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// The bracket engine rejected the operation.
    Bracket(BracketError),
    /// No tournament with this id in the store.
    TournamentNotFound(TournamentId),
    /// Participant not on the roster.
    ParticipantNotFound(ParticipantId),
    /// Tournament names must not be blank.
    EmptyName,
    /// A TIE result was submitted but the tournament does not allow ties.
    TiesNotAllowed,
    /// The store lock was poisoned by a panicking writer.
    StoreUnavailable,
}

impl TournamentError {
    /// Corrupted bracket or store; not the caller's fault.
    pub fn is_internal(&self) -> bool {
        match self {
            TournamentError::Bracket(e) => e.is_internal_consistency(),
            TournamentError::StoreUnavailable => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::Bracket(e) => write!(f, "{}", e),
            TournamentError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            TournamentError::ParticipantNotFound(_) => write!(f, "Participant not found"),
            TournamentError::EmptyName => write!(f, "Tournament name is required"),
            TournamentError::TiesNotAllowed => write!(f, "Ties are not allowed in this tournament"),
            TournamentError::StoreUnavailable => write!(f, "Tournament store unavailable"),
        }
    }
}

impl std::error::Error for TournamentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TournamentError::Bracket(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BracketError> for TournamentError {
    fn from(e: BracketError) -> Self {
        TournamentError::Bracket(e)
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Per-tournament rules.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    /// Accept TIE as a result type (a winner is still required to advance).
    #[serde(default)]
    pub allow_ties: bool,
}

impl TournamentSettings {
    pub fn permits(&self, result_type: ResultType) -> bool {
        result_type != ResultType::Tie || self.allow_ties
    }
}

/// What a caller submits to create a tournament.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InsertTournament {
    pub name: String,
    /// Sport id, e.g. "judo" or "darts". Free-form.
    #[serde(default)]
    pub sport: String,
    pub participants: Vec<InsertParticipant>,
    #[serde(default)]
    pub settings: TournamentSettings,
    #[serde(default)]
    pub is_public: bool,
}

/// Full tournament record: roster, bracket, and bookkeeping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub sport: String,
    pub participants: Vec<Participant>,
    pub matches: Vec<GameMatch>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub settings: TournamentSettings,
    /// Public (read-only viewers) vs referee mode.
    pub is_public: bool,
}

impl Tournament {
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Round number of the first round (highest round in the tree).
    pub fn first_round(&self) -> Option<u32> {
        self.matches.iter().map(|m| m.round).max()
    }

    /// Winner of the final, once decided.
    pub fn champion(&self) -> Option<&Participant> {
        self.matches
            .iter()
            .find(|m| m.round == 0)
            .and_then(|m| m.winner_id)
            .and_then(|id| self.participant(id))
    }

    pub fn update_settings(&mut self, settings: TournamentSettings) {
        self.settings = settings;
        self.touch();
    }

    /// Mark the record as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
