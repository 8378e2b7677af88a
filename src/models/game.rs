//! Bracket match, its result types, and engine errors.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Errors raised by the bracket builder and the advancement engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Fewer than two participants were supplied to the builder.
    NotEnoughParticipants { supplied: usize },
    /// The submitted winner is not one of the match's competitors.
    WinnerNotCompetitor { match_id: MatchId, winner: ParticipantId },
    /// A PENDING result must not carry a winner.
    PendingWithWinner(MatchId),
    /// A decided result must carry a winner.
    MissingWinner { match_id: MatchId, result_type: ResultType },
    /// The edited match is not part of the supplied collection.
    MatchNotFound(MatchId),
    /// `next_match_id` points at a match that does not exist.
    DanglingNextMatch { from: MatchId, to: MatchId },
    /// `next_match_id` points at a match that is not in the following round.
    MisplacedNextMatch { from: MatchId, to: MatchId },
}

impl BracketError {
    /// True for errors that mean the match tree itself is corrupted.
    /// Callers should log these and refuse to persist anything.
    pub fn is_internal_consistency(&self) -> bool {
        matches!(
            self,
            BracketError::MatchNotFound(_)
                | BracketError::DanglingNextMatch { .. }
                | BracketError::MisplacedNextMatch { .. }
        )
    }
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::NotEnoughParticipants { supplied } => {
                write!(f, "At least 2 participants are required (got {})", supplied)
            }
            BracketError::WinnerNotCompetitor { winner, .. } => {
                write!(f, "Winner {} is not a competitor in this match", winner)
            }
            BracketError::PendingWithWinner(_) => write!(f, "A pending match cannot have a winner"),
            BracketError::MissingWinner { result_type, .. } => {
                write!(f, "Result {:?} requires a winner", result_type)
            }
            BracketError::MatchNotFound(id) => write!(f, "Match {} is not in the bracket", id),
            BracketError::DanglingNextMatch { from, to } => {
                write!(f, "Match {} links to missing match {}", from, to)
            }
            BracketError::MisplacedNextMatch { from, to } => {
                write!(f, "Match {} links to match {} outside the following round", from, to)
            }
        }
    }
}

impl std::error::Error for BracketError {}

/// How a match was decided.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
    #[default]
    Pending,
    Score,
    Ko,
    Walkover,
    Dq,
    Tie,
}

/// One of the two competitor slots of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    Red,
    Blue,
}

impl Corner {
    /// Slot in the next round fed by the match at `position`: even positions feed red.
    pub fn fed_by(position: u32) -> Self {
        if position % 2 == 0 {
            Corner::Red
        } else {
            Corner::Blue
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Corner::Red => Corner::Blue,
            Corner::Blue => Corner::Red,
        }
    }
}

/// A single match in the bracket tree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// 0 = final, 1 = semi-finals, 2 = quarter-finals, ...
    pub round: u32,
    /// Index within the round, 0-based.
    pub position: u32,
    /// None is a BYE (first round) or a slot still waiting on its feeder.
    pub red_competitor_id: Option<ParticipantId>,
    pub blue_competitor_id: Option<ParticipantId>,
    pub winner_id: Option<ParticipantId>,
    pub result_type: ResultType,
    /// Free-form, e.g. "3-1" or "KO R2".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red_score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue_score: Option<String>,
    /// None only for the final.
    pub next_match_id: Option<MatchId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl GameMatch {
    /// An empty, pending match at the given place in the tree.
    pub fn new(round: u32, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            position,
            red_competitor_id: None,
            blue_competitor_id: None,
            winner_id: None,
            result_type: ResultType::Pending,
            red_score: None,
            blue_score: None,
            next_match_id: None,
            metadata: None,
        }
    }

    pub fn competitor(&self, corner: Corner) -> Option<ParticipantId> {
        match corner {
            Corner::Red => self.red_competitor_id,
            Corner::Blue => self.blue_competitor_id,
        }
    }

    pub fn set_competitor(&mut self, corner: Corner, id: Option<ParticipantId>) {
        match corner {
            Corner::Red => self.red_competitor_id = id,
            Corner::Blue => self.blue_competitor_id = id,
        }
    }

    pub fn has_competitor(&self, id: ParticipantId) -> bool {
        self.red_competitor_id == Some(id) || self.blue_competitor_id == Some(id)
    }

    /// The only occupied slot, if exactly one slot is occupied.
    pub fn lone_competitor(&self) -> Option<(Corner, ParticipantId)> {
        match (self.red_competitor_id, self.blue_competitor_id) {
            (Some(red), None) => Some((Corner::Red, red)),
            (None, Some(blue)) => Some((Corner::Blue, blue)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.red_competitor_id.is_none() && self.blue_competitor_id.is_none()
    }

    /// Back to PENDING: winner, scores and metadata are dropped. Slots are kept.
    pub fn clear_result(&mut self) {
        self.winner_id = None;
        self.result_type = ResultType::Pending;
        self.red_score = None;
        self.blue_score = None;
        self.metadata = None;
    }

    pub fn resolve_walkover(&mut self, winner: ParticipantId) {
        self.winner_id = Some(winner);
        self.result_type = ResultType::Walkover;
    }

    /// Copy winner, result type, scores and metadata from `edited`.
    pub fn apply_result(&mut self, edited: &GameMatch) {
        self.winner_id = edited.winner_id;
        self.result_type = edited.result_type;
        self.red_score = edited.red_score.clone();
        self.blue_score = edited.blue_score.clone();
        self.metadata = edited.metadata.clone();
    }

    /// Check the winner / result type pairing against this match's slots.
    pub fn check_result(&self) -> Result<(), BracketError> {
        match (self.result_type, self.winner_id) {
            (ResultType::Pending, Some(_)) => Err(BracketError::PendingWithWinner(self.id)),
            (ResultType::Pending, None) => Ok(()),
            (result_type, None) => Err(BracketError::MissingWinner {
                match_id: self.id,
                result_type,
            }),
            (_, Some(winner)) if !self.has_competitor(winner) => {
                Err(BracketError::WinnerNotCompetitor {
                    match_id: self.id,
                    winner,
                })
            }
            _ => Ok(()),
        }
    }
}
