//! Data structures for the bracket manager: participants, matches, tournaments.

mod game;
mod participant;
mod tournament;

pub use game::{BracketError, Corner, GameMatch, MatchId, ResultType};
pub use participant::{InsertParticipant, Participant, ParticipantId};
pub use tournament::{
    InsertTournament, Tournament, TournamentError, TournamentId, TournamentSettings,
};
