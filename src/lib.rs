//! Single-elimination bracket manager: library with models, bracket engine, and store.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::import_export::{
    bracket_layout, export_csv, export_json, import_csv, import_json, import_text,
    render_layout_text, ImportError, MatchLayout, RoundLayout, SlotLayout,
};
pub use logic::{
    add_participants, advance_winner, bracket_size, create_tournament, generate_bracket,
    record_match_result, remove_participant, reset_bracket, reset_tournament, round_count,
};
pub use models::{
    BracketError, Corner, GameMatch, InsertParticipant, InsertTournament, MatchId, Participant,
    ParticipantId, ResultType, Tournament, TournamentError, TournamentId, TournamentSettings,
};
pub use store::TournamentStore;
