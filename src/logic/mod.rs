//! Bracket engine and tournament operations: build, advance, reset, roster, import/export.

mod advance;
mod bracket;
pub mod import_export;
mod reset;
mod results;
mod setup;

pub use advance::advance_winner;
pub use bracket::{bracket_size, generate_bracket, round_count};
pub use reset::reset_bracket;
pub use results::{record_match_result, reset_tournament};
pub use setup::{add_participants, create_tournament, remove_participant};
