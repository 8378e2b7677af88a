//! Results: record a referee's match edit, or wipe the whole bracket.

use crate::logic::advance::advance_winner;
use crate::logic::reset::reset_bracket;
use crate::models::{GameMatch, Tournament, TournamentError};

/// Record a result edit for one match and propagate it through the bracket.
///
/// Nothing is written unless the whole cascade succeeds.
pub fn record_match_result(
    tournament: &mut Tournament,
    edited: GameMatch,
) -> Result<(), TournamentError> {
    if !tournament.settings.permits(edited.result_type) {
        return Err(TournamentError::TiesNotAllowed);
    }
    let match_id = edited.id;
    let matches = advance_winner(&tournament.matches, edited).map_err(|e| {
        if e.is_internal_consistency() {
            log::error!("Tournament {}: bracket is inconsistent: {}", tournament.id, e);
        }
        e
    })?;
    tournament.matches = matches;
    tournament.touch();
    log::debug!("Tournament {}: recorded result for match {}", tournament.id, match_id);
    Ok(())
}

/// Clear every result, keeping the first-round draw.
pub fn reset_tournament(tournament: &mut Tournament) {
    tournament.matches = reset_bracket(&tournament.matches);
    tournament.touch();
    log::info!("Tournament {}: bracket reset", tournament.id);
}
