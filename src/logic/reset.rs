//! Bracket reset: wipe every result but keep the first-round draw.

use crate::logic::bracket::seat_walkover_winners;
use crate::models::GameMatch;

/// Clear all results. First-round slots keep their seeded participants; every later
/// round is emptied. First-round BYE matches are resolved again as WALKOVER and their
/// winners re-seated, exactly as the builder leaves them.
pub fn reset_bracket(matches: &[GameMatch]) -> Vec<GameMatch> {
    let Some(first_round) = matches.iter().map(|m| m.round).max() else {
        return Vec::new();
    };

    let mut reset: Vec<GameMatch> = matches
        .iter()
        .cloned()
        .map(|mut m| {
            m.clear_result();
            if m.round != first_round {
                m.red_competitor_id = None;
                m.blue_competitor_id = None;
            } else if let Some((_, id)) = m.lone_competitor() {
                m.resolve_walkover(id);
            }
            m
        })
        .collect();
    seat_walkover_winners(&mut reset);
    reset
}
