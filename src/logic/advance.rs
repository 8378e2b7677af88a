//! Advancement engine: winner propagation and downstream invalidation.

use crate::models::{BracketError, Corner, GameMatch, MatchId};
use std::collections::HashMap;

/// Lookup tables over one match collection.
struct TreeIndex {
    by_id: HashMap<MatchId, usize>,
    by_place: HashMap<(u32, u32), usize>,
}

impl TreeIndex {
    fn new(matches: &[GameMatch]) -> Self {
        let mut by_id = HashMap::with_capacity(matches.len());
        let mut by_place = HashMap::with_capacity(matches.len());
        for (i, m) in matches.iter().enumerate() {
            by_id.insert(m.id, i);
            by_place.insert((m.round, m.position), i);
        }
        Self { by_id, by_place }
    }

    fn get(&self, id: MatchId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// The match in the previous (earlier) round that feeds `corner` of `m`.
    fn feeder(&self, m: &GameMatch, corner: Corner) -> Option<usize> {
        let offset = match corner {
            Corner::Red => 0,
            Corner::Blue => 1,
        };
        self.by_place
            .get(&(m.round + 1, m.position * 2 + offset))
            .copied()
    }

    /// No participant can ever come out of this match's subtree.
    fn is_vacant(&self, matches: &[GameMatch], idx: usize) -> bool {
        let m = &matches[idx];
        m.is_empty()
            && [Corner::Red, Corner::Blue]
                .into_iter()
                .all(|c| self.feeder(m, c).map_or(true, |f| self.is_vacant(matches, f)))
    }

    /// `corner` of `matches[idx]` is empty and will stay empty: a BYE.
    fn slot_is_bye(&self, matches: &[GameMatch], idx: usize, corner: Corner) -> bool {
        let m = &matches[idx];
        m.competitor(corner).is_none()
            && self
                .feeder(m, corner)
                .map_or(true, |f| self.is_vacant(matches, f))
    }
}

/// Apply one result edit and propagate it toward the final.
///
/// The result fields of `edited` (winner, result type, scores, metadata) replace
/// those of the stored match with the same id. Then, walking `next_match_id` links:
///
/// - winner set: it is written into the next match (red for even positions, blue
///   for odd). A changed occupant clears the next match's result and the walk
///   continues. If the other slot is a BYE the next match is resolved as WALKOVER
///   and the walk continues with that winner.
/// - winner cleared: the slot in the next match is emptied, its result cleared,
///   and the walk continues to the final.
///
/// The input is left untouched; the returned collection is the complete new state.
pub fn advance_winner(
    matches: &[GameMatch],
    edited: GameMatch,
) -> Result<Vec<GameMatch>, BracketError> {
    let mut matches = matches.to_vec();
    let tree = TreeIndex::new(&matches);

    let mut current = tree
        .get(edited.id)
        .ok_or(BracketError::MatchNotFound(edited.id))?;
    matches[current].apply_result(&edited);
    matches[current].check_result()?;

    // Each step moves one round closer to the final, so this ends there.
    while let Some(next_id) = matches[current].next_match_id {
        let from = &matches[current];
        let next = tree.get(next_id).ok_or(BracketError::DanglingNextMatch {
            from: from.id,
            to: next_id,
        })?;
        if matches[next].round + 1 != from.round {
            return Err(BracketError::MisplacedNextMatch {
                from: from.id,
                to: next_id,
            });
        }
        let corner = Corner::fed_by(from.position);
        let winner = from.winner_id;
        let other_is_bye = tree.slot_is_bye(&matches, next, corner.opposite());
        let target = &mut matches[next];

        match winner {
            Some(winner) => {
                let changed = target.competitor(corner) != Some(winner);
                target.set_competitor(corner, Some(winner));
                if changed {
                    target.clear_result();
                }

                if other_is_bye {
                    if target.winner_id != Some(winner) {
                        target.resolve_walkover(winner);
                    }
                    log::debug!(
                        "Walkover in round {} position {} for {}",
                        target.round,
                        target.position,
                        winner
                    );
                } else if !changed {
                    break;
                } else {
                    log::debug!(
                        "Cleared round {} position {}: {:?} slot now {}",
                        target.round,
                        target.position,
                        corner,
                        winner
                    );
                }
            }
            None => {
                target.set_competitor(corner, None);
                target.clear_result();
                log::debug!(
                    "Cleared round {} position {}: {:?} slot emptied",
                    target.round,
                    target.position,
                    corner
                );
            }
        }
        current = next;
    }

    Ok(matches)
}
