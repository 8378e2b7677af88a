//! Bracket builder: seeding, BYE spreading, and linking matches into a tree.

use crate::models::{BracketError, Corner, GameMatch, MatchId, Participant, ParticipantId, ResultType};
use std::collections::VecDeque;

/// Smallest power of two that fits `participants` (5 -> 8).
pub fn bracket_size(participants: usize) -> usize {
    participants.max(1).next_power_of_two()
}

/// Number of rounds for a bracket of `size` slots (8 -> 3).
pub fn round_count(size: usize) -> u32 {
    size.trailing_zeros()
}

/// Build a single-elimination bracket.
///
/// 1. Stable-sort by seed (seeded first, ascending; unseeded keep roster order).
/// 2. Pad with BYEs to the bracket size.
/// 3. Take slots alternately from the front and the back of the padded list.
/// 4. Pair consecutive slots into first-round matches; a lone participant wins by WALKOVER.
/// 5. Link every match to `(round - 1, position / 2)` and seat walkover winners there.
///
/// Matches are returned first round first, final last.
pub fn generate_bracket(participants: &[Participant]) -> Result<Vec<GameMatch>, BracketError> {
    if participants.len() < 2 {
        return Err(BracketError::NotEnoughParticipants {
            supplied: participants.len(),
        });
    }

    let size = bracket_size(participants.len());
    let total_rounds = round_count(size);
    let first_round = total_rounds - 1;
    let slots = seed_slots(participants, size);

    // Indexed by round number: rounds[0] is the final.
    let mut rounds: Vec<Vec<GameMatch>> = (0..total_rounds)
        .map(|round| (0..1u32 << round).map(|p| GameMatch::new(round, p)).collect())
        .collect();

    for (m, pair) in rounds[first_round as usize]
        .iter_mut()
        .zip(slots.chunks_exact(2))
    {
        m.red_competitor_id = pair[0];
        m.blue_competitor_id = pair[1];
        if let Some((_, id)) = m.lone_competitor() {
            m.resolve_walkover(id);
        }
    }

    for round in 1..total_rounds as usize {
        let (later, earlier) = rounds.split_at_mut(round);
        let targets: Vec<MatchId> = later[round - 1].iter().map(|m| m.id).collect();
        for m in earlier[0].iter_mut() {
            m.next_match_id = Some(targets[(m.position / 2) as usize]);
        }
    }

    let mut matches: Vec<GameMatch> = rounds.into_iter().rev().flatten().collect();
    seat_walkover_winners(&mut matches);

    log::debug!(
        "Built bracket: {} participants, size {}, {} rounds, {} byes",
        participants.len(),
        size,
        total_rounds,
        size - participants.len()
    );
    Ok(matches)
}

/// Seeded slot order for the first round, `None` for a BYE.
fn seed_slots(participants: &[Participant], size: usize) -> Vec<Option<ParticipantId>> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by_key(|p| (p.seed.is_none(), p.seed));

    let mut padded: VecDeque<Option<ParticipantId>> = ordered.into_iter().map(|p| Some(p.id)).collect();
    padded.resize(size, None);

    let mut slots = Vec::with_capacity(size);
    let mut from_front = true;
    loop {
        let next = if from_front {
            padded.pop_front()
        } else {
            padded.pop_back()
        };
        match next {
            Some(slot) => slots.push(slot),
            None => break,
        }
        from_front = !from_front;
    }
    slots
}

/// Put every first-round walkover winner into its slot of the following round.
/// One step only: first-round BYEs never stack, so nothing further cascades.
pub(crate) fn seat_walkover_winners(matches: &mut [GameMatch]) {
    let Some(first_round) = matches.iter().map(|m| m.round).max() else {
        return;
    };
    let seats: Vec<(MatchId, Corner, ParticipantId)> = matches
        .iter()
        .filter(|m| m.round == first_round && m.result_type == ResultType::Walkover)
        .filter_map(|m| Some((m.next_match_id?, Corner::fed_by(m.position), m.winner_id?)))
        .collect();
    for (next_id, corner, winner) in seats {
        if let Some(next) = matches.iter_mut().find(|m| m.id == next_id) {
            next.set_competitor(corner, Some(winner));
        }
    }
}
