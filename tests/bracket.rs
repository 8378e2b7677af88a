//! Integration tests for the bracket builder: size, seeding, BYE spreading, linking.

use bracket_manager_web::{
    bracket_size, generate_bracket, round_count, BracketError, GameMatch, Participant,
    ParticipantId, ResultType,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

fn seeded(n: usize) -> Vec<Participant> {
    (1..=n)
        .map(|i| Participant::new(format!("P{i}")).with_seed(i as u32))
        .collect()
}

fn find(matches: &[GameMatch], round: u32, position: u32) -> &GameMatch {
    matches
        .iter()
        .find(|m| m.round == round && m.position == position)
        .unwrap()
}

/// First-round slots in position order, as seeds (None = BYE).
fn first_round_seeds(participants: &[Participant], matches: &[GameMatch]) -> Vec<Option<u32>> {
    let seed_of: HashMap<ParticipantId, u32> = participants
        .iter()
        .map(|p| (p.id, p.seed.unwrap()))
        .collect();
    let first = matches.iter().map(|m| m.round).max().unwrap();
    let mut round: Vec<&GameMatch> = matches.iter().filter(|m| m.round == first).collect();
    round.sort_by_key(|m| m.position);
    round
        .iter()
        .flat_map(|m| [m.red_competitor_id, m.blue_competitor_id])
        .map(|slot| slot.map(|id| seed_of[&id]))
        .collect()
}

#[test]
fn build_requires_at_least_2_participants() {
    assert_eq!(
        generate_bracket(&[]),
        Err(BracketError::NotEnoughParticipants { supplied: 0 })
    );
    assert_eq!(
        generate_bracket(&seeded(1)),
        Err(BracketError::NotEnoughParticipants { supplied: 1 })
    );
}

#[test]
fn size_and_round_helpers() {
    assert_eq!(bracket_size(2), 2);
    assert_eq!(bracket_size(5), 8);
    assert_eq!(bracket_size(8), 8);
    assert_eq!(bracket_size(9), 16);
    assert_eq!(round_count(8), 3);
    assert_eq!(round_count(2), 1);
}

#[test]
fn match_and_bye_counts_hold_for_any_roster_size() {
    let mut rng = rand::thread_rng();
    let mut sizes: Vec<usize> = (2..=33).collect();
    sizes.extend((0..10).map(|_| rng.gen_range(34..300)));

    for n in sizes {
        let matches = generate_bracket(&seeded(n)).unwrap();
        let size = bracket_size(n);
        assert_eq!(matches.len(), size - 1, "n = {n}");

        let first = round_count(size) - 1;
        let byes = matches
            .iter()
            .filter(|m| m.round == first)
            .flat_map(|m| [m.red_competitor_id, m.blue_competitor_id])
            .filter(Option::is_none)
            .count();
        assert_eq!(byes, size - n, "n = {n}");

        for round in 0..=first {
            let count = matches.iter().filter(|m| m.round == round).count();
            assert_eq!(count, 1 << round, "n = {n}, round = {round}");
        }
    }
}

#[test]
fn next_match_links_point_one_round_closer_at_half_position() {
    let matches = generate_bracket(&seeded(13)).unwrap();
    let by_id: HashMap<_, _> = matches.iter().map(|m| (m.id, m)).collect();
    for m in &matches {
        match m.next_match_id {
            Some(next) => {
                let target = by_id[&next];
                assert_eq!(target.round, m.round - 1);
                assert_eq!(target.position, m.position / 2);
            }
            None => assert_eq!(m.round, 0),
        }
    }
}

#[test]
fn first_round_byes_resolve_as_walkover_and_full_matches_stay_pending() {
    let matches = generate_bracket(&seeded(11)).unwrap();
    let first = round_count(bracket_size(11)) - 1;
    for m in matches.iter().filter(|m| m.round == first) {
        match (m.red_competitor_id, m.blue_competitor_id) {
            (Some(_), Some(_)) => {
                assert_eq!(m.result_type, ResultType::Pending);
                assert_eq!(m.winner_id, None);
            }
            (Some(p), None) | (None, Some(p)) => {
                assert_eq!(m.result_type, ResultType::Walkover);
                assert_eq!(m.winner_id, Some(p));
            }
            (None, None) => panic!("two BYEs in one match"),
        }
    }
}

#[test]
fn five_seeds_top_seed_gets_a_bye_and_walks_over() {
    let participants = seeded(5);
    let matches = generate_bracket(&participants).unwrap();
    assert_eq!(matches.len(), 7);

    // Front/back alternation over [1, 2, 3, 4, 5, BYE, BYE, BYE].
    assert_eq!(
        first_round_seeds(&participants, &matches),
        vec![Some(1), None, Some(2), None, Some(3), None, Some(4), Some(5)]
    );

    let top = participants[0].id;
    let opener = find(&matches, 2, 0);
    assert_eq!(opener.red_competitor_id, Some(top));
    assert_eq!(opener.blue_competitor_id, None);
    assert_eq!(opener.winner_id, Some(top));
    assert_eq!(opener.result_type, ResultType::Walkover);
}

#[test]
fn walkover_winners_are_seated_in_the_next_round() {
    let participants = seeded(5);
    let matches = generate_bracket(&participants).unwrap();

    let semi_top = find(&matches, 1, 0);
    assert_eq!(semi_top.red_competitor_id, Some(participants[0].id));
    assert_eq!(semi_top.blue_competitor_id, Some(participants[1].id));
    assert_eq!(semi_top.result_type, ResultType::Pending);

    let semi_bottom = find(&matches, 1, 1);
    assert_eq!(semi_bottom.red_competitor_id, Some(participants[2].id));
    assert_eq!(semi_bottom.blue_competitor_id, None);
    assert_eq!(semi_bottom.winner_id, None);

    let final_match = find(&matches, 0, 0);
    assert!(final_match.is_empty());
    assert_eq!(final_match.result_type, ResultType::Pending);
}

#[test]
fn seeding_ignores_roster_order_when_everyone_is_seeded() {
    let participants = seeded(12);
    let expected = first_round_seeds(&participants, &generate_bracket(&participants).unwrap());

    let mut shuffled = participants.clone();
    shuffled.shuffle(&mut rand::thread_rng());
    let matches = generate_bracket(&shuffled).unwrap();
    assert_eq!(first_round_seeds(&participants, &matches), expected);
}

#[test]
fn unseeded_participants_keep_roster_order_after_seeded_ones() {
    let a = Participant::new("A");
    let b = Participant::new("B");
    let c = Participant::new("C").with_seed(1);
    let d = Participant::new("D");
    let matches = generate_bracket(&[a.clone(), b.clone(), c.clone(), d.clone()]).unwrap();

    // Order is C, A, B, D; front/back alternation pairs (C, D) and (A, B).
    let top = find(&matches, 1, 0);
    assert_eq!(top.red_competitor_id, Some(c.id));
    assert_eq!(top.blue_competitor_id, Some(d.id));
    let bottom = find(&matches, 1, 1);
    assert_eq!(bottom.red_competitor_id, Some(a.id));
    assert_eq!(bottom.blue_competitor_id, Some(b.id));
}

#[test]
fn two_participants_make_a_single_pending_final() {
    let matches = generate_bracket(&seeded(2)).unwrap();
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!(m.round, 0);
    assert_eq!(m.next_match_id, None);
    assert!(m.red_competitor_id.is_some() && m.blue_competitor_id.is_some());
    assert_eq!(m.result_type, ResultType::Pending);
}
