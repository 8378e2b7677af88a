//! Setup: create a tournament and change its roster. Every roster change regenerates the bracket.

use crate::logic::bracket::generate_bracket;
use crate::models::{
    InsertParticipant, InsertTournament, Participant, ParticipantId, Tournament, TournamentError,
};
use chrono::Utc;
use uuid::Uuid;

/// Create a tournament: assign ids to the roster and build its bracket.
pub fn create_tournament(data: InsertTournament) -> Result<Tournament, TournamentError> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    let participants: Vec<Participant> = data
        .participants
        .into_iter()
        .map(Participant::from_insert)
        .collect();
    let matches = generate_bracket(&participants)?;

    let now = Utc::now();
    let tournament = Tournament {
        id: Uuid::new_v4(),
        name: name.to_string(),
        sport: data.sport,
        participants,
        matches,
        created_at: now,
        updated_at: now,
        settings: data.settings,
        is_public: data.is_public,
    };
    log::info!(
        "Created tournament {} ({}) with {} participants",
        tournament.id,
        tournament.name,
        tournament.participants.len()
    );
    Ok(tournament)
}

/// Append participants and regenerate the bracket. All recorded results are discarded.
pub fn add_participants(
    tournament: &mut Tournament,
    new: Vec<InsertParticipant>,
) -> Result<(), TournamentError> {
    let mut participants = tournament.participants.clone();
    participants.extend(new.into_iter().map(Participant::from_insert));
    replace_roster(tournament, participants)
}

/// Remove one participant and regenerate the bracket. Fails if fewer than 2 would remain.
pub fn remove_participant(
    tournament: &mut Tournament,
    participant_id: ParticipantId,
) -> Result<(), TournamentError> {
    if tournament.participant(participant_id).is_none() {
        return Err(TournamentError::ParticipantNotFound(participant_id));
    }
    let participants: Vec<Participant> = tournament
        .participants
        .iter()
        .filter(|p| p.id != participant_id)
        .cloned()
        .collect();
    replace_roster(tournament, participants)
}

fn replace_roster(
    tournament: &mut Tournament,
    participants: Vec<Participant>,
) -> Result<(), TournamentError> {
    // Build first so a rejected roster leaves the tournament untouched.
    let matches = generate_bracket(&participants)?;
    tournament.participants = participants;
    tournament.matches = matches;
    tournament.touch();
    log::info!(
        "Regenerated bracket for tournament {} ({} participants)",
        tournament.id,
        tournament.participants.len()
    );
    Ok(())
}
