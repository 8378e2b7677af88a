//! Import participants (CSV, JSON, plain text) and export tournaments (JSON, CSV, print layout).

use crate::models::{GameMatch, InsertParticipant, MatchId, ParticipantId, ResultType, Tournament};
use serde::{Deserialize, Serialize};

/// Errors while reading a participant list.
#[derive(Debug)]
pub enum ImportError {
    Csv(csv::Error),
    Json(serde_json::Error),
    /// Entry at this index (0-based) has a blank name.
    EmptyName(usize),
    /// Input parsed but contained nobody.
    NoParticipants,
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Csv(e) => write!(f, "CSV parsing error: {}", e),
            ImportError::Json(e) => write!(f, "Invalid JSON format: {}", e),
            ImportError::EmptyName(i) => write!(f, "Participant {} has no name", i + 1),
            ImportError::NoParticipants => write!(f, "No valid participants found"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Csv(e) => Some(e),
            ImportError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        ImportError::Csv(e)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(e: serde_json::Error) -> Self {
        ImportError::Json(e)
    }
}

/// One CSV row. Header names are matched case-insensitively.
#[derive(Deserialize)]
struct CsvParticipantRow {
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    seed: Option<u32>,
    #[serde(default)]
    category: Option<String>,
}

/// Parse a CSV with a header row (`name` required; `country`, `seed`, `category` optional).
/// Rows that do not parse or have a blank name are skipped with a warning.
pub fn import_csv(text: &str) -> Result<Vec<InsertParticipant>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = csv::StringRecord::from(
        reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect::<Vec<_>>(),
    );
    reader.set_headers(headers.clone());

    let mut participants = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Line numbers as a spreadsheet shows them: header is line 1.
        let line = i + 2;
        match record.deserialize::<CsvParticipantRow>(Some(&headers)) {
            Ok(row) if !row.name.is_empty() => participants.push(InsertParticipant {
                name: row.name,
                country: row.country,
                seed: row.seed,
                category: row.category,
                metadata: None,
            }),
            Ok(_) => log::warn!("Skipping CSV line {}: empty name", line),
            Err(e) => log::warn!("Skipping CSV line {}: {}", line, e),
        }
    }

    if participants.is_empty() {
        return Err(ImportError::NoParticipants);
    }
    Ok(participants)
}

/// Parse a JSON array of participants.
pub fn import_json(text: &str) -> Result<Vec<InsertParticipant>, ImportError> {
    let participants: Vec<InsertParticipant> = serde_json::from_str(text)?;
    if let Some(i) = participants.iter().position(|p| p.name.trim().is_empty()) {
        return Err(ImportError::EmptyName(i));
    }
    if participants.is_empty() {
        return Err(ImportError::NoParticipants);
    }
    Ok(participants)
}

/// One name per line; blank lines ignored. Seeds follow line order, starting at 1.
pub fn import_text(text: &str) -> Result<Vec<InsertParticipant>, ImportError> {
    let participants: Vec<InsertParticipant> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .zip(1u32..)
        .map(|(name, seed)| InsertParticipant::new(name).with_seed(seed))
        .collect();
    if participants.is_empty() {
        return Err(ImportError::NoParticipants);
    }
    Ok(participants)
}

/// Whole tournament record as pretty JSON.
pub fn export_json(tournament: &Tournament) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tournament)
}

#[derive(Serialize)]
struct ParticipantRow<'a> {
    seed: u32,
    name: &'a str,
    country: &'a str,
    category: &'a str,
    matches: usize,
    wins: usize,
    losses: usize,
}

/// Roster with per-participant match stats as CSV.
/// Participants without a seed get their roster position (1-based).
pub fn export_csv(tournament: &Tournament) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (index, p) in tournament.participants.iter().enumerate() {
        let played: Vec<&GameMatch> = tournament
            .matches
            .iter()
            .filter(|m| m.has_competitor(p.id))
            .collect();
        let wins = played.iter().filter(|m| m.winner_id == Some(p.id)).count();
        let losses = played
            .iter()
            .filter(|m| m.winner_id.is_some_and(|w| w != p.id))
            .count();
        writer.serialize(ParticipantRow {
            seed: p.seed.unwrap_or(index as u32 + 1),
            name: &p.name,
            country: p.country.as_deref().unwrap_or(""),
            category: p.category.as_deref().unwrap_or(""),
            matches: played.len(),
            wins,
            losses,
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Label shown above a round: "Final", "Semifinals", "Quarterfinals", else "Round N"
/// counted from the first round.
pub fn round_label(round: u32, first_round: u32) -> String {
    match round {
        0 => "Final".to_string(),
        1 => "Semifinals".to_string(),
        2 => "Quarterfinals".to_string(),
        _ => format!("Round {}", first_round - round + 1),
    }
}

/// One side of a match as printed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SlotLayout {
    pub participant_id: Option<ParticipantId>,
    /// Participant name, or "BYE" for an empty slot.
    pub name: String,
    pub score: Option<String>,
    pub winner: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchLayout {
    pub match_id: MatchId,
    pub position: u32,
    pub red: SlotLayout,
    pub blue: SlotLayout,
    pub result_type: ResultType,
    pub next_match_id: Option<MatchId>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundLayout {
    pub round: u32,
    pub label: String,
    pub matches: Vec<MatchLayout>,
}

/// Print-ready bracket: rounds from the first round to the final, matches by position.
pub fn bracket_layout(tournament: &Tournament) -> Vec<RoundLayout> {
    let Some(first_round) = tournament.first_round() else {
        return Vec::new();
    };
    let slot = |m: &GameMatch, id: Option<ParticipantId>, score: &Option<String>| SlotLayout {
        participant_id: id,
        name: id
            .and_then(|id| tournament.participant(id))
            .map_or_else(|| "BYE".to_string(), |p| p.name.clone()),
        score: score.clone(),
        winner: id.is_some() && m.winner_id == id,
    };

    (0..=first_round)
        .rev()
        .map(|round| {
            let mut matches: Vec<&GameMatch> =
                tournament.matches.iter().filter(|m| m.round == round).collect();
            matches.sort_by_key(|m| m.position);
            RoundLayout {
                round,
                label: round_label(round, first_round),
                matches: matches
                    .into_iter()
                    .map(|m| MatchLayout {
                        match_id: m.id,
                        position: m.position,
                        red: slot(m, m.red_competitor_id, &m.red_score),
                        blue: slot(m, m.blue_competitor_id, &m.blue_score),
                        result_type: m.result_type,
                        next_match_id: m.next_match_id,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Plain-text rendering of [`bracket_layout`] for printing. Winners are marked with `*`.
pub fn render_layout_text(tournament: &Tournament) -> String {
    let side = |s: &SlotLayout| {
        let mark = if s.winner { "*" } else { "" };
        match &s.score {
            Some(score) => format!("{}{} ({})", mark, s.name, score),
            None => format!("{}{}", mark, s.name),
        }
    };
    let mut out = format!("{}\n{} participants\n", tournament.name, tournament.participants.len());
    for round in bracket_layout(tournament) {
        out.push_str(&format!("\n{}\n", round.label));
        for m in &round.matches {
            out.push_str(&format!("  {} vs {}\n", side(&m.red), side(&m.blue)));
        }
    }
    out
}
