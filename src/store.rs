//! In-memory tournament store. One lock serializes edits; updates commit all-or-nothing.

use crate::models::{Tournament, TournamentError, TournamentId};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Stored tournament + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

impl TournamentEntry {
    fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            last_activity: Instant::now(),
        }
    }
}

/// Tournaments by id.
#[derive(Default)]
pub struct TournamentStore {
    entries: RwLock<HashMap<TournamentId, TournamentEntry>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a whole tournament record.
    pub fn insert(&self, tournament: Tournament) -> Result<(), TournamentError> {
        let mut g = self
            .entries
            .write()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        g.insert(tournament.id, TournamentEntry::new(tournament));
        Ok(())
    }

    /// Copy of a tournament. Reading counts as activity.
    pub fn get(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let mut g = self
            .entries
            .write()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        let entry = g
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        entry.last_activity = Instant::now();
        Ok(entry.tournament.clone())
    }

    /// All tournaments, most recently created first.
    pub fn list(&self) -> Result<Vec<Tournament>, TournamentError> {
        let g = self
            .entries
            .read()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        let mut all: Vec<Tournament> = g.values().map(|e| e.tournament.clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    pub fn delete(&self, id: TournamentId) -> Result<(), TournamentError> {
        let mut g = self
            .entries
            .write()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        g.remove(&id)
            .map(|_| ())
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Run `f` on a copy of the tournament; the copy replaces the stored record only if
    /// `f` succeeds. Returns the updated record.
    pub fn update<F>(&self, id: TournamentId, f: F) -> Result<Tournament, TournamentError>
    where
        F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
    {
        let mut g = self
            .entries
            .write()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        let entry = g
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        entry.last_activity = Instant::now();
        let mut draft = entry.tournament.clone();
        f(&mut draft)?;
        entry.tournament = draft.clone();
        Ok(draft)
    }

    /// Drop tournaments not touched for `timeout`. Returns how many were removed.
    pub fn remove_inactive(&self, timeout: Duration) -> Result<usize, TournamentError> {
        let mut g = self
            .entries
            .write()
            .map_err(|_| TournamentError::StoreUnavailable)?;
        let before = g.len();
        g.retain(|_, entry| entry.last_activity.elapsed() < timeout);
        let removed = before - g.len();
        if removed > 0 {
            log::info!("Cleaned up {} inactive tournament(s)", removed);
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
