use chrono::{DateTime, Utc};
use popcorn_api::MovieDetail;
use serde::{Deserialize, Serialize};

/// A rated title in the user's watched list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedEntry {
    #[serde(flatten)]
    pub movie: MovieDetail,
    pub user_rating: u8,
    #[serde(default = "Utc::now")]
    pub watched_at: DateTime<Utc>,
}

impl WatchedEntry {
    pub fn new(movie: MovieDetail, user_rating: u8) -> Self {
        Self {
            movie,
            user_rating,
            watched_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.movie.id
    }
}

/// Ordered watched list, oldest first. Holds at most one entry per id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<WatchedEntry>", into = "Vec<WatchedEntry>")]
pub struct WatchedList {
    entries: Vec<WatchedEntry>,
}

/// Aggregates shown above the watched list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f32,
    pub avg_user_rating: f32,
    pub avg_runtime: f32,
}

impl WatchedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchedEntry> {
        self.entries.iter()
    }

    /// Most recently added first.
    pub fn newest_first(&self) -> impl Iterator<Item = &WatchedEntry> {
        self.entries.iter().rev()
    }

    pub fn get(&self, id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn rating_for(&self, id: &str) -> Option<u8> {
        self.get(id).map(|e| e.user_rating)
    }

    /// Insert `entry`, replacing any entry with the same id. The entry
    /// moves to the end (newest) either way.
    pub fn upsert(&mut self, entry: WatchedEntry) {
        self.entries.retain(|e| e.id() != entry.id());
        self.entries.push(entry);
    }

    /// Remove the entry for `id`. Returns whether one was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != id);
        self.entries.len() != before
    }

    /// Copy of this list with `entry` upserted.
    pub fn with_entry(&self, entry: WatchedEntry) -> Self {
        let mut next = self.clone();
        next.upsert(entry);
        next
    }

    /// Copy of this list without `id`.
    pub fn without(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.remove(id);
        next
    }

    pub fn summary(&self) -> WatchedSummary {
        let count = self.entries.len();
        if count == 0 {
            return WatchedSummary::default();
        }
        let n = count as f32;
        let sum = |f: fn(&WatchedEntry) -> f32| self.entries.iter().map(f).sum::<f32>() / n;
        WatchedSummary {
            count,
            avg_imdb_rating: sum(|e| e.movie.imdb_rating),
            avg_user_rating: sum(|e| f32::from(e.user_rating)),
            avg_runtime: sum(|e| e.movie.runtime_minutes as f32),
        }
    }
}

impl From<Vec<WatchedEntry>> for WatchedList {
    /// Older stores may hold duplicate ids; the last one wins.
    fn from(entries: Vec<WatchedEntry>) -> Self {
        let mut list = Self::new();
        for entry in entries {
            list.upsert(entry);
        }
        list
    }
}

impl From<WatchedList> for Vec<WatchedEntry> {
    fn from(list: WatchedList) -> Self {
        list.entries
    }
}
