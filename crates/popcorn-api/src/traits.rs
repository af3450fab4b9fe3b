//! Trait definitions for movie database services.
//!
//! The fetchers in `popcorn-core` are generic over [`MovieService`], so the
//! OMDb client and test doubles are interchangeable.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// A remote movie database that supports title search and detail lookup.
pub trait MovieService: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Search titles. `page` is 1-based; each page holds at most
    /// [`PAGE_SIZE`] results.
    fn search(
        &self,
        query: &str,
        page: u32,
    ) -> impl Future<Output = Result<SearchPage, Self::Error>> + Send;

    /// Fetch the full metadata for a single title.
    fn movie_detail(&self, id: &str)
        -> impl Future<Output = Result<MovieDetail, Self::Error>> + Send;
}

/// Number of results the remote endpoint returns per page.
pub const PAGE_SIZE: u32 = 10;

/// What kind of title a search hit refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Movie,
    Series,
    Game,
}

impl MediaKind {
    /// Parse the remote `Type` field. Unknown kinds fall back to `Movie`.
    pub fn from_remote(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Self::Movie,
            "series" => Self::Series,
            "game" => Self::Game,
            other => {
                tracing::debug!(kind = other, "unknown media kind, treating as movie");
                Self::Movie
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Game => "game",
        }
    }

    /// Single-glyph marker shown next to list rows.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Movie => "🎬",
            Self::Series => "📺",
            Self::Game => "🎮",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One hit from a title search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: Option<String>,
    pub kind: MediaKind,
}

/// One page of search hits plus the total hit count the service reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub total_results: u32,
}

/// Full metadata for a single title.
///
/// `rating_revisions` counts how often the user changed their rating while
/// the detail panel was open. It is not part of the remote payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub kind: MediaKind,
    pub release_date: String,
    pub genre: String,
    pub poster_url: Option<String>,
    pub imdb_rating: f32,
    pub runtime_minutes: u32,
    pub plot: String,
    pub actors: String,
    pub director: String,
    pub writer: String,
    #[serde(default)]
    pub rating_revisions: u32,
}
