use serde::Deserialize;
use serde_json::Value;

use crate::traits::{MediaKind, MovieDetail, SearchPage, SearchResult};

// ── Search responses ────────────────────────────────────────────

/// Raw `?s=` response. Every field is optional: the payload is validated
/// and coerced here before anything reaches the typed model.
#[derive(Debug, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Search", default)]
    pub search: Option<Vec<OmdbSearchItem>>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<Value>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
}

// ── Detail responses ────────────────────────────────────────────

/// Raw `?i=` response.
#[derive(Debug, Deserialize)]
pub struct OmdbDetailResponse {
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(rename = "Released", default)]
    pub released: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Runtime", default)]
    pub runtime: Option<String>,
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    #[serde(rename = "Actors", default)]
    pub actors: Option<String>,
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    #[serde(rename = "Writer", default)]
    pub writer: Option<String>,
}

/// `Response: "False"` marks a logical failure. A missing indicator is
/// treated as success.
fn marks_failure(response: Option<&str>) -> bool {
    response.is_some_and(|r| r.trim().eq_ignore_ascii_case("false"))
}

impl OmdbSearchResponse {
    /// The failure message, if the payload reports one.
    pub fn failure(&self) -> Option<String> {
        marks_failure(self.response.as_deref()).then(|| {
            self.error
                .clone()
                .unwrap_or_else(|| "No results found".to_string())
        })
    }

    pub fn into_page(self) -> SearchPage {
        SearchPage {
            total_results: coerce_count(self.total_results.as_ref()),
            results: self
                .search
                .unwrap_or_default()
                .into_iter()
                .map(OmdbSearchItem::into_search_result)
                .collect(),
        }
    }
}

impl OmdbSearchItem {
    pub fn into_search_result(self) -> SearchResult {
        SearchResult {
            id: self.imdb_id,
            title: self.title,
            year: self.year,
            poster_url: poster_url(self.poster),
            kind: self
                .kind
                .as_deref()
                .map(MediaKind::from_remote)
                .unwrap_or_default(),
        }
    }
}

impl OmdbDetailResponse {
    pub fn failure(&self) -> Option<String> {
        marks_failure(self.response.as_deref()).then(|| {
            self.error
                .clone()
                .unwrap_or_else(|| "No results found".to_string())
        })
    }

    /// Convert into a [`MovieDetail`]. `requested_id` is used when the
    /// payload omits `imdbID`.
    pub fn into_detail(self, requested_id: &str) -> MovieDetail {
        MovieDetail {
            id: self.imdb_id.unwrap_or_else(|| requested_id.to_string()),
            title: self.title.unwrap_or_default(),
            kind: self
                .kind
                .as_deref()
                .map(MediaKind::from_remote)
                .unwrap_or_default(),
            release_date: self.released.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            poster_url: poster_url(self.poster),
            imdb_rating: coerce_rating(self.imdb_rating.as_deref()),
            runtime_minutes: coerce_runtime(self.runtime.as_deref()),
            plot: self.plot.unwrap_or_default(),
            actors: self.actors.unwrap_or_default(),
            director: self.director.unwrap_or_default(),
            writer: self.writer.unwrap_or_default(),
            rating_revisions: 0,
        }
    }
}

// ── Coercions ───────────────────────────────────────────────────

/// `totalResults` arrives as a stringified integer. Anything missing,
/// negative or unparseable becomes 0.
pub fn coerce_count(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::String(s)) => s.trim().parse::<u32>().unwrap_or(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| v.min(u64::from(u32::MAX)) as u32)
            .unwrap_or(0),
        _ => 0,
    }
}

/// `imdbRating` such as `"8.8"`; `"N/A"` and garbage become 0.0.
pub fn coerce_rating(raw: Option<&str>) -> f32 {
    raw.and_then(|r| r.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

/// `Runtime` such as `"148 min"`; only the leading number is used.
pub fn coerce_runtime(raw: Option<&str>) -> u32 {
    raw.and_then(|r| r.split_whitespace().next())
        .and_then(|n| n.parse::<u32>().ok())
        .unwrap_or(0)
}

fn poster_url(raw: Option<String>) -> Option<String> {
    raw.filter(|p| {
        let p = p.trim();
        !p.is_empty() && !p.eq_ignore_ascii_case("N/A")
    })
}
