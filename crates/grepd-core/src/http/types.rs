//! Wire types for the JSON search API.
//!
//! These are the only types that cross the HTTP boundary. The request
//! shape follows the historic API: an `action` discriminator with the
//! search parameters inline.

use serde::{Deserialize, Serialize};

/// A request to `POST /api/v1/json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ApiRequest {
    /// Return every line of the default source.
    All,
    /// Search for a term with optional context and truncation.
    Search(SearchParams),
}

/// Parameters of a `"search"` action.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// The pattern to search for. Required and non-empty.
    pub term: String,

    /// Source file within the library; defaults to the configured source.
    #[serde(default)]
    pub dictionary: Option<String>,

    /// Maximum number of result groups; absent returns all.
    #[serde(default)]
    pub nresults: Option<i64>,

    /// Context lines before each match.
    #[serde(default)]
    pub n_before: usize,

    /// Context lines after each match.
    #[serde(default)]
    pub n_after: usize,

    /// Treat `term` as a regex instead of a literal substring.
    #[serde(default)]
    pub regex: bool,

    /// Return all groups as one string joined by the legacy `___` marker
    /// instead of a list of per-group strings.
    #[serde(default)]
    pub flat: bool,
}

/// Successful search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Number of entries in `results`.
    pub count: usize,
    /// One flattened context window per match, in file order.
    pub results: Vec<String>,
}

/// Generic error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}
