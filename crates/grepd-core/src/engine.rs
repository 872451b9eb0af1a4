//! Context-aware line search.
//!
//! The engine scans a source file line by line and, for every matching
//! line, emits a [`MatchGroup`]: the match itself plus up to `before`
//! preceding and `after` following lines, clipped at the file edges.
//! Adjacent matches produce independent windows — overlapping windows are
//! *not* merged, mirroring how `grep -A`/`-B` emits context per match.
//!
//! Results cross the engine boundary as a structured `Vec<MatchGroup>`;
//! flattening into a single separator-joined string is left to callers
//! that need the legacy wire shape.

use serde::{Deserialize, Serialize};

use crate::library::{Library, LibraryError};

/// Separator between flattened match groups.
///
/// Legacy wire marker. A source line containing this exact token would
/// corrupt a flattened result; the structured representation is unaffected.
pub const GROUP_SEPARATOR: &str = "___";

/// Errors from running a search.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error("cannot read source '{name}': {reason}")]
    Read { name: String, reason: String },

    #[error("invalid pattern: {0}")]
    Pattern(String),
}

/// What to match against each line of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Every line matches.
    MatchAll,
    /// Plain substring containment; metacharacters have no special meaning.
    Literal(String),
    /// A real regex, compiled with the regex crate.
    Regex(String),
}

/// Parameters for one search.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub pattern: Pattern,
    /// Source name within the library; `None` uses the library default.
    pub source: Option<String>,
    /// Maximum number of groups to return; `None` returns all.
    pub limit: Option<i64>,
    /// Context lines before each match.
    pub before: usize,
    /// Context lines after each match.
    pub after: usize,
}

impl SearchQuery {
    /// A query matching every line of the default source, no context, no limit.
    pub fn match_all() -> Self {
        Self {
            pattern: Pattern::MatchAll,
            source: None,
            limit: None,
            before: 0,
            after: 0,
        }
    }
}

/// One match and its surrounding context window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    /// 1-based line number of the first line in the window.
    pub start_line: usize,
    /// The window's lines, in file order.
    pub lines: Vec<String>,
}

impl MatchGroup {
    /// Number of lines in the window.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The window flattened to newline-joined text.
    pub fn as_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Flatten groups into the legacy single-string form, windows separated
/// by [`GROUP_SEPARATOR`] on its own line.
pub fn flatten(groups: &[MatchGroup]) -> String {
    groups
        .iter()
        .map(MatchGroup::as_text)
        .collect::<Vec<_>>()
        .join(&format!("\n{GROUP_SEPARATOR}\n"))
}

/// Keep at most `limit` groups, preserving encounter order.
///
/// `None` returns the sequence unchanged; a non-positive limit returns an
/// empty sequence. Never errors.
pub fn truncate(groups: Vec<MatchGroup>, limit: Option<i64>) -> Vec<MatchGroup> {
    match limit {
        None => groups,
        Some(n) if n <= 0 => Vec::new(),
        Some(n) => {
            let mut groups = groups;
            groups.truncate(n as usize);
            groups
        }
    }
}

/// Compiled form of a [`Pattern`].
enum Matcher {
    All,
    Literal(String),
    Regex(regex::Regex),
}

impl Matcher {
    fn compile(pattern: &Pattern) -> Result<Self, EngineError> {
        match pattern {
            Pattern::MatchAll => Ok(Self::All),
            Pattern::Literal(s) => Ok(Self::Literal(s.clone())),
            Pattern::Regex(s) => {
                let re = regex::Regex::new(s).map_err(sanitize_regex_error)?;
                Ok(Self::Regex(re))
            }
        }
    }

    fn is_match(&self, line: &str) -> bool {
        match self {
            Self::All => true,
            Self::Literal(s) => line.contains(s.as_str()),
            Self::Regex(re) => re.is_match(line),
        }
    }
}

/// Strip the matching engine's program-name prefix so only the useful
/// diagnostic reaches clients.
fn sanitize_regex_error(e: regex::Error) -> EngineError {
    let msg = e.to_string();
    let msg = msg
        .strip_prefix("regex parse error:")
        .unwrap_or(&msg)
        .trim()
        .to_string();
    EngineError::Pattern(msg)
}

/// Line search over a [`Library`] of text sources.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    library: Library,
}

impl SearchEngine {
    /// Create an engine over the given library.
    pub fn new(library: Library) -> Self {
        Self { library }
    }

    /// The underlying library.
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Run a search and return its match groups in file order.
    ///
    /// Zero matches is success with an empty sequence, not an error. The
    /// result limit from the query is already applied.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<MatchGroup>, EngineError> {
        let name = query
            .source
            .as_deref()
            .unwrap_or_else(|| self.library.default_source());
        let path = self.library.resolve(name)?;

        let matcher = Matcher::compile(&query.pattern)?;

        let text =
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| EngineError::Read {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
        let lines: Vec<&str> = text.lines().collect();

        let mut groups = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if matcher.is_match(line) {
                let start = i.saturating_sub(query.before);
                let end = (i + query.after + 1).min(lines.len());
                groups.push(MatchGroup {
                    start_line: start + 1,
                    lines: lines[start..end].iter().map(|s| s.to_string()).collect(),
                });
            }
        }

        Ok(truncate(groups, query.limit))
    }
}
