//! Tolerant answer extraction from upstream responses.

use serde::Serialize;
use serde_json::Value;

use super::render::{first_non_blank_line, render_text};
use super::table::CandidateTable;

/// Which route produced an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    /// A candidate path matched. `index` is its position in the table.
    Path { index: usize, path: String },
    /// No path matched; the answer is the first non-blank line of the
    /// rendered response.
    TextualFallback,
}

/// Outcome of one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// A non-empty, trimmed answer.
    Answer { text: String, source: Source },
    /// Nothing usable was found.
    NotFound,
}

impl ExtractionResult {
    /// Returns the answer text, if any.
    pub fn answer(&self) -> Option<&str> {
        match self {
            ExtractionResult::Answer { text, .. } => Some(text),
            ExtractionResult::NotFound => None,
        }
    }

    /// Returns the route that produced the answer, if any.
    pub fn source(&self) -> Option<&Source> {
        match self {
            ExtractionResult::Answer { source, .. } => Some(source),
            ExtractionResult::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ExtractionResult::Answer { .. })
    }
}

/// Recovers a display string from a JSON value of unknown shape.
///
/// Stateless and pure: the same table and input always give the same result,
/// and no input can make it fail.
#[derive(Debug, Clone)]
pub struct ResponseExtractor {
    table: CandidateTable,
    textual_fallback: bool,
}

impl ResponseExtractor {
    /// Creates an extractor over `table` with textual fallback enabled.
    pub fn new(table: CandidateTable) -> Self {
        Self {
            table,
            textual_fallback: true,
        }
    }

    /// Enables or disables the textual fallback.
    pub fn with_textual_fallback(mut self, enabled: bool) -> Self {
        self.textual_fallback = enabled;
        self
    }

    pub fn table(&self) -> &CandidateTable {
        &self.table
    }

    pub fn textual_fallback(&self) -> bool {
        self.textual_fallback
    }

    /// Extracts an answer from `value`.
    ///
    /// Paths are tried in table order and the first one that resolves to a
    /// non-blank string wins. When none does, the textual fallback (if
    /// enabled) takes the first non-blank line of the rendered value.
    pub fn extract(&self, value: &Value) -> ExtractionResult {
        for (index, path) in self.table.iter().enumerate() {
            if let Some(text) = path.resolve_text(value) {
                return ExtractionResult::Answer {
                    text: text.to_string(),
                    source: Source::Path {
                        index,
                        path: path.to_string(),
                    },
                };
            }
        }

        if self.textual_fallback {
            let rendered = render_text(value);
            if let Some(line) = first_non_blank_line(&rendered) {
                return ExtractionResult::Answer {
                    text: line.to_string(),
                    source: Source::TextualFallback,
                };
            }
        }

        ExtractionResult::NotFound
    }
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::new(CandidateTable::default())
    }
}
