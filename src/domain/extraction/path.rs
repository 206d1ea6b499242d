//! Candidate paths into a loosely-shaped JSON response.
//!
//! A path is a list of steps applied from the root of the response. Each step
//! either looks up a key in an object or indexes into an array. Traversal fails
//! closed: a step applied to the wrong shape yields `None` instead of an error.
//!
//! Paths have a compact textual notation used in configuration:
//!
//! ```text
//! outputs[0].outputs.message.text
//! ```
//!
//! The root itself is written as `$`.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Notation for the path with no steps.
pub const ROOT_NOTATION: &str = "$";

/// A single field-access step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Look up a key in a mapping.
    Key(String),
    /// Index into an ordered sequence by position.
    Index(usize),
}

impl PathStep {
    /// Applies this step to `value`.
    ///
    /// Returns `None` when the value is not the expected container, the key is
    /// missing, or the index is out of range.
    pub fn apply<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        match (self, value) {
            (PathStep::Key(key), Value::Object(map)) => map.get(key),
            (PathStep::Index(index), Value::Array(items)) => items.get(*index),
            _ => None,
        }
    }
}

/// An ordered sequence of steps describing one guess at where the answer lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CandidatePath {
    steps: Vec<PathStep>,
}

impl CandidatePath {
    /// Creates a path from explicit steps.
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    /// Starts an empty path (resolves to the root itself).
    pub fn root() -> Self {
        Self::default()
    }

    /// Appends a key lookup step.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.steps.push(PathStep::Key(key.into()));
        self
    }

    /// Appends an index step.
    pub fn index(mut self, index: usize) -> Self {
        self.steps.push(PathStep::Index(index));
        self
    }

    /// Returns the steps of this path.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Walks `root` along this path.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.steps
            .iter()
            .try_fold(root, |current, step| step.apply(current))
    }

    /// Walks `root` along this path and accepts only a non-blank string.
    ///
    /// The returned slice has surrounding whitespace trimmed.
    pub fn resolve_text<'a>(&self, root: &'a Value) -> Option<&'a str> {
        let text = self.resolve(root)?.as_str()?.trim();
        (!text.is_empty()).then_some(text)
    }
}

impl fmt::Display for CandidatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str(ROOT_NOTATION);
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathStep::Key(key) => write!(f, ".{}", key)?,
                PathStep::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Errors produced while parsing path notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    #[error("candidate path is empty")]
    Empty,

    #[error("empty segment {segment} in '{notation}'")]
    EmptySegment { notation: String, segment: usize },

    #[error("unterminated index in segment {segment} of '{notation}'")]
    UnterminatedIndex { notation: String, segment: usize },

    #[error("invalid index '{index}' in '{notation}'")]
    InvalidIndex { notation: String, index: String },

    #[error("unexpected characters after index in segment {segment} of '{notation}'")]
    TrailingCharacters { notation: String, segment: usize },
}

impl FromStr for CandidatePath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let notation = s.trim();
        if notation.is_empty() {
            return Err(PathParseError::Empty);
        }
        if notation == ROOT_NOTATION {
            return Ok(Self::root());
        }

        let mut steps = Vec::new();
        for (segment, text) in notation.split('.').enumerate() {
            parse_segment(notation, segment, text, &mut steps)?;
        }

        Ok(Self { steps })
    }
}

/// Parses `key[0][1]`, `key` or `[0]` into steps.
fn parse_segment(
    notation: &str,
    segment: usize,
    text: &str,
    steps: &mut Vec<PathStep>,
) -> Result<(), PathParseError> {
    let (key, mut rest) = match text.find('[') {
        Some(open) => text.split_at(open),
        None => (text, ""),
    };

    if key.contains(']') {
        return Err(PathParseError::TrailingCharacters {
            notation: notation.to_string(),
            segment,
        });
    }

    if !key.is_empty() {
        steps.push(PathStep::Key(key.to_string()));
    } else if rest.is_empty() {
        return Err(PathParseError::EmptySegment {
            notation: notation.to_string(),
            segment,
        });
    }

    while !rest.is_empty() {
        let body = rest
            .strip_prefix('[')
            .ok_or_else(|| PathParseError::TrailingCharacters {
                notation: notation.to_string(),
                segment,
            })?;
        let close = body
            .find(']')
            .ok_or_else(|| PathParseError::UnterminatedIndex {
                notation: notation.to_string(),
                segment,
            })?;

        let digits = &body[..close];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PathParseError::InvalidIndex {
                notation: notation.to_string(),
                index: digits.to_string(),
            });
        }
        let index = digits
            .parse::<usize>()
            .map_err(|_| PathParseError::InvalidIndex {
                notation: notation.to_string(),
                index: digits.to_string(),
            })?;

        steps.push(PathStep::Index(index));
        rest = &body[close + 1..];
    }

    Ok(())
}
