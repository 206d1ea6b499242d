//! Ordered table of candidate paths.

use thiserror::Error;

use super::path::{CandidatePath, PathParseError};

/// Errors that can occur while building a candidate table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("candidate table must contain at least one path")]
    Empty,

    #[error("invalid candidate path: {0}")]
    Path(#[from] PathParseError),
}

/// Candidate paths in priority order, most specific first.
///
/// The table is data: it is built from configuration or from
/// [`CandidateTable::default`], never from traversal code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTable {
    paths: Vec<CandidatePath>,
}

impl CandidateTable {
    /// Creates a table from explicit paths.
    pub fn new(paths: Vec<CandidatePath>) -> Result<Self, TableError> {
        if paths.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self { paths })
    }

    /// Parses a table from path notations, preserving order.
    pub fn parse<I, S>(notations: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = notations
            .into_iter()
            .map(|n| n.as_ref().parse::<CandidatePath>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(paths)
    }

    /// Parses a comma-separated list of notations. Blank entries are skipped.
    pub fn from_list(list: &str) -> Result<Self, TableError> {
        Self::parse(list.split(',').filter(|entry| !entry.trim().is_empty()))
    }

    /// Returns the paths in priority order.
    pub fn paths(&self) -> &[CandidatePath] {
        &self.paths
    }

    /// Iterates over the paths in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, CandidatePath> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Default for CandidateTable {
    /// Shapes observed from the Langflow run API.
    fn default() -> Self {
        let first_output = || {
            CandidatePath::root()
                .key("outputs")
                .index(0)
                .key("outputs")
        };

        Self {
            paths: vec![
                first_output().index(0).key("results").key("message").key("text"),
                first_output()
                    .index(0)
                    .key("results")
                    .key("message")
                    .key("data")
                    .key("text"),
                first_output().index(0).key("artifacts").key("message"),
                first_output().index(0).key("messages").index(0).key("message"),
                first_output().key("message").key("text"),
                first_output().key("message").key("data").key("text"),
                first_output().key("message"),
                CandidatePath::root()
                    .key("outputs")
                    .index(0)
                    .key("artifacts")
                    .key("message"),
                CandidatePath::root().key("output"),
            ],
        }
    }
}

impl<'a> IntoIterator for &'a CandidateTable {
    type Item = &'a CandidatePath;
    type IntoIter = std::slice::Iter<'a, CandidatePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_lists_known_shapes_in_order() {
        let notations: Vec<String> = CandidateTable::default()
            .iter()
            .map(|p| p.to_string())
            .collect();

        assert_eq!(
            notations,
            vec![
                "outputs[0].outputs[0].results.message.text",
                "outputs[0].outputs[0].results.message.data.text",
                "outputs[0].outputs[0].artifacts.message",
                "outputs[0].outputs[0].messages[0].message",
                "outputs[0].outputs.message.text",
                "outputs[0].outputs.message.data.text",
                "outputs[0].outputs.message",
                "outputs[0].artifacts.message",
                "output",
            ]
        );
    }

    #[test]
    fn from_list_preserves_order_and_skips_blanks() {
        let table = CandidateTable::from_list(" output , ,outputs[0].artifacts.message,").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.paths()[0].to_string(), "output");
        assert_eq!(table.paths()[1].to_string(), "outputs[0].artifacts.message");
    }

    #[test]
    fn empty_table_is_rejected() {
        assert_eq!(CandidateTable::new(vec![]), Err(TableError::Empty));
        assert_eq!(CandidateTable::from_list(" , "), Err(TableError::Empty));
    }

    #[test]
    fn invalid_notation_is_reported() {
        let err = CandidateTable::from_list("output,outputs[x]").unwrap_err();
        assert!(matches!(err, TableError::Path(PathParseError::InvalidIndex { .. })));
    }
}
