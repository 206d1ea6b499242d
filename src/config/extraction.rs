//! Answer extraction configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::extraction::{CandidateTable, ResponseExtractor};

/// Answer extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Comma-separated candidate paths, most specific first.
    /// The built-in table is used when unset.
    pub candidate_paths: Option<String>,

    /// Fall back to the first non-blank line of the rendered response
    #[serde(default = "default_textual_fallback")]
    pub textual_fallback: bool,
}

impl ExtractionConfig {
    /// Builds the candidate table.
    pub fn candidate_table(&self) -> Result<CandidateTable, ValidationError> {
        match self.candidate_paths.as_deref() {
            None => Ok(CandidateTable::default()),
            Some(list) => CandidateTable::from_list(list)
                .map_err(|e| ValidationError::InvalidCandidatePaths(e.to_string())),
        }
    }

    /// Builds the extractor described by this configuration.
    pub fn extractor(&self) -> Result<ResponseExtractor, ValidationError> {
        Ok(ResponseExtractor::new(self.candidate_table()?)
            .with_textual_fallback(self.textual_fallback))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.candidate_table().map(|_| ())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            candidate_paths: None,
            textual_fallback: default_textual_fallback(),
        }
    }
}

fn default_textual_fallback() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_builtin_table_with_fallback() {
        let config = ExtractionConfig::default();
        let extractor = config.extractor().unwrap();
        assert_eq!(extractor.table().len(), CandidateTable::default().len());
        assert!(extractor.textual_fallback());
    }

    #[test]
    fn custom_paths_are_parsed_in_order() {
        let config = ExtractionConfig {
            candidate_paths: Some("data.reply, outputs[0].text".to_string()),
            textual_fallback: false,
        };
        let extractor = config.extractor().unwrap();
        let notations: Vec<String> = extractor.table().iter().map(|p| p.to_string()).collect();
        assert_eq!(notations, vec!["data.reply", "outputs[0].text"]);
        assert!(!extractor.textual_fallback());
    }

    #[test]
    fn malformed_path_is_rejected() {
        let config = ExtractionConfig {
            candidate_paths: Some("outputs[zero]".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidCandidatePaths(_))
        ));
    }

    #[test]
    fn blank_list_is_rejected() {
        let config = ExtractionConfig {
            candidate_paths: Some(" , ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
