//! User input acquisition.
//!
//! Text reaches the service either typed into a text box or as an uploaded
//! text file. Both are normalized into an [`AnalysisInput`]: trimmed and
//! guaranteed non-blank.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Maximum accepted upload size (1 MiB).
pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// File extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "md", "csv"];

/// Errors that can occur while accepting user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please upload a file or enter some text")]
    Empty,

    #[error("Unsupported file type '{extension}', expected one of: txt, md, csv")]
    UnsupportedFileType { extension: String },

    #[error("Uploaded file is not valid UTF-8 text")]
    InvalidEncoding,

    #[error("Uploaded file is too large: {actual} bytes exceeds maximum of {max} bytes")]
    TooLarge { max: usize, actual: usize },
}

/// Where the input text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputSource {
    /// Typed into the text box.
    Text,
    /// Read from an uploaded file.
    Upload { file_name: String },
}

/// Validated, trimmed, non-blank input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    text: String,
    source: InputSource,
}

impl AnalysisInput {
    /// Accepts typed text.
    pub fn from_text(text: &str) -> Result<Self, InputError> {
        Ok(Self {
            text: non_blank(text)?,
            source: InputSource::Text,
        })
    }

    /// Accepts an uploaded file.
    ///
    /// The extension must be one of [`ALLOWED_EXTENSIONS`] and the content
    /// must be UTF-8 no larger than [`MAX_UPLOAD_BYTES`].
    pub fn from_upload(file_name: &str, bytes: &[u8]) -> Result<Self, InputError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(InputError::UnsupportedFileType { extension });
        }

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(InputError::TooLarge {
                max: MAX_UPLOAD_BYTES,
                actual: bytes.len(),
            });
        }

        let contents = std::str::from_utf8(bytes).map_err(|_| InputError::InvalidEncoding)?;

        Ok(Self {
            text: non_blank(contents)?,
            source: InputSource::Upload {
                file_name: file_name.to_string(),
            },
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &InputSource {
        &self.source
    }

    pub fn into_parts(self) -> (String, InputSource) {
        (self.text, self.source)
    }
}

fn non_blank(text: &str) -> Result<String, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(trimmed.to_string())
}
