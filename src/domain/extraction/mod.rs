//! Answer extraction from loosely-shaped upstream responses.
//!
//! The upstream flow nests its answer at locations that shift between
//! versions and configurations. Instead of binding to one schema, the
//! extractor walks an ordered table of candidate paths and, when all miss,
//! degrades to a textual scrape of the whole response.
//!
//! - `path` - path steps, traversal, and the `outputs[0].message` notation
//! - `table` - ordered candidate tables (default and configured)
//! - `render` - textual fallback rendering
//! - `extractor` - the extraction pass itself

mod extractor;
mod path;
mod render;
mod table;

pub use extractor::{ExtractionResult, ResponseExtractor, Source};
pub use path::{CandidatePath, PathParseError, PathStep};
pub use render::{first_non_blank_line, render_text};
pub use table::{CandidateTable, TableError};
