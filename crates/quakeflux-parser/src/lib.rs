pub mod errors;
pub mod locator;
pub mod model;
mod reader;

pub use errors::ParserError;
pub use locator::{locate_latest_extract, DEFAULT_EXTRACT_PATTERN};
pub use model::{ExtractMetadata, RawRecord, RawTable, REQUIRED_COLUMNS};
pub use reader::{parse_extract, read_extract};
