use std::path::{Path, PathBuf};

use glob::{glob, Pattern};

use crate::errors::ParserError;

pub const DEFAULT_EXTRACT_PATTERN: &str = "usgs_*.csv";

/// Picks the most recent extract in `dir`. Extract names embed their date, so the
/// lexicographically last match wins. Only `pattern` is glob syntax; `dir` is taken
/// literally.
pub fn locate_latest_extract(dir: &Path, pattern: &str) -> Result<PathBuf, ParserError> {
    let escaped_dir = PathBuf::from(Pattern::escape(&dir.to_string_lossy()));
    let full_pattern = escaped_dir.join(pattern);
    let mut matches: Vec<PathBuf> = glob(&full_pattern.to_string_lossy())?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    matches.sort();

    matches.pop().ok_or_else(|| ParserError::NoExtractFound {
        dir: dir.to_path_buf(),
        pattern: pattern.to_string(),
    })
}
