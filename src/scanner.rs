use crate::errors::Result;
use indexmap::IndexSet;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Anything between quotes, backticks, angle brackets or whitespace that does
/// not end in the variant separator.
static CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^<>"'`\s]*[^<>"'`\s:]"#).expect("candidate pattern is valid"));

/// Extract class candidates from content, deduplicated in first-seen order
pub fn extract_candidates(content: &str) -> IndexSet<String> {
    CANDIDATE
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract class candidates from a set of files
pub fn extract_candidates_from_files<P: AsRef<Path>>(files: &[P]) -> Result<IndexSet<String>> {
    let mut candidates = IndexSet::new();

    for file in files {
        let content = fs::read_to_string(file.as_ref())?;
        let found = extract_candidates(&content);
        tracing::debug!(
            file = %file.as_ref().display(),
            candidates = found.len(),
            "scanned content file"
        );
        candidates.extend(found);
    }

    Ok(candidates)
}
