use crate::error::{MgpError, Result};
use mgptree_scanner::PersonName;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Parse a name list, one `Last, First[, Middle]` per line.
///
/// Blank lines and `#` comments are ignored. Malformed lines are skipped
/// with a warning so one bad entry does not discard the rest of the file.
pub fn parse_name_lines(content: &str) -> Vec<PersonName> {
    // Editors on Windows often prepend a byte order mark.
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .filter_map(|(index, line)| match PersonName::parse(line) {
            Ok(name) => Some(name),
            Err(e) => {
                warn!("Skipping line {}: {}", index + 1, e);
                None
            }
        })
        .collect()
}

/// Load and parse a name list from disk.
pub fn load_names_from_file(path: &Path) -> Result<Vec<PersonName>> {
    let content = fs::read_to_string(path).map_err(|source| MgpError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let names = parse_name_lines(&content);
    if names.is_empty() {
        return Err(MgpError::NoNames(path.to_path_buf()));
    }

    Ok(names)
}
