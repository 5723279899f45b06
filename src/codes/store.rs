//! Line-delimited code files

use std::path::Path;

use crate::error::{InviteForgeError, Result};

/// Write one code per line, creating or truncating the file
pub fn write_codes_to_file<S: AsRef<str>>(path: &Path, codes: &[S]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            InviteForgeError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
        })?;
    }

    let content: String = codes
        .iter()
        .map(|code| format!("{}\n", code.as_ref()))
        .collect();

    std::fs::write(path, content).map_err(|e| {
        InviteForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })
}

/// Read the non-empty lines of a code file, in file order
pub fn read_codes_from_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        InviteForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })?;

    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
