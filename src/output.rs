//! Persisting found invites

use std::path::Path;

use crate::error::{InviteForgeError, Result};
use crate::types::Invite;

/// Write the confirmed invites as an indented JSON array, returning how many were written
///
/// Absent slots are skipped. The file is created (with parent directories) or truncated.
pub fn save_invites(path: &Path, invites: &[Option<Invite>]) -> Result<usize> {
    let found: Vec<&Invite> = invites.iter().flatten().collect();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            InviteForgeError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
        })?;
    }

    let content = serde_json::to_string_pretty(&found).map_err(|e| {
        InviteForgeError::internal(format!("Failed to serialize invites: {}", e))
    })?;

    std::fs::write(path, content).map_err(|e| {
        InviteForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })?;

    Ok(found.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Guild;

    fn invite(code: &str) -> Invite {
        Invite {
            code: code.to_string(),
            expires_at: None,
            created_at: None,
            guild: Some(Guild {
                id: "1".to_string(),
                name: "guild".to_string(),
                nsfw: false,
            }),
            inviter: None,
        }
    }

    #[test]
    fn test_save_skips_absent_slots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("invites.json");

        let written = save_invites(&path, &[None, Some(invite("abc")), None, Some(invite("xyz"))]).unwrap();
        assert_eq!(written, 2);

        let saved: Vec<Invite> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, vec![invite("abc"), invite("xyz")]);
    }

    #[test]
    fn test_save_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invites.json");
        assert_eq!(save_invites(&path, &[None, None]).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
