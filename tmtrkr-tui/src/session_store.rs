use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

use crate::config::root_path;

/// A logged-in user and the bearer token the API issued for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub token: String,
}

fn secure_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}

pub fn session_path() -> Result<PathBuf> {
    Ok(root_path()?.join("session"))
}

pub fn load_session() -> Result<Option<Session>> {
    load_session_from(&session_path()?)
}

pub fn save_session(session: &Session) -> Result<()> {
    save_session_to(&session_path()?, session)
}

pub fn clear_session() -> Result<()> {
    clear_session_at(&session_path()?)
}

fn load_session_from(path: &Path) -> Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path).context("Failed to read session file")?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let session: Session = toml::from_str(&raw).context("Failed to parse session file")?;
    if session.token.is_empty() {
        return Ok(None);
    }
    Ok(Some(session))
}

fn save_session_to(path: &Path, session: &Session) -> Result<()> {
    let raw = toml::to_string(session).context("Failed to serialize session")?;
    secure_write(path, &raw)
}

fn clear_session_at(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            name: "alice".to_string(),
            token: "abc.def".to_string(),
        }
    }

    #[test]
    fn saved_session_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tmtrkr-tui").join("session");
        save_session_to(&path, &session()).unwrap();
        assert_eq!(load_session_from(&path).unwrap(), Some(session()));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        save_session_to(&path, &session()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn missing_or_blank_session_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        assert_eq!(load_session_from(&path).unwrap(), None);
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(load_session_from(&path).unwrap(), None);
    }

    #[test]
    fn clearing_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        save_session_to(&path, &session()).unwrap();
        clear_session_at(&path).unwrap();
        assert!(!path.exists());
        clear_session_at(&path).unwrap();
    }
}
