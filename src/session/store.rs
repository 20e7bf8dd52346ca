use crate::session::{StoredSession, SCHEMA_VERSION};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";

fn session_path(dir: &Path) -> PathBuf {
    dir.join(SESSION_FILE)
}

fn read_session_file(path: &Path) -> Result<StoredSession, String> {
    let data = fs::read(path).map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let session: StoredSession = serde_json::from_slice(&data)
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))?;

    if session.schema_version != SCHEMA_VERSION {
        return Err(format!(
            "unknown schema_version in {}: {}",
            path.display(),
            session.schema_version
        ));
    }
    if session.refresh_token.trim().is_empty() {
        return Err(format!("empty refresh token in {}", path.display()));
    }
    Ok(session)
}

pub fn save(dir: &Path, session: &StoredSession) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let final_path = session_path(dir);
    let tmp_path = dir.join(format!("{SESSION_FILE}.tmp"));
    let bytes = serde_json::to_vec_pretty(session)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;

    fs::write(&tmp_path, bytes)?;
    match fs::rename(&tmp_path, &final_path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if final_path.exists() {
                fs::remove_file(&final_path)?;
                fs::rename(&tmp_path, &final_path)?;
                Ok(())
            } else {
                Err(rename_err)
            }
        }
    }
}

/// Returns the stored session, or a warning when a file exists but is unusable.
pub fn load(dir: &Path) -> (Option<StoredSession>, Option<String>) {
    let path = session_path(dir);
    if !path.exists() {
        return (None, None);
    }

    match read_session_file(&path) {
        Ok(session) => (Some(session), None),
        Err(err) => (None, Some(err)),
    }
}

pub fn clear(dir: &Path) -> io::Result<()> {
    match fs::remove_file(session_path(dir)) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}
