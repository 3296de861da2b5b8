// Credentials persisted after a successful verification so the secret can
// be looked up again without re-uploading the certificate.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::api::VerificationResult;

const FILE_NAME: &str = ".fotw_credentials.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub callsign: String,
    pub secret: String,
    pub verified_at: DateTime<Utc>,
}

impl Credentials {
    pub fn from_result(result: &VerificationResult, verified_at: DateTime<Utc>) -> Self {
        Credentials {
            callsign: result.callsign.clone(),
            secret: result.secret.clone(),
            verified_at,
        }
    }
}

/// `~/.fotw_credentials.json`, or the current directory when there is no
/// home directory.
pub fn default_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(FILE_NAME)
}

/// Write credentials, readable by the owner only on Unix.
pub fn save(path: &Path, creds: &Credentials) -> Result<()> {
    let data = serde_json::to_string_pretty(creds).context("Serializing credentials")?;
    let mut file = open_private(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(data.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), callsign = %creds.callsign, "credentials saved");
    Ok(())
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten a file left by an older run.
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create(true).truncate(true).open(path)
}

/// Load saved credentials. A missing file is not an error.
pub fn load(path: &Path) -> Result<Option<Credentials>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let creds = serde_json::from_str(&data)
        .with_context(|| format!("Parsing credentials in {}", path.display()))?;
    Ok(Some(creds))
}

/// Remove saved credentials; returns whether a file was removed.
pub fn clear(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)
        .with_context(|| format!("Failed to remove {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn sample() -> Credentials {
        Credentials::from_result(
            &VerificationResult {
                callsign: "VK3FUR".into(),
                secret: "JBSWY3DPEHPK3PXP".into(),
            },
            Utc.with_ymd_and_hms(2024, 10, 25, 12, 34, 0).unwrap(),
        )
    }

    #[test]
    fn test_save_load_clear() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(FILE_NAME);
        let creds = sample();
        save(&path, &creds).unwrap();
        assert_eq!(load(&path).unwrap(), Some(creds));
        assert!(clear(&path).unwrap());
        assert_eq!(load(&path).unwrap(), None);
        assert!(!clear(&path).unwrap());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(FILE_NAME);
        std::fs::write(&path, "not json").unwrap();
        assert!(load(&path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(FILE_NAME);
        save(&path, &sample()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // An existing world-readable file is tightened on overwrite.
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        save(&path, &sample()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
        assert_eq!(load(&path).unwrap(), Some(sample()));
    }

    #[test]
    fn test_default_path_file_name() {
        assert!(default_path().ends_with(FILE_NAME));
    }
}
