//! Durable storage: one JSON document per configuration file.
//!
//! Saves follow write → validate → swap: the new document lands in a temp
//! file beside the target, is re-read and validated independently of the
//! in-memory copy, and only then renamed over the target.

use crate::model::Configuration;
use crate::validate::{StructuralError, validate_str};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from reading or writing configuration files.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("corrupted substrate: {0}")]
    Corrupt(String),

    #[error("{path}: {source}")]
    Rejected {
        path: String,
        source: StructuralError,
    },

    #[error("configuration already exists: {0}")]
    AlreadyExists(String),
}

impl PersistError {
    fn io(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Io(format!("{}: {err}", path.display()))
    }

    /// The oracle's verdict, when this failure came from validation.
    pub fn structural(&self) -> Option<&StructuralError> {
        match self {
            Self::Rejected { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Serialize a configuration to its canonical text form.
pub fn to_canonical_json(config: &Configuration) -> Result<String, PersistError> {
    let mut text =
        serde_json::to_string_pretty(config).map_err(|e| PersistError::Serialize(e.to_string()))?;
    text.push('\n');
    Ok(text)
}

/// Read, parse and validate a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Configuration, PersistError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| PersistError::io(path, e))?;
    let text = validate_substrate_bytes(path, &bytes)?;
    validate_str(text).map_err(|source| PersistError::Rejected {
        path: path.display().to_string(),
        source,
    })
}

/// Read and parse a configuration file without running the oracle.
///
/// For integrity reports and repair flows over files that may be malformed.
pub fn read_config_unchecked(path: impl AsRef<Path>) -> Result<Configuration, PersistError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| PersistError::io(path, e))?;
    let text = validate_substrate_bytes(path, &bytes)?;
    serde_json::from_str(text).map_err(|e| PersistError::Rejected {
        path: path.display().to_string(),
        source: StructuralError::Parse(e.to_string()),
    })
}

/// Persist a configuration with write-validate-swap.
///
/// `path` is left byte-for-byte untouched unless the final rename happens.
pub fn save_config(config: &Configuration, path: impl AsRef<Path>) -> Result<(), PersistError> {
    save_config_with(config, path.as_ref(), sync_dir)
}

/// Once the rename lands the save is durable as far as callers are
/// concerned; a failed directory sync after that point is only logged.
fn save_config_with(
    config: &Configuration,
    path: &Path,
    sync_parent: impl FnOnce(&Path) -> std::io::Result<()>,
) -> Result<(), PersistError> {
    let text = to_canonical_json(config)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
    }

    let tmp_path = tmp_write_path(path);
    let staged = (|| -> Result<(), PersistError> {
        let file = File::create(&tmp_path).map_err(|e| PersistError::io(&tmp_path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(text.as_bytes())
            .map_err(|e| PersistError::io(&tmp_path, e))?;
        writer.flush().map_err(|e| PersistError::io(&tmp_path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| PersistError::io(&tmp_path, e))?;
        file.sync_all().map_err(|e| PersistError::io(&tmp_path, e))?;

        let bytes = fs::read(&tmp_path).map_err(|e| PersistError::io(&tmp_path, e))?;
        let reread = validate_substrate_bytes(&tmp_path, &bytes)?;
        validate_str(reread).map_err(|source| PersistError::Rejected {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    })();

    if let Err(error) = staged {
        remove_quietly(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        remove_quietly(&tmp_path);
        PersistError::Io(format!(
            "{} -> {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(err) = sync_parent(parent)
    {
        tracing::warn!(
            path = %path.display(),
            dir = %parent.display(),
            error = %err,
            "configuration swapped in but directory sync failed"
        );
    }

    tracing::info!(path = %path.display(), bytes = text.len(), "saved configuration");
    Ok(())
}

/// Create a fresh, empty configuration file. Never overwrites.
///
/// The target is reserved with `create_new` first, so of two concurrent
/// initializers exactly one wins; the reservation is then swapped out for
/// the real document.
pub fn write_new_config(path: impl AsRef<Path>) -> Result<Configuration, PersistError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(PersistError::AlreadyExists(path.display().to_string()));
        }
        Err(err) => return Err(PersistError::io(path, err)),
    }

    let config = Configuration::default();
    if let Err(err) = save_config(&config, path) {
        remove_quietly(path);
        return Err(err);
    }
    Ok(config)
}

fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

fn remove_quietly(path: &Path) {
    if let Err(err) = fs::remove_file(path)
        && err.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %err, "failed to remove leftover file");
    }
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

fn validate_substrate_bytes<'a>(path: &Path, bytes: &'a [u8]) -> Result<&'a str, PersistError> {
    if bytes.contains(&0) {
        return Err(PersistError::Corrupt(format!(
            "{}: contains NUL byte(s)",
            path.display()
        )));
    }
    std::str::from_utf8(bytes).map_err(|_| {
        PersistError::Corrupt(format!(
            "{}: contains non-UTF-8 byte sequence(s)",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Course;

    fn temp_path(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "schedconf-persist-{prefix}-{}-{unique}.json",
            std::process::id()
        ))
    }

    fn sibling_temp_files(path: &Path) -> usize {
        let name = path
            .file_name()
            .expect("path has file name")
            .to_string_lossy()
            .into_owned();
        fs::read_dir(path.parent().expect("path has parent"))
            .expect("dir should list")
            .filter_map(Result::ok)
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(&format!("{name}.tmp."))
            })
            .count()
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path("round-trip");
        let mut config = Configuration::default();
        config.config.rooms.push("Roddy 136".to_string());
        config.config.courses.push(Course::new("CMSC 140", 4));
        save_config(&config, &path).expect("save should succeed");

        let loaded = load_config(&path).expect("load should succeed");
        assert_eq!(loaded, config);
        assert_eq!(sibling_temp_files(&path), 0);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejected_save_leaves_file_bytes_identical() {
        let path = temp_path("rejected");
        let config = Configuration::default();
        save_config(&config, &path).expect("initial save");
        let before = fs::read(&path).expect("file exists");

        let mut invalid = config.clone();
        let mut course = Course::new("CMSC 140", 4);
        course.room.insert("Nowhere 1");
        invalid.config.courses.push(course);

        let err = save_config(&invalid, &path).expect_err("invalid save must fail");
        assert!(err.structural().is_some());
        assert_eq!(fs::read(&path).expect("file still exists"), before);
        assert_eq!(sibling_temp_files(&path), 0);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_rejects_nul_payload() {
        let path = temp_path("nul");
        fs::write(&path, b"{\"config\":{}}\n\0garbage").expect("fixture should write");

        match load_config(&path) {
            Err(PersistError::Corrupt(message)) => assert!(message.contains("contains NUL")),
            other => panic!("expected corrupt substrate error, got {other:?}"),
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn unchecked_read_returns_rejected_document() {
        let path = temp_path("unchecked");
        fs::write(
            &path,
            r#"{"config":{"rooms":["Roddy 136","Roddy 136"]}}"#,
        )
        .expect("fixture should write");

        assert!(load_config(&path).is_err());
        let config = read_config_unchecked(&path).expect("parse only");
        assert_eq!(config.rooms().len(), 2);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn write_new_config_refuses_to_overwrite() {
        let path = temp_path("init");
        let created = write_new_config(&path).expect("first init");
        assert_eq!(load_config(&path).expect("init writes a valid file"), created);
        assert_eq!(sibling_temp_files(&path), 0);
        assert!(matches!(
            write_new_config(&path),
            Err(PersistError::AlreadyExists(_))
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn write_new_config_leaves_existing_placeholder_alone() {
        let path = temp_path("init-placeholder");
        fs::write(&path, b"").expect("placeholder should write");

        assert!(matches!(
            write_new_config(&path),
            Err(PersistError::AlreadyExists(_))
        ));
        assert!(fs::read(&path).expect("placeholder remains").is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn failed_directory_sync_after_swap_still_reports_success() {
        let path = temp_path("dir-sync");
        save_config(&Configuration::default(), &path).expect("initial save");

        let mut config = Configuration::default();
        config.config.rooms.push("Roddy 136".to_string());
        save_config_with(&config, &path, |_| {
            Err(std::io::Error::other("directory sync unavailable"))
        })
        .expect("swap already happened, so the save stands");

        assert_eq!(load_config(&path).expect("file loads"), config);
        assert_eq!(sibling_temp_files(&path), 0);

        let _ = fs::remove_file(path);
    }
}
