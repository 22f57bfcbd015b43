//! Canonical in-memory configuration and its staged-edit boundary.
//!
//! This is the memory boundary for `schedconf-store`:
//! - hold the committed configuration (read-only to the outside)
//! - hand out staged copies; validate them before they replace the
//!   committed state
//! - save through write-validate-swap and re-read what was persisted

use crate::error::StoreError;
use crate::model::Configuration;
use crate::persist::{PersistError, load_config, save_config};
use crate::validate::validate;
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// Committed in-memory configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    committed: Configuration,
}

/// Result of a save followed by a reload.
#[derive(Debug)]
pub struct SaveOutcome {
    /// Whether the in-memory state now mirrors the file.
    pub reloaded: bool,
    /// Why the reload failed, when it did. The previous state was kept.
    pub reload_error: Option<PersistError>,
}

impl ConfigStore {
    /// Wrap a configuration without validating it.
    ///
    /// Useful for repairing malformed input: the first staged edit must
    /// still pass validation before it commits.
    pub fn new(config: Configuration) -> Self {
        Self { committed: config }
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::new(load_config(path)?))
    }

    /// Read-only view of the committed state.
    pub fn config(&self) -> &Configuration {
        &self.committed
    }

    pub fn into_config(self) -> Configuration {
        self.committed
    }

    /// Start a staged edit over a deep copy of the committed state.
    pub fn begin(&mut self) -> StagedEdit<'_> {
        let working = self.committed.clone();
        StagedEdit {
            store: self,
            working,
        }
    }

    /// Apply `edit` to a staged copy and commit it if both the edit and the
    /// validation oracle accept.
    pub fn edit<T, F>(&mut self, edit: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Configuration) -> Result<T, StoreError>,
    {
        let mut staged = self.begin();
        let value = edit(&mut staged)?;
        staged.commit()?;
        Ok(value)
    }

    /// Persist the committed state, then re-read it from disk.
    ///
    /// A failed save leaves both file and memory untouched. A failed reload
    /// is reported in the outcome and keeps the previous in-memory state.
    pub fn save_and_reload(&mut self, path: impl AsRef<Path>) -> Result<SaveOutcome, StoreError> {
        let path = path.as_ref();
        save_config(&self.committed, path)?;
        Ok(self.reload(path))
    }

    /// Replace the in-memory state with what `path` holds.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> SaveOutcome {
        let path = path.as_ref();
        match load_config(path) {
            Ok(config) => {
                self.committed = config;
                tracing::info!(path = %path.display(), "reloaded configuration");
                SaveOutcome {
                    reloaded: true,
                    reload_error: None,
                }
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "reload failed; keeping previous in-memory configuration"
                );
                SaveOutcome {
                    reloaded: false,
                    reload_error: Some(err),
                }
            }
        }
    }

    /// Full mutation pipeline: staged edit, validation, save, reload.
    ///
    /// If the save fails after the in-memory commit, the in-memory state is
    /// rolled back so neither memory nor disk shows a partial application.
    pub fn apply<T, F>(
        &mut self,
        path: impl AsRef<Path>,
        edit: F,
    ) -> Result<(T, SaveOutcome), StoreError>
    where
        F: FnOnce(&mut Configuration) -> Result<T, StoreError>,
    {
        let snapshot = self.committed.clone();
        let value = self.edit(edit)?;
        match self.save_and_reload(path) {
            Ok(outcome) => Ok((value, outcome)),
            Err(err) => {
                self.committed = snapshot;
                Err(err)
            }
        }
    }
}

/// A working copy of the configuration.
///
/// Dropping it without `commit` discards every edit.
#[derive(Debug)]
pub struct StagedEdit<'a> {
    store: &'a mut ConfigStore,
    working: Configuration,
}

impl StagedEdit<'_> {
    /// Validate the working copy and make it the committed state.
    pub fn commit(self) -> Result<(), StoreError> {
        let StagedEdit { store, working } = self;
        if let Err(err) = validate(&working) {
            tracing::debug!(error = %err, "staged edit rejected; discarding");
            return Err(err.into());
        }
        store.committed = working;
        Ok(())
    }
}

impl Deref for StagedEdit<'_> {
    type Target = Configuration;

    fn deref(&self) -> &Self::Target {
        &self.working
    }
}

impl DerefMut for StagedEdit<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.working
    }
}
