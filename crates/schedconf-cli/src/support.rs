use schedconf_store::{
    AtomicMutationError, Configuration, SaveOutcome, StoreError, StructuralError,
    load_config, mutate_config_file,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Which canonical name list a `room`/`lab` subcommand works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Room,
    Lab,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Lab => "lab",
        }
    }
}

pub fn load_config_or_exit(config_arg: &str) -> (Configuration, PathBuf) {
    let path = PathBuf::from(config_arg);
    let config = load_config(&path).unwrap_or_else(|e| {
        eprintln!("error: failed to load {}: {e}", path.display());
        print_rejection(e.structural());
        std::process::exit(1);
    });
    (config, path)
}

/// Run one edit against the file under its lock; exit 1 on any failure.
pub fn mutate_or_exit<T, F>(config_arg: &str, what: &str, edit: F) -> (T, Configuration, PathBuf)
where
    F: FnOnce(&mut Configuration) -> Result<T, StoreError>,
{
    let path = PathBuf::from(config_arg);
    if !path.exists() {
        eprintln!("error: configuration file not found: {}", path.display());
        std::process::exit(1);
    }

    tracing::debug!(path = %path.display(), what, "mutating configuration");
    let (value, outcome, config) = mutate_config_file(&path, edit).unwrap_or_else(|e| {
        eprintln!("error: failed to {what}: {e}");
        print_rejection(mutation_structural(&e));
        std::process::exit(1);
    });
    warn_on_stale_reload(&path, &outcome);
    (value, config, path)
}

pub fn print_json(payload: &Value) {
    let text = serde_json::to_string_pretty(payload).unwrap_or_else(|e| {
        eprintln!("error: failed to render JSON output: {e}");
        std::process::exit(1);
    });
    println!("{text}");
}

pub fn join_or_dash<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let joined = items.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

fn warn_on_stale_reload(path: &Path, outcome: &SaveOutcome) {
    if let Some(err) = &outcome.reload_error {
        eprintln!(
            "warning: saved {} but reload failed: {err}; in-memory state may be stale",
            path.display()
        );
    }
}

fn mutation_structural(err: &AtomicMutationError) -> Option<&StructuralError> {
    match err {
        AtomicMutationError::Store(StoreError::Validation(structural)) => Some(structural),
        AtomicMutationError::Store(StoreError::Persist(persist)) => persist.structural(),
        _ => None,
    }
}

fn print_rejection(structural: Option<&StructuralError>) {
    if let Some(StructuralError::Rejected(report)) = structural {
        for finding in &report.errors {
            eprintln!("  - [{}] {}: {}", finding.class, finding.entity, finding.message);
        }
    }
}
