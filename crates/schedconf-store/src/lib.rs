//! # schedconf-store
//!
//! Configuration store for course scheduling: courses, faculty, rooms, labs
//! and the conflict relation between courses.
//!
//! This crate provides:
//! - `Course`, `Faculty` and `Configuration` records (the entity graph)
//! - a referential-integrity engine whose add/rename/delete operations
//!   carry their own cascades
//! - conflict-edge add/remove/re-target across course sections
//! - `ConfigStore`: committed in-memory state behind a staged-edit boundary
//! - write-validate-swap persistence and a reload cycle
//!
//! Timetable generation is not here; the scheduler consumes
//! `ConfigStore::config()` read-only.
//!
//! ## Data flow
//!
//! ```text
//! staged copy ── edit ──▶ validate ──▶ commit (memory)
//!                                        │
//!                    file ◀── swap ◀── validate ◀── temp file
//!                     │
//!                     └── reload ──▶ memory
//! ```

pub mod atomic;
pub mod conflict;
pub mod error;
pub mod integrity;
pub mod model;
pub mod persist;
pub mod store;
pub mod validate;

pub use atomic::{AtomicMutationError, config_lock_path, mutate_config_file};
pub use conflict::RetargetMode;
pub use error::{EdgeFault, EntityKind, StoreError};
pub use integrity::{CascadeReport, CourseSelector, FacultyLimits};
pub use model::{
    ClockTime, Configuration, Course, DEFAULT_MAXIMUM_DAYS, DEFAULT_SCHEDULE_LIMIT, Day,
    EntityConfig, Faculty, MAX_PREFERENCE_WEIGHT, PreferenceKind, RefList, ReferenceKind,
    TimeRange,
};
pub use persist::{
    PersistError, load_config, read_config_unchecked, save_config, to_canonical_json,
    write_new_config,
};
pub use store::{ConfigStore, SaveOutcome, StagedEdit};
pub use validate::{
    CONFIG_CHECK_KIND, StructuralError, ValidationFinding, ValidationReport, ValidationSummary,
    check_config, validate, validate_str,
};
