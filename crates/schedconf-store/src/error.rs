//! Error types for entity-graph operations.

use crate::persist::PersistError;
use crate::validate::StructuralError;
use std::fmt::{Display, Formatter};

/// Entity classes addressed by store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Course,
    Section,
    Faculty,
    Room,
    Lab,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Course => "course",
            EntityKind::Section => "course section",
            EntityKind::Faculty => "faculty",
            EntityKind::Room => "room",
            EntityKind::Lab => "lab",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a conflict-edge request was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeFault {
    /// Both endpoints name the same course.
    SelfConflict,
    /// No section carries this course_id.
    MissingEndpoint(String),
    /// The edge to remove or re-target is not on the live record.
    NotPresent,
}

impl Display for EdgeFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeFault::SelfConflict => f.write_str("a course cannot conflict with itself"),
            EdgeFault::MissingEndpoint(id) => write!(f, "no section exists for {id}"),
            EdgeFault::NotPresent => f.write_str("edge is not present"),
        }
    }
}

/// Errors raised by staged edits, saves and reloads.
///
/// Every variant leaves the committed state untouched.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    #[error("{kind} already exists: {key}")]
    Duplicate { kind: EntityKind, key: String },

    #[error("invalid conflict {a} -- {b}: {fault}")]
    InvalidEdge { a: String, b: String, fault: EdgeFault },

    #[error(transparent)]
    Validation(#[from] StructuralError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl StoreError {
    pub(crate) fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub(crate) fn duplicate(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::Duplicate {
            kind,
            key: key.into(),
        }
    }

    pub(crate) fn invalid_edge(a: &str, b: &str, fault: EdgeFault) -> Self {
        Self::InvalidEdge {
            a: a.to_string(),
            b: b.to_string(),
            fault,
        }
    }

    pub(crate) fn section_not_found(index: usize) -> Self {
        Self::not_found(EntityKind::Section, format!("#{index}"))
    }
}
