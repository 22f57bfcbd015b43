//! Structural validation oracle.
//!
//! `check_config` produces a deterministic report of every finding;
//! `validate` / `validate_str` turn a report with errors into a
//! `StructuralError`. Staged edits and saves both gate on this.

use crate::model::{Configuration, Course, MAX_PREFERENCE_WEIGHT, PreferenceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

pub const CONFIG_CHECK_KIND: &str = "schedconf.config.check.v1";
pub const MAX_WEEK_DAYS: u32 = 7;

pub const FAILURE_CLASS_ROOM_BLANK: &str = "config.room.blank";
pub const FAILURE_CLASS_ROOM_DUPLICATE: &str = "config.room.duplicate";
pub const FAILURE_CLASS_LAB_BLANK: &str = "config.lab.blank";
pub const FAILURE_CLASS_LAB_DUPLICATE: &str = "config.lab.duplicate";
pub const FAILURE_CLASS_FACULTY_NAME_BLANK: &str = "faculty.name.blank";
pub const FAILURE_CLASS_FACULTY_NAME_DUPLICATE: &str = "faculty.name.duplicate";
pub const FAILURE_CLASS_FACULTY_CREDITS_INVERTED: &str = "faculty.credits.inverted";
pub const FAILURE_CLASS_FACULTY_DAYS_RANGE: &str = "faculty.maximum_days.range";
pub const FAILURE_CLASS_PREFERENCE_RANGE: &str = "faculty.preference.range";
pub const FAILURE_CLASS_PREFERENCE_UNKNOWN_COURSE: &str = "faculty.preference.unknown_course";
pub const FAILURE_CLASS_PREFERENCE_UNKNOWN_ROOM: &str = "faculty.preference.unknown_room";
pub const FAILURE_CLASS_PREFERENCE_UNKNOWN_LAB: &str = "faculty.preference.unknown_lab";
pub const FAILURE_CLASS_COURSE_ID_BLANK: &str = "course.id.blank";
pub const FAILURE_CLASS_COURSE_ROOM_UNKNOWN: &str = "course.room.unknown";
pub const FAILURE_CLASS_COURSE_LAB_UNKNOWN: &str = "course.lab.unknown";
pub const FAILURE_CLASS_COURSE_FACULTY_UNKNOWN: &str = "course.faculty.unknown";
pub const FAILURE_CLASS_CONFLICT_UNKNOWN: &str = "course.conflict.unknown";
pub const FAILURE_CLASS_CONFLICT_SELF: &str = "course.conflict.self";
pub const FAILURE_CLASS_REFERENCE_DUPLICATE: &str = "course.reference.duplicate";
pub const WARNING_CLASS_CONFLICT_ASYMMETRIC: &str = "course.conflict.asymmetric";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFinding {
    pub entity: String,
    pub class: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub room_count: usize,
    pub lab_count: usize,
    pub course_count: usize,
    pub faculty_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub check_kind: String,
    pub result: String,
    pub failure_classes: Vec<String>,
    pub warning_classes: Vec<String>,
    pub errors: Vec<ValidationFinding>,
    pub warnings: Vec<ValidationFinding>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    pub fn accepted(&self) -> bool {
        self.result == "accepted"
    }
}

/// The oracle's rejection signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The document is not a well-typed configuration.
    Parse(String),
    /// The document parsed but violates one or more rules.
    Rejected(Box<ValidationReport>),
}

impl Display for StructuralError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "configuration parse error: {message}"),
            Self::Rejected(report) => {
                write!(
                    f,
                    "configuration rejected ({} error(s))",
                    report.summary.error_count
                )?;
                if let Some(first) = report.errors.first() {
                    write!(f, ": {}: {}", first.entity, first.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for StructuralError {}

fn section_label(index: usize, course: &Course) -> String {
    format!("course {} (#{index})", course.course_id)
}

fn collect_classes(findings: &[ValidationFinding]) -> Vec<String> {
    findings
        .iter()
        .map(|finding| finding.class.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

struct Findings {
    errors: Vec<ValidationFinding>,
    warnings: Vec<ValidationFinding>,
}

impl Findings {
    fn error(&mut self, entity: impl Into<String>, class: &str, message: impl Into<String>) {
        self.errors.push(ValidationFinding {
            entity: entity.into(),
            class: class.to_string(),
            message: message.into(),
        });
    }

    fn warning(&mut self, entity: impl Into<String>, class: &str, message: impl Into<String>) {
        self.warnings.push(ValidationFinding {
            entity: entity.into(),
            class: class.to_string(),
            message: message.into(),
        });
    }
}

fn check_flat_names(
    findings: &mut Findings,
    names: &[String],
    kind: &str,
    blank_class: &str,
    duplicate_class: &str,
) {
    let mut seen = BTreeSet::new();
    for name in names {
        if name.trim().is_empty() {
            findings.error(kind, blank_class, format!("{kind} name must not be blank"));
        } else if !seen.insert(name.as_str()) {
            findings.error(
                format!("{kind} {name}"),
                duplicate_class,
                format!("{kind} {name:?} is listed more than once"),
            );
        }
    }
}

pub fn check_config(config: &Configuration) -> ValidationReport {
    let mut findings = Findings {
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    check_flat_names(
        &mut findings,
        config.rooms(),
        "room",
        FAILURE_CLASS_ROOM_BLANK,
        FAILURE_CLASS_ROOM_DUPLICATE,
    );
    check_flat_names(
        &mut findings,
        config.labs(),
        "lab",
        FAILURE_CLASS_LAB_BLANK,
        FAILURE_CLASS_LAB_DUPLICATE,
    );

    let course_ids: BTreeSet<&str> = config.course_ids().into_iter().collect();
    let mut faculty_names = BTreeSet::new();

    for faculty in config.faculty() {
        let entity = format!("faculty {}", faculty.name);
        if faculty.name.trim().is_empty() {
            findings.error(
                &entity,
                FAILURE_CLASS_FACULTY_NAME_BLANK,
                "faculty name must not be blank",
            );
        } else if !faculty_names.insert(faculty.name.to_lowercase()) {
            findings.error(
                &entity,
                FAILURE_CLASS_FACULTY_NAME_DUPLICATE,
                format!("faculty name {:?} collides (case-insensitive)", faculty.name),
            );
        }

        if faculty.minimum_credits > faculty.maximum_credits {
            findings.error(
                &entity,
                FAILURE_CLASS_FACULTY_CREDITS_INVERTED,
                format!(
                    "minimum_credits={} exceeds maximum_credits={}",
                    faculty.minimum_credits, faculty.maximum_credits
                ),
            );
        }
        if faculty.maximum_days > MAX_WEEK_DAYS {
            findings.error(
                &entity,
                FAILURE_CLASS_FACULTY_DAYS_RANGE,
                format!(
                    "maximum_days={} exceeds {MAX_WEEK_DAYS}",
                    faculty.maximum_days
                ),
            );
        }

        for kind in [
            PreferenceKind::Course,
            PreferenceKind::Room,
            PreferenceKind::Lab,
        ] {
            for (key, weight) in faculty.preferences(kind) {
                if *weight > MAX_PREFERENCE_WEIGHT {
                    findings.error(
                        &entity,
                        FAILURE_CLASS_PREFERENCE_RANGE,
                        format!(
                            "{} preference {key:?} has weight {weight} (max {MAX_PREFERENCE_WEIGHT})",
                            kind.as_str()
                        ),
                    );
                }
                let (known, class) = match kind {
                    PreferenceKind::Course => (
                        course_ids.contains(key.as_str()),
                        FAILURE_CLASS_PREFERENCE_UNKNOWN_COURSE,
                    ),
                    PreferenceKind::Room => {
                        (config.has_room(key), FAILURE_CLASS_PREFERENCE_UNKNOWN_ROOM)
                    }
                    PreferenceKind::Lab => {
                        (config.has_lab(key), FAILURE_CLASS_PREFERENCE_UNKNOWN_LAB)
                    }
                };
                if !known {
                    findings.error(
                        &entity,
                        class,
                        format!("{} preference references unknown {key:?}", kind.as_str()),
                    );
                }
            }
        }
    }

    for (index, course) in config.courses().iter().enumerate() {
        let entity = section_label(index, course);
        if course.course_id.trim().is_empty() {
            findings.error(
                &entity,
                FAILURE_CLASS_COURSE_ID_BLANK,
                "course_id must not be blank",
            );
        }

        for room in course.room.iter().filter(|room| !config.has_room(room)) {
            findings.error(
                &entity,
                FAILURE_CLASS_COURSE_ROOM_UNKNOWN,
                format!("references unknown room {room:?}"),
            );
        }
        for lab in course.lab.iter().filter(|lab| !config.has_lab(lab)) {
            findings.error(
                &entity,
                FAILURE_CLASS_COURSE_LAB_UNKNOWN,
                format!("references unknown lab {lab:?}"),
            );
        }
        for name in course
            .faculty
            .iter()
            .filter(|name| !config.faculty().iter().any(|f| f.name == *name))
        {
            findings.error(
                &entity,
                FAILURE_CLASS_COURSE_FACULTY_UNKNOWN,
                format!("references unknown faculty {name:?}"),
            );
        }

        for (field, list) in [
            ("room", &course.room),
            ("lab", &course.lab),
            ("faculty", &course.faculty),
            ("conflicts", &course.conflicts),
        ] {
            for dupe in list.duplicates() {
                findings.error(
                    &entity,
                    FAILURE_CLASS_REFERENCE_DUPLICATE,
                    format!("{field} lists {dupe:?} more than once"),
                );
            }
        }

        for other in course.conflicts.iter() {
            if other == course.course_id {
                findings.error(
                    &entity,
                    FAILURE_CLASS_CONFLICT_SELF,
                    "course conflicts with itself",
                );
            } else if !course_ids.contains(other) {
                findings.error(
                    &entity,
                    FAILURE_CLASS_CONFLICT_UNKNOWN,
                    format!("conflicts with unknown course {other:?}"),
                );
            } else if !config
                .sections_of(other)
                .any(|(_, section)| section.conflicts.contains(&course.course_id))
            {
                findings.warning(
                    &entity,
                    WARNING_CLASS_CONFLICT_ASYMMETRIC,
                    format!("no section of {other:?} lists {:?} back", course.course_id),
                );
            }
        }
    }

    let Findings { errors, warnings } = findings;
    let failure_classes = collect_classes(&errors);
    let warning_classes = collect_classes(&warnings);
    let result = if errors.is_empty() {
        "accepted".to_string()
    } else {
        "rejected".to_string()
    };
    let summary = ValidationSummary {
        room_count: config.rooms().len(),
        lab_count: config.labs().len(),
        course_count: config.courses().len(),
        faculty_count: config.faculty().len(),
        error_count: errors.len(),
        warning_count: warnings.len(),
    };

    ValidationReport {
        check_kind: CONFIG_CHECK_KIND.to_string(),
        result,
        failure_classes,
        warning_classes,
        errors,
        warnings,
        summary,
    }
}

/// Accept or reject an in-memory configuration.
pub fn validate(config: &Configuration) -> Result<(), StructuralError> {
    let report = check_config(config);
    if report.accepted() {
        Ok(())
    } else {
        Err(StructuralError::Rejected(Box::new(report)))
    }
}

/// Parse and validate a serialized configuration.
pub fn validate_str(serialized: &str) -> Result<Configuration, StructuralError> {
    let config: Configuration =
        serde_json::from_str(serialized).map_err(|e| StructuralError::Parse(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}
