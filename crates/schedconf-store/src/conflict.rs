//! Conflict edges: the symmetric "cannot share a slot" relation.
//!
//! An edge A–B is stored as B in the `conflicts` of every A-section and A in
//! the `conflicts` of every B-section. Adds and re-targets work across all
//! sections of an id; removal works on one section pair by position, since
//! `course_id` is not a unique key.

use crate::error::{EdgeFault, EntityKind, StoreError};
use crate::model::Configuration;

/// Which endpoint of an existing edge A–B gets replaced by C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetargetMode {
    /// A–B becomes C–B.
    ReplaceFirst,
    /// A–B becomes A–C.
    ReplaceSecond,
}

impl Configuration {
    fn require_endpoint(&self, a: &str, b: &str, id: &str) -> Result<(), StoreError> {
        if self.has_course(id) {
            Ok(())
        } else {
            Err(StoreError::invalid_edge(
                a,
                b,
                EdgeFault::MissingEndpoint(id.to_string()),
            ))
        }
    }

    /// Insert `other` into the conflicts of every section of `course_id`.
    fn link_all(&mut self, course_id: &str, other: &str) -> usize {
        self.config
            .courses
            .iter_mut()
            .filter(|course| course.course_id == course_id)
            .map(|course| usize::from(course.conflicts.insert(other)))
            .sum()
    }

    /// Remove `other` from the conflicts of every section of `course_id`.
    fn unlink_all(&mut self, course_id: &str, other: &str) -> usize {
        self.config
            .courses
            .iter_mut()
            .filter(|course| course.course_id == course_id)
            .map(|course| course.conflicts.remove(other))
            .sum()
    }

    /// In every section of `course_id`, rewrite `old` to `new` (deduplicated).
    fn relink_all(&mut self, course_id: &str, old: &str, new: &str) -> usize {
        self.config
            .courses
            .iter_mut()
            .filter(|course| course.course_id == course_id)
            .map(|course| usize::from(course.conflicts.replace(old, new)))
            .sum()
    }

    /// Add the edge A–B to every section of both courses.
    ///
    /// Adding an edge that is already present is a no-op.
    pub fn add_conflict(&mut self, a: &str, b: &str) -> Result<(), StoreError> {
        if a == b {
            return Err(StoreError::invalid_edge(a, b, EdgeFault::SelfConflict));
        }
        self.require_endpoint(a, b, a)?;
        self.require_endpoint(a, b, b)?;

        let forward = self.link_all(a, b);
        let backward = self.link_all(b, a);
        tracing::debug!(a, b, forward, backward, "added conflict");
        Ok(())
    }

    /// Remove the edge between the section at `index_a` (course `a`) and the
    /// section at `index_b` (course `b`).
    pub fn remove_conflict(
        &mut self,
        a: &str,
        b: &str,
        index_a: usize,
        index_b: usize,
    ) -> Result<(), StoreError> {
        for (index, expected) in [(index_a, a), (index_b, b)] {
            match self.section(index) {
                Some(section) if section.course_id == expected => {}
                Some(_) => {
                    return Err(StoreError::not_found(
                        EntityKind::Section,
                        format!("{expected} #{index}"),
                    ));
                }
                None => return Err(StoreError::section_not_found(index)),
            }
        }

        let courses = &mut self.config.courses;
        if !courses[index_a].conflicts.contains(b) || !courses[index_b].conflicts.contains(a) {
            return Err(StoreError::invalid_edge(a, b, EdgeFault::NotPresent));
        }
        courses[index_a].conflicts.remove(b);
        courses[index_b].conflicts.remove(a);

        tracing::debug!(a, b, index_a, index_b, "removed conflict");
        Ok(())
    }

    /// Replace one endpoint of the existing edge A–B with C.
    ///
    /// All three ids must have at least one section, and B must be listed by
    /// some section of A at the moment of the call. Course IDs are never
    /// changed; only conflict lists are.
    pub fn retarget_conflict(
        &mut self,
        a: &str,
        b: &str,
        c: &str,
        mode: RetargetMode,
    ) -> Result<(), StoreError> {
        for id in [a, b, c] {
            self.require_endpoint(a, b, id)?;
        }
        if !self
            .sections_of(a)
            .any(|(_, section)| section.conflicts.contains(b))
        {
            return Err(StoreError::invalid_edge(a, b, EdgeFault::NotPresent));
        }

        match mode {
            RetargetMode::ReplaceFirst => {
                if c == a {
                    return Ok(());
                }
                if c == b {
                    return Err(StoreError::invalid_edge(c, b, EdgeFault::SelfConflict));
                }
                self.unlink_all(a, b);
                self.link_all(c, b);
                self.relink_all(b, a, c);
            }
            RetargetMode::ReplaceSecond => {
                if c == b {
                    return Ok(());
                }
                if c == a {
                    return Err(StoreError::invalid_edge(a, c, EdgeFault::SelfConflict));
                }
                self.relink_all(a, b, c);
                self.unlink_all(b, a);
                self.link_all(c, a);
            }
        }

        tracing::debug!(a, b, c, ?mode, "retargeted conflict");
        Ok(())
    }
}
