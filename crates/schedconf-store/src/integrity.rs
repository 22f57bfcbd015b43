//! Referential-integrity engine.
//!
//! Each operation applies a primary edit together with every cascade edit
//! needed to keep the entity graph free of dangling references. They run
//! against a staged copy (see `store::StagedEdit`); callers never reach the
//! committed configuration directly.
//!
//! Cascades always finish before the primary entity is removed or renamed
//! in its canonical list.

use crate::error::{EdgeFault, EntityKind, StoreError};
use crate::model::{Configuration, Course, Day, Faculty, PreferenceKind, ReferenceKind, TimeRange};

/// Which sections of a course a delete targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseSelector {
    AllSections,
    Section(usize),
}

/// Partial update of a faculty member's numeric limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FacultyLimits {
    pub maximum_credits: Option<u32>,
    pub minimum_credits: Option<u32>,
    pub unique_course_limit: Option<u32>,
    pub maximum_days: Option<u32>,
}

/// Tally of cascade edits made by one operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub courses_touched: usize,
    pub faculty_touched: usize,
    pub records_removed: usize,
}

#[derive(Debug, Clone, Copy)]
enum Resource {
    Room,
    Lab,
}

impl Resource {
    fn entity_kind(self) -> EntityKind {
        match self {
            Resource::Room => EntityKind::Room,
            Resource::Lab => EntityKind::Lab,
        }
    }

    fn reference_kind(self) -> ReferenceKind {
        match self {
            Resource::Room => ReferenceKind::Room,
            Resource::Lab => ReferenceKind::Lab,
        }
    }

    fn preference_kind(self) -> PreferenceKind {
        match self {
            Resource::Room => PreferenceKind::Room,
            Resource::Lab => PreferenceKind::Lab,
        }
    }
}

impl Configuration {
    fn resources(&self, resource: Resource) -> &Vec<String> {
        match resource {
            Resource::Room => &self.config.rooms,
            Resource::Lab => &self.config.labs,
        }
    }

    fn resources_mut(&mut self, resource: Resource) -> &mut Vec<String> {
        match resource {
            Resource::Room => &mut self.config.rooms,
            Resource::Lab => &mut self.config.labs,
        }
    }

    fn section_mut(&mut self, index: usize) -> Result<&mut Course, StoreError> {
        self.config
            .courses
            .get_mut(index)
            .ok_or_else(|| StoreError::section_not_found(index))
    }

    fn faculty_index(&self, name: &str) -> Result<usize, StoreError> {
        self.config
            .faculty
            .iter()
            .position(|f| f.name_matches(name))
            .ok_or_else(|| StoreError::not_found(EntityKind::Faculty, name))
    }

    // ── Rooms and labs ──

    pub fn add_room(&mut self, name: &str) -> Result<(), StoreError> {
        self.add_resource(Resource::Room, name)
    }

    pub fn add_lab(&mut self, name: &str) -> Result<(), StoreError> {
        self.add_resource(Resource::Lab, name)
    }

    pub fn rename_room(&mut self, old: &str, new: &str) -> Result<CascadeReport, StoreError> {
        self.rename_resource(Resource::Room, old, new)
    }

    pub fn rename_lab(&mut self, old: &str, new: &str) -> Result<CascadeReport, StoreError> {
        self.rename_resource(Resource::Lab, old, new)
    }

    pub fn delete_room(&mut self, name: &str) -> Result<CascadeReport, StoreError> {
        self.delete_resource(Resource::Room, name)
    }

    pub fn delete_lab(&mut self, name: &str) -> Result<CascadeReport, StoreError> {
        self.delete_resource(Resource::Lab, name)
    }

    fn add_resource(&mut self, resource: Resource, name: &str) -> Result<(), StoreError> {
        if self.resources(resource).iter().any(|entry| entry == name) {
            return Err(StoreError::duplicate(resource.entity_kind(), name));
        }
        self.resources_mut(resource).push(name.to_string());
        tracing::debug!(kind = %resource.entity_kind(), name, "added");
        Ok(())
    }

    fn rename_resource(
        &mut self,
        resource: Resource,
        old: &str,
        new: &str,
    ) -> Result<CascadeReport, StoreError> {
        let position = self
            .resources(resource)
            .iter()
            .position(|entry| entry == old)
            .ok_or_else(|| StoreError::not_found(resource.entity_kind(), old))?;
        if old == new {
            return Ok(CascadeReport::default());
        }
        if self.resources(resource).iter().any(|entry| entry == new) {
            return Err(StoreError::duplicate(resource.entity_kind(), new));
        }

        let mut report = CascadeReport::default();
        for course in &mut self.config.courses {
            if course.references_mut(resource.reference_kind()).replace(old, new) {
                report.courses_touched += 1;
            }
        }
        for faculty in &mut self.config.faculty {
            if faculty.rekey_preference(resource.preference_kind(), old, new) {
                report.faculty_touched += 1;
            }
        }
        self.resources_mut(resource)[position] = new.to_string();

        tracing::debug!(
            kind = %resource.entity_kind(),
            old,
            new,
            courses = report.courses_touched,
            faculty = report.faculty_touched,
            "renamed"
        );
        Ok(report)
    }

    fn delete_resource(
        &mut self,
        resource: Resource,
        name: &str,
    ) -> Result<CascadeReport, StoreError> {
        if !self.resources(resource).iter().any(|entry| entry == name) {
            return Err(StoreError::not_found(resource.entity_kind(), name));
        }

        let mut report = CascadeReport::default();
        for course in &mut self.config.courses {
            if course.references_mut(resource.reference_kind()).remove(name) > 0 {
                report.courses_touched += 1;
            }
        }
        for faculty in &mut self.config.faculty {
            if faculty
                .preferences_mut(resource.preference_kind())
                .remove(name)
                .is_some()
            {
                report.faculty_touched += 1;
            }
        }

        let entries = self.resources_mut(resource);
        let before = entries.len();
        entries.retain(|entry| entry != name);
        report.records_removed = before - entries.len();

        tracing::debug!(
            kind = %resource.entity_kind(),
            name,
            courses = report.courses_touched,
            faculty = report.faculty_touched,
            "deleted"
        );
        Ok(report)
    }

    // ── Faculty ──

    pub fn add_faculty(&mut self, faculty: Faculty) -> Result<(), StoreError> {
        if self.faculty_member(&faculty.name).is_some() {
            return Err(StoreError::duplicate(EntityKind::Faculty, faculty.name));
        }
        tracing::debug!(name = %faculty.name, "added faculty");
        self.config.faculty.push(faculty);
        Ok(())
    }

    /// Rename a faculty member and rewrite every course that lists them.
    ///
    /// `old` is matched case-insensitively; a case-only change of the same
    /// member is allowed.
    pub fn rename_faculty(&mut self, old: &str, new: &str) -> Result<CascadeReport, StoreError> {
        let index = self.faculty_index(old)?;
        let current = self.config.faculty[index].name.clone();
        if current == new {
            return Ok(CascadeReport::default());
        }
        if self
            .config
            .faculty
            .iter()
            .enumerate()
            .any(|(i, f)| i != index && f.name_matches(new))
        {
            return Err(StoreError::duplicate(EntityKind::Faculty, new));
        }

        let mut report = CascadeReport::default();
        for course in &mut self.config.courses {
            if course.faculty.replace(&current, new) {
                report.courses_touched += 1;
            }
        }
        self.config.faculty[index].name = new.to_string();

        tracing::debug!(old = %current, new, courses = report.courses_touched, "renamed faculty");
        Ok(report)
    }

    pub fn delete_faculty(&mut self, name: &str) -> Result<CascadeReport, StoreError> {
        let index = self.faculty_index(name)?;
        let canonical = self.config.faculty[index].name.clone();

        let mut report = CascadeReport::default();
        for course in &mut self.config.courses {
            if course.faculty.remove(&canonical) > 0 {
                report.courses_touched += 1;
            }
        }
        self.config.faculty.remove(index);
        report.records_removed = 1;

        tracing::debug!(name = %canonical, courses = report.courses_touched, "deleted faculty");
        Ok(report)
    }

    pub fn set_faculty_limits(&mut self, name: &str, limits: FacultyLimits) -> Result<(), StoreError> {
        let index = self.faculty_index(name)?;
        let faculty = &mut self.config.faculty[index];
        if let Some(value) = limits.maximum_credits {
            faculty.maximum_credits = value;
        }
        if let Some(value) = limits.minimum_credits {
            faculty.minimum_credits = value;
        }
        if let Some(value) = limits.unique_course_limit {
            faculty.unique_course_limit = value;
        }
        if let Some(value) = limits.maximum_days {
            faculty.maximum_days = value;
        }
        Ok(())
    }

    /// Replace one day's availability. An empty list clears the day.
    pub fn set_faculty_times(
        &mut self,
        name: &str,
        day: Day,
        mut ranges: Vec<TimeRange>,
    ) -> Result<(), StoreError> {
        let index = self.faculty_index(name)?;
        let faculty = &mut self.config.faculty[index];
        if ranges.is_empty() {
            faculty.times.remove(&day);
        } else {
            ranges.sort();
            ranges.dedup();
            faculty.times.insert(day, ranges);
        }
        Ok(())
    }

    pub fn set_preference(
        &mut self,
        name: &str,
        kind: PreferenceKind,
        key: &str,
        weight: u8,
    ) -> Result<(), StoreError> {
        let index = self.faculty_index(name)?;
        self.config.faculty[index]
            .preferences_mut(kind)
            .insert(key.to_string(), weight);
        Ok(())
    }

    pub fn clear_preference(
        &mut self,
        name: &str,
        kind: PreferenceKind,
        key: &str,
    ) -> Result<(), StoreError> {
        let index = self.faculty_index(name)?;
        let kind_label = match kind {
            PreferenceKind::Course => EntityKind::Course,
            PreferenceKind::Room => EntityKind::Room,
            PreferenceKind::Lab => EntityKind::Lab,
        };
        self.config.faculty[index]
            .preferences_mut(kind)
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(kind_label, key))
    }

    // ── Courses ──

    /// Append a new section. Listed conflicts are mirrored onto every
    /// section of each target.
    pub fn add_course(&mut self, mut course: Course) -> Result<usize, StoreError> {
        course.room.dedup();
        course.lab.dedup();
        course.faculty.dedup();
        course.conflicts.dedup();

        for other in course.conflicts.iter() {
            if other == course.course_id {
                return Err(StoreError::invalid_edge(
                    &course.course_id,
                    other,
                    EdgeFault::SelfConflict,
                ));
            }
            if !self.has_course(other) {
                return Err(StoreError::invalid_edge(
                    &course.course_id,
                    other,
                    EdgeFault::MissingEndpoint(other.to_string()),
                ));
            }
        }

        for section in &mut self.config.courses {
            if course.conflicts.contains(&section.course_id) {
                section.conflicts.insert(course.course_id.clone());
            }
        }
        tracing::debug!(course_id = %course.course_id, conflicts = course.conflicts.len(), "added course");
        self.config.courses.push(course);
        Ok(self.config.courses.len() - 1)
    }

    /// Rename a course_id across all of its sections and every inbound
    /// reference.
    pub fn rename_course(&mut self, old: &str, new: &str) -> Result<CascadeReport, StoreError> {
        if !self.has_course(old) {
            return Err(StoreError::not_found(EntityKind::Course, old));
        }
        if old == new {
            return Ok(CascadeReport::default());
        }
        if self.has_course(new) {
            return Err(StoreError::duplicate(EntityKind::Course, new));
        }

        let mut report = CascadeReport::default();
        for course in &mut self.config.courses {
            if course.conflicts.replace(old, new) {
                report.courses_touched += 1;
            }
        }
        for faculty in &mut self.config.faculty {
            if faculty.rekey_preference(PreferenceKind::Course, old, new) {
                report.faculty_touched += 1;
            }
        }
        for course in self
            .config
            .courses
            .iter_mut()
            .filter(|course| course.course_id == old)
        {
            course.course_id = new.to_string();
        }

        tracing::debug!(
            old,
            new,
            courses = report.courses_touched,
            faculty = report.faculty_touched,
            "renamed course"
        );
        Ok(report)
    }

    /// Delete all sections of a course, or one section by position.
    ///
    /// Inbound references (other courses' conflicts, faculty course
    /// preferences) are scrubbed first whenever the deletion leaves no
    /// section carrying `course_id`.
    pub fn delete_course(
        &mut self,
        course_id: &str,
        selector: CourseSelector,
    ) -> Result<CascadeReport, StoreError> {
        let targets: Vec<usize> = match selector {
            CourseSelector::AllSections => {
                let positions: Vec<usize> =
                    self.sections_of(course_id).map(|(i, _)| i).collect();
                if positions.is_empty() {
                    return Err(StoreError::not_found(EntityKind::Course, course_id));
                }
                positions
            }
            CourseSelector::Section(index) => match self.section(index) {
                Some(section) if section.course_id == course_id => vec![index],
                _ => return Err(StoreError::section_not_found(index)),
            },
        };

        let remaining = self.sections_of(course_id).count() - targets.len();
        let mut report = CascadeReport::default();
        if remaining == 0 {
            for course in &mut self.config.courses {
                if course.course_id != course_id && course.conflicts.remove(course_id) > 0 {
                    report.courses_touched += 1;
                }
            }
            for faculty in &mut self.config.faculty {
                if faculty.course_preferences.remove(course_id).is_some() {
                    report.faculty_touched += 1;
                }
            }
        }

        for index in targets.iter().rev() {
            self.config.courses.remove(*index);
        }
        report.records_removed = targets.len();

        tracing::debug!(
            course_id,
            removed = report.records_removed,
            remaining,
            courses = report.courses_touched,
            faculty = report.faculty_touched,
            "deleted course"
        );
        Ok(report)
    }

    pub fn set_course_credits(&mut self, index: usize, credits: u32) -> Result<(), StoreError> {
        self.section_mut(index)?.credits = credits;
        Ok(())
    }

    /// Add a room/lab/faculty reference to one section. Unknown names are
    /// left for the oracle to reject.
    pub fn attach_course_reference(
        &mut self,
        index: usize,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<bool, StoreError> {
        let canonical = match kind {
            ReferenceKind::Faculty => self
                .faculty_member(name)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| name.to_string()),
            ReferenceKind::Room | ReferenceKind::Lab => name.to_string(),
        };
        Ok(self.section_mut(index)?.references_mut(kind).insert(canonical))
    }

    pub fn detach_course_reference(
        &mut self,
        index: usize,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<(), StoreError> {
        let section = self.section_mut(index)?;
        if section.references_mut(kind).remove(name) == 0 {
            let entity = match kind {
                ReferenceKind::Room => EntityKind::Room,
                ReferenceKind::Lab => EntityKind::Lab,
                ReferenceKind::Faculty => EntityKind::Faculty,
            };
            return Err(StoreError::not_found(entity, name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;

    fn fixture() -> Configuration {
        let mut config = Configuration::default();
        config.config.rooms = vec!["Roddy 136".to_string(), "Roddy 140".to_string()];
        config.config.labs = vec!["Linux".to_string(), "Mac".to_string()];

        let mut kunkle = Faculty::new("Kunkle", 12, 4, 3);
        kunkle.lab_preferences.insert("Linux".to_string(), 7);
        kunkle.room_preferences.insert("Roddy 136".to_string(), 5);
        kunkle.course_preferences.insert("CMSC 140".to_string(), 9);
        config.config.faculty.push(kunkle);
        config.config.faculty.push(Faculty::new("Hobbs", 12, 0, 2));

        let mut a = Course::new("CMSC 140", 4);
        a.room.insert("Roddy 136");
        a.lab.insert("Linux");
        a.faculty.insert("Kunkle");
        a.conflicts.insert("CMSC 161");
        let mut a2 = Course::new("CMSC 140", 4);
        a2.room.insert("Roddy 140");
        a2.conflicts.insert("CMSC 161");
        let mut b = Course::new("CMSC 161", 3);
        b.lab.insert("Linux");
        b.faculty.insert("Hobbs");
        b.conflicts.insert("CMSC 140");
        config.config.courses = vec![a, a2, b];
        config
    }

    fn mentions(config: &Configuration, name: &str) -> usize {
        let in_courses: usize = config
            .courses()
            .iter()
            .map(|c| c.room.count(name) + c.lab.count(name) + c.faculty.count(name) + c.conflicts.count(name))
            .sum();
        let in_faculty: usize = config
            .faculty()
            .iter()
            .map(|f| {
                usize::from(f.course_preferences.contains_key(name))
                    + usize::from(f.room_preferences.contains_key(name))
                    + usize::from(f.lab_preferences.contains_key(name))
            })
            .sum();
        in_courses + in_faculty
    }

    #[test]
    fn fixture_is_valid() {
        validate(&fixture()).expect("fixture must validate");
    }

    #[test]
    fn add_room_rejects_exact_duplicate() {
        let mut config = fixture();
        let err = config.add_room("Roddy 136").expect_err("duplicate room");
        assert!(matches!(err, StoreError::Duplicate { kind: EntityKind::Room, .. }));
        config.add_room("roddy 136").expect("rooms are case-sensitive");
    }

    #[test]
    fn add_faculty_rejects_case_insensitive_duplicate() {
        let mut config = fixture();
        let err = config
            .add_faculty(Faculty::new("kunkle", 10, 0, 1))
            .expect_err("duplicate faculty");
        assert!(matches!(err, StoreError::Duplicate { kind: EntityKind::Faculty, .. }));
    }

    #[test]
    fn rename_lab_rewrites_courses_and_preferences() {
        let mut config = fixture();
        let report = config.rename_lab("Linux", "Ubuntu").expect("rename");
        assert_eq!(report.courses_touched, 2);
        assert_eq!(report.faculty_touched, 1);
        assert_eq!(mentions(&config, "Linux"), 0);
        assert_eq!(config.labs(), ["Ubuntu".to_string(), "Mac".to_string()]);
        assert_eq!(config.faculty()[0].lab_preferences.get("Ubuntu"), Some(&7));
        validate(&config).expect("renamed config must validate");
    }

    #[test]
    fn rename_room_onto_existing_room_is_rejected() {
        let mut config = fixture();
        let err = config
            .rename_room("Roddy 136", "Roddy 140")
            .expect_err("collision");
        assert!(matches!(err, StoreError::Duplicate { kind: EntityKind::Room, .. }));
    }

    #[test]
    fn rename_twice_restores_original() {
        let original = fixture();
        let mut config = original.clone();
        config.rename_room("Roddy 136", "Roddy 200").expect("rename");
        config.rename_room("Roddy 200", "Roddy 136").expect("rename back");
        assert_eq!(config, original);

        config.rename_faculty("Kunkle", "Kunkel").expect("rename");
        config.rename_faculty("Kunkel", "Kunkle").expect("rename back");
        assert_eq!(config, original);
    }

    #[test]
    fn delete_room_cascades_everywhere() {
        let mut config = fixture();
        config.delete_room("Roddy 136").expect("delete");
        assert_eq!(mentions(&config, "Roddy 136"), 0);
        assert!(!config.has_room("Roddy 136"));
        assert!(config.has_room("Roddy 140"));
        validate(&config).expect("config must validate");
    }

    #[test]
    fn delete_faculty_removes_duplicate_listings() {
        let mut config = fixture();
        config.config.courses[0].faculty = ["Kunkle", "Hobbs", "Kunkle"].into_iter().collect();
        let report = config.delete_faculty("KUNKLE").expect("delete");
        assert_eq!(report.courses_touched, 1);
        assert_eq!(mentions(&config, "Kunkle"), 0);
        assert_eq!(config.courses()[0].faculty.iter().collect::<Vec<_>>(), vec!["Hobbs"]);
    }

    #[test]
    fn delete_all_sections_scrubs_inbound_references() {
        let mut config = fixture();
        let report = config
            .delete_course("CMSC 140", CourseSelector::AllSections)
            .expect("delete");
        assert_eq!(report.records_removed, 2);
        assert_eq!(mentions(&config, "CMSC 140"), 0);
        assert_eq!(config.courses().len(), 1);
        validate(&config).expect("config must validate");
    }

    #[test]
    fn delete_one_section_keeps_references_while_siblings_remain() {
        let mut config = fixture();
        config
            .delete_course("CMSC 140", CourseSelector::Section(1))
            .expect("delete");
        assert_eq!(config.courses().len(), 2);
        assert!(config.courses()[1].conflicts.contains("CMSC 140"));
        assert!(config.faculty()[0].course_preferences.contains_key("CMSC 140"));

        config
            .delete_course("CMSC 140", CourseSelector::Section(0))
            .expect("delete last section");
        assert_eq!(mentions(&config, "CMSC 140"), 0);
    }

    #[test]
    fn delete_section_with_mismatched_id_is_not_found() {
        let mut config = fixture();
        let err = config
            .delete_course("CMSC 140", CourseSelector::Section(2))
            .expect_err("section 2 is CMSC 161");
        assert!(matches!(err, StoreError::NotFound { kind: EntityKind::Section, .. }));
        let err = config
            .delete_course("CMSC 999", CourseSelector::AllSections)
            .expect_err("unknown course");
        assert!(matches!(err, StoreError::NotFound { kind: EntityKind::Course, .. }));
    }

    #[test]
    fn add_course_mirrors_conflicts() {
        let mut config = fixture();
        let mut c = Course::new("CMSC 170", 4);
        c.conflicts = ["CMSC 140", "CMSC 140"].into_iter().collect();
        let index = config.add_course(c).expect("add");
        assert_eq!(config.courses()[index].conflicts.len(), 1);
        for (_, section) in config.sections_of("CMSC 140") {
            assert_eq!(section.conflicts.count("CMSC 170"), 1);
        }
        assert!(!config.courses()[2].conflicts.contains("CMSC 170"));
    }

    #[test]
    fn add_course_rejects_self_and_missing_conflicts() {
        let mut config = fixture();
        let mut own = Course::new("CMSC 170", 4);
        own.conflicts.insert("CMSC 170");
        assert!(matches!(
            config.add_course(own),
            Err(StoreError::InvalidEdge { fault: EdgeFault::SelfConflict, .. })
        ));
        let mut dangling = Course::new("CMSC 170", 4);
        dangling.conflicts.insert("CMSC 999");
        assert!(matches!(
            config.add_course(dangling),
            Err(StoreError::InvalidEdge { fault: EdgeFault::MissingEndpoint(_), .. })
        ));
    }

    #[test]
    fn rename_course_rewrites_every_section_and_reference() {
        let mut config = fixture();
        config.rename_course("CMSC 140", "CMSC 141").expect("rename");
        assert_eq!(config.sections_of("CMSC 141").count(), 2);
        assert_eq!(mentions(&config, "CMSC 140"), 0);
        assert!(config.faculty()[0].course_preferences.contains_key("CMSC 141"));
        assert!(matches!(
            config.rename_course("CMSC 141", "CMSC 161"),
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[test]
    fn attach_faculty_uses_canonical_name() {
        let mut config = fixture();
        assert!(config
            .attach_course_reference(1, ReferenceKind::Faculty, "hobbs")
            .expect("attach"));
        assert!(config.courses()[1].faculty.contains("Hobbs"));
        assert!(!config
            .attach_course_reference(1, ReferenceKind::Faculty, "Hobbs")
            .expect("attach is idempotent"));
        config
            .detach_course_reference(1, ReferenceKind::Faculty, "Hobbs")
            .expect("detach");
        assert!(config
            .detach_course_reference(1, ReferenceKind::Faculty, "Hobbs")
            .is_err());
    }

    #[test]
    fn set_faculty_times_sorts_and_clears() {
        let mut config = fixture();
        let ranges = vec![
            "13:00-15:00".parse().expect("range"),
            "09:00-11:00".parse().expect("range"),
        ];
        config
            .set_faculty_times("Hobbs", Day::Tue, ranges)
            .expect("set times");
        let hobbs = config.faculty_member("Hobbs").expect("hobbs");
        assert_eq!(hobbs.times[&Day::Tue][0].to_string(), "09:00-11:00");

        config
            .set_faculty_times("Hobbs", Day::Tue, Vec::new())
            .expect("clear");
        assert!(config.faculty_member("Hobbs").expect("hobbs").times.is_empty());
    }

    #[test]
    fn rename_faculty_onto_other_member_in_different_case_is_rejected() {
        let mut config = fixture();
        let before = config.clone();
        let err = config
            .rename_faculty("Kunkle", "HOBBS")
            .expect_err("name collides with Hobbs");
        assert!(matches!(
            err,
            StoreError::Duplicate { kind: EntityKind::Faculty, ref key } if key == "HOBBS"
        ));
        assert_eq!(config, before);
    }

    #[test]
    fn case_only_rename_of_same_member_rewrites_listings() {
        let mut config = fixture();
        let report = config.rename_faculty("kunkle", "KUNKLE").expect("case-only rename");
        assert_eq!(report.courses_touched, 1);
        assert_eq!(config.faculty()[0].name, "KUNKLE");
        assert_eq!(config.courses()[0].faculty.iter().collect::<Vec<_>>(), vec!["KUNKLE"]);
        assert_eq!(mentions(&config, "Kunkle"), 0);
    }

    #[test]
    fn rename_course_onto_existing_id_is_rejected() {
        let mut config = fixture();
        let before = config.clone();
        let err = config
            .rename_course("CMSC 140", "CMSC 161")
            .expect_err("CMSC 161 already exists");
        assert!(matches!(
            err,
            StoreError::Duplicate { kind: EntityKind::Course, ref key } if key == "CMSC 161"
        ));
        assert_eq!(config, before);
    }

    #[test]
    fn clear_absent_preference_is_not_found() {
        let mut config = fixture();
        let err = config
            .clear_preference("Hobbs", PreferenceKind::Lab, "Linux")
            .expect_err("Hobbs has no lab preferences");
        assert!(matches!(
            err,
            StoreError::NotFound { kind: EntityKind::Lab, ref key } if key == "Linux"
        ));

        config
            .clear_preference("Kunkle", PreferenceKind::Lab, "Linux")
            .expect("present preference clears");
        assert!(config.faculty()[0].lab_preferences.is_empty());
    }
}
