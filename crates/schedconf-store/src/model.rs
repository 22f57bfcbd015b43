//! Entity records: the definables stored in a configuration file.
//!
//! ```text
//! Configuration
//!   ├─ config: EntityConfig { rooms, labs, courses, faculty }
//!   └─ scheduler parameters (limit, time_slot_config), carried opaquely
//! ```
//!
//! Courses are sections: several records may share one `course_id`.
//! Position in `courses` is the section identity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DEFAULT_SCHEDULE_LIMIT: u32 = 10;
pub const DEFAULT_MAXIMUM_DAYS: u32 = 5;
pub const MAX_PREFERENCE_WEIGHT: u8 = 10;

/// Ordered list of entity names with set-like editing.
///
/// Deserialization keeps whatever the file holds (including duplicates) so
/// the validation oracle can report them; every mutating helper keeps the
/// list duplicate-free from that point on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefList(Vec<String>);

impl RefList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|entry| entry == name)
    }

    /// Append `name` unless present. Returns whether the list changed.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.0.push(name);
        true
    }

    /// Drop every occurrence of `name`. Returns how many entries were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|entry| entry != name);
        before - self.0.len()
    }

    /// Rewrite every `old` to `new`, collapsing duplicates to the first
    /// occurrence. Returns whether `old` was present.
    pub fn replace(&mut self, old: &str, new: &str) -> bool {
        if !self.contains(old) {
            return false;
        }
        let mut rewritten: Vec<String> = Vec::with_capacity(self.0.len());
        for entry in self.0.drain(..) {
            let entry = if entry == old { new.to_string() } else { entry };
            if !rewritten.contains(&entry) {
                rewritten.push(entry);
            }
        }
        self.0 = rewritten;
        true
    }

    /// Collapse duplicates, keeping first occurrences in order.
    pub fn dedup(&mut self) {
        let mut seen: Vec<String> = Vec::with_capacity(self.0.len());
        for entry in self.0.drain(..) {
            if !seen.contains(&entry) {
                seen.push(entry);
            }
        }
        self.0 = seen;
    }

    /// Entries that occur more than once, each reported once.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut dupes: Vec<&str> = Vec::new();
        for (idx, entry) in self.0.iter().enumerate() {
            if self.0[..idx].contains(entry) && !dupes.contains(&entry.as_str()) {
                dupes.push(entry);
            }
        }
        dupes
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn count(&self, name: &str) -> usize {
        self.0.iter().filter(|entry| *entry == name).count()
    }
}

impl<S: Into<String>> FromIterator<S> for RefList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// One course section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub credits: u32,
    #[serde(default)]
    pub room: RefList,
    #[serde(default)]
    pub lab: RefList,
    #[serde(default)]
    pub faculty: RefList,
    #[serde(default)]
    pub conflicts: RefList,
}

impl Course {
    pub fn new(course_id: impl Into<String>, credits: u32) -> Self {
        Self {
            course_id: course_id.into(),
            credits,
            room: RefList::new(),
            lab: RefList::new(),
            faculty: RefList::new(),
            conflicts: RefList::new(),
        }
    }

    pub fn references(&self, kind: ReferenceKind) -> &RefList {
        match kind {
            ReferenceKind::Room => &self.room,
            ReferenceKind::Lab => &self.lab,
            ReferenceKind::Faculty => &self.faculty,
        }
    }

    pub fn references_mut(&mut self, kind: ReferenceKind) -> &mut RefList {
        match kind {
            ReferenceKind::Room => &mut self.room,
            ReferenceKind::Lab => &mut self.lab,
            ReferenceKind::Faculty => &mut self.faculty,
        }
    }
}

/// Which list of a course section a reference lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Room,
    Lab,
    Faculty,
}

/// Which preference map of a faculty record an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKind {
    Course,
    Room,
    Lab,
}

impl PreferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKind::Course => "course",
            PreferenceKind::Room => "room",
            PreferenceKind::Lab => "lab",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "MON",
            Day::Tue => "TUE",
            Day::Wed => "WED",
            Day::Thu => "THU",
            Day::Fri => "FRI",
            Day::Sat => "SAT",
            Day::Sun => "SUN",
        }
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown day: {s}"))
    }
}

/// Minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| Self(hour * 60 + minute))
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected HH:MM, got {s:?}"))?;
        let hour = two_digits(hour).ok_or_else(|| format!("invalid hour in {s:?}"))?;
        let minute = two_digits(minute).ok_or_else(|| format!("invalid minute in {s:?}"))?;
        ClockTime::from_hm(hour, minute).ok_or_else(|| format!("time out of range: {s:?}"))
    }
}

/// Exactly two ASCII digits.
fn two_digits(field: &str) -> Option<u16> {
    match field.as_bytes() {
        [tens @ b'0'..=b'9', ones @ b'0'..=b'9'] => {
            Some(u16::from(tens - b'0') * 10 + u16::from(ones - b'0'))
        }
        _ => None,
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// A half-open availability window, serialized as `"HH:MM-HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("expected HH:MM-HH:MM, got {s:?}"))?;
        let start: ClockTime = start.parse()?;
        let end: ClockTime = end.parse()?;
        if start >= end {
            return Err(format!("time range must start before it ends: {s:?}"));
        }
        Ok(Self { start, end })
    }
}

impl TryFrom<String> for TimeRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.to_string()
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A faculty member and their scheduling constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub name: String,
    pub maximum_credits: u32,
    pub minimum_credits: u32,
    pub unique_course_limit: u32,
    #[serde(default = "default_maximum_days")]
    pub maximum_days: u32,
    #[serde(default)]
    pub times: BTreeMap<Day, Vec<TimeRange>>,
    #[serde(default)]
    pub course_preferences: BTreeMap<String, u8>,
    #[serde(default)]
    pub room_preferences: BTreeMap<String, u8>,
    #[serde(default)]
    pub lab_preferences: BTreeMap<String, u8>,
}

fn default_maximum_days() -> u32 {
    DEFAULT_MAXIMUM_DAYS
}

impl Faculty {
    pub fn new(
        name: impl Into<String>,
        maximum_credits: u32,
        minimum_credits: u32,
        unique_course_limit: u32,
    ) -> Self {
        Self {
            name: name.into(),
            maximum_credits,
            minimum_credits,
            unique_course_limit,
            maximum_days: DEFAULT_MAXIMUM_DAYS,
            times: BTreeMap::new(),
            course_preferences: BTreeMap::new(),
            room_preferences: BTreeMap::new(),
            lab_preferences: BTreeMap::new(),
        }
    }

    pub fn preferences(&self, kind: PreferenceKind) -> &BTreeMap<String, u8> {
        match kind {
            PreferenceKind::Course => &self.course_preferences,
            PreferenceKind::Room => &self.room_preferences,
            PreferenceKind::Lab => &self.lab_preferences,
        }
    }

    pub fn preferences_mut(&mut self, kind: PreferenceKind) -> &mut BTreeMap<String, u8> {
        match kind {
            PreferenceKind::Course => &mut self.course_preferences,
            PreferenceKind::Room => &mut self.room_preferences,
            PreferenceKind::Lab => &mut self.lab_preferences,
        }
    }

    /// Move a preference entry to a new key, keeping its weight.
    ///
    /// An existing entry under `new` is overwritten.
    pub fn rekey_preference(&mut self, kind: PreferenceKind, old: &str, new: &str) -> bool {
        let map = self.preferences_mut(kind);
        match map.remove(old) {
            Some(weight) => {
                map.insert(new.to_string(), weight);
                true
            }
            None => false,
        }
    }

    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// The entity graph proper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(default)]
    pub rooms: Vec<String>,
    #[serde(default)]
    pub labs: Vec<String>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub faculty: Vec<Faculty>,
}

/// Full durable configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub config: EntityConfig,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub time_slot_config: serde_json::Value,
}

fn default_limit() -> u32 {
    DEFAULT_SCHEDULE_LIMIT
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            config: EntityConfig::default(),
            limit: DEFAULT_SCHEDULE_LIMIT,
            time_slot_config: serde_json::Value::Null,
        }
    }
}

impl Configuration {
    pub fn courses(&self) -> &[Course] {
        &self.config.courses
    }

    pub fn faculty(&self) -> &[Faculty] {
        &self.config.faculty
    }

    pub fn rooms(&self) -> &[String] {
        &self.config.rooms
    }

    pub fn labs(&self) -> &[String] {
        &self.config.labs
    }

    /// Section at `index`.
    pub fn section(&self, index: usize) -> Option<&Course> {
        self.config.courses.get(index)
    }

    /// Every section sharing `course_id`, with its position.
    pub fn sections_of<'a>(
        &'a self,
        course_id: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Course)> + 'a {
        self.config
            .courses
            .iter()
            .enumerate()
            .filter(move |(_, course)| course.course_id == course_id)
    }

    pub fn has_course(&self, course_id: &str) -> bool {
        self.sections_of(course_id).next().is_some()
    }

    /// Distinct course IDs in first-appearance order.
    pub fn course_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for course in &self.config.courses {
            if !ids.contains(&course.course_id.as_str()) {
                ids.push(&course.course_id);
            }
        }
        ids
    }

    /// Lookup one faculty record by name (case-insensitive).
    pub fn faculty_member(&self, name: &str) -> Option<&Faculty> {
        self.config.faculty.iter().find(|f| f.name_matches(name))
    }

    pub fn faculty_member_mut(&mut self, name: &str) -> Option<&mut Faculty> {
        self.config.faculty.iter_mut().find(|f| f.name_matches(name))
    }

    pub fn has_room(&self, name: &str) -> bool {
        self.config.rooms.iter().any(|room| room == name)
    }

    pub fn has_lab(&self, name: &str) -> bool {
        self.config.labs.iter().any(|lab| lab == name)
    }
}
