// used for birth dates
use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

// used to print out readable forms of identities
use std::fmt;

use crate::name::{build_full_name, normalize_name_part, split_full_name, to_title_full_name};

lazy_static! {
    static ref ISO_DATE: Regex = Regex::new(r"^\s*(\d{4})-(\d{1,2})-(\d{1,2})").unwrap();
    static ref US_DATE: Regex = Regex::new(r"^\s*(\d{1,2})/(\d{1,2})/(\d{4})\s*$").unwrap();
}

// ------------- Identities -------------
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A family scope. People without one belong to the shared example dataset.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(String);

impl FamilyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ------------- Person -------------
/// A single family record as it comes out of the store.
///
/// Relationships are not references: `parent1`/`parent2` hold the normalized
/// full name of a parent and the spouse is a name pair. Nothing computed by
/// the layout engine is ever written back onto a `Person`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    id: PersonId,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    middle_initial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spouse_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spouse_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    birth_date: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<String>, first_name: &str, last_name: &str) -> Self {
        Self {
            id: PersonId::new(id),
            first_name: normalize_name_part(first_name),
            last_name: normalize_name_part(last_name),
            middle_initial: None,
            spouse_first_name: None,
            spouse_last_name: None,
            parent1: None,
            parent2: None,
            birth_date: None,
        }
    }
    /// Parent slots take the full name of the parent; blank strings clear the slot.
    pub fn with_parents(mut self, parent1: Option<&str>, parent2: Option<&str>) -> Self {
        self.parent1 = non_blank(parent1).map(|s| normalize_name_part(s));
        self.parent2 = non_blank(parent2).map(|s| normalize_name_part(s));
        self
    }
    pub fn with_spouse(mut self, first_name: &str, last_name: &str) -> Self {
        self.spouse_first_name = non_blank(Some(first_name)).map(|s| normalize_name_part(s));
        self.spouse_last_name = non_blank(Some(last_name)).map(|s| normalize_name_part(s));
        self
    }
    /// Accepts a free-text spouse entry such as `"Mary Ann Smith"`.
    pub fn with_spouse_name(self, raw: &str) -> Self {
        let (first, last) = split_full_name(raw);
        self.with_spouse(&first, &last)
    }
    pub fn with_middle_initial(mut self, initial: &str) -> Self {
        self.middle_initial = non_blank(Some(initial)).map(|s| normalize_name_part(s));
        self
    }
    pub fn with_birth_date(mut self, birth_date: &str) -> Self {
        self.birth_date = non_blank(Some(birth_date)).map(str::to_string);
        self
    }
    // Fields are only exposed through getters so that a record stays the
    // same for the whole layout run.
    pub fn id(&self) -> &PersonId {
        &self.id
    }
    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn middle_initial(&self) -> Option<&str> {
        self.middle_initial.as_deref()
    }
    pub fn spouse_first_name(&self) -> Option<&str> {
        self.spouse_first_name.as_deref()
    }
    pub fn spouse_last_name(&self) -> Option<&str> {
        self.spouse_last_name.as_deref()
    }
    pub fn parent1(&self) -> Option<&str> {
        self.parent1.as_deref()
    }
    pub fn parent2(&self) -> Option<&str> {
        self.parent2.as_deref()
    }
    pub fn birth_date(&self) -> Option<&str> {
        self.birth_date.as_deref()
    }
    /// The comparison key for this person.
    pub fn full_name(&self) -> String {
        build_full_name(self.first_name.as_str(), self.last_name.as_str())
    }
    /// The comparison key of the declared spouse, `""` when none is declared.
    pub fn spouse_full_name(&self) -> String {
        build_full_name(self.spouse_first_name(), self.spouse_last_name())
    }
    pub fn display_name(&self) -> String {
        to_title_full_name(self.first_name.as_str(), self.last_name.as_str())
    }
    /// Parent slots after trimming, with blank slots treated as absent.
    pub fn parent_slots(&self) -> [Option<&str>; 2] {
        [parent_slot(self.parent1()), parent_slot(self.parent2())]
    }
    /// The birth date, when the stored text can be understood as a date.
    pub fn born(&self) -> Option<NaiveDate> {
        parse_birth_date(self.birth_date()?)
    }
    /// A record is usable when both name parts are present.
    pub fn is_valid(&self) -> bool {
        !self.first_name.trim().is_empty() && !self.last_name.trim().is_empty()
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

pub(crate) fn parent_slot(slot: Option<&str>) -> Option<&str> {
    slot.map(str::trim).filter(|s| !s.is_empty())
}

/// Understands `YYYY-MM-DD` (optionally followed by a time, as in RFC 3339
/// timestamps) and `MM/DD/YYYY`. Anything else is treated as unknown.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(timestamp.date_naive());
    }
    if let Some(captures) = ISO_DATE.captures(raw) {
        return NaiveDate::from_ymd_opt(
            captures[1].parse().ok()?,
            captures[2].parse().ok()?,
            captures[3].parse().ok()?,
        );
    }
    if let Some(captures) = US_DATE.captures(raw) {
        return NaiveDate::from_ymd_opt(
            captures[3].parse().ok()?,
            captures[1].parse().ok()?,
            captures[2].parse().ok()?,
        );
    }
    None
}
