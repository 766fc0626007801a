//! Relationship queries over a snapshot of person records.
//!
//! The free functions answer single questions by scanning the list they are
//! given. The [`Kinship`] index answers the same questions for a whole run in
//! constant time per lookup and is what the generation assigner and the block
//! grouper work from.

use core::hash::BuildHasherDefault;
use std::collections::HashMap;
use seahash::SeaHasher;

use crate::person::Person;

pub type NameHasher = BuildHasherDefault<SeaHasher>;

/// Position of a person in the snapshot a [`Kinship`] was built from.
pub type Position = usize;

// ------------- Pairwise queries -------------

/// Either side declaring the other as spouse is enough.
pub fn are_spouses<'a, 'b>(a: impl Into<Option<&'a Person>>, b: impl Into<Option<&'b Person>>) -> bool {
    let (a, b) = match (a.into(), b.into()) {
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    declares_spouse(a, &b.full_name()) || declares_spouse(b, &a.full_name())
}

fn declares_spouse(person: &Person, full_name: &str) -> bool {
    let declared = person.spouse_full_name();
    !declared.is_empty() && declared == full_name
}

pub fn has_parents<'a>(person: impl Into<Option<&'a Person>>) -> bool {
    person
        .into()
        .is_some_and(|p| p.parent_slots().iter().any(Option::is_some))
}

pub fn has_two_parents<'a>(person: impl Into<Option<&'a Person>>) -> bool {
    person
        .into()
        .is_some_and(|p| p.parent_slots().iter().all(Option::is_some))
}

/// Loose check: the two people have at least one parent name in common,
/// regardless of which slot it sits in.
pub fn are_siblings<'a, 'b>(a: impl Into<Option<&'a Person>>, b: impl Into<Option<&'b Person>>) -> bool {
    let (a, b) = match (a.into(), b.into()) {
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    let parents_b = b.parent_slots();
    a.parent_slots()
        .iter()
        .flatten()
        .any(|parent| parents_b.contains(&Some(*parent)))
}

fn share_both_parents(a: &Person, b: &Person) -> bool {
    let [a1, a2] = a.parent_slots();
    let [b1, b2] = b.parent_slots();
    if a1.is_none() && a2.is_none() {
        return false;
    }
    (a1 == b1 && a2 == b2) || (a1 == b2 && a2 == b1)
}

// ------------- Scanning queries -------------

pub fn get_children<'p, 'a>(person: impl Into<Option<&'p Person>>, all: &'a [Person]) -> Vec<&'a Person> {
    let Some(person) = person.into() else {
        return Vec::new();
    };
    let full_name = person.full_name();
    if full_name.is_empty() {
        return Vec::new();
    }
    all.iter()
        .filter(|p| p.parent_slots().contains(&Some(full_name.as_str())))
        .collect()
}

/// Full siblings share both parent slots, in either order. Self is excluded
/// by identifier since two people may share a name.
pub fn get_siblings<'p, 'a>(person: impl Into<Option<&'p Person>>, all: &'a [Person]) -> Vec<&'a Person> {
    let Some(person) = person.into() else {
        return Vec::new();
    };
    all.iter()
        .filter(|p| p.id() != person.id() && share_both_parents(p, person))
        .collect()
}

/// Half siblings share at least one parent but not both.
pub fn get_half_siblings<'p, 'a>(person: impl Into<Option<&'p Person>>, all: &'a [Person]) -> Vec<&'a Person> {
    let Some(person) = person.into() else {
        return Vec::new();
    };
    all.iter()
        .filter(|p| {
            p.id() != person.id() && are_siblings(*p, person) && !share_both_parents(p, person)
        })
        .collect()
}

pub fn has_siblings<'p>(person: impl Into<Option<&'p Person>>, all: &[Person]) -> bool {
    !get_siblings(person, all).is_empty()
}

pub fn has_children<'p>(person: impl Into<Option<&'p Person>>, all: &[Person]) -> bool {
    !get_children(person, all).is_empty()
}

// ------------- Kinship -------------
/// One-time indexes over a snapshot, built at the start of a layout run.
///
/// Everything is addressed by [`Position`] in the snapshot rather than by
/// identifier, so duplicated identifiers or names never merge two records
/// inside the index itself. Name lookups still collapse same-named people,
/// which is the accepted limitation of name-keyed relationships.
#[derive(Debug)]
pub struct Kinship<'a> {
    people: &'a [Person],
    full_names: Vec<String>,
    // full name -> every position carrying that name, in input order
    by_name: HashMap<String, Vec<Position>, NameHasher>,
    // parent key -> children, in input order
    children: HashMap<String, Vec<Position>, NameHasher>,
    // declared spouse key -> positions declaring it
    declared_spouse: HashMap<String, Vec<Position>, NameHasher>,
}

impl<'a> Kinship<'a> {
    pub fn new(people: &'a [Person]) -> Self {
        let full_names: Vec<String> = people.iter().map(Person::full_name).collect();
        let mut by_name: HashMap<String, Vec<Position>, NameHasher> = HashMap::default();
        let mut children: HashMap<String, Vec<Position>, NameHasher> = HashMap::default();
        let mut declared_spouse: HashMap<String, Vec<Position>, NameHasher> = HashMap::default();
        for (position, person) in people.iter().enumerate() {
            if !full_names[position].is_empty() {
                by_name.entry(full_names[position].clone()).or_default().push(position);
            }
            let [parent1, parent2] = person.parent_slots();
            if let Some(parent1) = parent1 {
                children.entry(parent1.to_string()).or_default().push(position);
            }
            if let Some(parent2) = parent2.filter(|p| Some(*p) != parent1) {
                children.entry(parent2.to_string()).or_default().push(position);
            }
            let spouse = person.spouse_full_name();
            if !spouse.is_empty() {
                declared_spouse.entry(spouse).or_default().push(position);
            }
        }
        Self {
            people,
            full_names,
            by_name,
            children,
            declared_spouse,
        }
    }
    pub fn people(&self) -> &'a [Person] {
        self.people
    }
    pub fn person(&self, position: Position) -> &'a Person {
        &self.people[position]
    }
    pub fn len(&self) -> usize {
        self.people.len()
    }
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
    pub fn full_name(&self, position: Position) -> &str {
        &self.full_names[position]
    }
    /// Everyone carrying this full name.
    pub fn named(&self, full_name: &str) -> &[Position] {
        self.by_name.get(full_name).map(Vec::as_slice).unwrap_or_default()
    }
    /// Resolves a parent or spouse reference to a single person. When several
    /// people share the name the last one in input order wins.
    pub fn resolve(&self, full_name: &str) -> Option<Position> {
        self.named(full_name).last().copied()
    }
    pub fn resolves(&self, full_name: Option<&str>) -> bool {
        full_name.is_some_and(|name| !self.named(name).is_empty())
    }
    /// Everyone whose parent slots name the person at `position`.
    pub fn children_of(&self, position: Position) -> &[Position] {
        self.children
            .get(self.full_name(position))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
    /// Positions the parent slots of `position` resolve to, without duplicates.
    pub fn parents_of(&self, position: Position) -> Vec<Position> {
        let mut parents: Vec<Position> = Vec::with_capacity(2);
        for slot in self.person(position).parent_slots().into_iter().flatten() {
            if let Some(parent) = self.resolve(slot) {
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
        }
        parents
    }
    /// Is any parent slot of `position` a person in this snapshot?
    pub fn has_resolvable_parent(&self, position: Position) -> bool {
        self.person(position)
            .parent_slots()
            .iter()
            .any(|slot| self.resolves(*slot))
    }
    /// Every spouse of `position` in input order, excluding records that share
    /// its identifier.
    pub fn spouses_of(&self, position: Position) -> Vec<Position> {
        let person = self.person(position);
        let declared = person.spouse_full_name();
        let mut spouses: Vec<Position> = Vec::new();
        if !declared.is_empty() {
            spouses.extend_from_slice(self.named(&declared));
        }
        if let Some(declaring) = self.declared_spouse.get(self.full_name(position)) {
            spouses.extend_from_slice(declaring);
        }
        spouses.sort_unstable();
        spouses.dedup();
        spouses.retain(|other| self.person(*other).id() != person.id());
        spouses
    }
    /// The first spouse of `position` in input order.
    pub fn spouse_of(&self, position: Position) -> Option<Position> {
        self.spouses_of(position).first().copied()
    }
}
