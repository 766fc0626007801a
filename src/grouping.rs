//! Bucketing and sorting helpers for presentation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::generation::{Generation, Generations, assign_generations, compare_names};
use crate::name::normalize_name_part;
use crate::person::Person;
use crate::relation::are_spouses;

pub type PeopleByGeneration<'a> = BTreeMap<Generation, Vec<&'a Person>>;

/// Runs the assigner and buckets people by generation. Within a generation
/// people keep traversal order, so siblings stay together.
pub fn group_by_generation(people: &[Person]) -> PeopleByGeneration<'_> {
    by_generation(&assign_generations(people))
}

/// Buckets an existing assignment without running it again.
pub fn by_generation<'a>(generations: &Generations<'a>) -> PeopleByGeneration<'a> {
    let people = generations.people();
    let mut map: PeopleByGeneration<'a> = BTreeMap::new();
    for position in generations.ordered() {
        map.entry(generations.generation(position))
            .or_default()
            .push(&people[position]);
    }
    map
}

/// Generation numbers in ascending order. Works with any map keyed by
/// generation, ordered or not.
pub fn sort_generation_keys<'m, V: 'm>(map: impl IntoIterator<Item = (&'m Generation, V)>) -> Vec<Generation> {
    let mut keys: Vec<Generation> = map.into_iter().map(|(key, _)| *key).collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Alphabetical by last name, then first name. Independent of generations.
pub fn sort_people_by_name<'a>(people: impl IntoIterator<Item = &'a Person>) -> Vec<&'a Person> {
    let mut sorted: Vec<&'a Person> = people.into_iter().collect();
    sorted.sort_by(|a, b| compare_names(a, b));
    sorted
}

// ------------- Generation rows -------------
/// How one generation row is drawn: spouses side by side, everyone else alone.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RowUnit<'a> {
    Pair { person: &'a Person, spouse: &'a Person },
    Single { person: &'a Person },
}

impl<'a> RowUnit<'a> {
    pub fn people(&self) -> Vec<&'a Person> {
        match *self {
            RowUnit::Pair { person, spouse } => vec![person, spouse],
            RowUnit::Single { person } => vec![person],
        }
    }
}

/// Walks a row in order, pairing each person with the first unused spouse
/// found anywhere in the same row.
pub fn pair_spouses<'a>(row: &[&'a Person]) -> Vec<RowUnit<'a>> {
    let mut used = vec![false; row.len()];
    let mut units = Vec::with_capacity(row.len());
    for (i, &person) in row.iter().enumerate() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let spouse = (0..row.len()).find(|j| !used[*j] && are_spouses(person, row[*j]));
        match spouse {
            Some(j) => {
                used[j] = true;
                units.push(RowUnit::Pair { person, spouse: row[j] });
            }
            None => units.push(RowUnit::Single { person }),
        }
    }
    units
}

// ------------- Search -------------
/// Everyone whose normalized full name contains the normalized query, in
/// input order. A blank query matches nobody.
pub fn search_by_name<'a>(people: &'a [Person], query: &str) -> Vec<&'a Person> {
    let query = normalize_name_part(query);
    if query.is_empty() {
        return Vec::new();
    }
    people
        .iter()
        .filter(|person| person.full_name().contains(&query))
        .collect()
}
