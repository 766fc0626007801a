//! A complete layout of one snapshot, ready to be rendered or serialized.

use serde::Serialize;

use crate::block::{BlocksByGeneration, group_blocks};
use crate::generation::{Generation, Generations, Placement, assign};
use crate::grouping::{RowUnit, pair_spouses};
use crate::person::Person;
use crate::relation::Kinship;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedPerson<'a> {
    #[serde(flatten)]
    pub person: &'a Person,
    pub display_name: String,
    #[serde(flatten)]
    pub placement: Placement,
}

#[derive(Debug, Serialize)]
pub struct GenerationRow<'a> {
    pub generation: Generation,
    pub people: Vec<PlacedPerson<'a>>,
    pub units: Vec<RowUnit<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Layout<'a> {
    #[serde(skip)]
    generations: Generations<'a>,
    rows: Vec<GenerationRow<'a>>,
    blocks: BlocksByGeneration<'a>,
}

impl<'a> Layout<'a> {
    /// Indexes the snapshot once and derives everything from that index.
    pub fn compute(people: &'a [Person]) -> Self {
        let kinship = Kinship::new(people);
        let generations = assign(&kinship);
        let blocks = group_blocks(&kinship, &generations);
        let mut rows: Vec<GenerationRow<'a>> = Vec::new();
        for position in generations.ordered() {
            let placement = generations.placement(position);
            if rows.last().is_none_or(|row| row.generation != placement.generation) {
                rows.push(GenerationRow {
                    generation: placement.generation,
                    people: Vec::new(),
                    units: Vec::new(),
                });
            }
            if let Some(row) = rows.last_mut() {
                let person = &people[position];
                row.people.push(PlacedPerson {
                    person,
                    display_name: person.display_name(),
                    placement,
                });
            }
        }
        for row in rows.iter_mut() {
            let members: Vec<&'a Person> = row.people.iter().map(|placed| placed.person).collect();
            row.units = pair_spouses(&members);
        }
        Self { generations, rows, blocks }
    }
    pub fn generations(&self) -> &Generations<'a> {
        &self.generations
    }
    pub fn rows(&self) -> &[GenerationRow<'a>] {
        &self.rows
    }
    pub fn blocks(&self) -> &BlocksByGeneration<'a> {
        &self.blocks
    }
}
