//! Family blocks, the unit handed to rendering.
//!
//! Blocks are built in two passes. Parent links come first: everyone with a
//! parent in the snapshot is grouped under the (order-independent) pair of
//! parent names they list. Whoever is left over afterwards is paired with an
//! equally unplaced spouse or stands alone.

use std::collections::{BTreeMap, HashMap};

use roaring::RoaringBitmap;
use serde::Serialize;

use crate::generation::{Generation, Generations, assign};
use crate::person::Person;
use crate::relation::{Kinship, NameHasher, Position};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// One or two parents with their children.
    Family,
    /// A childless couple.
    Couple,
    Single,
}

#[derive(Clone, Debug, Serialize)]
pub struct FamilyBlock<'a> {
    kind: BlockKind,
    generation: Generation,
    parents: Vec<&'a Person>,
    children: Vec<&'a Person>,
    #[serde(skip)]
    anchor: usize,
}

impl<'a> FamilyBlock<'a> {
    pub fn kind(&self) -> BlockKind {
        self.kind
    }
    pub fn generation(&self) -> Generation {
        self.generation
    }
    /// The people drawn on the block's own row (one or two).
    pub fn parents(&self) -> &[&'a Person] {
        &self.parents
    }
    /// Children in display order, drawn on the row below.
    pub fn children(&self) -> &[&'a Person] {
        &self.children
    }
    /// Lowest traversal index among the parents, used to order blocks in a row.
    pub fn anchor(&self) -> usize {
        self.anchor
    }
    /// Does this block show the given person, as parent or child?
    pub fn contains(&self, person: &Person) -> bool {
        self.parents
            .iter()
            .chain(self.children.iter())
            .any(|p| std::ptr::eq(*p, person))
    }
}

pub type BlocksByGeneration<'a> = BTreeMap<Generation, Vec<FamilyBlock<'a>>>;

pub fn build_family_blocks(people: &[Person]) -> BlocksByGeneration<'_> {
    let kinship = Kinship::new(people);
    let generations = assign(&kinship);
    group_blocks(&kinship, &generations)
}

struct Group {
    parents: Vec<Position>,
    children: Vec<Position>,
}

/// Groups an already assigned snapshot into blocks.
pub fn group_blocks<'a>(kinship: &Kinship<'a>, generations: &Generations<'a>) -> BlocksByGeneration<'a> {
    let ordered = generations.ordered();
    let mut placed = RoaringBitmap::new();
    let mut blocks: Vec<FamilyBlock<'a>> = Vec::new();

    // parent links
    let mut group_of: HashMap<Vec<&'a str>, usize, NameHasher> = HashMap::default();
    let mut groups: Vec<Group> = Vec::new();
    for &position in &ordered {
        if !kinship.has_resolvable_parent(position) {
            continue;
        }
        let person = kinship.person(position);
        let mut key: Vec<&'a str> = person.parent_slots().into_iter().flatten().collect();
        key.sort_unstable();
        key.dedup();
        let index = *group_of.entry(key).or_insert_with(|| {
            groups.push(Group {
                parents: kinship.parents_of(position),
                children: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index].children.push(position);
    }
    for group in groups {
        for &position in group.parents.iter().chain(group.children.iter()) {
            placed.insert(position as u32);
        }
        blocks.push(FamilyBlock {
            kind: BlockKind::Family,
            generation: group
                .parents
                .iter()
                .map(|p| generations.generation(*p))
                .max()
                .unwrap_or_default(),
            anchor: anchor(generations, &group.parents),
            parents: group.parents.iter().map(|p| kinship.person(*p)).collect(),
            children: group.children.iter().map(|c| kinship.person(*c)).collect(),
        });
    }

    // leftovers
    for &position in &ordered {
        if placed.contains(position as u32) {
            continue;
        }
        placed.insert(position as u32);
        let spouse = kinship
            .spouses_of(position)
            .into_iter()
            .find(|spouse| !placed.contains(*spouse as u32));
        let members = match spouse {
            Some(spouse) => {
                placed.insert(spouse as u32);
                vec![position, spouse]
            }
            None => vec![position],
        };
        blocks.push(FamilyBlock {
            kind: if members.len() == 2 { BlockKind::Couple } else { BlockKind::Single },
            generation: members
                .iter()
                .map(|p| generations.generation(*p))
                .max()
                .unwrap_or_default(),
            anchor: anchor(generations, &members),
            parents: members.iter().map(|p| kinship.person(*p)).collect(),
            children: Vec::new(),
        });
    }

    let mut by_generation: BlocksByGeneration<'a> = BTreeMap::new();
    for block in blocks {
        by_generation.entry(block.generation).or_default().push(block);
    }
    for row in by_generation.values_mut() {
        row.sort_by_key(FamilyBlock::anchor);
    }
    by_generation
}

fn anchor(generations: &Generations, members: &[Position]) -> usize {
    members
        .iter()
        .map(|p| generations.bfs_index(*p))
        .min()
        .unwrap_or(usize::MAX)
}
