//! Generation assignment.
//!
//! A run walks the snapshot breadth first from its roots, giving every person
//! a generation (tree depth, starting at 1) and a traversal index. The index
//! is what keeps siblings next to each other when a generation is laid out.
//! After the walk, spouses and co-parents are pulled onto the same row and the
//! result is settled so that children always sit below their parents.
//!
//! The assigner never fails. Dangling parent names, cycles and duplicated
//! names all produce a complete (if imperfect) assignment.

use std::cmp::Ordering;
use std::collections::VecDeque;

use roaring::RoaringBitmap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::name::normalize_name_part;
use crate::person::{Person, PersonId};
use crate::relation::{Kinship, Position, has_parents};

pub type Generation = u32;

pub const FIRST_GENERATION: Generation = 1;

/// Where one person ended up in a layout run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub generation: Generation,
    pub bfs_index: usize,
}

/// The outcome of one assignment run: a placement for every person of the
/// snapshot, held beside the records instead of written onto them.
#[derive(Debug)]
pub struct Generations<'a> {
    people: &'a [Person],
    placements: Vec<Placement>,
}

impl<'a> Generations<'a> {
    pub fn people(&self) -> &'a [Person] {
        self.people
    }
    pub fn len(&self) -> usize {
        self.placements.len()
    }
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
    pub fn placement(&self, position: Position) -> Placement {
        self.placements[position]
    }
    pub fn generation(&self, position: Position) -> Generation {
        self.placements[position].generation
    }
    pub fn bfs_index(&self, position: Position) -> usize {
        self.placements[position].bfs_index
    }
    /// Placement of the first record carrying this identifier.
    pub fn get(&self, id: &PersonId) -> Option<Placement> {
        self.people
            .iter()
            .position(|p| p.id() == id)
            .map(|position| self.placements[position])
    }
    pub fn iter(&self) -> impl Iterator<Item = (&'a Person, Placement)> + '_ {
        self.people.iter().zip(self.placements.iter().copied())
    }
    /// Orders two people of the same generation: traversal index first, then
    /// birth date when both are known, then last and first name.
    ///
    /// Traversal indexes are unique within a run, so for two distinct people
    /// the index alone decides and the later keys only matter for `a == b`.
    pub fn compare(&self, a: Position, b: Position) -> Ordering {
        let (pa, pb) = (&self.people[a], &self.people[b]);
        self.bfs_index(a)
            .cmp(&self.bfs_index(b))
            .then_with(|| match (pa.born(), pb.born()) {
                (Some(da), Some(db)) => da.cmp(&db),
                _ => Ordering::Equal,
            })
            .then_with(|| compare_names(pa, pb))
    }
    /// Every position sorted by generation, then by [`Generations::compare`].
    pub fn ordered(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = (0..self.len()).collect();
        positions.sort_by(|a, b| {
            self.generation(*a)
                .cmp(&self.generation(*b))
                .then_with(|| self.compare(*a, *b))
        });
        positions
    }
}

/// Alphabetical by last name, then first name.
pub fn compare_names(a: &Person, b: &Person) -> Ordering {
    normalize_name_part(a.last_name())
        .cmp(&normalize_name_part(b.last_name()))
        .then_with(|| normalize_name_part(a.first_name()).cmp(&normalize_name_part(b.first_name())))
}

pub fn assign_generations(people: &[Person]) -> Generations<'_> {
    assign(&Kinship::new(people))
}

/// Runs the assignment against an index that was already built.
pub fn assign<'a>(kinship: &Kinship<'a>) -> Generations<'a> {
    let mut run = Run::new(kinship);
    run.traverse();
    run.sweep_orphans();
    run.align_spouses();
    run.align_co_parents();
    run.settle();
    debug!(people = kinship.len(), "generations assigned");
    run.finish()
}

/// The generation of one person within `all`, matched by identifier and
/// then by full name. Unknown people are in the first generation.
pub fn figure_out_generation<'p>(person: impl Into<Option<&'p Person>>, all: &[Person]) -> Generation {
    let Some(person) = person.into() else {
        return FIRST_GENERATION;
    };
    let generations = assign_generations(all);
    let full_name = person.full_name();
    all.iter()
        .position(|p| p.id() == person.id())
        .or_else(|| all.iter().position(|p| p.full_name() == full_name))
        .map(|position| generations.generation(position))
        .unwrap_or(FIRST_GENERATION)
}

// ------------- Run -------------
struct Run<'k, 'a> {
    kinship: &'k Kinship<'a>,
    generation: Vec<Option<Generation>>,
    bfs_index: Vec<Option<usize>>,
    next_index: usize,
}

impl<'k, 'a> Run<'k, 'a> {
    fn new(kinship: &'k Kinship<'a>) -> Self {
        let n = kinship.len();
        Self {
            kinship,
            generation: vec![None; n],
            bfs_index: vec![None; n],
            next_index: 0,
        }
    }
    fn generation_of(&self, position: Position) -> Generation {
        self.generation[position].unwrap_or(FIRST_GENERATION)
    }
    fn roots(&self) -> Vec<Position> {
        let kinship = self.kinship;
        let mut roots: Vec<Position> = (0..kinship.len())
            .filter(|position| !kinship.has_resolvable_parent(*position))
            .collect();
        if roots.is_empty() && !kinship.is_empty() {
            warn!(people = kinship.len(), "no roots found, starting from the first person");
            roots.push(0);
        }
        roots
    }
    fn traverse(&mut self) {
        let mut visited = RoaringBitmap::new();
        let mut queue: VecDeque<Position> = VecDeque::new();
        for root in self.roots() {
            if visited.insert(root as u32) {
                self.generation[root] = Some(FIRST_GENERATION);
                queue.push_back(root);
            }
        }
        while let Some(current) = queue.pop_front() {
            self.bfs_index[current] = Some(self.next_index);
            self.next_index += 1;
            let proposed = self.generation_of(current) + 1;
            for &child in self.kinship.children_of(current) {
                // a child reachable through several parents settles at the deepest one
                if self.generation[child].is_none_or(|g| g < proposed) {
                    self.generation[child] = Some(proposed);
                }
                if visited.insert(child as u32) {
                    queue.push_back(child);
                }
            }
        }
    }
    fn sweep_orphans(&mut self) {
        for position in 0..self.kinship.len() {
            if self.generation[position].is_none() {
                self.generation[position] = Some(FIRST_GENERATION);
            }
            if self.bfs_index[position].is_none() {
                self.bfs_index[position] = Some(self.next_index);
                self.next_index += 1;
            }
        }
    }
    /// Couples share a row. When only one of them has recorded parents the
    /// couple is anchored to that side, otherwise both move to the deeper row.
    fn align_spouses(&mut self) {
        for position in 0..self.kinship.len() {
            let Some(spouse) = self.kinship.spouse_of(position) else {
                continue;
            };
            let (mine, theirs) = (self.generation_of(position), self.generation_of(spouse));
            if mine == theirs {
                continue;
            }
            let target = match (
                has_parents(self.kinship.person(position)),
                has_parents(self.kinship.person(spouse)),
            ) {
                (true, false) => mine,
                (false, true) => theirs,
                _ => mine.max(theirs),
            };
            self.generation[position] = Some(target);
            self.generation[spouse] = Some(target);
        }
    }
    /// Both parents of a child move to the deeper of their two rows.
    fn align_co_parents(&mut self) {
        for position in 0..self.kinship.len() {
            let [Some(parent1), Some(parent2)] = self.kinship.person(position).parent_slots() else {
                continue;
            };
            let (Some(p1), Some(p2)) = (self.kinship.resolve(parent1), self.kinship.resolve(parent2)) else {
                continue;
            };
            let target = self.generation_of(p1).max(self.generation_of(p2));
            self.generation[p1] = Some(target);
            self.generation[p2] = Some(target);
        }
    }
    /// Repeats raise-only passes until spouses share a row, co-parents share a
    /// row and every child sits below its parents. Cyclic data never settles,
    /// so the number of rounds is bounded by the size of the snapshot and the
    /// aligned generations are kept when the bound is hit.
    fn settle(&mut self) {
        let n = self.kinship.len();
        let aligned = self.generation.clone();
        for _ in 0..=n {
            let mut changed = false;
            for position in 0..n {
                for spouse in self.kinship.spouses_of(position) {
                    changed |= self.raise_together(position, spouse);
                }
                if let &[p1, p2] = self.kinship.parents_of(position).as_slice() {
                    changed |= self.raise_together(p1, p2);
                }
                let below = self.generation_of(position) + 1;
                for &child in self.kinship.children_of(position) {
                    if self.generation_of(child) < below {
                        self.generation[child] = Some(below);
                        changed = true;
                    }
                }
            }
            if !changed {
                return;
            }
        }
        warn!(people = n, "generations did not settle, the family data likely contains a cycle");
        self.generation = aligned;
    }
    fn raise_together(&mut self, a: Position, b: Position) -> bool {
        let (ga, gb) = (self.generation_of(a), self.generation_of(b));
        if ga == gb {
            return false;
        }
        let target = ga.max(gb);
        self.generation[a] = Some(target);
        self.generation[b] = Some(target);
        true
    }
    fn finish(self) -> Generations<'a> {
        let placements = self
            .generation
            .iter()
            .zip(self.bfs_index.iter())
            .map(|(generation, bfs_index)| Placement {
                generation: generation.unwrap_or(FIRST_GENERATION),
                bfs_index: bfs_index.unwrap_or_default(),
            })
            .collect();
        Generations {
            people: self.kinship.people(),
            placements,
        }
    }
}
