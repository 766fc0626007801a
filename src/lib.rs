//! Lineage – relationship inference and generational layout for family records.
//!
//! Lineage works on *flat* family records: every person is a single record and
//! relationships are not references but names.
//! * A parent is named in one of the `parent1` / `parent2` slots of the child,
//!   holding the normalized `"first last"` of the parent.
//! * A spouse is declared as a first and last name on either partner. One
//!   side declaring it is enough.
//! * Siblings are never stored at all, they are derived from shared parents.
//!
//! From such a snapshot the crate reconstructs the family graph, gives every
//! person a generation and a stable position within it, and groups people into
//! blocks (parents with their children, childless couples, singles) that a
//! renderer can draw row by row.
//!
//! ## Modules
//! * [`name`] – Name canonicalization. The normalized full name is the one and
//!   only cross-reference key.
//! * [`person`] – The [`person::Person`] record and its identifiers.
//! * [`relation`] – Spouse, parent, child and sibling queries plus the
//!   [`relation::Kinship`] index used for a layout run.
//! * [`generation`] – Breadth-first generation assignment with spouse and
//!   co-parent alignment.
//! * [`block`] – Family blocks, the unit handed to rendering.
//! * [`grouping`] – Bucketing by generation, sorting, row pairing and search.
//! * [`layout`] – Everything above bundled for one snapshot.
//! * [`persist`] – The [`persist::RecordSource`] interface with a SQLite and an
//!   in-memory implementation.
//! * [`config`] – Settings for the binary.
//!
//! ## Layout runs
//! Layout is never stored. Every render fetches a fresh snapshot and computes
//! generations, ordering and blocks from scratch. Computed values are held in
//! [`generation::Generations`] beside the records, the records themselves are
//! left untouched.
//!
//! Data problems are not errors. A parent name that matches nobody makes the
//! child a root, cycles are cut by the traversal, and two people sharing a name
//! are treated as one node by every lookup (a known limitation of name-keyed
//! relationships).
//!
//! ## Quick Start
//! ```
//! use lineage::{Layout, Person};
//! let people = vec![
//!     Person::new("1", "Alice", "Smith").with_spouse("Bob", "Smith"),
//!     Person::new("2", "Bob", "Smith"),
//!     Person::new("3", "Carol", "Smith").with_parents(Some("alice smith"), Some("bob smith")),
//! ];
//! let layout = Layout::compute(&people);
//! assert_eq!(layout.rows().len(), 2);
//! assert_eq!(layout.blocks()[&1].len(), 1);
//! ```

pub mod block;
pub mod config;
pub mod error;
pub mod generation;
pub mod grouping;
pub mod layout;
pub mod name;
pub mod persist;
pub mod person;
pub mod relation;

pub use block::{BlockKind, FamilyBlock, build_family_blocks};
pub use error::{LineageError, Result};
pub use generation::{Generation, Generations, Placement, assign_generations, figure_out_generation};
pub use grouping::{group_by_generation, pair_spouses, search_by_name, sort_generation_keys, sort_people_by_name};
pub use layout::Layout;
pub use persist::{InMemorySource, PersistenceMode, Persistor, RecordSource};
pub use person::{FamilyId, Person, PersonId};
