// used for persistence
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{LineageError, Result};
use crate::name::normalize_name_part;
use crate::person::{FamilyId, Person};

// Exclude confusing characters like 0/O and 1/I
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const JOIN_CODE_LENGTH: usize = 6;
const JOIN_CODE_ATTEMPTS: u32 = 16;
const DOCUMENT_ID_LENGTH: usize = 20;

const PERSON_COLUMNS: &str = "
    Person_Identity,
    FirstName,
    MiddleInitial,
    LastName,
    SpouseFirstName,
    SpouseLastName,
    Parent1,
    Parent2,
    BirthDate
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceMode {
    InMemory,
    File(String),
}

// ------------- Record source -------------
/// Where the layout engine gets its snapshot from.
///
/// `None` as scope means the shared example dataset. An unknown or empty
/// scope is not an error, it simply has nobody in it.
pub trait RecordSource {
    fn fetch_all_people(&self, scope: Option<&FamilyId>) -> Result<Vec<Person>>;
    fn fetch_person_by_name(&self, first: &str, last: &str, scope: Option<&FamilyId>) -> Result<Option<Person>>;
}

/// A record source over a plain list, for tests and for embedding the engine
/// next to some other store.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    records: Vec<(Option<FamilyId>, Person)>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_people(scope: Option<&FamilyId>, people: impl IntoIterator<Item = Person>) -> Self {
        let mut source = Self::new();
        for person in people {
            source.push(scope, person);
        }
        source
    }
    pub fn push(&mut self, scope: Option<&FamilyId>, person: Person) {
        self.records.push((scope.cloned(), person));
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for InMemorySource {
    fn fetch_all_people(&self, scope: Option<&FamilyId>) -> Result<Vec<Person>> {
        Ok(self
            .records
            .iter()
            .filter(|(family, _)| family.as_ref() == scope)
            .map(|(_, person)| person.clone())
            .collect())
    }
    fn fetch_person_by_name(&self, first: &str, last: &str, scope: Option<&FamilyId>) -> Result<Option<Person>> {
        let (first, last) = (normalize_name_part(first), normalize_name_part(last));
        if first.is_empty() || last.is_empty() {
            return Ok(None);
        }
        Ok(self
            .records
            .iter()
            .filter(|(family, _)| family.as_ref() == scope)
            .map(|(_, person)| person)
            .find(|person| {
                normalize_name_part(person.first_name()) == first
                    && normalize_name_part(person.last_name()) == last
            })
            .cloned())
    }
}

// ------------- Data entry -------------
/// A person as typed into the data-entry form: free text, not yet normalized.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewPerson {
    pub first_name: String,
    pub middle_initial: String,
    pub last_name: String,
    /// Free text such as `"Mary Ann Smith"`.
    pub spouse: String,
    pub parent1: String,
    pub parent2: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    pub id: FamilyId,
    pub name: String,
    pub description: String,
    pub join_code: String,
    pub created_at: DateTime<Utc>,
}

// ------------- Persistence -------------
pub struct Persistor {
    connection: Mutex<Connection>,
    sequence: AtomicU64,
}

impl Persistor {
    pub fn new(mode: PersistenceMode) -> Result<Self> {
        let connection = match &mode {
            PersistenceMode::InMemory => Connection::open_in_memory()?,
            PersistenceMode::File(path) => Connection::open(path)?,
        };
        // The "STRICT" keyword introduced in 3.37.0 breaks JDBC connections, which makes
        // debugging using an external tool like DBeaver impossible
        connection.execute_batch(
            "
            create table if not exists Family (
                Family_Identity text not null,
                Name text not null,
                Description text not null,
                Join_Code text not null,
                Created_At text not null,
                constraint referenceable_Family_Identity primary key (
                    Family_Identity
                ),
                constraint unique_Join_Code unique (
                    Join_Code
                )
            );-- STRICT;
            create table if not exists Person (
                Person_Row integer primary key,
                Person_Identity text not null,
                Family_Identity text null,
                FirstName text not null,
                MiddleInitial text null,
                LastName text not null,
                SpouseFirstName text null,
                SpouseLastName text null,
                Parent1 text null,
                Parent2 text null,
                BirthDate text null,
                constraint Person_in_Family foreign key (
                    Family_Identity
                ) references Family(Family_Identity),
                constraint unique_Person_Identity unique (
                    Person_Identity
                )
            );-- STRICT;
            create index if not exists Person_by_Name on Person (
                Family_Identity,
                LastName,
                FirstName
            );
            ",
        )?;
        info!(?mode, "record store opened");
        Ok(Self {
            connection: Mutex::new(connection),
            sequence: AtomicU64::new(0),
        })
    }
    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        Ok(self.connection.lock()?)
    }
    fn next_seed(&self, text: &str) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("{}|{}|{}", text, nanos, sequence)
    }
    pub fn create_family(&self, name: &str, description: &str) -> Result<Family> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LineageError::Validation {
                message: "a family needs a name".to_string(),
            });
        }
        let connection = self.connection()?;
        for _ in 0..JOIN_CODE_ATTEMPTS {
            let seed = self.next_seed(name);
            let join_code = join_code(&seed);
            let taken = connection
                .query_row(
                    "select Family_Identity from Family where Join_Code = ?",
                    params![&join_code],
                    |r| r.get::<_, String>(0),
                )
                .optional()?
                .is_some();
            if taken {
                continue;
            }
            let family = Family {
                id: FamilyId::new(document_id(&seed)),
                name: name.to_string(),
                description: description.trim().to_string(),
                join_code,
                created_at: Utc::now(),
            };
            connection.execute(
                "
                insert into Family (
                    Family_Identity,
                    Name,
                    Description,
                    Join_Code,
                    Created_At
                ) values (?, ?, ?, ?, ?)
            ",
                params![
                    family.id.as_str(),
                    &family.name,
                    &family.description,
                    &family.join_code,
                    &family.created_at
                ],
            )?;
            info!(family = %family.id, "family created");
            return Ok(family);
        }
        Err(LineageError::Persistence(format!(
            "could not find a free join code after {} attempts",
            JOIN_CODE_ATTEMPTS
        )))
    }
    /// Looks a family up by its join code, ignoring surrounding whitespace and case.
    pub fn join_family(&self, code: &str) -> Result<Option<Family>> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Ok(None);
        }
        let family = self
            .connection()?
            .query_row(
                "
                select Family_Identity, Name, Description, Join_Code, Created_At
                    from Family
                    where Join_Code = ?
            ",
                params![&code],
                |r| {
                    Ok(Family {
                        id: FamilyId::new(r.get::<_, String>(0)?),
                        name: r.get(1)?,
                        description: r.get(2)?,
                        join_code: r.get(3)?,
                        created_at: r.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(family)
    }
    /// Stores a form entry the way the data-entry form always has: names are
    /// lower-cased and the spouse entry is split into first and last name.
    pub fn add_person(&self, entry: &NewPerson, scope: Option<&FamilyId>) -> Result<Person> {
        if entry.first_name.trim().is_empty() || entry.last_name.trim().is_empty() {
            return Err(LineageError::Validation {
                message: "a person needs both a first and a last name".to_string(),
            });
        }
        let seed = self.next_seed(&format!(
            "{}|{} {}",
            scope.map(FamilyId::as_str).unwrap_or_default(),
            entry.first_name,
            entry.last_name
        ));
        let person = Person::new(document_id(&seed), &entry.first_name, &entry.last_name)
            .with_middle_initial(&entry.middle_initial)
            .with_spouse_name(&entry.spouse)
            .with_parents(Some(&entry.parent1), Some(&entry.parent2))
            .with_birth_date(&entry.birth_date);
        self.persist_person(&person, scope)?;
        Ok(person)
    }
    /// Stores a complete record. Returns true when a record with the same
    /// identifier was already there, in which case nothing is written.
    pub fn persist_person(&self, person: &Person, scope: Option<&FamilyId>) -> Result<bool> {
        let connection = self.connection()?;
        let existing = connection
            .query_row(
                "select Person_Row from Person where Person_Identity = ?",
                params![person.id().as_str()],
                |r| r.get::<_, i64>(0),
            )
            .optional()?
            .is_some();
        if !existing {
            connection.execute(
                "
                insert into Person (
                    Person_Identity,
                    Family_Identity,
                    FirstName,
                    MiddleInitial,
                    LastName,
                    SpouseFirstName,
                    SpouseLastName,
                    Parent1,
                    Parent2,
                    BirthDate
                ) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
                params![
                    person.id().as_str(),
                    scope.map(FamilyId::as_str),
                    person.first_name(),
                    person.middle_initial(),
                    person.last_name(),
                    person.spouse_first_name(),
                    person.spouse_last_name(),
                    person.parent1(),
                    person.parent2(),
                    person.birth_date()
                ],
            )?;
        }
        Ok(existing)
    }
}

impl RecordSource for Persistor {
    fn fetch_all_people(&self, scope: Option<&FamilyId>) -> Result<Vec<Person>> {
        let connection = self.connection()?;
        let mut statement = connection.prepare_cached(&format!(
            "select {} from Person where Family_Identity is ? order by Person_Row",
            PERSON_COLUMNS
        ))?;
        let people = statement
            .query_map(params![scope.map(FamilyId::as_str)], person_from_row)?
            .collect::<rusqlite::Result<Vec<Person>>>()?;
        debug!(people = people.len(), scope = ?scope, "people fetched");
        Ok(people)
    }
    fn fetch_person_by_name(&self, first: &str, last: &str, scope: Option<&FamilyId>) -> Result<Option<Person>> {
        let (first, last) = (normalize_name_part(first), normalize_name_part(last));
        if first.is_empty() || last.is_empty() {
            return Ok(None);
        }
        let connection = self.connection()?;
        let mut statement = connection.prepare_cached(&format!(
            "select {} from Person
                where FirstName = ? and LastName = ? and Family_Identity is ?
                order by Person_Row
                limit 1",
            PERSON_COLUMNS
        ))?;
        let person = statement
            .query_row(params![&first, &last, scope.map(FamilyId::as_str)], person_from_row)
            .optional()?;
        Ok(person)
    }
}

fn person_from_row(row: &Row) -> rusqlite::Result<Person> {
    let id: String = row.get(0)?;
    let first: String = row.get(1)?;
    let middle: Option<String> = row.get(2)?;
    let last: String = row.get(3)?;
    let spouse_first: Option<String> = row.get(4)?;
    let spouse_last: Option<String> = row.get(5)?;
    let parent1: Option<String> = row.get(6)?;
    let parent2: Option<String> = row.get(7)?;
    let birth_date: Option<String> = row.get(8)?;
    Ok(Person::new(id, &first, &last)
        .with_middle_initial(middle.as_deref().unwrap_or_default())
        .with_spouse(
            spouse_first.as_deref().unwrap_or_default(),
            spouse_last.as_deref().unwrap_or_default(),
        )
        .with_parents(parent1.as_deref(), parent2.as_deref())
        .with_birth_date(birth_date.as_deref().unwrap_or_default()))
}

fn document_id(seed: &str) -> String {
    blake3::hash(seed.as_bytes()).to_hex().as_str()[..DOCUMENT_ID_LENGTH].to_string()
}

fn join_code(seed: &str) -> String {
    blake3::hash(seed.as_bytes())
        .as_bytes()
        .iter()
        .take(JOIN_CODE_LENGTH)
        .map(|b| JOIN_CODE_ALPHABET[*b as usize % JOIN_CODE_ALPHABET.len()] as char)
        .collect()
}
