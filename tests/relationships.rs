use chrono::NaiveDate;
use lineage::Person;
use lineage::person::parse_birth_date;
use lineage::relation::{
    Kinship, are_siblings, are_spouses, get_children, get_half_siblings, get_siblings, has_children,
    has_parents, has_siblings, has_two_parents,
};

fn ids(people: &[&Person]) -> Vec<String> {
    people.iter().map(|p| p.id().to_string()).collect()
}

fn smiths() -> Vec<Person> {
    vec![
        Person::new("alice", "Alice", "Smith").with_spouse("Bob", "Smith"),
        Person::new("bob", "Bob", "Smith"),
        Person::new("carol", "Carol", "Smith").with_parents(Some("alice smith"), Some("bob smith")),
        // same parents in swapped slots
        Person::new("dave", "Dave", "Smith").with_parents(Some("bob smith"), Some("alice smith")),
        // only shares the father
        Person::new("erin", "Erin", "Smith").with_parents(Some("bob smith"), Some("zoe jones")),
        Person::new("zoe", "Zoe", "Jones"),
        Person::new("frank", "Frank", "Lee"),
    ]
}

#[test]
fn spouse_declared_on_one_side_is_enough() {
    let people = smiths();
    assert!(are_spouses(&people[0], &people[1]));
    assert!(are_spouses(&people[1], &people[0]));
    assert!(!are_spouses(&people[0], &people[2]));
    assert!(!are_spouses(None::<&Person>, &people[0]));
    assert!(!are_spouses(&people[0], None::<&Person>));
}

#[test]
fn people_without_a_spouse_are_not_married_to_each_other() {
    let a = Person::new("a", "Ann", "Nobody");
    let b = Person::new("b", "Ben", "Nobody");
    assert!(!are_spouses(&a, &b));
}

#[test]
fn blank_parent_slots_do_not_count() {
    let blank = Person::new("x", "X", "Y").with_parents(Some("   "), None);
    assert!(!has_parents(&blank));
    let one = Person::new("x", "X", "Y").with_parents(None, Some("Ann Nobody"));
    assert!(has_parents(&one));
    assert!(!has_two_parents(&one));
    let people = smiths();
    assert!(has_two_parents(&people[2]));
    assert!(!has_parents(None::<&Person>));
    assert!(!has_two_parents(None::<&Person>));
}

#[test]
fn full_siblings_ignore_slot_order() {
    let people = smiths();
    assert_eq!(ids(&get_siblings(&people[2], &people)), vec!["dave"]);
    assert_eq!(ids(&get_siblings(&people[3], &people)), vec!["carol"]);
    assert!(has_siblings(&people[2], &people));
    assert!(!has_siblings(&people[4], &people));
}

#[test]
fn half_siblings_share_exactly_one_parent() {
    let people = smiths();
    assert_eq!(ids(&get_half_siblings(&people[4], &people)), vec!["carol", "dave"]);
    assert_eq!(ids(&get_half_siblings(&people[2], &people)), vec!["erin"]);
    assert!(are_siblings(&people[2], &people[4]));
}

#[test]
fn parentless_people_are_nobodys_siblings() {
    let people = smiths();
    assert!(!are_siblings(&people[0], &people[1]));
    assert!(get_siblings(&people[6], &people).is_empty());
    assert!(get_half_siblings(&people[6], &people).is_empty());
    assert!(!are_siblings(None::<&Person>, &people[2]));
    assert!(get_siblings(None::<&Person>, &people).is_empty());
}

#[test]
fn children_are_found_by_either_slot() {
    let people = smiths();
    assert_eq!(ids(&get_children(&people[0], &people)), vec!["carol", "dave"]);
    assert_eq!(ids(&get_children(&people[1], &people)), vec!["carol", "dave", "erin"]);
    assert!(has_children(&people[5], &people));
    assert!(!has_children(&people[6], &people));
    assert!(get_children(None::<&Person>, &people).is_empty());
}

#[test]
fn kinship_resolves_names_to_positions() {
    let people = smiths();
    let kinship = Kinship::new(&people);
    assert_eq!(kinship.len(), people.len());
    assert_eq!(kinship.resolve("alice smith"), Some(0));
    assert_eq!(kinship.resolve("nobody at all"), None);
    assert_eq!(kinship.children_of(1), &[2, 3, 4]);
    assert_eq!(kinship.parents_of(3), vec![1, 0]);
    assert_eq!(kinship.spouses_of(0), vec![1]);
    assert_eq!(kinship.spouses_of(1), vec![0]);
    assert_eq!(kinship.spouse_of(6), None);
    assert!(kinship.has_resolvable_parent(4));
    assert!(!kinship.has_resolvable_parent(0));
}

#[test]
fn same_named_people_collapse_onto_the_last_one() {
    let people = vec![
        Person::new("1", "John", "Smith"),
        Person::new("2", "John", "Smith"),
        Person::new("3", "Kid", "Smith").with_parents(Some("john smith"), Some("john smith")),
    ];
    let kinship = Kinship::new(&people);
    assert_eq!(kinship.named("john smith"), &[0, 1]);
    assert_eq!(kinship.resolve("john smith"), Some(1));
    // both slots name the same person
    assert_eq!(kinship.parents_of(2), vec![1]);
    assert_eq!(kinship.children_of(0), &[2]);
}

#[test]
fn birth_dates_in_common_formats() {
    let expected = NaiveDate::from_ymd_opt(1950, 3, 4);
    assert_eq!(parse_birth_date("1950-03-04"), expected);
    assert_eq!(parse_birth_date("03/04/1950"), expected);
    assert_eq!(parse_birth_date("1950-03-04T10:00:00Z"), expected);
    assert_eq!(parse_birth_date("spring of 1950"), None);
    assert_eq!(parse_birth_date("1950-13-40"), None);
}
