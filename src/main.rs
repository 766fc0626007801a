use std::fs;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lineage::config::Settings;
use lineage::{Layout, LineageError, Person, PersistenceMode, Persistor, RecordSource};

fn parse_arg(flag: &str) -> Option<String> {
    let mut args = std::env::args();
    while let Some(arg) = args.next() {
        if arg == flag {
            return args.next();
        }
    }
    None
}

fn has_flag(flag: &str) -> bool {
    std::env::args().any(|arg| arg == flag)
}

fn print_help() {
    eprintln!(
        r#"lineage - lays out a family tree by generation

USAGE:
    lineage [OPTIONS]

OPTIONS:
    -d, --database <FILE>   SQLite file holding the records [default: in-memory]
    -f, --family <ID>       Family scope to lay out [default: example dataset]
    -s, --seed <FILE>       JSON array of people to store before the layout
    -h, --help              Print help

ENVIRONMENT:
    LINEAGE_CONFIG          Path to config file [default: lineage.toml]
    LINEAGE_DATABASE        SQLite file
    LINEAGE_FAMILY          Family scope
    LINEAGE_LOG_FILTER      Log filter used when RUST_LOG is unset
"#
    );
}

fn main() -> Result<(), LineageError> {
    if has_flag("-h") || has_flag("--help") {
        print_help();
        return Ok(());
    }

    let mut settings = Settings::load()?;
    if let Some(database) = parse_arg("--database").or_else(|| parse_arg("-d")) {
        settings.database = Some(database);
    }
    if let Some(family) = parse_arg("--family").or_else(|| parse_arg("-f")) {
        settings.family = Some(family);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mode = settings.persistence_mode();
    if mode == PersistenceMode::InMemory {
        info!("no database configured, records only live for this run");
    }
    let persistor = Persistor::new(mode)?;
    let scope = settings.family_scope();

    if let Some(seed) = parse_arg("--seed").or_else(|| parse_arg("-s")) {
        let raw = fs::read_to_string(&seed)?;
        let people: Vec<Person> = serde_json::from_str(&raw)?;
        let mut stored = 0;
        for person in people.iter().filter(|person| person.is_valid()) {
            if persistor.persist_person(person, scope.as_ref())? {
                warn!(id = %person.id(), "record already stored, skipped");
            } else {
                stored += 1;
            }
        }
        info!(stored, file = %seed, "seed records stored");
    }

    let people = persistor.fetch_all_people(scope.as_ref())?;
    let layout = Layout::compute(&people);
    info!(people = people.len(), generations = layout.rows().len(), "layout computed");
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}
