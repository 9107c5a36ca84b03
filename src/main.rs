use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use shortcut_coach::{
    init_logging, Analyzer, CoachSettings, Database, ElementDescriptor, EventDeduplicator,
    EventRecord, SettingsStore, ShortcutCatalog, ShortcutResolver,
};

#[derive(Parser)]
#[command(name = "shortcut-coach", version, about = "Find repeated workflows and missed keyboard shortcuts")]
struct Cli {
    /// JSON settings file; missing values use defaults
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Segment a JSON array of events and print the processes found
    Analyze {
        #[arg(long)]
        input: PathBuf,
        /// Only print processes that repeat
        #[arg(long)]
        frequent: bool,
        /// Drop repeated events inside the dedup cooldown first
        #[arg(long)]
        dedup: bool,
    },
    /// Analyze the recent part of a SQLite event log
    Recent {
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        hours: Option<u32>,
        /// Only print processes seen at least this many times
        #[arg(long)]
        min_frequency: Option<usize>,
    },
    /// Look up the shortcut for a clicked UI element
    Resolve {
        #[arg(long)]
        name: String,
        #[arg(long)]
        app: String,
        #[arg(long, default_value = "Button")]
        element_type: String,
    },
}

fn load_settings(path: Option<PathBuf>) -> Result<CoachSettings> {
    match path {
        Some(path) => Ok(SettingsStore::new(path)?.settings()),
        None => Ok(CoachSettings::default()),
    }
}

fn load_events(path: &PathBuf) -> Result<Vec<EventRecord>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read events from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse events from {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let settings = load_settings(cli.settings)?;

    match cli.command {
        Command::Analyze {
            input,
            frequent,
            dedup,
        } => {
            let mut events = load_events(&input)?;
            if dedup {
                let before = events.len();
                events = EventDeduplicator::from_settings(&settings).filter_batch(events);
                log::info!("dropped {} duplicate events", before - events.len());
            }
            let mut analyzer = Analyzer::from_settings(&settings);
            let processes = if frequent {
                analyzer.frequent_processes(&events)
            } else {
                analyzer.analyze(&events)
            };
            let reports: Vec<_> = processes.iter().map(|p| analyzer.report(p)).collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Command::Recent {
            db,
            hours,
            min_frequency,
        } => {
            let hours = hours.unwrap_or(settings.recent_hours);
            let db = Database::new(db)?;
            let mut analyzer = Analyzer::from_settings(&settings);
            let processes = match min_frequency {
                Some(min) => analyzer.frequent_recent_processes(&db, hours, min).await?,
                None => analyzer.recent_processes(&db, hours).await?,
            };
            let output = json!({
                "hours": hours,
                "statistics": analyzer.statistics(&processes),
                "processes": processes.iter().map(|p| analyzer.report(p)).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Resolve {
            name,
            app,
            element_type,
        } => {
            let resolver = ShortcutResolver::new(Arc::new(ShortcutCatalog::standard()));
            let element = ElementDescriptor::new(name, element_type, app);
            match resolver.resolve(&element) {
                Some(shortcut) => println!("{}", serde_json::to_string_pretty(&shortcut)?),
                None => log::info!("no shortcut for {:?} in {}", element.name, element.app_name),
            }
        }
    }

    Ok(())
}
