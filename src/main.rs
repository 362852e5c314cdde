//! Wanderlist CLI - manage the travel bucket list from the terminal

use chrono::Local;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use rand::seq::SliceRandom;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wanderlist::config;
use wanderlist::export;
use wanderlist::place::PlaceForm;
use wanderlist::query::{PER_PAGE, PlaceFilter, PlaceQuery, SortOrder, page_from_param};
use wanderlist::storage::SqliteStore;
use wanderlist::ui::{self, theme};

#[derive(Parser)]
#[command(name = "wanderlist")]
#[command(version = "0.1.0")]
#[command(about = "Travel bucket list tracker - the places you still want to see")]
#[command(long_about = r#"
Wanderlist keeps your travel bucket list in a single SQLite file:
  • Add, edit and check off places from the CLI or the web UI
  • Filter, search and sort the list the same way in both
  • Export everything to CSV, or let it pick your next trip

Example usage:
  wanderlist serve --port 5000
  wanderlist add --name Kyoto --country Japan --continent Asia \
      --category Cultural --description "Temples and tea houses" --priority High
  wanderlist list --continent Asia --sort priority
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web interface
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Create the database, and optionally a config file
    Init {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Also write a wanderlist.toml recording the database path
        #[arg(long)]
        config: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Add a place to the list
    Add {
        /// Name of the place
        #[arg(long)]
        name: String,

        /// Country the place is in
        #[arg(long)]
        country: String,

        /// Continent (Asia, Europe, Africa, North America, South America, Australia, Antarctica)
        #[arg(long)]
        continent: String,

        /// Category (Beach, Mountain, City, Desert, Nature, Cultural)
        #[arg(long)]
        category: String,

        /// Why it is on the list
        #[arg(long)]
        description: String,

        /// Priority (High, Medium, Low)
        #[arg(long)]
        priority: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// List places, with the same filters as the web listing
    List {
        /// Only this continent
        #[arg(long)]
        continent: Option<String>,

        /// Only this category
        #[arg(long)]
        category: Option<String>,

        /// Only visited or not_visited places
        #[arg(long)]
        status: Option<String>,

        /// Substring match on name or country
        #[arg(long)]
        search: Option<String>,

        /// Sort order: newest (default) or priority
        #[arg(long)]
        sort: Option<String>,

        /// Page number
        #[arg(long, default_value = "1")]
        page: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Flip the visited flag on a place
    Toggle {
        /// Id of the place
        id: i64,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Show aggregate statistics
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Write the CSV export to a file, or stdout
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Pick a random place to plan next
    Random {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { port, database } => {
            let loaded = config::load_config(None)?;
            let database = config::resolve_database_path(database, loaded.as_ref());
            let port = config::resolve_port(port, loaded.as_ref());
            config::ensure_db_dir(&database)?;

            println!("🧳 Wanderlist");
            println!("🗄️  Database: {:?}", database);
            wanderlist::server::start_server(port, database).await?;
        }

        Commands::Init { database, config: with_config, force } => {
            let loaded = config::load_config(None)?;
            let database = config::resolve_database_path(database, loaded.as_ref());
            config::ensure_db_dir(&database)?;
            SqliteStore::open(&database)?;
            println!("✅ Database ready at {:?}", database);

            if with_config {
                let cfg = config::WanderConfig {
                    database: Some(database.display().to_string()),
                    port: None,
                };
                let config_path = config::default_config_path();
                config::write_config(&config_path, &cfg, force)?;
                println!("✅ Wrote {:?}", config_path);
            }
        }

        Commands::Add {
            name,
            country,
            continent,
            category,
            description,
            priority,
            database,
        } => {
            let store = open_store(database)?;
            let form = PlaceForm {
                name,
                country,
                continent,
                category,
                description,
                priority,
            };
            let place = form.validate()?;
            let id = store.insert_place(&place)?;
            println!(
                "✅ {} #{}: {} in {} ({})",
                "Added".style(theme().success),
                id,
                place.name,
                place.country,
                place.continent
            );
        }

        Commands::List {
            continent,
            category,
            status,
            search,
            sort,
            page,
            database,
        } => {
            let store = open_store(database)?;
            let query = PlaceQuery {
                filter: PlaceFilter::from_params(
                    continent.as_deref(),
                    category.as_deref(),
                    status.as_deref(),
                    search.as_deref(),
                ),
                sort: SortOrder::from_param(sort.as_deref()),
                page: page_from_param(Some(page.as_str())),
            };
            let (places, total) = store.list_places(&query)?;

            if places.is_empty() {
                println!("{}", "∅ No places match.".style(theme().warn));
            } else {
                println!("{}", ui::places_table(&places));
                let pages = ((total + PER_PAGE - 1) / PER_PAGE).max(1);
                println!(
                    "{}",
                    format!("Page {} of {} ({} places total)", query.page, pages, total)
                        .style(theme().dim)
                );
            }
        }

        Commands::Toggle { id, database } => {
            let store = open_store(database)?;
            let today = Local::now().date_naive();
            match store.toggle_visited(id, today)? {
                Some(place) if place.visited => {
                    println!(
                        "✅ {} marked visited on {}",
                        place.name.style(theme().success),
                        today
                    );
                }
                Some(place) => {
                    println!("↩️  {} marked not visited", place.name);
                }
                None => anyhow::bail!("place {id} not found"),
            }
        }

        Commands::Stats { database } => {
            let store = open_store(database)?;
            let stats = store.stats()?;

            println!("{}", "📊 Bucket List Stats".style(theme().header));
            let mut rows = vec![
                ("Total places".to_string(), stats.total.to_string()),
                ("Visited".to_string(), stats.visited.to_string()),
                ("Still to see".to_string(), stats.not_visited.to_string()),
                (
                    "Completion".to_string(),
                    format!("{:.1}%", stats.completion_pct),
                ),
            ];
            for (continent, count) in &stats.by_continent {
                rows.push((continent.clone(), count.to_string()));
            }
            println!("{}", ui::stats_table(&rows));
        }

        Commands::Export { output, database } => {
            let store = open_store(database)?;
            let places = store.all_places()?;
            let csv = export::to_csv(&places);

            match output {
                Some(path) => {
                    std::fs::write(&path, csv)?;
                    println!("✅ Exported {} places to {:?}", places.len(), path);
                }
                None => print!("{csv}"),
            }
        }

        Commands::Random { database } => {
            let store = open_store(database)?;
            let places = store.all_places()?;
            match places.choose(&mut rand::thread_rng()) {
                Some(place) => {
                    println!(
                        "🎲 {}",
                        format!(
                            "Random pick: {} in {} ({})",
                            place.name, place.country, place.continent
                        )
                        .style(theme().info)
                    );
                }
                None => {
                    println!(
                        "{}",
                        "∅ Your list is empty. Add a place first!".style(theme().warn)
                    );
                }
            }
        }
    }

    Ok(())
}

fn open_store(database: Option<PathBuf>) -> anyhow::Result<SqliteStore> {
    let loaded = config::load_config(None)?;
    let path = config::resolve_database_path(database, loaded.as_ref());
    config::ensure_db_dir(&path)?;
    Ok(SqliteStore::open(&path)?)
}
