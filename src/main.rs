use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cup_predictor::api::state::AppState;
use cup_predictor::calculate;
use cup_predictor::config::AppConfig;
use cup_predictor::models::Match;
use cup_predictor::storage::worldcup::read_groups;
use cup_predictor::storage::{
    available_years, convert_year, convertible_years, load_matches, load_year, read_matches,
    read_tournament, save_conversion, write_matches, InMemoryMatchStore, MatchStore,
    StorageConfig,
};
use cup_predictor::validate::{validate_groups, validate_worldcup, ValidationResult};

#[derive(Parser)]
#[command(name = "cup-predictor")]
#[command(about = "World Cup match statistics and prediction engine")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Load matches from a JSONL export instead of the year datasets
        #[arg(long)]
        matches_file: Option<PathBuf>,
    },

    /// Check the dataset files for errors and suspicious data
    Validate {
        /// Only validate this tournament year
        #[arg(long)]
        year: Option<u16>,
    },

    /// Convert cup.txt / cup_finals.txt sources into worldcup.json files
    Convert {
        /// Convert this tournament year
        #[arg(long, conflicts_with = "all")]
        year: Option<u16>,

        /// Convert every year with text sources
        #[arg(long)]
        all: bool,

        /// Also overwrite years that already have a worldcup.json (with --all)
        #[arg(long)]
        force: bool,

        /// Validate only, write nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Print a summary of the loaded dataset
    Summary {
        /// Only summarize this tournament year
        #[arg(long)]
        year: Option<u16>,
    },

    /// Predict a match between two teams
    Predict {
        /// First team code (e.g. ARG)
        team_a: String,

        /// Second team code (e.g. FRA)
        team_b: String,

        /// Load matches from a JSONL export instead of the year datasets
        #[arg(long)]
        matches_file: Option<PathBuf>,
    },

    /// Write every match to a JSONL file
    Export {
        /// Output path (defaults to <data_dir>/matches.jsonl)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn load_store(storage: &StorageConfig, matches_file: Option<&Path>) -> Result<InMemoryMatchStore> {
    let matches = match matches_file {
        Some(path) => {
            read_matches(path).with_context(|| format!("reading matches from {:?}", path))?
        }
        None => load_matches(storage)
            .with_context(|| format!("loading datasets from {:?}", storage.datasets_dir()))?,
    };
    Ok(InMemoryMatchStore::new(matches))
}

fn years_to_check(storage: &StorageConfig, year: Option<u16>) -> Result<Vec<u16>> {
    match year {
        Some(year) => Ok(vec![year]),
        None => Ok(available_years(storage)?),
    }
}

fn print_report(label: &str, result: &ValidationResult) {
    for error in &result.errors {
        println!("  [{}] ERROR: {}", label, error);
    }
    for warning in &result.warnings {
        println!("  [{}] warning: {}", label, warning);
    }
}

fn summarize(matches: &[Match]) {
    let store = InMemoryMatchStore::new(matches.to_vec());
    let years: BTreeSet<u16> = matches.iter().map(|m| m.year).collect();
    let goals: u64 = matches
        .iter()
        .map(|m| u64::from(m.score_a) + u64::from(m.score_b))
        .sum();
    let draws = matches.iter().filter(|m| m.winner_loser().is_none()).count();

    println!("Matches:   {}", matches.len());
    println!("Teams:     {}", store.teams().len());
    println!("Goals:     {}", goals);
    if !matches.is_empty() {
        println!(
            "Avg goals: {:.2}",
            goals as f64 / matches.len() as f64
        );
    }
    println!("Draws:     {}", draws);
    println!(
        "Years:     {}",
        years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {:?}", cli.config))?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting cup-predictor v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Serve {
            host,
            port,
            matches_file,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let store = match load_store(&storage, matches_file.as_deref()) {
                Ok(store) => store,
                Err(e) => {
                    tracing::error!("Failed to load matches: {:#}", e);
                    InMemoryMatchStore::default()
                }
            };
            if store.is_empty() {
                tracing::warn!("No matches loaded; data endpoints will return 503");
            } else {
                tracing::info!(
                    "Serving {} matches, {} teams",
                    store.len(),
                    store.teams().len()
                );
            }

            let state = AppState::new(Arc::new(store), config.analytics.clone());
            let app = cup_predictor::api::build_router(state, &config.server.cors_origin);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}/api/v1", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Validate { year } => {
            let years = years_to_check(&storage, year)?;
            if years.is_empty() {
                bail!("No datasets found under {:?}", storage.datasets_dir());
            }

            let mut invalid = 0;
            for year in years {
                let data = read_tournament(&storage, year)
                    .with_context(|| format!("reading {} dataset", year))?;
                let mut result = validate_worldcup(&data);
                if let Some(groups) = read_groups(&storage.groups_path(year))? {
                    result.merge_prefixed("groups: ", validate_groups(&groups));
                }

                println!(
                    "{} ({}): {} errors, {} warnings",
                    year,
                    data.name,
                    result.errors.len(),
                    result.warnings.len()
                );
                print_report(&year.to_string(), &result);

                if !result.is_valid {
                    invalid += 1;
                }
            }

            if invalid > 0 {
                bail!("{} dataset(s) failed validation", invalid);
            }
        }
        Commands::Convert {
            year,
            all,
            force,
            dry_run,
        } => {
            let years = match (year, all) {
                (Some(year), _) => vec![year],
                (None, true) => convertible_years(&storage, force)?,
                (None, false) => bail!("Pass --year <YEAR> or --all"),
            };
            if years.is_empty() {
                println!("Nothing to convert under {:?}", storage.datasets_dir());
            }

            let mut failed = 0;
            for year in years {
                let conversion = match convert_year(&storage, year) {
                    Ok(conversion) => conversion,
                    Err(e) => {
                        tracing::error!("Failed to convert {}: {}", year, e);
                        failed += 1;
                        continue;
                    }
                };

                let mut result = validate_worldcup(&conversion.worldcup);
                result.merge_prefixed("groups: ", validate_groups(&conversion.groups));
                println!(
                    "{}: {} matches, {} groups, {} errors, {} warnings",
                    year,
                    conversion.match_count(),
                    conversion.groups.groups.len(),
                    result.errors.len(),
                    result.warnings.len()
                );
                print_report(&year.to_string(), &result);

                if !result.is_valid {
                    failed += 1;
                    continue;
                }
                if !dry_run {
                    save_conversion(&storage, year, &conversion)
                        .with_context(|| format!("writing {} dataset", year))?;
                }
            }

            if failed > 0 {
                bail!("{} year(s) failed to convert", failed);
            }
        }
        Commands::Summary { year } => {
            let matches = match year {
                Some(year) => load_year(&storage, year)?,
                None => load_matches(&storage)?,
            };
            summarize(&matches);
        }
        Commands::Predict {
            team_a,
            team_b,
            matches_file,
        } => {
            let store = load_store(&storage, matches_file.as_deref())?;
            let a = team_a.trim().to_uppercase();
            let b = team_b.trim().to_uppercase();
            let prediction = calculate::predict_match(&store, &a, &b, &config.analytics)?;

            let name = |code: &str| store.team_name(code).unwrap_or_else(|| code.to_string());
            println!(
                "{} {}% - {}% {}",
                name(&a),
                prediction.probability_a,
                prediction.probability_b,
                name(&b)
            );
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        Commands::Export { out } => {
            let matches = load_matches(&storage)?;
            let out = out.unwrap_or_else(|| storage.matches_path());
            let count = write_matches(&out, &matches)?;
            tracing::info!("Exported {} matches to {:?}", count, out);
        }
    }

    Ok(())
}
