//! Gamedex command line front end
//!
//! Browse per-platform game catalogs, tally genres and keep a list of
//! favorite games with personal notes and scores.

mod render;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gamedex_config::GamedexConfig;
use gamedex_library::{CatalogStore, FavoriteRecord, FavoritesStore};

/// Top-level CLI arguments
#[derive(Parser)]
#[command(name = "gamedex", about = "Browse game catalogs and manage favorites")]
struct Cli {
    /// Configuration file (defaults to ./gamedex.toml or the user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured platforms
    Platforms,

    /// List known genre names
    Genres,

    /// Search a platform's catalog by game name
    Search {
        platform: String,

        /// Case-insensitive name fragment; everything when omitted
        query: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Count a platform's games per genre
    Analyze {
        platform: String,

        /// Genres to count; every known genre when omitted
        genres: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Manage favorite games
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites in the order they were added
    List {
        #[arg(long)]
        json: bool,
    },

    /// Add a game from a platform's catalog, matched by exact name
    Add { platform: String, name: String },

    /// Remove a favorite
    Remove { name: String },

    /// Show a favorite with its notes
    Show { name: String },

    /// Set personal score and, optionally, notes
    Note {
        name: String,

        /// New notes; the current notes are kept when omitted
        #[arg(short, long)]
        notes: Option<String>,

        /// Score from 0 to 10
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=10))]
        rating: u8,
    },
}

fn setup_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<GamedexConfig> {
    let config = match path {
        Some(path) => GamedexConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => GamedexConfig::load_default()?,
    };
    debug!("Data root: {}", config.data.root.display());
    Ok(config)
}

/// Load a platform's catalog, refusing platforms the config does not list
fn open_catalog(config: &GamedexConfig, platform: &str) -> Result<CatalogStore> {
    if !config.has_platform(platform) {
        bail!(
            "Unknown platform '{}' (available: {})",
            platform,
            config.platforms.join(", ")
        );
    }

    let mut catalog = CatalogStore::open(config.data.clone());
    catalog
        .load_catalog(platform)
        .with_context(|| format!("Failed to load games for {}", platform))?;
    Ok(catalog)
}

/// Shown when the genre table is missing, malformed or has no rows
fn no_genres_message(genres_path: &Path) -> String {
    format!("No genres available from {}", genres_path.display())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Platforms => {
            for platform in &config.platforms {
                println!("{}", platform);
            }
        }
        Commands::Genres => {
            let catalog = CatalogStore::open(config.data.clone());
            let names = catalog.genre_names();
            if names.is_empty() {
                eprintln!("{}", no_genres_message(&config.data.genres_path()));
            }
            for name in names {
                println!("{}", name);
            }
        }
        Commands::Search {
            platform,
            query,
            json,
        } => {
            let catalog = open_catalog(&config, &platform)?;
            let results = catalog.search_by_name(query.as_deref().unwrap_or(""));
            info!("{} of {} games match", results.len(), catalog.len());

            if json {
                print_json(&results)?;
            } else {
                print!("{}", render::games_table(&results));
                println!("\n{} games on {}", results.len(), platform);
            }
        }
        Commands::Analyze {
            platform,
            genres,
            json,
        } => {
            let catalog = open_catalog(&config, &platform)?;
            let requested: Vec<String> = if genres.is_empty() {
                catalog
                    .genre_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            } else {
                genres
            };
            if requested.is_empty() {
                bail!("No genres given and no genre table available");
            }

            let counts = catalog.count_by_genre(&requested);
            if json {
                print_json(&counts)?;
            } else if counts.is_empty() {
                println!("The {} catalog has no genre information", platform);
            } else {
                println!("Games per genre on {}\n", platform);
                print!("{}", render::genre_chart(&counts));
            }
        }
        Commands::Favorites { action } => run_favorites(&config, action)?,
    }

    Ok(())
}

fn run_favorites(config: &GamedexConfig, action: FavoritesAction) -> Result<()> {
    let mut favorites = FavoritesStore::from_config(&config.data)?;

    match action {
        FavoritesAction::List { json } => {
            if json {
                print_json(favorites.all())?;
            } else if favorites.is_empty() {
                println!("No favorites yet");
            } else {
                print!("{}", render::favorites_table(favorites.all()));
            }
        }
        FavoritesAction::Add { platform, name } => {
            let catalog = open_catalog(config, &platform)?;
            let favorite = catalog
                .full_catalog()
                .iter()
                .find(|game| game.name.as_deref() == Some(name.as_str()))
                .and_then(FavoriteRecord::from_game)
                .with_context(|| format!("No game named '{}' on {}", name, platform))?;

            favorites.add(favorite)?;
            println!("Added '{}' to favorites", name);
        }
        FavoritesAction::Remove { name } => {
            if favorites.remove(&name)? == 0 {
                println!("'{}' was not a favorite", name);
            } else {
                println!("Removed '{}' from favorites", name);
            }
        }
        FavoritesAction::Show { name } => match favorites.get(&name) {
            Some(favorite) => print!("{}", render::favorite_details(favorite)),
            None => bail!("'{}' is not a favorite", name),
        },
        FavoritesAction::Note {
            name,
            notes,
            rating,
        } => {
            let notes = match notes {
                Some(notes) => notes,
                None => favorites
                    .get(&name)
                    .map(|f| f.personal_notes.clone())
                    .unwrap_or_default(),
            };
            favorites.update_details(&name, &notes, rating)?;
            println!("Saved notes for '{}'", name);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    run(cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use gamedex_config::DataConfig;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_note_command() {
        let cli = Cli::parse_from([
            "gamedex",
            "favorites",
            "note",
            "Chrono Trigger",
            "--notes",
            "DS port",
            "--rating",
            "9",
        ]);
        match cli.command {
            Commands::Favorites {
                action: FavoritesAction::Note { name, notes, rating },
            } => {
                assert_eq!(name, "Chrono Trigger");
                assert_eq!(notes.as_deref(), Some("DS port"));
                assert_eq!(rating, 9);
            }
            _ => panic!("Expected favorites note"),
        }
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        let result = Cli::try_parse_from([
            "gamedex",
            "favorites",
            "note",
            "Doom",
            "--rating",
            "11",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_query_is_optional() {
        let cli = Cli::parse_from(["gamedex", "search", "PC"]);
        assert!(matches!(
            cli.command,
            Commands::Search { query: None, json: false, .. }
        ));
    }

    fn temp_config(dir: &TempDir) -> GamedexConfig {
        GamedexConfig {
            data: DataConfig::with_root(dir.path()),
            ..GamedexConfig::default()
        }
    }

    #[test]
    fn test_note_without_notes_keeps_existing_notes() {
        let dir = TempDir::new().unwrap();
        let config = temp_config(&dir);
        let mut favorites = FavoritesStore::from_config(&config.data).unwrap();
        favorites
            .add(FavoriteRecord::new("Doom", "Action, Shooter", "4.4"))
            .unwrap();
        favorites.update_details("Doom", "keep me", 3).unwrap();

        let cli = Cli::parse_from(["gamedex", "favorites", "note", "Doom", "--rating", "7"]);
        let Commands::Favorites { action } = cli.command else {
            panic!("Expected favorites command");
        };
        run_favorites(&config, action).unwrap();

        let reloaded = FavoritesStore::from_config(&config.data).unwrap();
        let doom = reloaded.get("Doom").unwrap();
        assert_eq!(doom.personal_notes, "keep me");
        assert_eq!(doom.personal_rating, 7);
    }

    #[test]
    fn test_note_with_notes_replaces_them() {
        let dir = TempDir::new().unwrap();
        let config = temp_config(&dir);
        let mut favorites = FavoritesStore::from_config(&config.data).unwrap();
        favorites
            .add(FavoriteRecord::new("Myst", "Puzzle", "3.9"))
            .unwrap();
        favorites.update_details("Myst", "old", 5).unwrap();

        let action = FavoritesAction::Note {
            name: "Myst".to_string(),
            notes: Some(String::new()),
            rating: 6,
        };
        run_favorites(&config, action).unwrap();

        let reloaded = FavoritesStore::from_config(&config.data).unwrap();
        assert_eq!(reloaded.get("Myst").unwrap().personal_notes, "");
    }

    #[test]
    fn test_no_genres_message_covers_malformed_table() {
        let dir = TempDir::new().unwrap();
        let config = temp_config(&dir);
        std::fs::write(config.data.genres_path(), "id\n4\n").unwrap();

        let catalog = CatalogStore::open(config.data.clone());
        assert!(catalog.genre_names().is_empty());

        let message = no_genres_message(&config.data.genres_path());
        assert!(message.starts_with("No genres available from "));
        assert!(!message.contains("not found"));
    }

    #[test]
    fn test_unknown_platform_is_refused() {
        let config = GamedexConfig::default();
        let err = open_catalog(&config, "Atari").err().unwrap();
        assert!(err.to_string().contains("Unknown platform 'Atari'"));
    }
}
