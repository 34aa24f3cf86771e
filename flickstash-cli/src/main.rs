//! flickstash CLI
//!
//! Command-line interface for syncing and browsing a local VOD catalog
//! cache.

mod error;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use flickstash_catalog::ItemKind;
use flickstash_db::item_count;
use flickstash_service::VodCatalog;
use flickstash_xtream::{Credentials, XtreamClient};

use error::CliError;

#[derive(Parser)]
#[command(name = "flickstash")]
#[command(about = "Sync and browse a local VOD catalog cache", long_about = None)]
struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Profile id owning favorites
    #[arg(long, global = true, default_value = "default")]
    profile: String,

    #[command(subcommand)]
    command: Commands,
}

/// Common arguments for commands that read the catalog.
#[derive(Args, Clone)]
struct ScopeArgs {
    /// Playlist id to operate on
    #[arg(short, long, default_value = "default")]
    playlist: String,

    /// Operate on the series partition instead of movies
    #[arg(long)]
    series: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the full catalog from the provider and replace the cache
    Sync {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Provider base URL (overrides config/env)
        #[arg(long)]
        base_url: Option<String>,

        /// Provider username (overrides config/env)
        #[arg(long)]
        username: Option<String>,

        /// Provider password (overrides config/env)
        #[arg(long)]
        password: Option<String>,
    },

    /// List categories with item counts
    Categories {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Show one page of a category ("all", "favorites", "recent", or a provider id)
    Page {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Category id (omit for the whole playlist)
        #[arg(short, long)]
        category: Option<String>,

        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u32,
    },

    /// Search item names for a substring
    Search {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Text to search for
        query: String,

        /// Maximum results
        #[arg(short, long, default_value_t = 50)]
        limit: u32,

        /// Restrict to one category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show the deduplicated recently-added view
    Recent {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Show row counts for the cached catalog
    Stats {
        /// Playlist id to operate on
        #[arg(short, long, default_value = "default")]
        playlist: String,
    },

    /// Manage provider credentials configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Save provider credentials to the config file
    Set {
        #[arg(long)]
        base_url: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Print the config file path
    Path,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!(
                "{} Failed to create async runtime: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(cli)) {
        eprintln!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Sync {
            scope,
            base_url,
            username,
            password,
        } => run_sync(&cli.db, &cli.profile, scope, base_url, username, password).await,
        Commands::Categories { scope } => run_categories(&cli.db, &cli.profile, scope).await,
        Commands::Page {
            scope,
            category,
            page,
        } => run_page(&cli.db, &cli.profile, scope, category.as_deref(), page),
        Commands::Search {
            scope,
            query,
            limit,
            category,
        } => run_search(&cli.db, &cli.profile, scope, &query, limit, category.as_deref()),
        Commands::Recent { scope } => run_recent(&cli.db, &cli.profile, scope),
        Commands::Stats { playlist } => run_stats(&cli.db, &cli.profile, &playlist),
        Commands::Config { action } => run_config(action),
    }
}

fn data_dir() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|d| d.join("flickstash"))
        .ok_or_else(|| CliError::config("Could not determine data directory"))
}

fn open_catalog(db: &Option<PathBuf>, profile: &str) -> Result<VodCatalog, CliError> {
    let dir = data_dir()?;
    let db_path = match db {
        Some(path) => path.clone(),
        None => {
            std::fs::create_dir_all(&dir)?;
            dir.join("catalog.db")
        }
    };
    log::debug!("opening catalog database at {}", db_path.display());
    Ok(VodCatalog::open(
        &db_path,
        dir.join("favorites.json"),
        profile,
    )?)
}

fn kind_of(scope: &ScopeArgs) -> ItemKind {
    if scope.series {
        ItemKind::Series
    } else {
        ItemKind::Movie
    }
}

// ── Commands ────────────────────────────────────────────────────────────────

async fn run_sync(
    db: &Option<PathBuf>,
    profile: &str,
    scope: ScopeArgs,
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Result<(), CliError> {
    let creds = match (base_url, username, password) {
        (Some(base_url), Some(username), Some(password)) => Credentials {
            base_url,
            username,
            password,
        },
        (base_url, username, password) => Credentials::load()
            .map_err(|e| {
                CliError::config(format!(
                    "{e}. Set FLICKSTASH_BASE_URL, FLICKSTASH_USERNAME, FLICKSTASH_PASSWORD \
                     or run 'flickstash config set'"
                ))
            })?
            .with_overrides(base_url, username, password),
    };

    let client = XtreamClient::new(creds)?;
    let mut catalog = open_catalog(db, profile)?.with_client(client);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("/-\\|"),
    );
    pb.set_message(format!("Syncing playlist {}...", scope.playlist));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = catalog.sync(&scope.playlist).await;
    pb.finish_and_clear();
    let stats = result?;

    println!(
        "{} Synced {} categories and {} items for playlist {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        stats.categories,
        stats.items,
        scope.playlist.if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

async fn run_categories(
    db: &Option<PathBuf>,
    profile: &str,
    scope: ScopeArgs,
) -> Result<(), CliError> {
    let kind = kind_of(&scope);
    let mut catalog = open_catalog(db, profile)?;
    let categories = catalog.get_categories(&scope.playlist, kind)?;
    let counts = catalog.category_counts(&scope.playlist, kind).await?;

    if categories.is_empty() {
        println!("No {kind} categories cached. Run 'flickstash sync' first.");
        return Ok(());
    }

    println!(
        "{} {} categories:",
        categories.len(),
        kind.if_supports_color(Stdout, |t| t.cyan()),
    );
    for cat in &categories {
        let count = counts.get(&cat.category_id).copied().unwrap_or(0);
        println!(
            "  {:6}  {} ({})",
            cat.category_id.if_supports_color(Stdout, |t| t.dimmed()),
            cat.name,
            count,
        );
    }
    Ok(())
}

fn run_page(
    db: &Option<PathBuf>,
    profile: &str,
    scope: ScopeArgs,
    category: Option<&str>,
    page: u32,
) -> Result<(), CliError> {
    let mut catalog = open_catalog(db, profile)?;
    match kind_of(&scope) {
        ItemKind::Movie => {
            let result = catalog.get_movie_page(&scope.playlist, category, page)?;
            println!(
                "Page {} of {} movies{}:",
                page,
                result.total_count,
                if result.has_more { " (more available)" } else { "" },
            );
            for movie in &result.items {
                println!(
                    "  {:8}  {}",
                    movie.movie_id.if_supports_color(Stdout, |t| t.dimmed()),
                    movie.name,
                );
            }
        }
        ItemKind::Series => {
            let result = catalog.get_series_page(&scope.playlist, category, page)?;
            println!(
                "Page {} of {} series{}:",
                page,
                result.total_count,
                if result.has_more { " (more available)" } else { "" },
            );
            for series in &result.items {
                println!(
                    "  {:8}  {}",
                    series.series_id.if_supports_color(Stdout, |t| t.dimmed()),
                    series.name,
                );
            }
        }
    }
    Ok(())
}

fn run_search(
    db: &Option<PathBuf>,
    profile: &str,
    scope: ScopeArgs,
    query: &str,
    limit: u32,
    category: Option<&str>,
) -> Result<(), CliError> {
    let catalog = open_catalog(db, profile)?;
    match kind_of(&scope) {
        ItemKind::Movie => {
            let hits = catalog.search_movies(&scope.playlist, query, limit, category)?;
            println!("{} movies matching \"{query}\":", hits.len());
            for movie in &hits {
                println!(
                    "  {:8}  {}",
                    movie.movie_id.if_supports_color(Stdout, |t| t.dimmed()),
                    movie.name,
                );
            }
        }
        ItemKind::Series => {
            let hits = catalog.search_series(&scope.playlist, query, limit, category)?;
            println!("{} series matching \"{query}\":", hits.len());
            for series in &hits {
                println!(
                    "  {:8}  {}",
                    series.series_id.if_supports_color(Stdout, |t| t.dimmed()),
                    series.name,
                );
            }
        }
    }
    Ok(())
}

fn run_recent(db: &Option<PathBuf>, profile: &str, scope: ScopeArgs) -> Result<(), CliError> {
    let mut catalog = open_catalog(db, profile)?;
    match kind_of(&scope) {
        ItemKind::Movie => {
            let result = catalog.get_movie_page(&scope.playlist, Some("recent"), 0)?;
            println!("{} recently added movies:", result.items.len());
            for movie in &result.items {
                println!("  {}", movie.name);
            }
        }
        ItemKind::Series => {
            let result = catalog.get_series_page(&scope.playlist, Some("recent"), 0)?;
            println!("{} recently added series:", result.items.len());
            for series in &result.items {
                println!("  {}", series.name);
            }
        }
    }
    Ok(())
}

fn run_stats(db: &Option<PathBuf>, profile: &str, playlist: &str) -> Result<(), CliError> {
    let catalog = open_catalog(db, profile)?;
    let conn = catalog.connection();
    let movies = item_count(conn, playlist, ItemKind::Movie).map_err(flickstash_service::ServiceError::from)?;
    let series = item_count(conn, playlist, ItemKind::Series).map_err(flickstash_service::ServiceError::from)?;
    let favorites = catalog.favorites(playlist)?.len();

    println!(
        "Playlist {}:",
        playlist.if_supports_color(Stdout, |t| t.cyan()),
    );
    println!("  movies:    {movies}");
    println!("  series:    {series}");
    println!("  favorites: {favorites}");
    Ok(())
}

fn run_config(action: ConfigAction) -> Result<(), CliError> {
    match action {
        ConfigAction::Set {
            base_url,
            username,
            password,
        } => {
            let creds = Credentials {
                base_url,
                username,
                password,
            };
            let path = flickstash_xtream::save_to_file(&creds)?;
            println!(
                "{} Credentials saved to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                path.display(),
            );
        }
        ConfigAction::Path => match flickstash_xtream::config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("Could not determine config directory"),
        },
    }
    Ok(())
}
