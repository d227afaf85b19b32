use clap::{ArgAction, Parser, Subcommand};
use commands::{catalog, config, settings, watchlist, AppContext};
use nexttowatch_catalog::SearchScope;
use nexttowatch_config::PathManager;
use nexttowatch_models::{ContentType, WatchStatus};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "nexttowatch")]
#[command(about = "NextToWatch - Track the anime, movies and series you want to watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to a daily-rotated file instead of stderr (defaults to the logs directory)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the watchlist
    List {
        /// Only show one content type (anime, movie, series)
        #[arg(long = "type", value_name = "TYPE")]
        content_type: Option<ContentType>,
    },
    /// Add an item to the watchlist, or update it if already present
    #[command(long_about = "Add an item to the watchlist. Adding an item that is already listed merges the new fields into it instead of creating a duplicate. With --fetch the title, artwork and year are looked up in the catalog first.")]
    Add {
        id: String,
        #[arg(value_name = "TYPE")]
        content_type: ContentType,

        /// Display title (required unless --fetch is given)
        #[arg(long)]
        title: Option<String>,

        /// Initial status: to-watch, watching or watched
        #[arg(long)]
        status: Option<WatchStatus>,

        #[arg(long)]
        poster: Option<String>,

        #[arg(long)]
        year: Option<String>,

        /// Fill in missing fields from the catalog
        #[arg(long, action = ArgAction::SetTrue)]
        fetch: bool,
    },
    /// Remove an item from the watchlist
    Remove {
        id: String,
        #[arg(value_name = "TYPE")]
        content_type: ContentType,
    },
    /// Set the status of a listed item
    Status {
        id: String,
        #[arg(value_name = "TYPE")]
        content_type: ContentType,
        status: WatchStatus,
    },
    /// Record episode progress; the status follows from it
    #[command(long_about = "Record how many episodes of a listed item have been watched. Progress reaching the known episode total marks the item watched and records it in the history; any other positive progress marks it watching. Zero progress leaves the status unchanged.")]
    Progress {
        id: String,
        #[arg(value_name = "TYPE")]
        content_type: ContentType,
        progress: u32,

        /// Total episodes (0 when unknown)
        #[arg(long, default_value_t = 0)]
        total: u32,
    },
    /// Show the watch history, oldest first
    History,
    /// Search the catalogs
    Search {
        query: String,

        /// all, anime, movie or series
        #[arg(long = "type", value_name = "TYPE", default_value = "all")]
        scope: SearchScope,
    },
    /// Show catalog details for one title
    Details {
        id: String,
        #[arg(value_name = "TYPE")]
        content_type: ContentType,
    },
    /// Show popular titles
    Popular {
        #[arg(long = "type", value_name = "TYPE", default_value = "all")]
        scope: SearchScope,

        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// View or change application settings
    Settings {
        #[command(subcommand)]
        cmd: SettingsCommands,
    },
    /// View configuration or store the OMDb API key
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Execute a raw JSON request against the store and print the JSON response
    #[command(long_about = "Execute one request in the store's JSON request format, e.g. '{\"operation\": \"get-watchlist\"}'. Reads the request from standard input when no argument is given.")]
    Request {
        json: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum SettingsCommands {
    Show,
    Set {
        #[arg(long)]
        theme: Option<String>,

        #[arg(long)]
        notifications: Option<bool>,

        #[arg(long)]
        auto_update: Option<bool>,

        #[arg(long)]
        language: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show paths, store and catalog configuration (masks the API key)
    Show,
    /// Store the OMDb API key used for movie and series lookups
    OmdbKey {
        /// API key (prompted for when omitted)
        #[arg(long)]
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .map(|path| path.unwrap_or_else(|| PathManager::default().log_file()));
    logging::init_logging(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let context = AppContext::load()?;

    match cli.command {
        Commands::List { content_type } => context.with_store(|store| watchlist::list(store, content_type, &output)),
        Commands::Add {
            id,
            content_type,
            title,
            status,
            poster,
            year,
            fetch,
        } => {
            let item = watchlist::build_item(&context, id, content_type, title, poster, year, fetch, &output).await?;
            context.with_store(|store| watchlist::add(store, item, status, &output))
        }
        Commands::Remove { id, content_type } => {
            context.with_store(|store| watchlist::remove(store, &id, content_type, &output))
        }
        Commands::Status { id, content_type, status } => {
            context.with_store(|store| watchlist::set_status(store, &id, content_type, status, &output))
        }
        Commands::Progress {
            id,
            content_type,
            progress,
            total,
        } => context.with_store(|store| watchlist::set_progress(store, &id, content_type, progress, total, &output)),
        Commands::History => context.with_store(|store| watchlist::history(store, &output)),
        Commands::Search { query, scope } => catalog::search(&context, &query, scope, &output).await,
        Commands::Details { id, content_type } => catalog::details(&context, &id, content_type, &output).await,
        Commands::Popular { scope, limit } => catalog::popular(&context, scope, limit, &output).await,
        Commands::Settings { cmd } => context.with_store(|store| settings::run_settings(cmd, store, &output)),
        Commands::Config { cmd } => config::run_config(cmd, &context, &output),
        Commands::Request { json } => context.with_store(|store| watchlist::request(store, json, &output)),
    }
}
