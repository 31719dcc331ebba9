//! QuoteSync - Quote collection manager with periodic server sync
//!
//! Command-line front end: manage the local collection directly, or run the
//! HTTP API with the periodic sync loop.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quotesync::{
    api::build_app,
    config::QuoteSyncConfig,
    quotes::{QuoteStore, QuotesState, ALL_CATEGORIES, NO_QUOTES_MESSAGE},
    sync::{spawn_sync_loop, HttpRemote, SyncEngine, SyncOutcome, SyncState},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quotesync")]
#[command(version)]
#[command(about = "Quote collection manager with periodic server sync")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "QUOTESYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, env = "QUOTESYNC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API and run the periodic sync loop
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Disable the periodic sync loop
        #[arg(long)]
        no_sync: bool,
    },

    /// Show a random quote
    Random {
        /// Category filter (defaults to the selected category)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Add a quote
    Add {
        /// Quote text
        text: String,

        /// Quote category
        category: String,

        /// Do not push the quote to the server
        #[arg(long)]
        no_push: bool,
    },

    /// Import quotes from a JSON array file
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Export all quotes as JSON
    Export {
        /// Output file, `-` for stdout
        #[arg(short, long, default_value = "quotes.json")]
        output: PathBuf,
    },

    /// List categories
    Categories,

    /// Select the category filter and show a quote from it
    Category {
        /// Category name, or `all`
        name: String,
    },

    /// Sync with the server once
    Sync,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let mut config = QuoteSyncConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_sync,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if no_sync {
                config.sync.enabled = false;
            }
            run_server(config).await?;
        }
        Commands::Random { category } => {
            let store = open_store(&config).await?;
            let category = match category {
                Some(category) => category,
                None => store.selected_category().await,
            };
            match store.pick_random(&category).await? {
                Some(picked) => println!("{}", picked.quote),
                None => println!("{}", NO_QUOTES_MESSAGE),
            }
        }
        Commands::Add {
            text,
            category,
            no_push,
        } => {
            let store = Arc::new(open_store(&config).await?);
            let quote = store.add_quote(&text, &category).await?;
            println!("Quote added successfully!");
            if !no_push && config.sync.enabled {
                let engine = build_engine(&config, store)?;
                engine.push_quote(&quote).await;
            }
        }
        Commands::Import { file } => {
            let store = open_store(&config).await?;
            let payload = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let count = store.import_quotes(&payload).await?;
            println!("Imported {} quotes ({} total)", count, store.len().await);
        }
        Commands::Export { output } => {
            let store = open_store(&config).await?;
            let json = store.export_quotes().await?;
            if output.as_os_str() == "-" {
                println!("{}", json);
            } else {
                tokio::fs::write(&output, json)
                    .await
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                println!("Exported {} quotes to {}", store.len().await, output.display());
            }
        }
        Commands::Categories => {
            let store = open_store(&config).await?;
            let options = store.category_options().await;
            for category in std::iter::once(ALL_CATEGORIES.to_string()).chain(options.categories) {
                let marker = if category == options.selected { "*" } else { " " };
                println!("{} {}", marker, category);
            }
        }
        Commands::Category { name } => {
            let store = open_store(&config).await?;
            store.set_selected_category(&name).await?;
            match store.pick_random(&name).await? {
                Some(picked) => println!("{}", picked.quote),
                None => println!("{}", NO_QUOTES_MESSAGE),
            }
        }
        Commands::Sync => {
            let store = Arc::new(open_store(&config).await?);
            let engine = build_engine(&config, store)?;
            match engine.sync_now().await {
                SyncOutcome::Merged { .. } => {
                    if let Some(message) = engine.status().await {
                        println!("{}", message);
                    }
                }
                SyncOutcome::NothingToMerge => println!("Server returned no quotes"),
                SyncOutcome::Failed { reason } => println!("Sync failed: {}", reason),
                SyncOutcome::Skipped => println!("Sync already in progress"),
            }
        }
        Commands::Config { default } => {
            let shown = if default {
                QuoteSyncConfig::default()
            } else {
                config
            };
            println!("{}", shown.to_toml()?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("quotesync={},tower_http={}", log_level, log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn open_store(config: &QuoteSyncConfig) -> Result<QuoteStore> {
    QuoteStore::open(config.storage.data_dir.clone())
        .await
        .with_context(|| {
            format!(
                "Failed to open quote store at {}",
                config.storage.data_dir.display()
            )
        })
}

fn build_engine(config: &QuoteSyncConfig, store: Arc<QuoteStore>) -> Result<Arc<SyncEngine>> {
    let remote = Arc::new(HttpRemote::new(&config.sync)?);
    Ok(Arc::new(SyncEngine::new(store, remote, &config.sync)))
}

async fn run_server(config: QuoteSyncConfig) -> Result<()> {
    tracing::info!(data_dir = %config.storage.data_dir.display(), "Starting QuoteSync");

    let store = Arc::new(open_store(&config).await?);
    let engine = build_engine(&config, store.clone())?;

    let sync_task = if config.sync.enabled {
        tracing::info!(
            endpoint = %config.sync.endpoint,
            interval_secs = config.sync.interval_secs,
            "Periodic sync enabled"
        );
        Some(spawn_sync_loop(engine.clone()))
    } else {
        None
    };

    let app = build_app(
        QuotesState {
            store,
            sync: engine.clone(),
        },
        SyncState { engine },
        &config.server.cors_origins,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("QuoteSync API listening on http://{}. Press Ctrl+C to stop.", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

    if let Some(task) = sync_task {
        task.abort();
    }

    Ok(())
}
