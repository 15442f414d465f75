//! Querybot Entry Point

use std::sync::Arc;

use clap::{Parser, Subcommand};
use querybot::{database::open_database_or_unavailable, Chatbot, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// Querybot: ask a SQL database questions in plain English
#[derive(Parser, Debug)]
#[command(name = "querybot")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the SQLite database (overrides configuration)
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask a question and run the generated query
    Ask {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Show how a question is translated without running it
    Translate {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// List tables of the database
    Tables,
    /// Run the REST API server (default behavior)
    Serve {
        /// Bind address. If not specified, uses config file value.
        #[arg(long)]
        host: Option<String>,
        /// HTTP port. If not specified, uses config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // For CLI commands (non-serve), use minimal logging
    let is_serve = matches!(args.command, Some(Command::Serve { .. }) | None);

    if !is_serve {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::stderr)
            .init();
    }

    match args.command {
        Some(Command::Ask { ref message }) => {
            let config = load_config(&args)?;
            cli::run_ask(&config, &message.join(" "), args.json)
        }
        Some(Command::Translate { ref message }) => {
            let config = load_config(&args)?;
            cli::run_translate(&config, &message.join(" "), args.json)
        }
        Some(Command::Tables) => {
            let config = load_config(&args)?;
            cli::run_tables(&config, args.json)
        }
        Some(Command::Serve {
            ref host,
            port,
            json_logs,
        }) => run_rest_server(&args, host.clone(), port, json_logs).await,
        None => run_rest_server(&args, None, None, false).await,
    }
}

/// Load configuration and apply environment and command-line overrides.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    let mut config = config.with_env_overrides()?;
    if let Some(database) = &args.database {
        config.database.path = database.clone();
    }
    Ok(config)
}

/// Run the REST API server.
async fn run_rest_server(
    args: &Args,
    host: Option<String>,
    port: Option<u16>,
    json_logs: bool,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Querybot v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(args)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let path = config.database_path();
    tracing::info!(
        database = %path.display(),
        threshold = config.matcher.threshold,
        stopwords = ?config.matcher.stopwords,
        "Configuration loaded"
    );

    let database = open_database_or_unavailable(&path);
    let mut chatbot = Chatbot::with_config(database, &config.matcher);
    if let Err(e) = chatbot.initialize() {
        tracing::warn!(error = %e, "Chatbot could not load the database schema");
    }

    let chatbot = Arc::new(chatbot);
    querybot::serve(Arc::clone(&chatbot), &config.server).await?;
    chatbot.close()?;
    Ok(())
}
