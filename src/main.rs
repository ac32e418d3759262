//! ragchat CLI entry point

use clap::{Parser, Subcommand};
use ragchat::{
    chat::OpenAiChatClient,
    commands::{
        cmd_chat, cmd_delete_source, cmd_ingest_files, cmd_ingest_links, cmd_ingest_text,
        cmd_list_sources, cmd_serve, cmd_show_source, print_ingest_report, print_source_detail,
        print_sources,
    },
    config::Config,
    controller::AppController,
    embed::create_embedder,
    error::Result,
    progress::LogWriterFactory,
    store::QdrantStore,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ragchat")]
#[command(version, about = "Chat with your documents via Qdrant and OpenAI", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Ingest a source into its own collection
    Ingest {
        #[command(subcommand)]
        source: IngestSource,
    },

    /// List and inspect ingested sources
    Sources {
        #[command(subcommand)]
        action: Option<SourcesAction>,
    },

    /// Chat against every ingested collection
    Chat,

    /// Start the HTTP proxy server
    Serve,
}

#[derive(Subcommand)]
enum IngestSource {
    /// Ingest PDF files, one collection per file
    File {
        /// Paths to PDF files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Ingest raw text (argument or stdin)
    Text {
        /// The text to ingest; reads stdin when omitted
        text: Option<String>,
    },

    /// Scrape and ingest websites, one collection per link
    Url {
        /// Website links
        #[arg(required = true)]
        links: Vec<String>,
    },
}

#[derive(Subcommand)]
enum SourcesAction {
    /// List all collections
    List,

    /// Show one collection's metadata and sample chunks
    Show {
        /// Collection name
        name: String,
    },

    /// Delete a collection
    Delete {
        /// Collection name
        name: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(LogWriterFactory::default()))
        .with(filter)
        .init();

    // Init writes the config file and needs no credentials.
    if let Commands::Init { force } = cli.command {
        return handle_init(cli.config.as_deref(), force);
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Init { .. } => unreachable!(),

        Commands::Ingest { source } => {
            let mut controller = build_controller(config)?;
            let report = match source {
                IngestSource::File { paths } => cmd_ingest_files(&mut controller, paths).await?,
                IngestSource::Text { text } => {
                    let text = match text {
                        Some(t) => t,
                        None => {
                            let mut buffer = String::new();
                            std::io::stdin().read_to_string(&mut buffer)?;
                            buffer
                        }
                    };
                    cmd_ingest_text(&mut controller, text).await?
                }
                IngestSource::Url { links } => cmd_ingest_links(&mut controller, links).await?,
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_ingest_report(&report);
            }
        }

        Commands::Sources { action } => {
            let store = build_store(&config)?;
            match action.unwrap_or(SourcesAction::List) {
                SourcesAction::List => {
                    let sources = cmd_list_sources(&store).await?;
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&sources)?);
                    } else {
                        print_sources(&sources);
                    }
                }
                SourcesAction::Show { name } => {
                    let detail =
                        cmd_show_source(&store, &name, config.query.scroll_limit).await?;
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&detail)?);
                    } else {
                        print_source_detail(&detail);
                    }
                }
                SourcesAction::Delete { name } => {
                    if cmd_delete_source(&store, &name).await? {
                        println!("Deleted {}", name);
                    } else {
                        println!("Collection '{}' does not exist", name);
                    }
                }
            }
        }

        Commands::Chat => {
            let mut controller = build_controller(config)?;
            cmd_chat(&mut controller).await?;
        }

        Commands::Serve => {
            cmd_serve(&config).await?;
        }
    }

    Ok(())
}

fn handle_init(config_path: Option<&std::path::Path>, force: bool) -> Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_config_path);

    if path.exists() && !force {
        println!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }

    Config::write_default(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn build_store(config: &Config) -> Result<QdrantStore> {
    QdrantStore::new(&config.qdrant_url, config.embedding.resolved_dimension())
}

fn build_controller(config: Config) -> Result<AppController> {
    let embedder = create_embedder(&config)?;
    let store = Arc::new(build_store(&config)?);
    let chat = Arc::new(OpenAiChatClient::new(&config.chat, &config.openai_api_key)?);
    AppController::new(config, embedder, store, chat)
}
