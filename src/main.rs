use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use faq_relay::{ask, config::load_config, fallback::create_generator, server, sheets::SheetsStore};
use faq_relay_core::{resolve::AnswerGenerator, store::KnowledgeStore};

#[derive(Parser)]
#[command(name = "faqr", version, about = "FAQ resolution engine over a spreadsheet knowledge base")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "./config/faqr.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single question and print the answer
    Ask {
        /// The question to resolve
        question: String,

        /// Override the configured confidence threshold
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// List the knowledge-base entries
    Entries,

    /// Run the HTTP server
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Ask {
            question,
            threshold,
        } => ask::run_ask(&config, &question, threshold).await,
        Commands::Entries => ask::run_entries(&config).await,
        Commands::Serve => {
            let store: Arc<dyn KnowledgeStore> = Arc::new(SheetsStore::new(&config.store)?);
            let generator: Arc<dyn AnswerGenerator> = Arc::from(create_generator(&config.fallback)?);
            server::run_server(config, store, generator).await
        }
    }
}
