//! AutoService BL CLI - migrations, fact sheets and a terminal assistant.
//!
//! # Usage
//!
//! ```bash
//! # Create the user and session tables
//! as-cli migrate storefront
//!
//! # Validate a fact sheet
//! as-cli facts check facts.yaml
//!
//! # Print the assistant's system context in French
//! as-cli facts context --lang fr facts.yaml
//!
//! # Chat with the store assistant in the terminal
//! as-cli chat --lang ar
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `facts` - Check or render fact sheets
//! - `chat` - Interactive store assistant

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use autoservice_core::Language;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "as-cli")]
#[command(author, version, about = "AutoService BL CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Work with assistant fact sheets
    Facts {
        #[command(subcommand)]
        action: FactsAction,
    },
    /// Chat with the store assistant
    Chat {
        /// Page language used when storage has none (en, fr, ar)
        #[arg(short, long)]
        lang: Option<String>,

        /// JSON file standing in for the browser's local storage
        #[arg(short, long, default_value = "assistant-storage.json")]
        storage: PathBuf,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run storefront database migrations
    Storefront,
}

#[derive(Subcommand)]
enum FactsAction {
    /// Load and validate a YAML fact sheet
    Check {
        /// Fact sheet path
        path: PathBuf,
    },
    /// Print the system context sent to the generation service
    Context {
        /// Fact sheet path; the built-in sheet when omitted
        path: Option<PathBuf>,

        /// Context language (en, fr, ar)
        #[arg(short, long, default_value = "en")]
        lang: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
        },
        Commands::Facts { action } => match action {
            FactsAction::Check { path } => {
                commands::facts::check(&path)?;
            }
            FactsAction::Context { path, lang } => {
                let context =
                    commands::facts::context(path.as_deref(), Language::from_code_or_default(&lang))?;
                print_context(&context);
            }
        },
        Commands::Chat { lang, storage } => {
            commands::chat::run(lang.as_deref(), &storage).await?;
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_context(context: &str) {
    println!("{context}");
}
