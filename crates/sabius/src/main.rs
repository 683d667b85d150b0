// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sabius - knowledge-grounded voice assistant for the Convergence Lab.
//!
//! This is the binary entry point. Besides the interactive console session
//! it exposes inspection commands for the knowledge layer.

mod check;
mod inspect;
mod shell;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sabius_config::SabiusConfig;
use sabius_context::PromptAssembler;
use sabius_core::SabiusError;
use sabius_knowledge::{KnowledgeCatalog, KnowledgeStats, load_scorer};

use crate::inspect::CatalogQuery;

/// Sabius - knowledge-grounded voice assistant.
#[derive(Parser, Debug)]
#[command(name = "sabius", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the instructions the model would receive for a query.
    Prompt {
        /// User query; omit for the session-start instructions.
        query: Option<String>,
    },
    /// Show which knowledge entries a query selects.
    Search {
        query: String,
        /// Maximum number of entries to show.
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// List loaded knowledge entries and their keywords.
    Contexts,
    /// Print knowledge store statistics.
    Stats {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Look up faculty, publications and entrepreneurship cases.
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// Validate configuration, knowledge data and credentials.
    Check {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Run a console session against the assistant.
    Shell,
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Search professors by name, title or research group URL.
    Professors {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Search publications by title or research group.
    Publications {
        #[arg(default_value = "")]
        query: String,
        /// Restrict to an academic unit.
        #[arg(long)]
        unit: Option<String>,
        /// Restrict to a research group.
        #[arg(long)]
        group: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show entrepreneurship cases; filter by name.
    Cases {
        #[arg(default_value = "")]
        query: String,
    },
}

impl From<CatalogCommand> for CatalogQuery {
    fn from(command: CatalogCommand) -> Self {
        match command {
            CatalogCommand::Professors { query, limit } => Self::Professors { query, limit },
            CatalogCommand::Publications {
                query,
                unit,
                group,
                limit,
            } => Self::Publications {
                query,
                unit,
                group,
                limit,
            },
            CatalogCommand::Cases { query } => Self::Cases { query },
        }
    }
}

#[tokio::main]
async fn main() {
    load_env_files();
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => sabius_config::load_and_validate_path(path),
        None => sabius_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            sabius_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    match run(cli.command, config).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Dispatches a subcommand; returns the process exit code.
async fn run(command: Option<Commands>, config: SabiusConfig) -> Result<i32, SabiusError> {
    let Some(command) = command else {
        println!("sabius: use --help for available commands");
        return Ok(0);
    };

    match command {
        Commands::Prompt { query } => {
            let scorer = Arc::new(load_scorer(&config.knowledge));
            let assembler = PromptAssembler::new(&config.agent, &config.knowledge, scorer).await?;
            print!(
                "{}",
                inspect::render_prompt(&assembler, query.as_deref().unwrap_or(""))
            );
        }
        Commands::Search { query, limit } => {
            let scorer = load_scorer(&config.knowledge);
            print!("{}", inspect::render_search(&scorer, &query, limit));
        }
        Commands::Contexts => {
            let scorer = load_scorer(&config.knowledge);
            print!("{}", inspect::render_contexts(scorer.store()));
        }
        Commands::Stats { json } => {
            let scorer = load_scorer(&config.knowledge);
            let stats = KnowledgeStats::collect(scorer.store(), scorer.index());
            print!("{}", inspect::render_stats(&stats, json)?);
        }
        Commands::Catalog(command) => {
            let dir = Path::new(&config.knowledge.knowledge_base_dir);
            let catalog = KnowledgeCatalog::load(dir);
            print!("{}", inspect::render_catalog(&catalog, &command.into()));
        }
        Commands::Check { plain } => {
            let scorer = load_scorer(&config.knowledge);
            let results = check::run_checks(&config, &scorer, |name| std::env::var(name).ok());
            if check::print_results(&results, plain) > 0 {
                return Ok(1);
            }
        }
        Commands::Shell => shell::run_shell(config).await?,
    }
    Ok(0)
}

/// Loads `.env.local` then `.env`; values already in the environment win.
fn load_env_files() {
    for file in [".env.local", ".env"] {
        match dotenvy::from_filename(file) {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => eprintln!("sabius: failed to load {file}: {e}"),
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sabius={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
