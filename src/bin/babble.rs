//! Babble CLI — build a token transition graph and generate sentences.
//!
//! Usage:
//!   babble ingest   [--db path] [--config path]           (reads stdin)
//!   babble generate [--db path] [--config path] [--separator sep]

use babble::{Config, Ingestor, OpenStore, SpaceTokenizer, SqliteStore, Walker};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "babble",
    version,
    about = "Token transition graph with provenance-consistent sentence generation"
)]
struct Cli {
    /// Path to a YAML config file (default: ./babble.yml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest lines from standard input into the graph
    Ingest,
    /// Generate one sentence and print it to standard output
    Generate {
        /// Separator placed between generated tokens
        #[arg(long)]
        separator: Option<String>,
    },
}

fn cmd_ingest(store: &SqliteStore) -> i32 {
    let tokenizer = SpaceTokenizer::new();
    let ingestor = Ingestor::new(store, &tokenizer);
    let stdin = std::io::stdin();
    let report = ingestor.ingest_lines(stdin.lock());

    info!(
        lines = report.lines,
        nodes = report.nodes_upserted,
        edges = report.edges_created,
        failures = report.failures,
        "ingestion finished"
    );
    // Per-item failures are best-effort by design; the run still succeeds.
    0
}

fn cmd_generate(store: &SqliteStore, separator: &str) -> i32 {
    match Walker::new(store).generate(separator) {
        Ok(sentence) => {
            println!("{}", sentence);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let db_path = config.resolve_db(cli.db);
    let store = match SqliteStore::open(&db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to open database {}: {}", db_path.display(), e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Ingest => cmd_ingest(&store),
        Commands::Generate { separator } => {
            let separator = config.resolve_separator(separator);
            cmd_generate(&store, &separator)
        }
    };
    std::process::exit(code);
}
