//! adaptest CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "adaptest", version, about = "Adaptive quiz engine for study material")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive adaptive session over a question bank
    Run {
        /// Path to a .toml question bank
        #[arg(long)]
        bank: PathBuf,

        /// Session length in questions
        #[arg(long, default_value = "10")]
        max_questions: usize,

        /// Directory for saved session reports
        #[arg(long, default_value = "./adaptest-results")]
        output: PathBuf,
    },

    /// Generate a question bank from study material via a supplier
    Fetch {
        /// Plain-text study material (already extracted from its source)
        #[arg(long)]
        source: PathBuf,

        /// Where to write the generated bank TOML
        #[arg(long)]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bank id (defaults to the source file stem)
        #[arg(long)]
        id: Option<String>,

        /// Bank display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Render a saved session report
    Report {
        /// Path to a report JSON file
        #[arg(long)]
        report: PathBuf,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("adaptest=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            bank,
            max_questions,
            output,
        } => commands::run::execute(bank, max_questions, output),
        Commands::Fetch {
            source,
            output,
            config,
            id,
            name,
        } => commands::fetch::execute(source, output, config, id, name).await,
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Report { report } => commands::report::execute(report),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
