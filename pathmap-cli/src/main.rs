mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, PolymorphicArgs, RelationsArgs, ToBackendArgs, ToUiArgs};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the relations of every entity mapping with resolved pointers
    Relations(RelationsArgs),
    /// Report relations of one entity mapping that do not fit the sample
    Check(CheckArgs),
    /// Switch an entity mapping in or out of polymorphic list mode
    Polymorphic(PolymorphicArgs),
    /// Convert an editor configuration into its persisted form
    ToBackend(ToBackendArgs),
    /// Convert a persisted configuration into its editor form
    ToUi(ToUiArgs),
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Relations(args) => commands::relations::run(&args),
        Commands::Check(args) => commands::check::run(&args),
        Commands::Polymorphic(args) => commands::polymorphic::run(&args),
        Commands::ToBackend(args) => commands::convert::run_to_backend(&args),
        Commands::ToUi(args) => commands::convert::run_to_ui(&args),
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Reports go to stdout, so logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_string()))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
