use crate::demo::{run_demo, run_ingest_check, DemoArgs, IngestArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use creditline::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "creditline",
    about = "Run and exercise the loan eligibility service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate ledger CSV exports and print the import counters
    Ingest(IngestArgs),
    /// Run an end-to-end CLI demo covering registration, scoring, and approval
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Customer ledger CSV to seed the repositories at startup
    #[arg(long)]
    pub(crate) customers_csv: Option<PathBuf>,
    /// Loan ledger CSV to seed the repositories at startup
    #[arg(long, requires = "customers_csv")]
    pub(crate) loans_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Ingest(args) => run_ingest_check(args),
        Command::Demo(args) => run_demo(args),
    }
}
