use crate::commands::{run_export, run_list, ExportArgs, ListArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use enrollment::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "enrollment-api",
    about = "Run the child-care enrollment intake service and inspect stored enrollments",
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
    /// Inspect stored enrollments
    Enrollments {
        #[command(subcommand)]
        command: EnrollmentsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum EnrollmentsCommand {
    /// Print the most recent enrollments
    List(ListArgs),
    /// Write enrollments as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Enrollments {
            command: EnrollmentsCommand::List(args),
        } => run_list(args),
        Command::Enrollments {
            command: EnrollmentsCommand::Export(args),
        } => run_export(args),
    }
}
