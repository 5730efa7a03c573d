use crate::demo::{run_classify, run_criteria, run_demo, ClassifyArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use export_matrix::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Export Readiness Matrix",
    about = "Serve and exercise the export-readiness classification matrix",
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
    /// Print the configured rubric with every option and its score
    Criteria,
    /// Classify a single selection vector or a CSV export of companies
    Classify(ClassifyArgs),
    /// Walk a company evaluation through load, edit, and save against an in-memory store
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Criteria => run_criteria(),
        Command::Classify(args) => run_classify(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
