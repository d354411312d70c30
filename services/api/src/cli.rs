use crate::commands::{run_bulk, run_predict, run_summary, BulkArgs, PredictArgs, SummaryArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loansphere::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "LoanSphere",
    about = "Predict loan approval outcomes for single applicants or whole CSV uploads",
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
    /// Predict the outcome of a single loan application
    Predict(Box<PredictArgs>),
    /// Score every row of a CSV file and write the annotated export
    Bulk(BulkArgs),
    /// Print reference dataset counts and the loaded model's feature schema
    Summary(SummaryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

/// Artifact path overrides shared by every subcommand that loads the model.
#[derive(Args, Debug, Default)]
pub(crate) struct ArtifactArgs {
    /// Path to the serialized model artifact (overrides LOAN_MODEL_PATH)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Path to the reference loan dataset (overrides LOAN_DATA_PATH)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(*args),
        Command::Bulk(args) => run_bulk(args),
        Command::Summary(args) => run_summary(args),
    }
}
