use crate::commands::{run_estimate, run_locate, run_vocabulary, EstimateArgs, LocateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rent_estimator::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Rent Estimator",
    about = "Estimate German apartment cold rents from location and listing features",
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
    /// Resolve a postal code or state/city selection against the geo data
    Locate(LocateArgs),
    /// Print the label to code tables of every feature category
    Vocabulary,
    /// Build a prediction record from form inputs and ask the model for an estimate
    Estimate(EstimateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the geo data file (GEO_DATA_PATH)
    #[arg(long)]
    pub(crate) geo_data: Option<PathBuf>,
    /// Override the model-serving endpoint (MODEL_ENDPOINT)
    #[arg(long)]
    pub(crate) model_endpoint: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Locate(args) => run_locate(args),
        Command::Vocabulary => run_vocabulary(),
        Command::Estimate(args) => run_estimate(args).await,
    }
}
