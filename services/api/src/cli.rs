use crate::infra::TableOverrideArgs;
use crate::quote::{run_catalog, run_estimate, EstimateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sip_estimator::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SIP House Cost Estimator",
    about = "Price prefabricated SIP panel houses from the command line or over HTTP",
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
    /// Price one house configuration and print the itemized quote
    Estimate(EstimateArgs),
    /// Print the configured catalogs: roof types, works, delivery cities
    Catalog(CatalogArgs),
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
    pub(crate) tables: TableOverrideArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    #[command(flatten)]
    pub(crate) tables: TableOverrideArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args),
        Command::Catalog(args) => run_catalog(args),
    }
}
