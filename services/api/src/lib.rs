mod cli;
mod infra;
mod quote;
mod routes;
mod server;

use sip_estimator::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
