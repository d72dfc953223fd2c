mod cli;
mod infra;
mod predict;
mod routes;
mod server;

use cycle_insight::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
