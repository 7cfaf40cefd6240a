mod cli;
mod infra;
mod routes;
mod select;
mod server;

use lead_router::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
