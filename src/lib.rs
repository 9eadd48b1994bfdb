pub mod breakdown;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod forecast;
pub mod log;
pub mod providers;
pub mod quote;
pub mod selection;
pub mod ui;
pub mod valuation;

use anyhow::Result;
use tracing::info;

pub enum AppCommand {
    Quote { price: Option<f64> },
    Forecast { from: Option<u16>, to: Option<u16> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Landed-cost estimator starting...");

    match command {
        AppCommand::Quote { price } => quote::run(config_path, price).await,
        AppCommand::Forecast { from, to } => forecast::run(config_path, from, to).await,
    }
}
