use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use mashin::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for mashin::AppCommand {
    fn from(cmd: Commands) -> mashin::AppCommand {
        match cmd {
            Commands::Quote { price } => mashin::AppCommand::Quote { price },
            Commands::Forecast { from, to } => mashin::AppCommand::Forecast { from, to },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the landed-cost breakdown for the configured vehicle
    Quote {
        /// Use this auction price (JPY) instead of asking the prediction service
        #[arg(short, long)]
        price: Option<f64>,
    },
    /// Display predicted prices across a range of years
    Forecast {
        /// First year of the range (default: five years before the last)
        #[arg(long)]
        from: Option<u16>,
        /// Last year of the range (default: current year)
        #[arg(long)]
        to: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => mashin::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = mashin::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
vehicle:
  maker: "Toyota"
  model: "Camry"
  fuel_type: "Hybrid"
  year: "2022"
  engine_size: 2500
  odometer: 45000

rates:
  jpy_to_mnt: 24.95
  usd_to_mnt: 3560
  transport_cost_usd: 1190
  service_charge_jpy: 120000
  special_tax_mnt: 6675000

providers:
  catalog:
    base_url: "http://103.50.205.42:8000"
  oracle:
    base_url: "http://103.50.205.42:8000"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
