mod discover;

use clap::{Args, Parser, Subcommand};
use shopfinder_core::SortOrder;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopfinder")]
#[command(about = "Find marketplace shops near you")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List shops, nearest first when a location is known
    Discover(DiscoverArgs),
    /// Great-circle distance between two points, in kilometers
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lng1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lng2: f64,
    },
}

#[derive(Debug, Args)]
struct DiscoverArgs {
    /// Viewer latitude (requires --lng)
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Viewer longitude (requires --lat)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Behave as if location access was refused
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    deny_location: bool,

    /// List every shop instead of shops near the viewer
    #[arg(long)]
    all: bool,

    /// Case-insensitive match on name, description, or city
    #[arg(long, default_value = "")]
    search: String,

    /// Only shops tagged with this category
    #[arg(long)]
    category: Option<String>,

    /// as-returned, nearest, name, or newest
    #[arg(long, default_value_t = SortOrder::AsReturned)]
    sort: SortOrder,

    /// Ask for location access again if the first lookup fails
    #[arg(long)]
    enable_location: bool,

    /// Print the rendered view as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Discover(args) => {
            let config = shopfinder_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            tracing::debug!(env = %config.env, "configuration loaded");
            discover::run(&config, &args).await
        }
        Commands::Distance {
            lat1,
            lng1,
            lat2,
            lng2,
        } => {
            init_tracing("warn")?;
            let km = shopfinder_core::distance_km(lat1, lng1, lat2, lng2);
            println!("{km:.3} km");
            Ok(())
        }
    }
}

/// Logs go to stderr so `--json` output on stdout stays machine-readable.
fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests;
