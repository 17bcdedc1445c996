use clap::{Parser, Subcommand};
use placeid_core::{BusinessRecord, Coordinates};
use placeid_resolver::PlaceResolver;

#[derive(Debug, Parser)]
#[command(name = "placeid-cli")]
#[command(about = "Resolve place ids for business records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one resolution and print the result as JSON.
    Resolve {
        /// Business name; search-result markup is stripped automatically.
        #[arg(long)]
        name: String,
        /// Lot-number address, used for region narrowing and matching.
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        road_address: Option<String>,
        /// District/region fragment for the aggregated-search variants.
        #[arg(long)]
        district: Option<String>,
        /// Longitude-like coordinate; only used together with --y.
        #[arg(long)]
        x: Option<f64>,
        /// Latitude-like coordinate; only used together with --x.
        #[arg(long)]
        y: Option<f64>,
    },
    /// Run a coordinate-keyed lookup and print the candidate as JSON.
    Locate {
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        /// Optional business name to scope the map search.
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the per-strategy status snapshot as JSON.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = placeid_core::load_resolver_config()?;
    tracing::debug!(?config, "loaded resolver configuration");
    let resolver = PlaceResolver::new(&config)?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve {
            name,
            address,
            road_address,
            district,
            x,
            y,
        } => {
            let record = BusinessRecord {
                name,
                address,
                road_address,
                district,
                coordinates: x.zip(y).map(|(x, y)| Coordinates { x, y }),
            };
            let result = resolver.resolve(&record).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Locate { x, y, name } => {
            let candidate = resolver
                .resolve_by_coordinates(Coordinates { x, y }, name.as_deref())
                .await;
            println!("{}", serde_json::to_string_pretty(&candidate)?);
        }
        Commands::Status => {
            println!(
                "{}",
                serde_json::to_string_pretty(&resolver.strategy_status())?
            );
        }
    }

    Ok(())
}
