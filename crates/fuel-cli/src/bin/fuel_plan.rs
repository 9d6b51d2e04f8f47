use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fuel_cli::{load_route, load_stations, plan_request, RuleArgs};
use fuel_core::{plan_trip, DistanceUnit};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan fuel stops locally and print the plan as JSON
    Plan {
        /// Route file: a directions response or {geometry, distance_miles}
        #[arg(long)]
        route: PathBuf,

        /// Station catalog: a `.csv` price export, or JSON records (list or keyed by id)
        #[arg(long)]
        stations: PathBuf,

        /// Unit of distances in a directions response
        #[arg(long, value_enum, default_value_t = Unit::Meters)]
        distance_unit: Unit,

        /// Print only the GeoJSON feature collection
        #[arg(long)]
        geojson: bool,

        #[command(flatten)]
        rules: RuleArgs,
    },
    /// Submit a route to a running fuel server
    Submit {
        /// Fuel server URL
        #[arg(long, default_value = "http://localhost:3000")]
        url: String,

        #[arg(long)]
        route: PathBuf,

        #[arg(long, value_enum, default_value_t = Unit::Meters)]
        distance_unit: Unit,

        #[command(flatten)]
        rules: RuleArgs,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Unit {
    Meters,
    Kilometers,
    Miles,
}

impl From<Unit> for DistanceUnit {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Meters => DistanceUnit::Meters,
            Unit::Kilometers => DistanceUnit::Kilometers,
            Unit::Miles => DistanceUnit::Miles,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fuel_cli=info".parse()?)
                .add_directive("fuel_core=warn".parse()?),
        )
        .init();

    match Cli::parse().command {
        Command::Plan {
            route,
            stations,
            distance_unit,
            geojson,
            rules,
        } => {
            let input = load_route(&route, distance_unit.into())?;
            let catalog = load_stations(&stations)?;
            tracing::info!(
                stations = catalog.len(),
                skipped = catalog.skipped(),
                distance_miles = input.distance_miles,
                "planning trip"
            );

            let trip = plan_trip(&input, &catalog, &rules.to_rules())?;
            let output = if geojson {
                serde_json::to_string_pretty(&trip.feature_collection)?
            } else {
                serde_json::to_string_pretty(&trip)?
            };
            println!("{}", output);
        }
        Command::Submit {
            url,
            route,
            distance_unit,
            rules,
        } => {
            let input = load_route(&route, distance_unit.into())?;
            let endpoint = format!("{}/v1/routes/plan", url.trim_end_matches('/'));
            tracing::info!(%endpoint, distance_miles = input.distance_miles, "submitting route");

            let response = reqwest::blocking::Client::new()
                .post(&endpoint)
                .json(&plan_request(&input, &rules))
                .send()
                .with_context(|| format!("failed to reach {}", endpoint))?;
            let status = response.status();
            let body: serde_json::Value = response.json().context("invalid response body")?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            if !status.is_success() {
                bail!("server rejected route: {}", status);
            }
        }
    }

    Ok(())
}
