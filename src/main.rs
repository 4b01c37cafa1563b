use anyhow::Context;
use clap::{Parser, Subcommand};
use fueltracker::sdk::{
    config::{AppConfig, RoutingBackend},
    fuel::FuelKind,
    history::{HistoryStore, JsonFileHistoryStore},
    pricing::{default_sources, PriceResolver, EMERGENCY_FALLBACK_SOURCE},
    routing::{CachedGeocoder, GeoCache, Geocoder, NominatimGeocoder, OrsProvider, OsrmRouter, Router},
    trip::{TripCalculator, TripRecord},
    util::{
        log::init_logging,
        rate_limit::{nominatim_limiter, ors_limiter},
    },
};
use reqwest::Client as HttpClient;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

/// Estimate fuel cost and CO2 for a road trip
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate the cost of a trip and add it to the history
    Trip {
        /// Departure address (e.g. "Gent")
        #[arg(long = "from")]
        from: String,

        /// Destination address (e.g. "Brussel")
        #[arg(long = "to")]
        to: String,

        /// Fuel consumption in L/100km (2-25)
        #[arg(short, long)]
        consumption: f64,

        #[arg(short, long, value_enum, default_value_t = FuelKind::Euro95)]
        fuel: FuelKind,

        /// Do not store the result in the history
        #[arg(long)]
        no_save: bool,
    },
    /// Show the current price per litre
    Price {
        #[arg(short, long, value_enum, default_value_t = FuelKind::Euro95)]
        fuel: FuelKind,
    },
    /// List address matches for a query
    Search {
        query: String,

        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Inspect or edit the trip history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// Print every stored trip, oldest first
    List,
    /// Print totals over all trips
    Summary,
    /// Delete the trip at INDEX (as shown by `list`)
    Remove { index: usize },
    /// Delete every trip
    Clear,
    /// Write the history as a JSON bundle (stdout by default)
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the history with a previously exported bundle
    Import { file: PathBuf },
}

/// Network-backed services for the trip, price and search commands.
struct Session {
    geocoder: Arc<CachedGeocoder>,
    calculator: TripCalculator,
}

impl Session {
    fn open(config: &AppConfig) -> anyhow::Result<Self> {
        let http = HttpClient::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;

        let (geocoder, router): (Arc<dyn Geocoder>, Arc<dyn Router>) = match &config.backend {
            RoutingBackend::Osm {
                nominatim_url,
                osrm_url,
            } => {
                let geocoder: Arc<dyn Geocoder> = Arc::new(NominatimGeocoder::new(
                    http.clone(),
                    nominatim_url.clone(),
                    config.countries.clone(),
                    nominatim_limiter(),
                ));
                let router: Arc<dyn Router> = Arc::new(OsrmRouter::new(http.clone(), osrm_url.clone()));
                (geocoder, router)
            }
            RoutingBackend::Ors { api_key, base_url } => {
                let provider = Arc::new(OrsProvider::new(
                    http.clone(),
                    api_key.clone(),
                    base_url.clone(),
                    &config.countries,
                    ors_limiter(),
                ));
                let geocoder: Arc<dyn Geocoder> = provider.clone();
                let router: Arc<dyn Router> = provider;
                (geocoder, router)
            }
        };

        let cache = GeoCache::load_from_file(&config.geo_cache_path)
            .with_context(|| format!("Failed to load {}", config.geo_cache_path.display()))?;
        let geocoder = Arc::new(CachedGeocoder::new(geocoder, cache));
        let resolver = PriceResolver::new(default_sources(&http, &config.prices), config.prices.cache_ttl);
        let calculator = TripCalculator::new(geocoder.clone(), router, resolver);
        Ok(Self { geocoder, calculator })
    }

    fn save_geo_cache(&self, path: &Path) -> anyhow::Result<()> {
        self.geocoder
            .save_to_file(path)
            .with_context(|| format!("Failed to save {}", path.display()))
    }
}

fn print_trip(index: Option<usize>, trip: &TripRecord) {
    let prefix = index.map(|i| format!("[{}] ", i)).unwrap_or_default();
    println!(
        "{}{}  {} → {}  {:.1} km  {:.0} min  {}  €{:.3}/L  €{:.2}  {:.1} kg CO2",
        prefix,
        trip.created_at.format("%Y-%m-%d %H:%M"),
        trip.departure_label,
        trip.destination_label,
        trip.distance_km,
        trip.duration_min,
        trip.fuel_kind.display_name(),
        trip.price_per_liter,
        trip.cost_total,
        trip.co2_kg
    );
}

fn run_history(action: HistoryAction, store: &mut JsonFileHistoryStore) -> anyhow::Result<()> {
    match action {
        HistoryAction::List => {
            let trips = store.load_all()?;
            if trips.is_empty() {
                println!("No trips recorded yet.");
            }
            for (i, trip) in trips.iter().enumerate() {
                print_trip(Some(i), trip);
            }
        }
        HistoryAction::Summary => {
            let s = store.summary()?;
            println!(
                "{} trips, {:.1} km, €{:.2} total, €{:.3}/km",
                s.trips, s.total_distance_km, s.total_cost, s.avg_cost_per_km
            );
        }
        HistoryAction::Remove { index } => {
            let removed = store.remove_at(index)?;
            log::info!(
                "Removed trip {} → {}",
                removed.departure_label,
                removed.destination_label
            );
        }
        HistoryAction::Clear => {
            store.clear()?;
            log::info!("History cleared");
        }
        HistoryAction::Export { output } => {
            let json = store.export_json(chrono::Utc::now())?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    log::info!("History exported to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        HistoryAction::Import { file } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let count = store.import_json(&json)?;
            log::info!("Imported {} trips from {}", count, file.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::from_env()?;
    let mut history = JsonFileHistoryStore::new(&config.history_path);

    match cli.command {
        Command::History { action } => run_history(action, &mut history),
        Command::Trip {
            from,
            to,
            consumption,
            fuel,
            no_save,
        } => {
            let mut session = Session::open(&config)?;
            let outcome = session.calculator.compute_trip(&from, &to, consumption, fuel).await;
            // Saved before the error propagates so resolved addresses stay cached.
            session.save_geo_cache(&config.geo_cache_path)?;
            let trip = outcome?;

            print_trip(None, &trip);
            if trip.price_source == EMERGENCY_FALLBACK_SOURCE {
                log::warn!("Live prices unavailable; cost uses a reference price");
            }
            if !no_save {
                history.append(trip)?;
                log::info!("Trip saved to {}", config.history_path.display());
            }
            Ok(())
        }
        Command::Price { fuel } => {
            let mut session = Session::open(&config)?;
            let quote = session.calculator.current_price(fuel).await;
            println!(
                "{}: €{:.3}/L ({}, {})",
                fuel.display_name(),
                quote.amount,
                quote.source_name,
                quote.retrieved_at.format("%Y-%m-%d %H:%M")
            );
            Ok(())
        }
        Command::Search { query, limit } => {
            let session = Session::open(&config)?;
            let places = session.geocoder.search(&query, limit).await?;
            if places.is_empty() {
                println!("No matches for \"{}\"", query);
            }
            for place in places {
                println!(
                    "{}  ({:.5}, {:.5})  {}",
                    place.name, place.coord.lat, place.coord.lon, place.display_name
                );
            }
            Ok(())
        }
    }
}
