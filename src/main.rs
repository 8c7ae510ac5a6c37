use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Instant;

use isochrone_explorer::api::{GoogleMapsClient, geocode};
use isochrone_explorer::config::FileConfig;
use isochrone_explorer::domain::{GeoPoint, PoiType, TravelMode};
use isochrone_explorer::isochrone::{
    EstimatorConfig, IsochroneEstimator, IsochroneRequest, IsochroneSession, Outcome,
};
use isochrone_explorer::output::{MapLayers, to_feature_collection, write_geojson};

/// Estimate how far you can walk, run or cycle in a given time
///
/// Examples:
///   # 15 minute walk from downtown San Francisco
///   isochrone-explorer --lat 37.7749 --lon -122.4194 -t 15
///
///   # 20 minute bike ride from a named place, with nearby cafes and parks
///   isochrone-explorer -p "Ferry Building, San Francisco" -m bicycling -t 20 --pois cafe,park
///
///   # Running isochrone plus a route to a destination
///   isochrone-explorer --lat 37.7749 --lon -122.4194 -m running --route-to-lat 37.7694 --route-to-lon -122.4862
///
/// Requires a maps API key in GOOGLE_MAPS_API_KEY or the config file.
#[derive(Parser, Debug)]
#[command(name = "isochrone-explorer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches isochrone-explorer.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Origin latitude (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Origin longitude (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Origin as a place name, geocoded via OpenStreetMap
    #[arg(short = 'p', long, conflicts_with = "lat")]
    place: Option<String>,

    /// Travel mode
    #[arg(short = 'm', long, value_enum)]
    mode: Option<TravelMode>,

    /// Time budget in minutes
    #[arg(short = 't', long)]
    minutes: Option<f64>,

    /// Sampling grid points per side
    #[arg(long)]
    grid_size: Option<usize>,

    /// Destinations per travel-time request
    #[arg(long)]
    batch_size: Option<usize>,

    /// Travel-time requests in flight at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Output GeoJSON file path
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Points of interest to search for, comma separated
    #[arg(long, value_enum, value_delimiter = ',')]
    pois: Vec<PoiType>,

    /// Search radius for points of interest in meters
    #[arg(long)]
    poi_radius: Option<u32>,

    /// Route destination latitude (use with --route-to-lon)
    #[arg(long, requires = "route_to_lon", allow_hyphen_values = true)]
    route_to_lat: Option<f64>,

    /// Route destination longitude (use with --route-to-lat)
    #[arg(long, requires = "route_to_lat", allow_hyphen_values = true)]
    route_to_lon: Option<f64>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    // Open until the config file has been read; narrowed below
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let file_config = match args.config {
        Some(ref config_path) if config_path.exists() => FileConfig::from_path(config_path)?,
        Some(ref config_path) => bail!("Config file not found: {:?}", config_path),
        None => FileConfig::load().unwrap_or_default(),
    };

    let mode = args.mode.unwrap_or(file_config.mode);
    let minutes = args.minutes.unwrap_or(file_config.minutes);
    let poi_radius = args.poi_radius.unwrap_or(file_config.poi_radius_m);
    let verbose = is_verbose(&args, &file_config);
    if std::env::var_os("RUST_LOG").is_none() {
        log::set_max_level(log_level(verbose));
    }
    let output_path = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| PathBuf::from("isochrone.geojson"));
    let maps_config = file_config.maps.clone().unwrap_or_default();

    let mut estimator_config = EstimatorConfig::from(&file_config);
    if let Some(grid_size) = args.grid_size {
        estimator_config.grid_size = grid_size;
    }
    if let Some(batch_size) = args.batch_size {
        estimator_config.batch_size = batch_size;
    }
    if let Some(concurrency) = args.concurrency {
        estimator_config.max_concurrent_batches = concurrency;
    }

    if !(minutes.is_finite() && minutes > 0.0) {
        bail!("--minutes must be a positive number, got {}", minutes);
    }

    println!("isochrone-explorer - Reachability Estimator");
    println!("===========================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Mode: {}", mode);
        println!("  Budget: {} min", minutes);
        println!(
            "  Speed estimate: {:.1} km/h",
            estimator_config.speeds.speed_for(mode) / 1000.0
        );
        println!(
            "  Grid: {0}x{0} points",
            estimator_config.grid_size
        );
        println!("  Batch size: {}", estimator_config.batch_size);
        println!("  Concurrent batches: {}", estimator_config.max_concurrent_batches);
        println!("  Output: {}", output_path.display());
        println!();
    }

    let origin = resolve_origin(&args, &file_config, maps_config.timeout_secs)?;
    if !origin.is_valid() {
        bail!("Origin {} is not a valid coordinate", origin);
    }

    let client =
        GoogleMapsClient::new(&maps_config).context("Failed to initialize mapping services")?;
    let estimator = IsochroneEstimator::new(&client, estimator_config);
    let session = IsochroneSession::new();
    let request = IsochroneRequest::new(origin, mode, minutes);

    let spinner = create_spinner("Estimating reachable area...");
    let start = Instant::now();
    let polygon = match session
        .run(&estimator, &request)
        .context("Failed to calculate isochrone. Please try again.")?
    {
        Outcome::Completed(polygon) => polygon,
        Outcome::Superseded => bail!("Isochrone computation was cancelled"),
    };
    if polygon.is_empty() {
        spinner.finish_with_message(format!(
            "No reachable area within {} min [{:.1}s]",
            minutes,
            start.elapsed().as_secs_f32()
        ));
    } else {
        spinner.finish_with_message(format!(
            "Boundary with {} points, {:.2} km², farthest {:.0}m [{:.1}s]",
            polygon.len(),
            polygon.area_m2() / 1_000_000.0,
            polygon.max_distance_m(origin),
            start.elapsed().as_secs_f32()
        ));
    }

    let pois = if args.pois.is_empty() {
        Vec::new()
    } else {
        let spinner = create_spinner("Searching points of interest...");
        let start = Instant::now();
        let pois = client.find_pois(origin, poi_radius, &args.pois);
        let inside = pois.iter().filter(|p| polygon.contains(p.position)).count();
        spinner.finish_with_message(format!(
            "Found {} places, {} inside the boundary [{:.1}s]",
            pois.len(),
            inside,
            start.elapsed().as_secs_f32()
        ));
        pois
    };

    let route = match (args.route_to_lat, args.route_to_lon) {
        (Some(lat), Some(lon)) => {
            let destination = GeoPoint::new(lat, lon);
            let spinner = create_spinner("Calculating route...");
            let start = Instant::now();
            let route = client
                .route(origin, destination, mode)
                .context("Failed to calculate route")?;
            spinner.finish_with_message(format!(
                "Route: {:.1} km, {:.0} min, {} steps [{:.1}s]",
                route.distance_m / 1000.0,
                route.duration_minutes(),
                route.steps.len(),
                start.elapsed().as_secs_f32()
            ));
            Some(route)
        }
        _ => None,
    };

    let layers = MapLayers {
        origin,
        polygon: &polygon,
        route: route.as_ref(),
        pois: &pois,
    };
    write_geojson(&output_path, &to_feature_collection(&layers))
        .context("Failed to write GeoJSON file")?;

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", output_path.display());

    Ok(())
}

/// Command line coordinates, then a command line place name, then the config file
fn resolve_origin(args: &Args, file_config: &FileConfig, timeout_secs: u64) -> Result<GeoPoint> {
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        println!("Using provided coordinates: ({:.4}, {:.4})", lat, lon);
        return Ok(GeoPoint::new(lat, lon));
    }

    let place = match args.place.as_ref() {
        Some(place) => Some(place),
        None => {
            if let Some(origin) = file_config.origin() {
                println!(
                    "Using configured coordinates: ({:.4}, {:.4})",
                    origin.lat, origin.lng
                );
                return Ok(origin);
            }
            file_config.place.as_ref()
        }
    };

    let Some(place) = place else {
        bail!("Must provide either --lat and --lon, or --place");
    };

    let spinner = create_spinner("Geocoding place...");
    let start = Instant::now();
    let origin = geocode(place, timeout_secs).context("Failed to geocode place")?;
    spinner.finish_with_message(format!(
        "Geocoded: {} -> ({:.4}, {:.4}) [{:.1}s]",
        place,
        origin.lat,
        origin.lng,
        start.elapsed().as_secs_f32()
    ));
    Ok(origin)
}

/// Either the flag or the config file asks for verbose output
fn is_verbose(args: &Args, file_config: &FileConfig) -> bool {
    args.verbose || file_config.verbose
}

/// Log level when RUST_LOG does not say otherwise
fn log_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_verbose_raises_log_level() {
        let args = Args::parse_from(["isochrone-explorer"]);
        let file_config: FileConfig = toml::from_str("verbose = true").unwrap();

        let verbose = is_verbose(&args, &file_config);
        assert_eq!(log_level(verbose), LevelFilter::Debug);
        assert_eq!(log_level(args.verbose), LevelFilter::Warn);
    }

    #[test]
    fn test_flags_parse() {
        let args = Args::parse_from([
            "isochrone-explorer", "--lat", "37.7749", "--lon", "-122.4194", "-m", "running",
            "--pois", "cafe,park", "-v",
        ]);
        assert_eq!(args.mode, Some(TravelMode::Running));
        assert_eq!(args.pois, vec![PoiType::Cafe, PoiType::Park]);
        assert!(args.verbose);
    }
}
