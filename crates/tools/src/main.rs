use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use foundation::math::Coordinate;
use proximity::{AccessPolicy, Direction, EngineConfig, ProximityEngine, Room};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Geofence simulation tool for location-scoped chat rooms.
#[derive(Debug, Parser)]
#[command(name = "geofence", version)]
struct Cli {
    /// How rooms with unknown geometry are treated (overrides PROXIMITY_ACCESS_POLICY).
    #[arg(long, global = true)]
    policy: Option<AccessPolicy>,

    /// Evaluate at most this many rooms (overrides PROXIMITY_MAX_ROOMS).
    #[arg(long, global = true)]
    max_rooms: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Location {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    #[arg(long)]
    accuracy: Option<f64>,
}

impl Location {
    fn coordinate(&self) -> Result<Coordinate, String> {
        tools::viewer(self.lat, self.lon, self.accuracy).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Great-circle distance between two points.
    Distance {
        #[arg(allow_hyphen_values = true)]
        lat1: f64,
        #[arg(allow_hyphen_values = true)]
        lon1: f64,
        #[arg(allow_hyphen_values = true)]
        lat2: f64,
        #[arg(allow_hyphen_values = true)]
        lon2: f64,
    },
    /// Whether a location may enter one room.
    Evaluate {
        /// Room listing (JSON array), or `-` for stdin.
        #[arg(long)]
        rooms: PathBuf,
        #[arg(long)]
        room: String,
        /// Evaluate without a viewer location.
        #[arg(long)]
        no_location: bool,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Active room for a location, with every admitted candidate.
    Resolve {
        #[arg(long)]
        rooms: PathBuf,
        #[command(flatten)]
        location: Location,
    },
    /// Collapse duplicate room records.
    Dedupe {
        #[arg(long)]
        rooms: PathBuf,
    },
    /// Move a location along a cardinal direction.
    Shift {
        #[command(flatten)]
        location: Location,
        #[arg(long)]
        direction: Direction,
        /// Defaults to PROXIMITY_STEP_METERS, or roughly two miles.
        #[arg(long)]
        step_meters: Option<f64>,
    },
    /// Match a room listing against the built-in presets.
    Presets {
        #[arg(long)]
        rooms: Option<PathBuf>,
        #[arg(long)]
        preferred: Option<String>,
    },
    /// Jump to a named teleport preset and resolve the room there.
    Teleport {
        key: String,
        #[arg(long)]
        rooms: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let cli = Cli::parse();

    let mut config = EngineConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(policy) = cli.policy {
        config.access_policy = policy;
    }
    if let Some(max) = cli.max_rooms {
        config.max_rooms = (max > 0).then_some(max);
    }
    debug!(?config, "engine config");
    let engine = ProximityEngine::new(config);

    match cli.command {
        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let a = tools::viewer(lat1, lon1, None).map_err(|e| e.to_string())?;
            let b = tools::viewer(lat2, lon2, None).map_err(|e| e.to_string())?;
            print_json(&tools::distance_report(&a, &b))
        }
        Command::Evaluate {
            rooms,
            room,
            no_location,
            lat,
            lon,
        } => {
            let rooms = read_rooms(&rooms)?;
            let viewer = match (no_location, lat, lon) {
                (true, _, _) => None,
                (false, Some(lat), Some(lon)) => {
                    Some(tools::viewer(lat, lon, None).map_err(|e| e.to_string())?)
                }
                _ => return Err("evaluate needs --lat and --lon, or --no-location".to_string()),
            };
            print_json(&tools::evaluate_report(
                &engine,
                &rooms,
                &room,
                viewer.as_ref(),
            ))
        }
        Command::Resolve { rooms, location } => {
            let rooms = read_rooms(&rooms)?;
            let viewer = location.coordinate()?;
            print_json(&tools::resolve_report(&engine, &rooms, Some(&viewer)))
        }
        Command::Dedupe { rooms } => {
            let rooms = read_rooms(&rooms)?;
            print_json(&engine.dedupe(&rooms))
        }
        Command::Shift {
            location,
            direction,
            step_meters,
        } => {
            let source = location.coordinate()?;
            let report = tools::shift_report(&engine, &source, direction, step_meters)
                .ok_or_else(|| "step must be a finite number of meters".to_string())?;
            print_json(&report)
        }
        Command::Presets { rooms, preferred } => {
            let rooms = match rooms {
                Some(path) => read_rooms(&path)?,
                None => Vec::new(),
            };
            print_json(&tools::preset_report(
                &engine,
                &rooms,
                preferred.as_deref(),
                None,
            ))
        }
        Command::Teleport { key, rooms } => {
            let rooms = match rooms {
                Some(path) => read_rooms(&path)?,
                None => Vec::new(),
            };
            print_json(&tools::teleport_report(&engine, &rooms, &key)?)
        }
    }
}

fn read_rooms(path: &Path) -> Result<Vec<Room>, String> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("read stdin: {e}"))?;
        buf
    } else {
        fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?
    };
    let rooms = tools::load_rooms(&raw).map_err(|e| format!("{path:?}: {e}"))?;
    debug!(count = rooms.len(), "loaded rooms");
    Ok(rooms)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}
