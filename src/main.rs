#![deny(clippy::all)]
#![forbid(unsafe_code)]

use std::error::Error;
use std::io::prelude::*;
use std::path::PathBuf;

use structopt::StructOpt;
use tracing::info;

use waypoint_tool::codes::{FixType, FixUsage, OperationType};
use waypoint_tool::input::{parse_coordinates, validate_runway_code};
use waypoint_tool::logging::init_logging;
use waypoint_tool::nav_data::{resolve, ByIndex, Candidate, DataFile, Selector, SourceKind};
use waypoint_tool::{FixRequest, GeoPoint, WaypointRequest};

#[derive(StructOpt)]
#[structopt(about = "Computes waypoint and fix records for navigation-database coding")]
struct Args {
    /// Navaid data (earth_nav.dat layout)
    #[structopt(long = "nav-file", parse(from_os_str))]
    nav_file: Option<PathBuf>,
    /// Fix data (earth_fix.dat layout)
    #[structopt(long = "fix-file", parse(from_os_str))]
    fix_file: Option<PathBuf>,
    /// Log at debug level unless RUST_LOG says otherwise
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Point at a bearing and distance from a reference navaid
    Waypoint(WaypointArgs),
    /// Fix at known coordinates
    Fix(FixArgs),
}

#[derive(StructOpt)]
struct LocationArgs {
    /// "lat lon" in decimal degrees or DMS (29-58-48.000N 095-20-30.000W)
    #[structopt(short = "c", long = "coords", allow_hyphen_values = true)]
    coords: Option<String>,
    /// Identifier to look up when no coordinates are given
    #[structopt(short = "i", long = "ident")]
    ident: Option<String>,
    /// Data file to search: nav or fix
    #[structopt(long = "source")]
    source: Option<SourceKind>,
    /// Entry to use when several rows match, starting at 1
    #[structopt(long = "choice")]
    choice: Option<usize>,
}

#[derive(StructOpt)]
struct WaypointArgs {
    #[structopt(flatten)]
    location: LocationArgs,
    /// Magnetic bearing from the reference, 0-359
    #[structopt(short = "b", long = "bearing")]
    bearing: f64,
    /// Distance in nautical miles
    #[structopt(short = "d", long = "distance")]
    distance: f64,
    /// Magnetic declination, east positive
    #[structopt(long = "declination", default_value = "0", allow_hyphen_values = true)]
    declination: f64,
    #[structopt(short = "a", long = "airport")]
    airport: String,
    /// 1-3 letter VOR identifier for the record suffix
    #[structopt(long = "vor")]
    vor: Option<String>,
    /// Departure, Arrival or Approach
    #[structopt(short = "o", long = "operation")]
    operation: OperationType,
    /// Wrap the destination longitude into [-180, 180)
    #[structopt(long = "wrap-longitude")]
    wrap_longitude: bool,
}

#[derive(StructOpt)]
struct FixArgs {
    #[structopt(flatten)]
    location: LocationArgs,
    /// VORDME, VOR, NDBDME, NDB, ILS or RNP
    #[structopt(long = "fix-type")]
    fix_type: FixType,
    /// e.g. "Final approach fix"
    #[structopt(long = "usage")]
    usage: FixUsage,
    /// Two digit runway code, 00-99
    #[structopt(short = "r", long = "runway")]
    runway: String,
    #[structopt(short = "a", long = "airport")]
    airport: String,
    /// Departure, Arrival or Approach
    #[structopt(short = "o", long = "operation")]
    operation: OperationType,
}

/// Asks on the terminal which row to use.
struct Prompt;

impl Selector for Prompt {
    fn select(&mut self, candidates: &[Candidate<'_>]) -> waypoint_tool::Result<usize> {
        eprintln!("Several entries match '{}':", candidates[0].ident());
        for (i, c) in candidates.iter().enumerate() {
            eprintln!("  {}) {}", i + 1, c.label());
        }
        eprint!("Select an entry [1]: ");
        std::io::stderr().flush()?;

        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        let line = line.trim();
        if line.is_empty() {
            return Ok(0);
        }
        line.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|&i| i < candidates.len())
            .ok_or_else(|| waypoint_tool::Error::InvalidInput {
                field: "choice".to_owned(),
                reason: format!("'{}' is not an entry number", line),
            })
    }
}

fn locate(
    args: &Args,
    location: &LocationArgs,
    default_source: SourceKind,
) -> Result<GeoPoint, Box<dyn Error>> {
    if let Some(ref coords) = location.coords {
        return Ok(parse_coordinates(coords)?);
    }
    let ident = location
        .ident
        .as_ref()
        .ok_or("coordinates or identifier must be provided")?;

    let kind = location.source.unwrap_or(default_source);
    let path = match kind {
        SourceKind::Nav => args.nav_file.as_ref(),
        SourceKind::Fix => args.fix_file.as_ref(),
    }
    .ok_or_else(|| waypoint_tool::Error::MissingData {
        kind: kind.to_string(),
    })?;

    info!("Loading {} data from {}...", kind, path.display());
    let data = DataFile::from_file(path)?;

    let point = match location.choice {
        Some(n) => {
            let index = n.checked_sub(1).ok_or("--choice starts at 1")?;
            resolve(&data, kind, ident, &mut ByIndex(index))?
        }
        None => resolve(&data, kind, ident, &mut Prompt)?,
    };
    info!("{} resolved to {}", ident.trim().to_uppercase(), point);
    Ok(point)
}

fn waypoint(args: &Args, w: &WaypointArgs) -> Result<String, Box<dyn Error>> {
    let origin = locate(args, &w.location, SourceKind::Nav)?;
    let request = WaypointRequest::builder()
        .origin(origin)
        .magnetic_bearing(w.bearing)
        .declination(w.declination)
        .distance_nm(w.distance)
        .airport(&w.airport)
        .vor_ident(w.vor.as_deref().unwrap_or(""))
        .operation(w.operation)
        .wrap_longitude(w.wrap_longitude)
        .build()?;

    info!(true_bearing = request.true_bearing(), "Solving destination...");
    Ok(request.compute()?)
}

fn fix(args: &Args, f: &FixArgs) -> Result<String, Box<dyn Error>> {
    let point = locate(args, &f.location, SourceKind::Fix)?;
    let request = FixRequest::builder()
        .point(point)
        .fix_type(f.fix_type)
        .usage(f.usage)
        .runway(validate_runway_code(&f.runway)?)
        .airport(&f.airport)
        .operation(f.operation)
        .build()?;
    Ok(request.compute())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::from_args();
    init_logging(if args.verbose { "debug" } else { "info" });

    let record = match args.cmd {
        Command::Waypoint(ref w) => waypoint(&args, w)?,
        Command::Fix(ref f) => fix(&args, f)?,
    };

    println!("{}", record);
    Ok(())
}
