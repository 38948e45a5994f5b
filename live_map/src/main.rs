#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod report;

use abstutil::Timer;
use anyhow::Result;
use structopt::StructOpt;

use catalogue::{Catalogue, GeoPoint, LineId};
use model::{Event, Outcome, Reseed, Session, Settings};

/// Runs the live map without a screen: vehicles move on a real timer and everything that
/// happens is logged.
#[derive(StructOpt)]
struct Args {
    /// A JSON file mapping line IDs to lists of {latitude, longitude}. The bundled routes are
    /// used if neither this nor --shapes is given.
    #[structopt(long)]
    routes: Option<String>,
    /// A CSV file with line_id, sequence, latitude, longitude columns
    #[structopt(long)]
    shapes: Option<String>,
    /// A CSV file with line_id, name columns
    #[structopt(long)]
    line_names: Option<String>,
    /// A JSON settings file. Flags below override it.
    #[structopt(long)]
    settings: Option<String>,
    /// Seconds between ticks
    #[structopt(long)]
    tick_secs: Option<f64>,
    /// "replace" or "diff"
    #[structopt(long, parse(try_from_str = parse_reseed))]
    reseed: Option<Reseed>,

    /// Lines to activate, comma-separated
    #[structopt(long, use_delimiter = true)]
    lines: Vec<String>,
    /// A line to select once the lines are active
    #[structopt(long)]
    select: Option<String>,
    /// Taps the map at "lat,lng" after the last tick
    #[structopt(long, parse(try_from_str = parse_point))]
    tap: Option<GeoPoint>,
    /// How many ticks to run before stopping
    #[structopt(long, default_value = "10")]
    ticks: usize,
    /// Write the final frame here as GeoJSON
    #[structopt(long)]
    export: Option<String>,
}

impl Args {
    fn load_catalogue(&self, timer: &mut Timer) -> Result<Catalogue> {
        timer.start("load catalogue");
        let mut catalogue = match (&self.routes, &self.shapes) {
            (Some(_), Some(_)) => bail!("Only one of --routes and --shapes can be used"),
            (Some(path), None) => Catalogue::load_json(fs_err::File::open(path)?)?,
            (None, Some(path)) => Catalogue::load_shapes_csv(fs_err::File::open(path)?)?,
            (None, None) => Catalogue::bundled()?,
        };
        if let Some(ref path) = self.line_names {
            catalogue.load_lines_csv(fs_err::File::open(path)?)?;
        }
        timer.stop("load catalogue");
        Ok(catalogue)
    }

    fn load_settings(&self) -> Result<Settings> {
        let mut settings = match self.settings {
            Some(ref path) => Settings::from_json(fs_err::File::open(path)?)?,
            None => Settings::default(),
        };
        if let Some(x) = self.tick_secs {
            settings.tick_secs = x;
        }
        if let Some(x) = self.reseed {
            settings.reseed = x;
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn parse_reseed(x: &str) -> Result<Reseed> {
    match x {
        "replace" => Ok(Reseed::Replace),
        "diff" => Ok(Reseed::Diff),
        _ => bail!("Unknown reseed policy {x}; use replace or diff"),
    }
}

fn parse_point(x: &str) -> Result<GeoPoint> {
    let parts: Vec<&str> = x.split(',').map(|part| part.trim()).collect();
    if parts.len() != 2 {
        bail!("Expected lat,lng, got {x}");
    }
    Ok(GeoPoint::new(parts[0].parse()?, parts[1].parse()?))
}

fn main() -> Result<()> {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());
    let mut timer = Timer::new("set up live map");
    let catalogue = args.load_catalogue(&mut timer)?;
    let settings = args.load_settings()?;
    drop(timer);

    let mut session = Session::new(catalogue, settings);
    let sender = session.sender();
    sender.send(Event::SetActiveLines(
        args.lines.iter().map(|x| LineId::new(x.as_str())).collect(),
    ));
    if let Some(ref line) = args.select {
        sender.send(Event::SelectLine(LineId::new(line.as_str())));
    }
    let outcomes = session.pump();
    report::outcomes(&session, outcomes);

    run(&mut session, args.ticks);

    if let Some(pt) = args.tap {
        let outcomes = session.handle(Event::TapMap(pt));
        if outcomes.is_empty() {
            info!("Tapping {pt:?} did nothing");
        }
        report::outcomes(&session, outcomes);
    }

    if let Some(ref path) = args.export {
        let gj = session.frame().to_geojson();
        fs_err::write(path, serde_json::to_string_pretty(&gj)?)?;
        info!("Wrote final frame to {path}");
    }
    Ok(())
}

/// Polls the session like a UI thread would, until enough ticks have happened
fn run(session: &mut Session, ticks: usize) {
    if ticks == 0 {
        return;
    }
    if session.vehicles().is_empty() {
        warn!("No vehicles to simulate; ticking anyway");
    }

    // Poll a few times per tick, so the log keeps up
    let poll =
        std::time::Duration::from_secs_f64(session.settings().tick_period().inner_seconds() / 4.0);

    session.start();
    let mut seen = 0;
    while seen < ticks {
        std::thread::sleep(poll);
        let outcomes = session.pump();
        seen += outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::VehiclesMoved))
            .count();
        report::outcomes(session, outcomes);
    }
    session.stop();

    // Ticks that raced with stop() are still applied, so the log matches the final state
    let leftover = session.pump();
    report::outcomes(session, leftover);
    info!(
        "Ran {} ticks, simulation clock at {}",
        session.simulator().tick_count(),
        session.clock()
    );
}
