//! Headless Walk Simulator
//!
//! Drives a synthetic, jittered GPS walk around a square through a full
//! tracking session and reports the claim outcome. Useful for eyeballing
//! pipeline behavior without a phone in hand.

use clap::Parser;
use landgrab::core::config::EngineConfig;
use landgrab::core::error::Result;
use landgrab::core::types::{GeoFix, GeoPoint, PlayerId};
use landgrab::session::{SessionEvent, StartOutcome, TrackingSession};
use landgrab::territory::TerritorySnapshot;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const METERS_PER_DEG: f64 = std::f64::consts::PI * landgrab::geo::EARTH_RADIUS_M / 180.0;

/// Headless Walk Simulator - synthetic GPS loops through the claim pipeline
#[derive(Parser, Debug)]
#[command(name = "walk_sim")]
#[command(about = "Simulate a jittered square walk and print the claim outcome")]
struct Args {
    /// Side length of the simulated square in meters
    #[arg(long, default_value_t = 60.0)]
    side_m: f64,

    /// Walking speed in km/h
    #[arg(long, default_value_t = 5.0)]
    speed_kmh: f64,

    /// Uniform GPS jitter amplitude in meters
    #[arg(long, default_value_t = 1.5)]
    jitter_m: f64,

    /// Origin latitude in degrees
    #[arg(long, default_value_t = 52.5200)]
    lat: f64,

    /// Origin longitude in degrees
    #[arg(long, default_value_t = 13.4050)]
    lon: f64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Debug, Serialize)]
struct WalkReport {
    fixes_sent: usize,
    fixes_accepted: usize,
    fixes_dropped: usize,
    advisories: usize,
    outcome: Option<landgrab::claim::ValidationOutcome>,
    claimed_area_m2: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("landgrab=debug")
        .init();

    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let origin = GeoPoint::new(args.lat, args.lon);
    let fixes = synthesize_walk(&args, origin, &mut rng);

    let (mut session, mut events) = TrackingSession::new(
        EngineConfig::default(),
        PlayerId::new("walk-sim"),
        TerritorySnapshot::new(),
    );

    let mut fixes_iter = fixes.into_iter();
    let first = fixes_iter
        .next()
        .expect("walk synthesis always yields fixes");
    match session.start_at(first).await? {
        StartOutcome::Started => {}
        StartOutcome::Blocked(violation) => {
            eprintln!("start blocked: {violation:?}");
            return Ok(());
        }
    }

    let mut report = WalkReport {
        fixes_sent: 1,
        fixes_accepted: 1,
        fixes_dropped: 0,
        advisories: 0,
        outcome: None,
        claimed_area_m2: None,
    };

    for fix in fixes_iter {
        report.fixes_sent += 1;
        session.push_fix(fix).await;
        while let Ok(event) = events.try_recv() {
            match event {
                SessionEvent::FixAccepted { .. } => report.fixes_accepted += 1,
                SessionEvent::FixDropped { .. } => report.fixes_dropped += 1,
                SessionEvent::SpeedAdvisory { .. } => report.advisories += 1,
                SessionEvent::ClaimCompleted { outcome, territory } => {
                    report.claimed_area_m2 = territory.map(|t| t.area_m2());
                    report.outcome = Some(outcome);
                }
                _ => {}
            }
        }
        if report.outcome.is_some() {
            break;
        }
    }
    session.stop().await;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("sent {} fixes, accepted {}, dropped {}", report.fixes_sent, report.fixes_accepted, report.fixes_dropped);
        match report.outcome {
            Some(outcome) => println!("outcome: {outcome:?}"),
            None => println!("walk ended without closing a loop"),
        }
    }
    Ok(())
}

/// Fixes around the square perimeter, sampled every two seconds of walking
fn synthesize_walk(args: &Args, origin: GeoPoint, rng: &mut StdRng) -> Vec<GeoFix> {
    let step_m = args.speed_kmh / 3.6 * 2.0;
    let legs = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];

    let mut fixes = Vec::new();
    let mut t = 0.0;
    for (de, dn) in legs {
        let mut travelled = 0.0;
        while travelled < args.side_m {
            let east = match de {
                d if d > 0.0 => travelled,
                d if d < 0.0 => args.side_m - travelled,
                _ => if dn > 0.0 { args.side_m } else { 0.0 },
            };
            let north = match dn {
                d if d > 0.0 => travelled,
                d if d < 0.0 => args.side_m - travelled,
                _ => if de > 0.0 { 0.0 } else { args.side_m },
            };
            let jitter_e = rng.gen_range(-args.jitter_m..=args.jitter_m);
            let jitter_n = rng.gen_range(-args.jitter_m..=args.jitter_m);
            let p = offset(origin, east + jitter_e, north + jitter_n);
            fixes.push(GeoFix::new(p.latitude, p.longitude, t));
            travelled += step_m;
            t += 2.0;
        }
    }
    // walk back onto the origin to force the closure probe
    let p = offset(origin, 0.0, 0.0);
    fixes.push(GeoFix::new(p.latitude, p.longitude, t));
    fixes
}

fn offset(origin: GeoPoint, east_m: f64, north_m: f64) -> GeoPoint {
    GeoPoint::new(
        origin.latitude + north_m / METERS_PER_DEG,
        origin.longitude + east_m / (METERS_PER_DEG * origin.latitude.to_radians().cos()),
    )
}
