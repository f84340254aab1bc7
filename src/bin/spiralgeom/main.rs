//! Entry point for generating, inspecting, and simulating with microphone
//! array geometries.

use clap::Parser;
use log::{error, info};
use spiralgeom::{args::GeomArgs, tasks::run};

// Example:
// cargo run --bin spiralgeom -- generate --out spiral_geom.xml linear -n 64 -a 0.01 -b 0.05
// cargo run --bin spiralgeom -- simulate --geom spiral_geom.xml --out three_sources.wav
// cargo run --bin spiralgeom -- inspect spiral_geom.xml

fn main() {
    env_logger::init();
    let args = GeomArgs::parse();

    match run(args.command) {
        Ok(Some(path)) => info!("done, wrote {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
