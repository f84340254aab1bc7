//! The work behind each command. Nothing runs until one of these functions
//! is called; the binary is the only caller outside of tests.

use crate::args::{CommandTask, ConfigCommand, GenerateCommand, InspectCommand, SimulateCommand};
use crate::config::{load_layout, load_scenario, Scenario};
use crate::error::GeomError;
use crate::geometry::MicGeometry;
use crate::layout::ArrayLayout;
use crate::mic_xml::{export, load};
use crate::recording::{write_wav, TimeSamples};

use log::{debug, info};
use std::path::{Path, PathBuf};

/// Runs one command and returns the path of the file it wrote, if any.
pub fn run(command: CommandTask) -> Result<Option<PathBuf>, GeomError> {
    match command {
        CommandTask::Generate(GenerateCommand { outfile, layout }) => {
            generate(&ArrayLayout::from(layout), &outfile).map(Some)
        }
        CommandTask::Config(ConfigCommand { layout, outfile }) => {
            let layout = load_layout(&layout)?;
            generate(&layout, &outfile).map(Some)
        }
        CommandTask::Inspect(InspectCommand { file }) => {
            let geom = load(&file)?;
            println!("{}", summary(&geom));
            Ok(None)
        }
        CommandTask::Simulate(SimulateCommand {
            geom,
            outfile,
            scenario,
        }) => {
            let scenario = match scenario {
                Some(path) => load_scenario(path)?,
                None => Scenario::default(),
            };
            simulate(&geom, &scenario, &outfile).map(Some)
        }
    }
}

/// Computes `layout` and exports it to `outfile`.
pub fn generate(layout: &ArrayLayout, outfile: &Path) -> Result<PathBuf, GeomError> {
    debug!("generating {:?}", layout);
    let positions = layout.generate()?;
    export(&positions, outfile)
}

/// Renders `scenario` as heard by the array stored in `geom_file`, and
/// writes the recording to `outfile`.
pub fn simulate(
    geom_file: &Path,
    scenario: &Scenario,
    outfile: &Path,
) -> Result<PathBuf, GeomError> {
    let mics = load(geom_file)?;
    info!(
        "simulating {} sources on {} mics, {} samples at {} Hz",
        scenario.sources.len(),
        mics.len(),
        scenario.num_samples,
        scenario.sample_rate
    );
    let channels = scenario.mixer().result(&mics)?;
    write_wav(
        outfile,
        &TimeSamples {
            sample_rate: scenario.sample_rate,
            channels,
        },
    )
}

/// A human readable description of a geometry.
pub fn summary(geom: &MicGeometry) -> String {
    let mut out = format!(
        "{}: {} mics, center {}, aperture {:.4} m",
        geom.name(),
        geom.len(),
        geom.center(),
        geom.aperture()
    );
    for (i, p) in geom.positions().iter().enumerate() {
        out.push_str(&format!("\n  {:>4} {}", i + 1, p));
    }
    out
}
