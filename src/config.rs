//! Layouts and source scenarios read from [ron] files.
//!
//! A layout file holds a single [ArrayLayout]. A scenario file describes the
//! sources of a simulated recording:
//!
//! ```text
//! (
//!     sample_rate: 51200,
//!     num_samples: 51200,
//!     sources: [
//!         (loc: (-0.1, -0.1, -0.3), rms: 1.0, seed: 1),
//!         (loc: (0.15, 0.0, -0.3), rms: 0.7, seed: 2),
//!     ],
//! )
//! ```

use crate::error::GeomError;
use crate::layout::ArrayLayout;
use crate::simulate::{Mixer, PointSource, WhiteNoise};

use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};

/// One noise source in a [Scenario].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Location relative to the array center, in meters
    pub loc: (f64, f64, f64),
    /// RMS of the emitted white noise
    pub rms: f64,
    /// Seed of the emitted white noise
    pub seed: u64,
}

/// Everything needed to simulate a recording, apart from the array.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Scenario {
    /// Samples per second
    pub sample_rate: u32,
    /// Length of the recording in samples
    pub num_samples: usize,
    /// The sources to mix
    pub sources: Vec<SourceConfig>,
}

impl Default for Scenario {
    /// Three sources 0.3 m in front of the array, one second at 51.2 kHz.
    /// This is the plain three-source scene; a scene with a fourth source
    /// such as `(loc: (0.1, 0.05, -0.4), rms: 1.0, seed: 4)` is described
    /// in a scenario file instead.
    fn default() -> Self {
        let sfreq = 51200;
        Self {
            sample_rate: sfreq,
            num_samples: sfreq as usize,
            sources: vec![
                SourceConfig {
                    loc: (-0.1, -0.1, -0.3),
                    rms: 1.0,
                    seed: 1,
                },
                SourceConfig {
                    loc: (0.15, 0.0, -0.3),
                    rms: 0.7,
                    seed: 2,
                },
                SourceConfig {
                    loc: (0.0, 0.1, -0.3),
                    rms: 0.5,
                    seed: 3,
                },
            ],
        }
    }
}

impl Scenario {
    /// Builds the [Mixer] that renders this scenario.
    pub fn mixer(&self) -> Mixer {
        self.sources
            .iter()
            .map(|s| PointSource {
                signal: WhiteNoise {
                    sample_rate: self.sample_rate,
                    num_samples: self.num_samples,
                    seed: s.seed,
                    rms: s.rms,
                },
                loc: [s.loc.0, s.loc.1, s.loc.2],
            })
            .fold(Mixer::default(), Mixer::add_source)
    }
}

fn open_existing(path: &Path) -> Result<File, GeomError> {
    if !path.exists() {
        return Err(GeomError::PreconditionFailed(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

/// Reads an [ArrayLayout] from a RON file.
pub fn load_layout(path: impl AsRef<Path>) -> Result<ArrayLayout, GeomError> {
    let handle = open_existing(path.as_ref())?;
    Ok(ron::de::from_reader(handle)?)
}

/// Reads a [Scenario] from a RON file.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario, GeomError> {
    let handle = open_existing(path.as_ref())?;
    Ok(ron::de::from_reader(handle)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ron_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn read_layout() {
        let file = ron_file("LinearSpiral(count: 64, start_offset: 0.01, growth_rate: 0.05)");
        let layout = load_layout(file.path()).unwrap();
        assert_eq!(layout.mic_count(), 64);
    }

    #[test]
    fn read_scenario() {
        let file = ron_file(
            "(sample_rate: 8000, num_samples: 800, sources: [(loc: (0.0, 0.0, -1.0), rms: 2.0, seed: 9)])",
        );
        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.sample_rate, 8000);
        assert_eq!(scenario.sources.len(), 1);
        assert_eq!(scenario.mixer().sample_rate().unwrap(), 8000);
    }

    #[test]
    fn default_scenario_survives_ron() {
        let text = ron::ser::to_string(&Scenario::default()).unwrap();
        let file = ron_file(&text);
        assert_eq!(load_scenario(file.path()).unwrap(), Scenario::default());
    }

    #[test]
    fn fourth_source_comes_from_a_file() {
        let mut scenario = Scenario::default();
        assert_eq!(scenario.sources.len(), 3);
        scenario.sources.push(SourceConfig {
            loc: (0.1, 0.05, -0.4),
            rms: 1.0,
            seed: 4,
        });
        let file = ron_file(&ron::ser::to_string(&scenario).unwrap());

        let read = load_scenario(file.path()).unwrap();
        assert_eq!(read.sources.len(), 4);
        assert_eq!(read.sources[3].seed, 4);
        assert_eq!(read.mixer().sample_rate().unwrap(), 51200);
    }

    #[test]
    fn bad_layout_syntax() {
        let file = ron_file("Hexagon(count: 6)");
        assert!(matches!(
            load_layout(file.path()),
            Err(GeomError::ConfigError(_))
        ));
    }

    #[test]
    fn missing_config() {
        let tempdir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_scenario(tempdir.path().join("scenario.ron")),
            Err(GeomError::PreconditionFailed(_))
        ));
    }
}
