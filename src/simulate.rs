//! Synthetic microphone array recordings.
//!
//! A [PointSource] radiates a [WhiteNoise] signal from a fixed location in
//! free field. Every microphone hears the signal delayed by its travel time
//! and attenuated by its distance to the source. A [Mixer] adds several
//! sources together, which is how a multi-source test scene is built.

use crate::error::GeomError;
use crate::geometry::{Meters, MicGeometry};

use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Speed of sound in air, meters per second.
pub const SPEED_OF_SOUND: f64 = 343.0;

/// Gaussian white noise, reproducible from its seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhiteNoise {
    /// Samples per second
    pub sample_rate: u32,
    /// Length of the signal in samples
    pub num_samples: usize,
    /// Seed for the random generator
    pub seed: u64,
    /// Root mean square value of the signal
    pub rms: f64,
}

impl WhiteNoise {
    /// Generates the samples. Identical parameters always give identical
    /// samples.
    pub fn signal(&self) -> Result<Vec<f64>, GeomError> {
        if self.sample_rate == 0 {
            return Err(GeomError::invalid("sample rate must be positive"));
        }
        let normal = Normal::new(0.0, self.rms).map_err(|_| {
            GeomError::invalid(format!(
                "noise rms must be finite and non-negative, got {}",
                self.rms
            ))
        })?;
        let rng = StdRng::seed_from_u64(self.seed);
        Ok(normal.sample_iter(rng).take(self.num_samples).collect())
    }
}

/// A monopole radiating `signal` from `loc`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSource {
    /// What the source emits
    pub signal: WhiteNoise,
    /// Where the source sits, `[x, y, z]` in meters
    pub loc: [Meters; 3],
}

impl PointSource {
    /// The sound pressure at every microphone of `mics`, one channel per
    /// microphone. Channel `i` is `s(t - r_i / c) / r_i`, where `r_i` is
    /// the distance from the source to microphone `i`. Samples before the
    /// wavefront reaches a microphone are silent.
    pub fn result(&self, mics: &MicGeometry) -> Result<Vec<Vec<f32>>, GeomError> {
        let signal = self.signal.signal()?;
        let fs = self.signal.sample_rate as f64;

        mics.positions()
            .iter()
            .enumerate()
            .map(|(i, mic)| {
                let r = mic.dist_to(self.loc);
                if r <= f64::EPSILON {
                    return Err(GeomError::invalid(format!(
                        "mic {} coincides with the source at {:?}",
                        i + 1,
                        self.loc
                    )));
                }
                let delay = r / SPEED_OF_SOUND * fs;
                debug!("mic {}: r={:.4} m, delay={:.2} samples", i + 1, r, delay);
                Ok(delayed(&signal, delay)
                    .map(|s| (s / r) as f32)
                    .collect())
            })
            .collect()
    }
}

/// `signal` shifted later by a fractional number of samples, read with
/// linear interpolation.
fn delayed(signal: &[f64], delay: f64) -> impl Iterator<Item = f64> + '_ {
    (0..signal.len()).map(move |n| {
        let t = n as f64 - delay;
        if t < 0.0 {
            return 0.0;
        }
        let idx = t.floor() as usize;
        let frac = t - idx as f64;
        let here = signal[idx];
        let next = signal.get(idx + 1).copied().unwrap_or(here);
        here + frac * (next - here)
    })
}

/// Adds up several sources heard by the same array.
#[derive(Debug, Clone, Default)]
pub struct Mixer {
    sources: Vec<PointSource>,
}

impl Mixer {
    /// A mixer over `sources`.
    pub fn new(sources: Vec<PointSource>) -> Self {
        Self { sources }
    }

    /// Adds another source to the mix.
    pub fn add_source(mut self, source: PointSource) -> Self {
        self.sources.push(source);
        self
    }

    /// The sample rate shared by all sources.
    pub fn sample_rate(&self) -> Result<u32, GeomError> {
        let first = self
            .sources
            .first()
            .ok_or_else(|| GeomError::invalid("mixer has no sources"))?;
        let sig = first.signal;
        if self.sources.iter().any(|s| {
            s.signal.sample_rate != sig.sample_rate || s.signal.num_samples != sig.num_samples
        }) {
            return Err(GeomError::invalid(
                "all mixed sources need the same sample rate and length",
            ));
        }
        Ok(sig.sample_rate)
    }

    /// Channel-wise sum of every source's [PointSource::result].
    pub fn result(&self, mics: &MicGeometry) -> Result<Vec<Vec<f32>>, GeomError> {
        self.sample_rate()?;
        let mut sources = self.sources.iter();
        let mut mix = match sources.next() {
            Some(first) => first.result(mics)?,
            None => return Err(GeomError::invalid("mixer has no sources")),
        };
        for source in sources {
            for (acc, chan) in mix.iter_mut().zip(source.result(mics)?) {
                acc.iter_mut().zip(chan).for_each(|(a, s)| *a += s);
            }
        }
        Ok(mix)
    }
}
