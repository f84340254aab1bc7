//! A wrapper for the hound library that stores multichannel array
//! recordings as WAV files, one channel per microphone.

use crate::error::GeomError;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};
use std::path::{Path, PathBuf};

const BITS_PER_SAMPLE: u16 = 32;

/// Sampled pressure at each microphone, plus the rate it was sampled at.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSamples {
    /// Samples per second
    pub sample_rate: u32,
    /// One buffer per microphone, all the same length
    pub channels: Vec<Vec<f32>>,
}

impl TimeSamples {
    #[allow(missing_docs)]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Length of the recording in samples.
    pub fn num_samples(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// Fails with [GeomError::PreconditionFailed] unless `path` exists. Used
/// before reading anything an earlier run was supposed to leave behind.
pub fn require_existing(path: impl AsRef<Path>) -> Result<(), GeomError> {
    let path = path.as_ref();
    if path.exists() {
        Ok(())
    } else {
        Err(GeomError::PreconditionFailed(path.to_path_buf()))
    }
}

/// Writes `data` as an interleaved 32-bit float WAV file and returns the
/// path written to.
pub fn write_wav(path: impl AsRef<Path>, data: &TimeSamples) -> Result<PathBuf, GeomError> {
    let path = path.as_ref();
    if data.channels.is_empty() {
        return Err(GeomError::invalid("recording has no channels"));
    }
    let channels = u16::try_from(data.num_channels()).map_err(|_| {
        GeomError::invalid(format!(
            "{} channels do not fit in a wav file",
            data.num_channels()
        ))
    })?;
    let len = data.num_samples();
    if data.channels.iter().any(|c| c.len() != len) {
        return Err(GeomError::invalid("channels have unequal lengths"));
    }

    let spec = WavSpec {
        channels,
        sample_rate: data.sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;

    for idx in 0..len {
        for chan in &data.channels {
            writer.write_sample(chan[idx])?;
        }
    }

    // finalize explicitly so header errors surface instead of being
    // swallowed on drop
    writer.finalize()?;
    info!(
        "wrote {} channels x {} samples at {} Hz to {}",
        channels,
        len,
        data.sample_rate,
        path.display()
    );
    Ok(path.to_path_buf())
}

/// Reads a WAV file into per-channel buffers. Integer files are scaled so
/// full scale maps to ±1.0.
pub fn read_wav(path: impl AsRef<Path>) -> Result<TimeSamples, GeomError> {
    let path = path.as_ref();
    require_existing(path)?;
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    debug!("reading {}: {:?}", path.display(), spec);

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let full_scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<_, _>>()?
        }
    };

    let n_channels = spec.channels as usize;
    let channels = (0..n_channels)
        .map(|i| {
            interleaved
                .iter()
                .skip(i)
                .step_by(n_channels)
                .cloned()
                .collect()
        })
        .collect();

    Ok(TimeSamples {
        sample_rate: spec.sample_rate,
        channels,
    })
}
