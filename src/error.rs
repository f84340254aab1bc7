//! The one error type shared by every stage of generating, writing,
//! reading, and simulating with a microphone array.

use std::{borrow::Cow, fmt, io, path::PathBuf};

/// Everything that can go wrong while building or persisting a geometry or
/// a recording. Nothing is retried; errors surface to whoever called.
#[derive(Debug)]
pub enum GeomError {
    /// Returned when a layout, source, or recording is described by values
    /// that cannot produce a sensible result, like a zero microphone count
    /// or a negative radius.
    InvalidParameter(String),

    /// Returned when io fails when reading or writing files.
    IoError(io::Error),

    /// Returned when a file that an earlier step should have produced is
    /// not there.
    PreconditionFailed(PathBuf),

    /// Returned when a geometry file is not a well-formed `MicArray`
    /// document.
    XmlError(nom::error::Error<String>),

    /// Returned when deserialization of a layout or scenario file fails.
    ConfigError(ron::de::SpannedError),

    /// Returned when hound fails to read or write a recording.
    WavError(hound::Error),
}

impl GeomError {
    /// Shorthand for building an [GeomError::InvalidParameter].
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GeomError::InvalidParameter(msg.into())
    }
}

impl fmt::Display for GeomError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use GeomError as GE;
        let msg = match self {
            GE::InvalidParameter(reason) => Cow::from(format!("invalid parameter: {}", reason)),
            GE::IoError(error) => Cow::from(format!("io error: {}", error)),
            GE::PreconditionFailed(path) => Cow::from(format!(
                "required file {} does not exist",
                path.display()
            )),
            GE::XmlError(error) => Cow::from(format!("malformed MicArray xml: {}", error)),
            GE::ConfigError(error) => Cow::from(format!("ron error: {}", error)),
            GE::WavError(error) => Cow::from(format!("wav error: {}", error)),
        };

        write!(f, "{}", msg)
    }
}

impl std::error::Error for GeomError {}

impl From<io::Error> for GeomError {
    fn from(value: io::Error) -> Self {
        Self::IoError(value)
    }
}

impl From<ron::de::SpannedError> for GeomError {
    fn from(value: ron::de::SpannedError) -> Self {
        Self::ConfigError(value)
    }
}

impl From<hound::Error> for GeomError {
    fn from(value: hound::Error) -> Self {
        match value {
            hound::Error::IoError(error) => Self::IoError(error),
            other => Self::WavError(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_missing_file() {
        let err = GeomError::PreconditionFailed(PathBuf::from("three_sources.wav"));
        assert_eq!(
            err.to_string(),
            "required file three_sources.wav does not exist"
        );
    }

    #[test]
    fn hound_io_errors_become_io_errors() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let err = GeomError::from(hound::Error::IoError(io));
        assert!(matches!(err, GeomError::IoError(_)));
    }
}
