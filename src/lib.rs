/// Module for error handling
pub mod error;
/// Module for generating output file names
pub mod naming;
/// Module for interactive terminal prompts
pub mod prompt;
/// Module for size reduction reporting
pub mod report;
/// Module for saving audio files
pub mod save;
/// Module for scanning a directory for audio files
pub mod scan;
/// Module driving the interactive compression session
pub mod session;
/// Module for the volume transform collaborator
pub mod transform;

use std::path::Path;

use strum_macros::Display;

pub use crate::error::Error;
pub use crate::report::CompressionResult;
pub use crate::session::run;
pub use crate::transform::{SymphoniaTransform, VolumeTransform};

/// Represents supported input audio file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormats {
    Mp3,
    Wav,
    Ogg,
    Flac,
}

impl AudioFormats {
    /// Returns a list of supported file extensions
    #[inline]
    pub fn supported_extensions() -> &'static [&'static str] {
        &["mp3", "wav", "ogg", "flac"]
    }

    /// Creates an AudioFormats enum from a file path based on its extension
    #[inline]
    pub fn from_path(value: impl AsRef<Path>) -> Option<Self> {
        Some(
            match value
                .as_ref()
                .extension()
                .unwrap_or_default()
                .to_string_lossy()
                .to_lowercase()
                .as_ref()
            {
                "mp3" => Self::Mp3,
                "wav" => Self::Wav,
                "ogg" => Self::Ogg,
                "flac" => Self::Flac,
                _ => return None,
            },
        )
    }
}

/// Container the compressed files are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[cfg_attr(feature = "bin", derive(clap::ValueEnum))]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mp3,
    Wav,
    Ogg,
}

impl OutputFormat {
    /// File extension without the leading dot
    #[inline]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
        }
    }

    /// Picks the output container from a path's extension
    pub fn from_path(value: impl AsRef<Path>) -> Option<Self> {
        match AudioFormats::from_path(value)? {
            AudioFormats::Mp3 => Some(Self::Mp3),
            AudioFormats::Wav => Some(Self::Wav),
            AudioFormats::Ogg => Some(Self::Ogg),
            AudioFormats::Flac => None,
        }
    }
}

/// A volume percentage in `[1, 200]`, applied as a linear sample scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionTarget(f64);

impl CompressionTarget {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 200.0;

    /// Returns `None` when the percentage is outside `[1, 200]` or NaN
    pub fn new(percent: f64) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&percent)
            .then_some(Self(percent))
    }

    #[inline]
    pub fn percent(self) -> f64 {
        self.0
    }

    /// Linear gain, `percent / 100`
    #[inline]
    pub fn scale_factor(self) -> f64 {
        self.0 / 100.0
    }
}

/// Configuration options for a compression session
#[derive(Debug, Clone)]
pub struct CompressionOptions {
    /// Container every output file is written in
    pub output_format: OutputFormat,
    /// In batch mode, skip files that fail instead of aborting the run
    pub keep_going: bool,
    /// Draw a progress bar while processing a batch
    pub show_progress: bool,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        CompressionOptions {
            output_format: OutputFormat::Mp3,
            keep_going: false,
            show_progress: true,
        }
    }
}
