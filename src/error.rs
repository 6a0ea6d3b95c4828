use std::path::PathBuf;

use symphonia::core::errors::Error as SymphoniaError;

#[derive(thiserror::Error, Debug)]
pub enum WritingError {
    #[error("Writing wav Error: {0}")]
    Wav(#[from] hound::Error),
    #[error("Writing ogg Error: {0}")]
    Ogg(#[from] vorbis_rs::VorbisError),
    #[error("Writing mp3 Error: {0}")]
    Mp3(String),
    #[error("Invalid stream layout: {0}")]
    Layout(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum TransformError {
    #[error("Symphonia error: {0}")]
    Symphonia(#[from] SymphoniaError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No compatible audio track found")]
    NoTrack,
    #[error("Track has no sample rate")]
    MissingSampleRate,
    #[error("Track has no channel layout")]
    MissingChannelSpec,
    #[error("Unsupported sample format")]
    UnsupportedSampleFormat,
    #[error("Unsupported output container: {0:?}")]
    UnsupportedOutput(PathBuf),
    #[error(transparent)]
    Writing(#[from] WritingError),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("Input closed while waiting for an answer")]
    InputClosed,
    #[error("Volume transform failed for {path}: {source}")]
    Transform {
        path: PathBuf,
        #[source]
        source: TransformError,
    },
    #[error("Original file {path} is empty, cannot compute size reduction")]
    EmptyOriginal { path: PathBuf },
    #[error("I/O error during processing of {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} files failed to process")]
    FilesFailed(usize),
}
