use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::AudioFormats;

/// An audio file found directly inside the scanned directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFileEntry {
    name: String,
}

impl AudioFileEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Full file name, e.g. `song.wav`
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name without its final extension
    pub fn base_name(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    /// Lower-cased extension without the dot
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
    }
}

/// Finds the supported audio files directly inside `dir`
///
/// Subdirectories are not descended into. The order is whatever the
/// filesystem listing yields. Unreadable entries are skipped.
pub fn find_audio_files(dir: impl AsRef<Path>) -> Vec<AudioFileEntry> {
    let mut audio_files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        if AudioFormats::from_path(entry.path()).is_none() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => audio_files.push(AudioFileEntry::new(name)),
            None => warn!("Skipping file with non UTF-8 name: {:?}", entry.path()),
        }
    }
    debug!("Scan found {} audio files", audio_files.len());
    audio_files
}
