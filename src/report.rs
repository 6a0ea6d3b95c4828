use std::fs;
use std::path::Path;

use crate::error::Error;

/// One successfully written output and how much smaller it is than its source
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    pub output_name: String,
    /// Positive when the output shrank, negative when it grew
    pub reduction_percent: f64,
}

/// Percentage by which `compressed` is smaller than `original`
///
/// An empty original is rejected with [`Error::EmptyOriginal`].
pub fn size_reduction(original: &Path, compressed: &Path) -> Result<f64, Error> {
    let original_size = file_size(original)?;
    let compressed_size = file_size(compressed)?;
    reduction_percent(original_size, compressed_size).ok_or_else(|| Error::EmptyOriginal {
        path: original.to_path_buf(),
    })
}

/// `(original - compressed) / original * 100`, `None` for a zero original
pub fn reduction_percent(original: u64, compressed: u64) -> Option<f64> {
    if original == 0 {
        return None;
    }
    Some((original as f64 - compressed as f64) / original as f64 * 100.0)
}

fn file_size(path: &Path) -> Result<u64, Error> {
    fs::metadata(path).map(|m| m.len()).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Enumerated summary lines, one per result
pub fn summary_lines(results: &[CompressionResult]) -> Vec<String> {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. {} - Reduction: -{:.2}%",
                i + 1,
                r.output_name,
                r.reduction_percent
            )
        })
        .collect()
}
