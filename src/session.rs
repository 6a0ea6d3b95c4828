use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use log::{debug, error, info};
use rand::Rng;

use crate::error::Error;
use crate::naming::output_file_name;
use crate::prompt::Prompter;
use crate::report::{CompressionResult, size_reduction, summary_lines};
use crate::scan::{AudioFileEntry, find_audio_files};
use crate::transform::VolumeTransform;
use crate::{AudioFormats, CompressionOptions, CompressionTarget};

/// What the user picked at the file selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Single(AudioFileEntry),
}

/// Runs one interactive session: scan, select, compress, report
///
/// Returns the results that were printed in the summary. The invalid
/// directory and empty directory paths print a message and return an empty
/// list. In batch mode with `keep_going` set, failed files are skipped and
/// reported as [`Error::FilesFailed`] after the summary.
pub fn run<R, W, T, G>(
    prompter: &mut Prompter<R, W>,
    transform: &T,
    rng: &mut G,
    options: &CompressionOptions,
) -> Result<Vec<CompressionResult>, Error>
where
    R: BufRead,
    W: Write,
    T: VolumeTransform + ?Sized,
    G: Rng + ?Sized,
{
    prompter.say("Supported audio file extensions:")?;
    for ext in AudioFormats::supported_extensions() {
        prompter.say(format_args!(".{ext}"))?;
    }

    let directory = prompter.ask("Enter the location of the audio files: ")?;
    let directory = Path::new(&directory);
    if !directory.is_dir() {
        prompter.say("Invalid directory. Please try again.")?;
        return Ok(Vec::new());
    }

    let audio_files = find_audio_files(directory);
    if audio_files.is_empty() {
        prompter.say("No audio files found in the given directory.")?;
        return Ok(Vec::new());
    }
    prompter.say("Found the following audio files:")?;
    for (i, file) in audio_files.iter().enumerate() {
        prompter.say(format_args!("{}. {}", i + 1, file.name()))?;
    }

    let (selected, batch) = match select_files(prompter, &audio_files)? {
        Selection::All => (audio_files, true),
        Selection::Single(file) => (vec![file], false),
    };

    let output_question = if batch {
        "Enter the output location for the compressed files: "
    } else {
        "Enter the output location for the compressed file: "
    };
    let output_directory = prompter.ask(output_question)?;
    let output_directory = Path::new(&output_directory);
    ensure_dir(output_directory)?;

    let target = prompter.ask_target()?;
    info!(
        "Compressing {} file(s) at {}% volume into {:?}",
        selected.len(),
        target.percent(),
        output_directory
    );

    let start = Instant::now();
    let progress = if batch && options.show_progress {
        progress_bar(selected.len())
    } else {
        ProgressBar::hidden()
    };

    let mut results = Vec::with_capacity(selected.len());
    let mut failed = 0;
    for file in selected.iter().progress_with(progress.clone()) {
        match compress_one(file, directory, output_directory, target, transform, rng, options) {
            Ok(result) => results.push(result),
            Err(e) if batch && options.keep_going => {
                error!("Skipping {}: {}", file.name(), e);
                failed += 1;
            }
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        }
    }
    progress.finish_and_clear();

    let elapsed = start.elapsed().as_secs_f64();
    if batch {
        prompter.say(format_args!(
            "Compression completed in {elapsed:.2} seconds for all files."
        ))?;
    } else {
        prompter.say(format_args!("Compression completed in {elapsed:.2} seconds"))?;
    }

    prompter.say("\nCompressed files and size reduction percentages:")?;
    for line in summary_lines(&results) {
        prompter.say(line)?;
    }

    if failed > 0 {
        return Err(Error::FilesFailed(failed));
    }
    Ok(results)
}

/// Asks which file to compress until the answer resolves to something
///
/// `all` (any case) selects every file, an empty answer asks again, anything
/// else is a case-insensitive name prefix. Several matches open a numbered
/// sub-menu.
pub fn select_files<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    files: &[AudioFileEntry],
) -> Result<Selection, Error> {
    loop {
        let answer = prompter.ask(
            "Enter the name of the file you want to compress (or type 'all' to compress all files, or press enter to list all files): ",
        )?;
        if answer.eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        if answer.is_empty() {
            continue;
        }

        let matches = match_prefix(files, &answer);
        match matches.as_slice() {
            [] => prompter.say("No matching files found. Please try again.")?,
            [only] => return Ok(Selection::Single((*only).clone())),
            _ => {
                prompter.say("Multiple matching files found. Please select one:")?;
                for (i, file) in matches.iter().enumerate() {
                    prompter.say(format_args!("{}. {}", i + 1, file.name()))?;
                }
                let choice = prompter.ask_choice(matches.len())?;
                return Ok(Selection::Single(matches[choice].clone()));
            }
        }
    }
}

/// Files whose name starts with `prefix`, ignoring case, in scan order
pub fn match_prefix<'a>(files: &'a [AudioFileEntry], prefix: &str) -> Vec<&'a AudioFileEntry> {
    let prefix = prefix.to_lowercase();
    files
        .iter()
        .filter(|f| f.name().to_lowercase().starts_with(&prefix))
        .collect()
}

fn compress_one<T, G>(
    file: &AudioFileEntry,
    input_dir: &Path,
    output_dir: &Path,
    target: CompressionTarget,
    transform: &T,
    rng: &mut G,
    options: &CompressionOptions,
) -> Result<CompressionResult, Error>
where
    T: VolumeTransform + ?Sized,
    G: Rng + ?Sized,
{
    let input_path = input_dir.join(file.name());
    let output_name = output_file_name(file, options.output_format, rng);
    let output_path = output_dir.join(&output_name);
    debug!("Processing {:?} -> {:?}", input_path, output_path);

    transform
        .apply(&input_path, &output_path, target.scale_factor())
        .map_err(|e| Error::Transform {
            path: input_path.clone(),
            source: e,
        })?;

    let reduction_percent = size_reduction(&input_path, &output_path)?;
    debug!("  -> {}: {:.2}% smaller", output_name, reduction_percent);
    Ok(CompressionResult {
        output_name,
        reduction_percent,
    })
}

fn ensure_dir(dir: &Path) -> Result<(), Error> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| Error::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        info!("Created output directory: {:?}", dir);
    }
    Ok(())
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => debug!("Falling back to default progress style: {}", e),
    }
    pb.set_message("Compressing files");
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn files(names: &[&str]) -> Vec<AudioFileEntry> {
        names.iter().map(|n| AudioFileEntry::new(*n)).collect()
    }

    fn select(script: &str, names: &[&str]) -> (Result<Selection, Error>, String) {
        let mut prompter = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let selection = select_files(&mut prompter, &files(names));
        (selection, String::from_utf8(prompter.into_output()).unwrap())
    }

    #[test]
    fn prefix_is_case_insensitive() {
        let list = files(&["Track1.mp3", "track2.MP3", "other.wav"]);
        let found: Vec<&str> = match_prefix(&list, "TRACK").iter().map(|f| f.name()).collect();
        assert_eq!(found, ["Track1.mp3", "track2.MP3"]);
        assert!(match_prefix(&list, "zzz").is_empty());
    }

    #[test]
    fn all_in_any_case() {
        let (sel, _) = select("ALL\n", &["a.mp3"]);
        assert_eq!(sel.unwrap(), Selection::All);
    }

    #[test]
    fn empty_and_unmatched_answers_reprompt() {
        let (sel, out) = select("\nnope\nb\n", &["a.mp3", "b.wav"]);
        assert_eq!(sel.unwrap(), Selection::Single(AudioFileEntry::new("b.wav")));
        assert_eq!(out.matches("No matching files found.").count(), 1);
        assert_eq!(out.matches("Enter the name of the file").count(), 3);
    }

    #[test]
    fn ambiguous_prefix_opens_sub_menu() {
        let (sel, out) = select("track\n9\n2\n", &["track1.mp3", "track2.mp3", "x.ogg"]);
        assert_eq!(sel.unwrap(), Selection::Single(AudioFileEntry::new("track2.mp3")));
        assert!(out.contains("Multiple matching files found. Please select one:"));
        assert!(out.contains("1. track1.mp3\n2. track2.mp3\n"));
        assert!(out.contains("Invalid choice. Please try again."));
    }

    #[test]
    fn closed_input_stops_selection() {
        let (sel, _) = select("\n", &["a.mp3"]);
        assert!(matches!(sel, Err(Error::InputClosed)));
    }
}
