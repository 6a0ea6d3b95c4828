use std::fs;
use std::path::Path;

use log::{debug, warn};
use symphonia::core::audio::{AudioBufferRef, SignalSpec};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::OutputFormat;
use crate::error::TransformError;
use crate::save::{save_as_mp3, save_as_ogg, save_as_wav};

/// Scales the loudness of one audio file into a new file
///
/// Implementations must have finished writing `output` when they return `Ok`.
pub trait VolumeTransform {
    fn apply(&self, input: &Path, output: &Path, scale: f64) -> Result<(), TransformError>;
}

/// Decodes with symphonia and re-encodes into the container named by the
/// output extension
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaTransform;

impl VolumeTransform for SymphoniaTransform {
    fn apply(&self, input: &Path, output: &Path, scale: f64) -> Result<(), TransformError> {
        let format = OutputFormat::from_path(output)
            .ok_or_else(|| TransformError::UnsupportedOutput(output.to_path_buf()))?;

        let (planar, spec) = decode_scaled(input, scale)?;
        let interleaved = interleave_planar_f32(&planar);
        let channels = spec.channels.count();
        debug!(
            "Decoded {:?}: {} channels, {} Hz, {} frames, scale {:.3}x",
            input.file_name().unwrap_or_default(),
            channels,
            spec.rate,
            planar.first().map_or(0, Vec::len),
            scale
        );

        match format {
            OutputFormat::Mp3 => save_as_mp3(output, channels, spec.rate, &interleaved)?,
            OutputFormat::Wav => save_as_wav(output, channels, spec.rate, &interleaved)?,
            OutputFormat::Ogg => save_as_ogg(output, channels, spec.rate, &interleaved)?,
        }
        debug!("Wrote {:?}", output);
        Ok(())
    }
}

/// Decodes an audio file and multiplies every sample by `scale`
///
/// Samples are clamped to `[-1, 1]` after scaling.
///
/// # Returns
/// Planar samples (one vector per channel) and the signal spec
fn decode_scaled(
    path: &Path,
    scale: f64,
) -> Result<(Vec<Vec<f32>>, SignalSpec), TransformError> {
    let file = fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }
    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or(TransformError::NoTrack)?;
    let track_id = track.id;

    let spec = SignalSpec::new(
        track
            .codec_params
            .sample_rate
            .ok_or(TransformError::MissingSampleRate)?,
        track
            .codec_params
            .channels
            .ok_or(TransformError::MissingChannelSpec)?,
    );

    let dec_opts: DecoderOptions = Default::default();
    let mut decoder = symphonia::default::get_codecs().make(&track.codec_params, &dec_opts)?;

    let gain = scale as f32;
    let mut all_samples_planar: Vec<Vec<f32>> = vec![Vec::new(); spec.channels.count()];

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => {
                let current_planar = convert_buffer_to_planar_f32(&decoded)?;
                for (channel, plane) in all_samples_planar.iter_mut().zip(current_planar) {
                    channel.extend(plane.into_iter().map(|s| (s * gain).clamp(-1.0, 1.0)));
                }
            }
            Err(SymphoniaError::DecodeError(e)) => {
                warn!(
                    "Decode error in {:?}: {}. Skipping packet.",
                    path.file_name().unwrap_or_default(),
                    e
                );
            }
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok((all_samples_planar, spec))
}

/// Converts any Symphonia audio buffer to planar f32 in `[-1, 1]`
fn convert_buffer_to_planar_f32(
    decoded: &AudioBufferRef<'_>,
) -> Result<Vec<Vec<f32>>, TransformError> {
    let planes: Vec<Vec<f32>> = match decoded {
        AudioBufferRef::F32(buf) => buf.planes().planes().iter().map(|p| p.to_vec()).collect(),
        AudioBufferRef::F64(buf) => buf
            .planes()
            .planes()
            .iter()
            .map(|p| p.iter().map(|&s| s as f32).collect())
            .collect(),
        AudioBufferRef::S32(buf) => buf
            .planes()
            .planes()
            .iter()
            .map(|p| p.iter().map(|&s| s as f32 / i32::MAX as f32).collect())
            .collect(),
        AudioBufferRef::S24(buf) => buf
            .planes()
            .planes()
            .iter()
            // i24 spans -2^23..2^23-1
            .map(|p| p.iter().map(|&s| s.inner() as f32 / 8_388_607.0).collect())
            .collect(),
        AudioBufferRef::S16(buf) => buf
            .planes()
            .planes()
            .iter()
            .map(|p| p.iter().map(|&s| s as f32 / i16::MAX as f32).collect())
            .collect(),
        AudioBufferRef::U8(buf) => buf
            .planes()
            .planes()
            .iter()
            .map(|p| p.iter().map(|&s| (s as i16 - 128) as f32 / 128.0).collect())
            .collect(),
        _ => return Err(TransformError::UnsupportedSampleFormat),
    };
    Ok(planes)
}

/// Interleaves planar audio samples, padding short planes with silence
fn interleave_planar_f32(planar_samples: &[Vec<f32>]) -> Vec<f32> {
    let num_frames = planar_samples.iter().map(Vec::len).max().unwrap_or(0);
    if planar_samples.iter().any(|p| p.len() != num_frames) {
        warn!("Planar sample planes have different lengths during interleaving!");
    }

    let mut interleaved = Vec::with_capacity(num_frames * planar_samples.len());
    for frame_idx in 0..num_frames {
        for plane in planar_samples {
            interleaved.push(plane.get(frame_idx).copied().unwrap_or(0.0));
        }
    }
    interleaved
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn interleave_pads_short_planes() {
        let planar = vec![vec![1.0, 2.0, 3.0], vec![-1.0, -2.0]];
        assert_eq!(
            interleave_planar_f32(&planar),
            [1.0, -1.0, 2.0, -2.0, 3.0, 0.0]
        );
        assert!(interleave_planar_f32(&[]).is_empty());
    }

    #[test]
    fn rejects_unknown_output_container() {
        let dir = tempdir().expect("temp dir");
        let err = SymphoniaTransform
            .apply(&dir.path().join("in.wav"), &dir.path().join("out.flac"), 0.5)
            .unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedOutput(_)));
    }

    #[test]
    fn garbage_input_fails() {
        let dir = tempdir().expect("temp dir");
        let input = dir.path().join("noise.mp3");
        fs::write(&input, b"definitely not audio").unwrap();
        assert!(
            SymphoniaTransform
                .apply(&input, &dir.path().join("out.wav"), 1.0)
                .is_err()
        );
    }
}
