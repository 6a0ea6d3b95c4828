use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, InterleavedPcm, Quality};
use vorbis_rs::VorbisEncoderBuilder;

use crate::error::WritingError;
use std::{fs, fs::File, num::NonZero, path::Path};

/// Frames handed to the vorbis encoder per block
const OGG_BLOCK_FRAMES: usize = 4096;

/// Saves audio data as a WAV file
///
/// # Arguments
/// * `path` - Output file path
/// * `channels` - Number of audio channels
/// * `sample_rate` - Sample rate in Hz
/// * `samples` - Interleaved audio samples in 32-bit float format
pub fn save_as_wav(
    path: &Path,
    channels: usize,
    sample_rate: u32,
    samples: &[f32],
) -> Result<(), WritingError> {
    let channels = u16::try_from(channels).map_err(|_| WritingError::Layout("too many channels"))?;
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    Ok(writer.finalize()?)
}

/// Saves audio data as an Ogg Vorbis file
///
/// # Arguments
/// * `path` - Output file path
/// * `channels` - Number of audio channels, non zero
/// * `sample_rate` - Sample rate in Hz
/// * `samples` - Interleaved audio samples in 32-bit float format
pub fn save_as_ogg(
    path: &Path,
    channels: usize,
    sample_rate: u32,
    samples: &[f32],
) -> Result<(), WritingError> {
    let rate = NonZero::new(sample_rate).ok_or(WritingError::Layout("sample rate is zero"))?;
    let channel_count = u8::try_from(channels)
        .ok()
        .and_then(NonZero::new)
        .ok_or(WritingError::Layout("channel count must be 1..=255"))?;

    let output_file = File::create(path)?;
    let mut encoder = VorbisEncoderBuilder::new(rate, channel_count, output_file)?.build()?;

    for block in samples.chunks(OGG_BLOCK_FRAMES * channels) {
        let mut planar: Vec<Vec<f32>> = vec![Vec::with_capacity(OGG_BLOCK_FRAMES); channels];
        for (i, &sample) in block.iter().enumerate() {
            planar[i % channels].push(sample);
        }
        encoder.encode_audio_block(&planar)?;
    }
    encoder.finish()?;
    Ok(())
}

/// Saves audio data as a 192 kbps MP3 file
///
/// LAME only takes mono or stereo input; everything is encoded as stereo,
/// mono is duplicated and channels past the second are dropped.
///
/// # Arguments
/// * `path` - Output file path
/// * `channels` - Number of audio channels, non zero
/// * `sample_rate` - Sample rate in Hz
/// * `samples` - Interleaved audio samples in 32-bit float format
pub fn save_as_mp3(
    path: &Path,
    channels: usize,
    sample_rate: u32,
    samples: &[f32],
) -> Result<(), WritingError> {
    let stereo = to_stereo(channels, samples)?;

    let mut builder = Builder::new().ok_or(WritingError::Mp3(
        "failed to allocate LAME encoder".to_string(),
    ))?;
    builder.set_num_channels(2).map_err(lame_error)?;
    builder.set_sample_rate(sample_rate).map_err(lame_error)?;
    builder.set_brate(Bitrate::Kbps192).map_err(lame_error)?;
    builder.set_quality(Quality::Best).map_err(lame_error)?;
    let mut encoder = builder.build().map_err(lame_error)?;

    let mut mp3_buffer: Vec<u8> = Vec::new();
    encoder
        .encode_to_vec(InterleavedPcm(&stereo), &mut mp3_buffer)
        .map_err(lame_error)?;
    encoder
        .flush_to_vec::<FlushNoGap>(&mut mp3_buffer)
        .map_err(lame_error)?;

    fs::write(path, &mp3_buffer)?;
    Ok(())
}

fn lame_error(e: impl std::fmt::Debug) -> WritingError {
    WritingError::Mp3(format!("{e:?}"))
}

/// Interleaved stereo from any interleaved layout
fn to_stereo(channels: usize, samples: &[f32]) -> Result<Vec<f32>, WritingError> {
    match channels {
        0 => Err(WritingError::Layout("channel count is zero")),
        1 => Ok(samples.iter().flat_map(|&s| [s, s]).collect()),
        2 => Ok(samples.to_vec()),
        n => Ok(samples
            .chunks_exact(n)
            .flat_map(|frame| [frame[0], frame[1]])
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn stereo_layouts() {
        assert_eq!(to_stereo(1, &[0.1, 0.2]).unwrap(), [0.1, 0.1, 0.2, 0.2]);
        assert_eq!(to_stereo(2, &[0.1, 0.2]).unwrap(), [0.1, 0.2]);
        assert_eq!(
            to_stereo(3, &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap(),
            [0.1, 0.2, 0.4, 0.5]
        );
        assert!(to_stereo(0, &[]).is_err());
    }

    #[test]
    fn wav_round_trips_through_hound() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.wav");
        save_as_wav(&path, 2, 8000, &[0.25, -0.25, 0.5, -0.5]).unwrap();
        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 8000);
        let samples: Vec<f32> = reader.samples::<f32>().map(Result::unwrap).collect();
        assert_eq!(samples, [0.25, -0.25, 0.5, -0.5]);
    }

    #[test]
    fn ogg_rejects_zero_channels() {
        let dir = tempdir().expect("temp dir");
        let err = save_as_ogg(&dir.path().join("x.ogg"), 0, 44100, &[]).unwrap_err();
        assert!(matches!(err, WritingError::Layout(_)));
    }
}
