use rand::Rng;

use crate::OutputFormat;
use crate::scan::AudioFileEntry;

/// Length of the random upper-case suffix
pub const SUFFIX_LEN: usize = 5;

/// Builds `<base>_<XXXXX>.<ext>` for a source file.
///
/// The suffix is not collision free; two outputs for the same base name in
/// one directory can in principle clash.
pub fn output_file_name<R: Rng + ?Sized>(
    original: &AudioFileEntry,
    format: OutputFormat,
    rng: &mut R,
) -> String {
    format!(
        "{}_{}.{}",
        original.base_name(),
        random_suffix(rng),
        format.extension()
    )
}

fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| char::from(rng.random_range(b'A'..=b'Z')))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_shape(name: &str, base: &str, ext: &str) {
        let rest = name
            .strip_prefix(base)
            .and_then(|s| s.strip_prefix('_'))
            .and_then(|s| s.strip_suffix(ext))
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or_else(|| panic!("unexpected name {name}"));
        assert_eq!(rest.len(), SUFFIX_LEN);
        assert!(rest.bytes().all(|b| b.is_ascii_uppercase()), "{name}");
    }

    #[test]
    fn coerces_to_output_extension() {
        let mut rng = StdRng::seed_from_u64(7);
        for original in ["song.wav", "song.mp3", "song.OGG", "song.flac"] {
            let name = output_file_name(&AudioFileEntry::new(original), OutputFormat::Mp3, &mut rng);
            assert_shape(&name, "song", "mp3");
        }
    }

    #[test]
    fn keeps_inner_dots_of_base_name() {
        let mut rng = StdRng::seed_from_u64(1);
        let name = output_file_name(&AudioFileEntry::new("a.b_c.wav"), OutputFormat::Wav, &mut rng);
        assert_shape(&name, "a.b_c", "wav");
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let entry = AudioFileEntry::new("track.ogg");
        let a = output_file_name(&entry, OutputFormat::Mp3, &mut StdRng::seed_from_u64(42));
        let b = output_file_name(&entry, OutputFormat::Mp3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
