use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::Error;

/// Loads a raw mono S16LE sample file into memory.
///
/// A file whose byte length is not a whole number of samples is still
/// usable; the trailing bytes are dropped with a warning.
pub fn load_s16le(path: &Path) -> Result<Vec<i16>, Error> {
    let bytes = fs::read(path).map_err(|source| Error::ResourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.len() % 2 != 0 {
        warn!(
            "{}: only {} of {} bytes form whole samples, dropping the rest",
            path.display(),
            bytes.len() - 1,
            bytes.len()
        );
    }

    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    info!("loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_little_endian_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.raw");
        fs::File::create(&path)
            .unwrap()
            .write_all(&[0x01, 0x00, 0xff, 0xff, 0x00, 0x80])
            .unwrap();

        let samples = load_s16le(&path).unwrap();
        assert_eq!(samples, vec![1, -1, i16::MIN]);
    }

    #[test]
    fn drops_trailing_partial_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.raw");
        fs::File::create(&path)
            .unwrap()
            .write_all(&[0x02, 0x00, 0x7f])
            .unwrap();

        let samples = load_s16le(&path).unwrap();
        assert_eq!(samples, vec![2]);
    }

    #[test]
    fn missing_file_is_resource_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.raw");

        match load_s16le(&path) {
            Err(Error::ResourceUnavailable { path: p, .. }) => assert_eq!(p, path),
            Err(other) => panic!("expected ResourceUnavailable, got {}", other),
            Ok(samples) => panic!("expected an error, loaded {} samples", samples.len()),
        }
    }
}
