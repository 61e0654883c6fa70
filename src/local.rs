use crate::source::SampleCursor;

/// Local file source. Serves chunks with the same capping rules as the
/// network side, but reads return as soon as the data is copied.
pub struct LocalSource {
    cursor: SampleCursor,
}

impl LocalSource {
    pub fn new(samples: Vec<i16>) -> LocalSource {
        LocalSource {
            cursor: SampleCursor::new(samples),
        }
    }

    /// Reads the next chunk into `dest`. Returns the number of bytes read,
    /// always a whole number of samples; 0 means end of stream.
    pub fn read(&mut self, dest: &mut [u8]) -> usize {
        let chunk = self.cursor.next_chunk_len(dest.len());
        if chunk == 0 {
            return 0; // EOS
        }
        self.cursor.copy_into(dest, chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_whole_buffer_then_signals_eos() {
        let mut source = LocalSource::new(vec![-1, 2, -3]);

        let mut dest = [0u8; 4];
        assert_eq!(source.read(&mut dest), 4);
        assert_eq!(dest, [0xff, 0xff, 2, 0]);

        assert_eq!(source.read(&mut dest), 2);
        assert_eq!(&dest[..2], [0xfd, 0xff]);

        assert_eq!(source.read(&mut dest), 0);
        assert_eq!(source.read(&mut dest), 0);
    }

    #[test]
    fn odd_destination_length_still_reads_whole_samples() {
        let mut source = LocalSource::new(vec![10; 8]);
        let mut dest = [0u8; 5];
        assert_eq!(source.read(&mut dest), 4);
    }
}
