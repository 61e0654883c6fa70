/// Hard ceiling on the bytes served by a single read call, so one paced
/// transfer can only take so long.
pub const BLOCK_SIZE: usize = 8192 * 4;

pub(crate) const SAMPLE_SIZE: usize = std::mem::size_of::<i16>();

/// A fixed sample buffer with a read cursor. Both source types serve their
/// data through one of these; only the pacing differs.
pub(crate) struct SampleCursor {
    samples: Vec<i16>,
    index: usize,
}

impl SampleCursor {
    pub fn new(samples: Vec<i16>) -> SampleCursor {
        SampleCursor { samples, index: 0 }
    }

    /// Bytes the next read into a `want_bytes` buffer would serve: capped by
    /// the block size and the samples left, rounded down to whole samples.
    /// 0 means end of stream.
    pub fn next_chunk_len(&self, want_bytes: usize) -> usize {
        let remaining = self.samples.len() - self.index;
        let capped = want_bytes.min(BLOCK_SIZE).min(remaining * SAMPLE_SIZE);
        (capped / SAMPLE_SIZE) * SAMPLE_SIZE
    }

    /// Copies `chunk_len` bytes of samples into `dest` as little-endian
    /// bytes and advances the cursor. `chunk_len` must come from
    /// [`next_chunk_len`](Self::next_chunk_len).
    pub fn copy_into(&mut self, dest: &mut [u8], chunk_len: usize) -> usize {
        let n_samples = chunk_len / SAMPLE_SIZE;
        for (i, sample) in self.samples[self.index..self.index + n_samples]
            .iter()
            .enumerate()
        {
            let bytes = sample.to_le_bytes();
            dest[SAMPLE_SIZE * i] = bytes[0];
            dest[SAMPLE_SIZE * i + 1] = bytes[1];
        }
        self.index += n_samples;
        n_samples * SAMPLE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_len_rounds_down_to_whole_samples() {
        let cursor = SampleCursor::new(vec![0; 10]);
        assert_eq!(cursor.next_chunk_len(7), 6);
        assert_eq!(cursor.next_chunk_len(20), 20);
        assert_eq!(cursor.next_chunk_len(100), 20);
    }

    #[test]
    fn chunk_len_respects_block_size() {
        let cursor = SampleCursor::new(vec![0; BLOCK_SIZE]);
        assert_eq!(cursor.next_chunk_len(usize::MAX), BLOCK_SIZE);
    }

    #[test]
    fn copy_advances_until_end_of_stream() {
        let mut cursor = SampleCursor::new(vec![1, 2, 3]);
        let mut dest = [0u8; 4];

        let chunk = cursor.next_chunk_len(dest.len());
        assert_eq!(cursor.copy_into(&mut dest, chunk), 4);
        assert_eq!(dest, [1, 0, 2, 0]);

        let chunk = cursor.next_chunk_len(dest.len());
        assert_eq!(cursor.copy_into(&mut dest, chunk), 2);
        assert_eq!(&dest[..2], [3, 0]);

        assert_eq!(cursor.next_chunk_len(dest.len()), 0); // EOS
    }
}
