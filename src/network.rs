use std::sync::Arc;
use std::time::Duration;

use crate::profile::TransferProfile;
use crate::source::SampleCursor;
use crate::stopwatch::StopWatch;

// A zero rate only happens on clock skew; floor it so the delay division
// stays finite.
const MIN_RATE: f64 = 1.0;

/// Simulated network stream over a fixed sample buffer.
///
/// Every read waits for the time a transfer of that chunk at the profile's
/// current rate would take before delivering the data, so real time elapses
/// in proportion to chunk size over the modeled throughput. The wait is an
/// async sleep; no thread blocks.
pub struct NetworkSource {
    cursor: SampleCursor,
    profile: TransferProfile,
    clock: Arc<StopWatch>,
}

impl NetworkSource {
    /// Wraps `samples` with a freshly generated transfer profile. A
    /// non-negative seed reproduces the same profile curve run to run.
    pub fn new(samples: Vec<i16>, seed: i64, clock: Arc<StopWatch>) -> NetworkSource {
        NetworkSource::with_profile(samples, TransferProfile::generate(seed), clock)
    }

    pub fn with_profile(
        samples: Vec<i16>,
        profile: TransferProfile,
        clock: Arc<StopWatch>,
    ) -> NetworkSource {
        NetworkSource {
            cursor: SampleCursor::new(samples),
            profile,
            clock,
        }
    }

    /// Reads the next chunk into `dest` after the simulated transfer delay.
    ///
    /// Returns the number of bytes read, always a whole number of samples.
    /// 0 means end of stream.
    pub async fn read(&mut self, dest: &mut [u8]) -> usize {
        let chunk = self.cursor.next_chunk_len(dest.len());
        if chunk == 0 {
            return 0; // EOS
        }

        let bps = self.profile.value_at(self.clock.elapsed()).max(MIN_RATE);
        let delay_ms = (1000.0 * chunk as f64 / bps) as u64;
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        self.cursor.copy_into(dest, chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::BLOCK_SIZE;

    // fast enough that test reads finish in well under a millisecond each
    fn instant_profile() -> TransferProfile {
        TransferProfile::from_anchors(vec![1e9; 2])
    }

    #[tokio::test]
    async fn reads_are_sample_aligned() {
        let clock = Arc::new(StopWatch::new());
        let mut source = NetworkSource::with_profile(vec![5; 40], instant_profile(), clock);

        let mut dest = [0u8; 13];
        assert_eq!(source.read(&mut dest).await, 12);
    }

    #[tokio::test]
    async fn drains_buffer_then_signals_eos() {
        let clock = Arc::new(StopWatch::new());
        let mut source = NetworkSource::with_profile(vec![1; 100], instant_profile(), clock);

        let mut dest = [0u8; 64];
        let mut total = 0;
        loop {
            let n = source.read(&mut dest).await;
            if n == 0 {
                break;
            }
            total += n;
        }
        assert_eq!(total, 200);

        // EOS is sticky
        assert_eq!(source.read(&mut dest).await, 0);
    }

    #[tokio::test]
    async fn single_read_is_capped_at_block_size() {
        let clock = Arc::new(StopWatch::new());
        let samples = vec![0i16; BLOCK_SIZE];
        let mut source = NetworkSource::with_profile(samples, instant_profile(), clock);

        let mut dest = vec![0u8; BLOCK_SIZE * 2];
        assert_eq!(source.read(&mut dest).await, BLOCK_SIZE);
    }

    #[tokio::test]
    async fn read_delay_tracks_the_modeled_rate() {
        let clock = Arc::new(StopWatch::new());
        // 1000 bytes/s: a 100-byte read should take about 100ms
        let profile = TransferProfile::from_anchors(vec![1000.0; 2]);
        let mut source = NetworkSource::with_profile(vec![7; 50], profile, clock.clone());

        let mut dest = [0u8; 100];
        let before = clock.elapsed_ms();
        assert_eq!(source.read(&mut dest).await, 100);
        let took = clock.elapsed_ms() - before;
        assert!(took >= 100, "paced read returned after only {} ms", took);
    }
}
