use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One second of 48kHz mono S16LE playback, in bytes. 96kB/s -> 768kbps.
pub const REFERENCE_RATE: f64 = 48_000.0 * 2.0;

const PERIOD_SECS: usize = 100;

/// Periodic transfer rate curve for the simulated network.
///
/// One anchor value (bytes per second) is generated per whole second of the
/// period, and lookups cosine-interpolate between neighboring anchors, so the
/// rate drifts smoothly instead of jumping. Times past the period wrap
/// around, with the anchor after the last one aliasing the first.
pub struct TransferProfile {
    anchors: Vec<f64>,
}

impl TransferProfile {
    /// Generates a profile with anchors drawn uniformly from 0.7x to 1.4x
    /// the reference rate. A non-negative seed reproduces the same curve;
    /// a negative seed draws from entropy.
    pub fn generate(seed: i64) -> TransferProfile {
        let mut rng = if seed >= 0 {
            StdRng::seed_from_u64(seed as u64)
        } else {
            StdRng::from_entropy()
        };
        let anchors = (0..PERIOD_SECS)
            .map(|_| rng.gen_range(REFERENCE_RATE * 0.7..REFERENCE_RATE * 1.4))
            .collect();
        TransferProfile { anchors }
    }

    /// Builds a profile from explicit anchor values, one per second.
    pub fn from_anchors(anchors: Vec<f64>) -> TransferProfile {
        assert!(!anchors.is_empty(), "profile needs at least one anchor");
        TransferProfile { anchors }
    }

    /// Instantaneous rate in bytes per second at `elapsed` since the
    /// session started.
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        self.value_at_ms(elapsed.as_millis() as i64)
    }

    /// Millisecond-timestamp form of [`value_at`](Self::value_at). A
    /// negative timestamp (clock skew) yields 0; callers must floor the
    /// rate before dividing by it.
    pub fn value_at_ms(&self, ms: i64) -> f64 {
        if ms < 0 {
            return 0.0;
        }

        let period_ms = (self.anchors.len() as i64) * 1000;
        let t = ms % period_ms;
        let sec = (t / 1000) as usize;
        let frac = (t % 1000) as f64 / 1000.0;

        let next = (sec + 1) % self.anchors.len();
        cosine_interpolate(self.anchors[sec], self.anchors[next], frac)
    }

    /// Writes the curve as `millisecond, bytesPerSecond` CSV at `step`
    /// resolution, for inspecting a generated profile offline.
    pub fn dump(&self, path: &Path, step: Duration) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "millisecond, bytesPerSecond")?;

        let period_ms = (self.anchors.len() as u64) * 1000;
        let step_ms = step.as_millis().max(1) as u64;
        let mut t = 0;
        while t < period_ms {
            writeln!(out, "{},{}", t, self.value_at_ms(t as i64) as i64)?;
            t += step_ms;
        }
        out.flush()
    }
}

fn cosine_interpolate(y1: f64, y2: f64, mu: f64) -> f64 {
    let mu2 = (1.0 - (mu * std::f64::consts::PI).cos()) / 2.0;
    y1 * (1.0 - mu2) + y2 * mu2
}
