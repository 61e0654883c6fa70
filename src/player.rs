use std::fs::File;
use std::sync::{Arc, Mutex};

use log::info;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::Error;
use crate::local::LocalSource;
use crate::network::NetworkSource;
use crate::pcm;
use crate::sink::{ByteSink, StatsLog};
use crate::stopwatch::StopWatch;

/// Samples requested from each source per mix iteration. Also bounds the
/// pause latency: one iteration's simulated transfer is the longest a
/// pause can wait.
const CHUNK_SAMPLES: usize = 72;

const CHUNK_BYTES: usize = CHUNK_SAMPLES * 2;

/// Mixing state shared between the control methods and the mix loop. The
/// loop reads it once per iteration, so every change takes effect at the
/// next iteration boundary.
struct MixState {
    network_level: f64,
    player_level: f64,
    written_samples: u64,
    paused: bool,
    stopping: bool,
    pause_checkpoint: Option<(u64, u64)>,
}

impl MixState {
    fn new() -> MixState {
        MixState {
            // level 0: an even split
            network_level: 0.5,
            player_level: 0.5,
            written_samples: 0,
            paused: false,
            stopping: false,
            pause_checkpoint: None,
        }
    }
}

struct Shared {
    state: Mutex<MixState>,
    wake: Notify,
}

/// Everything the mix loop owns exclusively: both sources and both outputs.
/// Handed to the worker task on the first `play`.
struct Streams {
    network: NetworkSource,
    local: LocalSource,
    sink: ByteSink<File>,
    stats: StatsLog<File>,
}

/// Mixes a simulated network stream with a local one into a stereo S16LE
/// sink, pacing itself to the network side's modeled bandwidth.
///
/// All control methods return immediately; the mix loop runs on its own
/// task from the first `play` until both sources are drained, the session
/// is closed, or the task is paused in between.
pub struct Player {
    shared: Arc<Shared>,
    clock: Arc<StopWatch>,
    streams: Option<Streams>,
    worker: Option<JoinHandle<Result<(), Error>>>,
}

impl Player {
    /// Opens a session: loads both input files, creates the output files,
    /// and leaves the player idle until [`play`](Self::play).
    ///
    /// A missing or unreadable input is fatal here; nothing is retried.
    pub fn open(config: &Config) -> Result<Player, Error> {
        let network_samples = pcm::load_s16le(&config.network_input)?;
        let player_samples = pcm::load_s16le(&config.player_input)?;

        let sink = ByteSink::create(&config.sink_output)?;
        let stats = StatsLog::create(&config.stats_output)?;

        let clock = Arc::new(StopWatch::new());
        let network = NetworkSource::new(network_samples, config.profile_seed, clock.clone());
        let local = LocalSource::new(player_samples);

        let player = Player {
            shared: Arc::new(Shared {
                state: Mutex::new(MixState::new()),
                wake: Notify::new(),
            }),
            clock,
            streams: Some(Streams {
                network,
                local,
                sink,
                stats,
            }),
            worker: None,
        };
        player.set_mixing_level(config.mixing_level);
        Ok(player)
    }

    /// Sets the blend between the two sources: -1 is network only, 0 an
    /// even split, 1 is local only. Values outside [-1, 1] are clamped.
    /// Takes effect at the next mix iteration; already-emitted data is
    /// untouched.
    pub fn set_mixing_level(&self, level: f64) {
        let level = level.clamp(-1.0, 1.0);
        let mut state = self.shared.state.lock().unwrap();
        state.network_level = (1.0 - level) / 2.0;
        state.player_level = (1.0 + level) / 2.0;
    }

    /// Current (network, player) weights. They always sum to 1.
    pub fn levels(&self) -> (f64, f64) {
        let state = self.shared.state.lock().unwrap();
        (state.network_level, state.player_level)
    }

    /// Samples mixed into the sink so far.
    pub fn written_samples(&self) -> u64 {
        self.shared.state.lock().unwrap().written_samples
    }

    /// Where the most recent pause landed: elapsed milliseconds and samples
    /// written at the moment it was requested. None until the first pause.
    pub fn pause_checkpoint(&self) -> Option<(u64, u64)> {
        self.shared.state.lock().unwrap().pause_checkpoint
    }

    /// Starts playback, or resumes it where [`pause`](Self::pause) left
    /// off. Returns immediately. The first call spawns the mix loop; only
    /// one loop ever runs per session.
    pub fn play(&mut self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.paused = false;
        }
        self.shared.wake.notify_one();

        if let Some(streams) = self.streams.take() {
            info!("starting mix loop");
            let shared = self.shared.clone();
            let clock = self.clock.clone();
            self.worker = Some(tokio::spawn(run_mix_loop(streams, shared, clock)));
        }
    }

    /// Pauses playback at the current position and records where it was.
    ///
    /// The flag is observed between iterations, so an in-flight paced read
    /// finishes first: pause takes effect within one chunk's simulated
    /// transfer time.
    pub fn pause(&self) {
        let mut state = self.shared.state.lock().unwrap();
        state.paused = true;
        let checkpoint = (self.clock.elapsed_ms(), state.written_samples);
        state.pause_checkpoint = Some(checkpoint);
        info!(
            "paused at {} ms with {} samples written",
            checkpoint.0, checkpoint.1
        );
    }

    /// Waits for the mix loop to drain both sources. Completes right away
    /// if playback never started or already finished.
    pub async fn finished(&mut self) -> Result<(), Error> {
        match self.worker.take() {
            Some(worker) => worker.await.expect("mix loop panicked"),
            None => Ok(()),
        }
    }

    /// Closes the session: halts the mix loop if it is still running, then
    /// releases both outputs. A failed sink or stats write surfaces here;
    /// data written before the failure stays on disk.
    pub async fn close(mut self) -> Result<(), Error> {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.stopping = true;
        }
        self.shared.wake.notify_one();

        let result = self.finished().await;
        info!("session closed");
        result
    }
}

async fn run_mix_loop(
    mut streams: Streams,
    shared: Arc<Shared>,
    clock: Arc<StopWatch>,
) -> Result<(), Error> {
    let mut network_buf = [0u8; CHUNK_BYTES];
    let mut player_buf = [0u8; CHUNK_BYTES];

    loop {
        // pause and shutdown are observed here, between iterations
        loop {
            let (paused, stopping) = {
                let state = shared.state.lock().unwrap();
                (state.paused, state.stopping)
            };
            if stopping {
                return Ok(());
            }
            if !paused {
                break;
            }
            shared.wake.notified().await;
        }

        let network_read = streams.network.read(&mut network_buf).await;
        let player_read = streams.local.read(&mut player_buf);

        let (network_level, player_level, written_samples) = {
            let mut state = shared.state.lock().unwrap();
            state.written_samples += ((network_read + player_read) / 2) as u64;
            (
                state.network_level,
                state.player_level,
                state.written_samples,
            )
        };

        let mixed = mix_stereo(
            &network_buf[..network_read],
            &player_buf[..player_read],
            network_level,
            player_level,
        );

        streams.stats.record(clock.elapsed_ms(), written_samples)?;
        streams.sink.append(&mixed)?;

        // both sources done in the same iteration ends the stream; one
        // finishing early just keeps contributing zero-length reads
        if network_read == 0 && player_read == 0 {
            info!("both sources drained, {} samples written", written_samples);
            return Ok(());
        }
    }
}

/// Weighted overlap-add of two byte streams, duplicated to stereo.
///
/// The output is `2 * (network.len() + player.len())` bytes. Each input
/// byte is scaled by its source's weight (truncating), written to both
/// channel positions, and bytes from the two sources landing on the same
/// position are summed. The shorter stream contributes zero past its end,
/// and neither slice is read past its actual length.
fn mix_stereo(network: &[u8], player: &[u8], network_level: f64, player_level: f64) -> Vec<u8> {
    let mut mixed = vec![0i8; 2 * (network.len() + player.len())];

    for (i, &byte) in network.iter().enumerate() {
        let weighted = (network_level * byte as i8 as f64) as i8;
        mixed[2 * i] = weighted;
        mixed[2 * i + 1] = weighted;
    }
    for (i, &byte) in player.iter().enumerate() {
        let weighted = (player_level * byte as i8 as f64) as i8;
        mixed[2 * i] = mixed[2 * i].wrapping_add(weighted);
        mixed[2 * i + 1] = mixed[2 * i + 1].wrapping_add(weighted);
    }

    mixed.into_iter().map(|b| b as u8).collect()
}
