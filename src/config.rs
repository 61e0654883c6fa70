use std::fs::{create_dir_all, File};
use std::path::PathBuf;

use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Session configuration. Loaded from the platform config dir; any field
/// missing from the file falls back to its default.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Raw mono S16LE 48kHz input fed through the simulated network.
    pub network_input: PathBuf,
    /// Raw mono S16LE 48kHz input read directly.
    pub player_input: PathBuf,
    /// Mixed stereo output stream.
    pub sink_output: PathBuf,
    /// Per-iteration progress log.
    pub stats_output: PathBuf,
    /// Blend between the sources, -1 (network only) to 1 (local only).
    pub mixing_level: f64,
    /// Seed for the transfer rate profile. Non-negative values reproduce
    /// the same curve run to run; negative means non-deterministic.
    pub profile_seed: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            network_input: "audio2_s16le_mono_48k.raw".into(),
            player_input: "audio1_s16le_mono_48k.raw".into(),
            sink_output: "audio_output.raw".into(),
            stats_output: "realtime_stats.txt".into(),
            mixing_level: 0.0,
            profile_seed: -1,
        }
    }
}

pub fn load_config() -> Config {
    let proj_dirs = match ProjectDirs::from("com", "netmix", "netmix") {
        Some(dirs) => dirs,
        None => {
            warn!("no home directory, using default config");
            return Config::default();
        }
    };
    let config_path = proj_dirs.config_dir().join("config.json");

    match File::open(&config_path) {
        Ok(config_file) => match serde_json::from_reader(config_file) {
            Ok(config) => {
                info!("loaded config from {}", config_path.display());
                config
            }
            Err(err) => {
                warn!("couldn't parse {}: {}, using defaults", config_path.display(), err);
                Config::default()
            }
        },
        Err(_) => {
            info!("creating and saving default config");
            let config = Config::default();
            if let Err(err) = save_config(&config) {
                warn!("couldn't save default config: {}", err);
            }
            config
        }
    }
}

pub fn save_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let proj_dirs =
        ProjectDirs::from("com", "netmix", "netmix").ok_or("no home directory for config")?;
    let config_dir = proj_dirs.config_dir();
    create_dir_all(config_dir)?;

    let config_path = config_dir.join("config.json");
    let config_file = File::create(config_path)?;
    serde_json::to_writer(config_file, &config)?;
    Ok(())
}
