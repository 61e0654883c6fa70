use std::time::Duration;

use log::info;
use netmix::{config, Player};

/// Runs the reference session: start playing, pause after three seconds,
/// sit paused for ten, then resume and let both sources drain.
async fn run_session() -> Result<(), netmix::Error> {
    let config = config::load_config();

    let mut player = Player::open(&config)?;
    player.set_mixing_level(-0.4);

    player.play();
    tokio::time::sleep(Duration::from_secs(3)).await;

    player.pause();
    tokio::time::sleep(Duration::from_secs(10)).await;

    player.play();
    player.finished().await?;
    info!("mixed {} samples", player.written_samples());

    player.close().await
}

#[tokio::main]
async fn main() {
    env_logger::init();
    run_session().await.unwrap();
}
