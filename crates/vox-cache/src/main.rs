//! Vox binary: speaks text through the synthesis cache.

use std::path::PathBuf;

use anyhow::Context;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vox_cache::session::{EXIT_COMMAND, speak_lines};
use vox_cache::{Settings, SynthesisCache, register_cache_metrics};
use vox_engine::{AudioPlayer, CommandPlayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let play = match args.iter().position(|arg| arg == "--no-play") {
        Some(index) => {
            args.remove(index);
            false
        }
        None => true,
    };

    // VOX_CONFIG apunta a un archivo explicito; si no, vox.toml opcional
    let config_path = std::env::var_os("VOX_CONFIG").map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_deref()).context("failed to load settings")?;

    info!("Starting Vox v{}", vox_cache::version());
    info!("Voice: {} @ {}", settings.voice, settings.rate);
    info!("Audio store: {}", settings.storage_path.display());
    info!("Engine: {}", settings.engine.program());

    register_cache_metrics();

    let cache = SynthesisCache::from_settings(&settings).context("failed to open audio store")?;
    if let Err(e) = cache.engine_health().await {
        warn!(error = %e, "Speech engine is not healthy, only cached audio will be served");
    }

    let command_player = CommandPlayer::new(settings.player.clone());
    let player = play.then_some(&command_player as &dyn AudioPlayer);

    if args.is_empty() {
        info!("Enter text to speak (or type '{}' to quit)", EXIT_COMMAND);

        let summary = speak_lines(&cache, player, BufReader::new(tokio::io::stdin()))
            .await
            .context("failed to read stdin")?;
        info!(spoken = summary.spoken, failed = summary.failed, "Session finished");
    } else {
        let text = args.join(" ");
        let audio = cache
            .speak_text(&text)
            .await
            .with_context(|| format!("failed to speak {:?}", text))?;

        if let Some(player) = player {
            player.play(&audio).await.context("playback failed")?;
        }
    }

    let metrics = cache.metrics();
    info!(
        memory_hits = metrics.memory_hits(),
        durable_hits = metrics.durable_hits(),
        misses = metrics.misses(),
        syntheses = metrics.syntheses(),
        store_write_failures = metrics.store_write_failures(),
        hit_rate = metrics.hit_rate(),
        "Cache statistics"
    );

    Ok(())
}

