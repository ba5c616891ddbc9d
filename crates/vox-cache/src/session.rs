//! Line-oriented speaking session used by the `vox` binary.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::error;
use vox_engine::AudioPlayer;

use crate::SynthesisCache;

/// Palabra que termina la sesion (sin distinguir mayusculas).
pub const EXIT_COMMAND: &str = "exit";

/// Resumen de una sesion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Lineas convertidas en audio
    pub spoken: u64,
    /// Lineas cuya sintesis fallo
    pub failed: u64,
}

/// Habla cada linea de `input` a medida que llega.
///
/// Lineas vacias se ignoran y `exit` termina la sesion antes del EOF. Un
/// error de sintesis o de reproduccion se registra y la sesion continua;
/// solo un error leyendo `input` la corta.
pub async fn speak_lines<R>(
    cache: &SynthesisCache,
    player: Option<&dyn AudioPlayer>,
    input: R,
) -> std::io::Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = SessionSummary::default();
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }
        if text.is_empty() {
            continue;
        }

        let audio = match cache.speak_text(text).await {
            Ok(audio) => audio,
            Err(e) => {
                summary.failed += 1;
                error!(error = %e, "Failed to generate speech");
                continue;
            }
        };
        summary.spoken += 1;

        if let Some(player) = player
            && let Err(e) = player.play(&audio).await
        {
            error!(player = player.name(), error = %e, "Playback failed");
        }
    }

    Ok(summary)
}
