//! Cancellation signal for in-progress speech requests.

use tokio::sync::watch;

/// Crea un par handle/senal enlazados.
///
/// El handle lo conserva quien puede retirar la solicitud; la senal se
/// pasa a [`SynthesisCache::speak_cancellable`](crate::SynthesisCache::speak_cancellable).
pub fn cancellation() -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, Cancellation { rx })
}

/// Lado que dispara la cancelacion.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancela la solicitud. Llamadas repetidas no tienen efecto.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Verifica si ya se cancelo.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Lado que observa la cancelacion.
///
/// Si el handle se descarta sin cancelar, la senal nunca se dispara.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

impl Cancellation {
    /// Una senal que nunca se dispara.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Verifica si ya se cancelo.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completa cuando se cancela; queda pendiente para siempre si el
    /// handle se descarto sin cancelar.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
