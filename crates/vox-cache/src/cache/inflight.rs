//! Per-key coalescing of concurrent misses.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use vox_core::CacheKey;

type Slots = Arc<Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>>;

/// Registro de sintesis en curso.
///
/// Solo un caller por key pasa `acquire` a la vez; el resto espera su
/// turno y vuelve a consultar los tiers antes de sintetizar. Keys
/// distintas nunca se bloquean entre si.
#[derive(Clone, Default)]
pub(crate) struct InFlight {
    slots: Slots,
}

impl InFlight {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Espera el turno para la key.
    ///
    /// El guard existe desde antes de esperar: si el future se cancela, su
    /// drop poda el slot igual que una liberacion normal.
    pub(crate) async fn acquire(&self, key: CacheKey) -> InFlightGuard {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(key).or_default())
        };

        let mut guard = InFlightGuard {
            key,
            slots: Arc::clone(&self.slots),
            permit: None,
        };
        guard.permit = Some(slot.lock_owned().await);
        guard
    }

    /// Numero de keys con slot registrado.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Turno exclusivo sobre una key; se libera al hacer drop.
///
/// Sin `permit` representa un caller que todavia espera.
pub(crate) struct InFlightGuard {
    key: CacheKey,
    slots: Slots,
    permit: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut slots = self.slots.lock();
        drop(self.permit.take());

        // El mapa retiene una referencia; si es la unica, nadie espera
        if slots
            .get(&self.key)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(&self.key);
        }
    }
}
