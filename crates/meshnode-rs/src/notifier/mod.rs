// crates/meshnode-rs/src/notifier/mod.rs

mod flags;
mod registry;

pub use flags::ChangedFlags;
pub use registry::{CallbackContext, CallbackRegistry, StateChangedHandler};

use crate::hal::MeshError;
use log::debug;

/// Collects state changes and delivers them to the registered callbacks.
///
/// Changes are accumulated with `signal` while a control-plane call runs and
/// are only delivered on `flush`. Callbacks therefore never run inside the
/// call that caused the change.
#[derive(Debug, Default)]
pub struct Notifier<const N: usize> {
    registry: CallbackRegistry<N>,
    pending: ChangedFlags,
}

impl<const N: usize> Notifier<N> {
    pub fn new() -> Self {
        Self {
            registry: CallbackRegistry::new(),
            pending: ChangedFlags::empty(),
        }
    }

    pub fn register(
        &mut self,
        handler: StateChangedHandler,
        context: CallbackContext,
    ) -> Result<(), MeshError> {
        self.registry.register(handler, context)
    }

    pub fn remove(&mut self, handler: StateChangedHandler, context: CallbackContext) {
        self.registry.remove(handler, context);
    }

    /// Records a change to be delivered on the next flush.
    pub fn signal(&mut self, flags: ChangedFlags) {
        self.pending.insert(flags);
    }

    /// Changes recorded since the last flush.
    pub fn pending(&self) -> ChangedFlags {
        self.pending
    }

    /// Delivers and clears the accumulated changes. Returns what was delivered.
    pub fn flush(&mut self) -> ChangedFlags {
        let flags = core::mem::take(&mut self.pending);
        if !flags.is_empty() {
            debug!("[NOTIFY] Delivering state changes {:#06x}", flags.0);
            self.registry.notify(flags);
        }
        flags
    }
}
