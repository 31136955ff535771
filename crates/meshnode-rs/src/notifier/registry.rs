use super::flags::ChangedFlags;
use crate::hal::MeshError;
use log::{debug, trace, warn};

/// Opaque caller value handed back to a callback on every notification.
pub type CallbackContext = usize;

/// Function invoked when observable node state changes.
pub type StateChangedHandler = fn(ChangedFlags, CallbackContext);

/// One registered (handler, context) pair.
#[derive(Debug, Clone, Copy)]
struct Callback {
    handler: StateChangedHandler,
    context: CallbackContext,
}

impl Callback {
    fn is_serving(&self, handler: StateChangedHandler, context: CallbackContext) -> bool {
        core::ptr::fn_addr_eq(self.handler, handler) && self.context == context
    }
}

/// Fixed-capacity table of state-changed callbacks.
///
/// Registration takes the first free slot; the table never grows.
/// Notifications are delivered in ascending slot order.
#[derive(Debug)]
pub struct CallbackRegistry<const N: usize> {
    slots: [Option<Callback>; N],
}

impl<const N: usize> Default for CallbackRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CallbackRegistry<N> {
    pub const fn new() -> Self {
        Self { slots: [None; N] }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores the pair in the first free slot.
    ///
    /// An identical pair that is already registered takes a second slot.
    pub fn register(
        &mut self,
        handler: StateChangedHandler,
        context: CallbackContext,
    ) -> Result<(), MeshError> {
        match self.slots.iter_mut().enumerate().find(|(_, s)| s.is_none()) {
            Some((index, slot)) => {
                *slot = Some(Callback { handler, context });
                debug!("[NOTIFY] Callback registered in slot {}", index);
                Ok(())
            }
            None => {
                warn!("[NOTIFY] Callback table full ({} slots)", N);
                Err(MeshError::NoBufs)
            }
        }
    }

    /// Frees the first slot holding exactly this pair. No match is a no-op.
    pub fn remove(&mut self, handler: StateChangedHandler, context: CallbackContext) {
        if let Some((index, slot)) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, s)| s.is_some_and(|cb| cb.is_serving(handler, context)))
        {
            *slot = None;
            debug!("[NOTIFY] Callback removed from slot {}", index);
        }
    }

    /// Invokes every registered callback with `flags`.
    pub fn notify(&self, flags: ChangedFlags) {
        for (index, callback) in self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|cb| (i, cb)))
        {
            trace!("[NOTIFY] Slot {} <- {:#06x}", index, flags.0);
            (callback.handler)(flags, callback.context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    fn noop_a(_flags: ChangedFlags, _ctx: CallbackContext) {}
    fn noop_b(_flags: ChangedFlags, _ctx: CallbackContext) {}

    #[test]
    fn test_register_until_full() {
        let mut registry = CallbackRegistry::<3>::new();
        assert_eq!(registry.register(noop_a, 1), Ok(()));
        assert_eq!(registry.register(noop_a, 2), Ok(()));
        assert_eq!(registry.register(noop_b, 1), Ok(()));
        assert_eq!(registry.register(noop_b, 2), Err(MeshError::NoBufs));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_remove_frees_slot_for_reuse() {
        let mut registry = CallbackRegistry::<2>::new();
        registry.register(noop_a, 1).unwrap();
        registry.register(noop_a, 2).unwrap();

        registry.remove(noop_a, 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.register(noop_b, 9), Ok(()));
        assert_eq!(registry.register(noop_b, 10), Err(MeshError::NoBufs));
    }

    #[test]
    fn test_remove_unknown_pair_is_noop() {
        let mut registry = CallbackRegistry::<2>::new();
        registry.register(noop_a, 1).unwrap();

        // Same handler, different context; different handler, same context.
        registry.remove(noop_a, 2);
        registry.remove(noop_b, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_pair_takes_second_slot() {
        let mut registry = CallbackRegistry::<2>::new();
        registry.register(noop_a, 7).unwrap();
        registry.register(noop_a, 7).unwrap();
        assert_eq!(registry.len(), 2);

        // Each remove frees exactly one of them.
        registry.remove(noop_a, 7);
        assert_eq!(registry.len(), 1);
        registry.remove(noop_a, 7);
        assert!(registry.is_empty());
    }

    static ORDER: AtomicU32 = AtomicU32::new(0);
    static SEEN_FLAGS: AtomicU32 = AtomicU32::new(0);
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn record(flags: ChangedFlags, ctx: CallbackContext) {
        // Append the context digit so delivery order can be checked.
        let prev = ORDER.load(Ordering::SeqCst);
        ORDER.store(prev * 10 + ctx as u32, Ordering::SeqCst);
        SEEN_FLAGS.store(flags.0, Ordering::SeqCst);
        CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_notify_in_slot_order() {
        let mut registry = CallbackRegistry::<3>::new();
        registry.register(record, 1).unwrap();
        registry.register(record, 2).unwrap();
        registry.register(record, 3).unwrap();
        registry.remove(record, 2);
        registry.register(record, 4).unwrap(); // Reuses slot 1

        registry.notify(ChangedFlags::ROLE);

        assert_eq!(CALLS.load(Ordering::SeqCst), 3);
        assert_eq!(ORDER.load(Ordering::SeqCst), 143);
        assert_eq!(SEEN_FLAGS.load(Ordering::SeqCst), ChangedFlags::ROLE.0);
    }
}
