//! Keys used in the settings store and small helpers around them.

use crate::hal::{MeshError, SettingsStore};
use log::warn;

/// Keys of the blobs this stack keeps in the settings store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum SettingsKey {
    ActiveDataset = 0x0001,
    PendingDataset = 0x0002,
    ThreadAutoStart = 0x0006,
}

impl From<SettingsKey> for u16 {
    fn from(key: SettingsKey) -> Self {
        key as u16
    }
}

/// Reads a key, mapping `NotFound` to `None`.
pub fn read_optional<S: SettingsStore>(
    store: &mut S,
    key: SettingsKey,
) -> Result<Option<alloc::vec::Vec<u8>>, MeshError> {
    match store.get(key.into()) {
        Ok(blob) => Ok(Some(blob)),
        Err(MeshError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Persists the auto-start flag as a single byte.
#[cfg(feature = "auto-start")]
pub fn save_auto_start<S: SettingsStore>(store: &mut S, enabled: bool) -> Result<(), MeshError> {
    store.set(SettingsKey::ThreadAutoStart.into(), &[u8::from(enabled)])
}

/// Reads the auto-start flag. Any read failure counts as "disabled".
#[cfg(feature = "auto-start")]
pub fn load_auto_start<S: SettingsStore>(store: &mut S) -> bool {
    match read_optional(store, SettingsKey::ThreadAutoStart) {
        Ok(Some(blob)) => blob.first().is_some_and(|b| *b != 0),
        Ok(None) => false,
        Err(e) => {
            warn!("[SETTINGS] Failed to read auto-start flag: {}", e);
            false
        }
    }
}

/// Erases the whole store.
pub fn wipe<S: SettingsStore>(store: &mut S) -> Result<(), MeshError> {
    store.wipe().inspect_err(|e| warn!("[SETTINGS] Wipe failed: {}", e))
}
