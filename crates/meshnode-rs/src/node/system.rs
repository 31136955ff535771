use super::Instance;
use crate::hal::{MeshEngine, MeshError, Platform, SettingsStore};
use crate::role::NodeRole;
use crate::settings;
use log::{info, warn};

impl<E: MeshEngine, P: Platform, S: SettingsStore> Instance<E, P, S> {
    /// Version string of this stack.
    pub fn version_string(&self) -> &'static str {
        crate::version_string()
    }

    /// Resets the platform.
    pub fn platform_reset(&mut self) {
        info!("[NODE] Platform reset");
        self.platform.reset();
    }

    /// Wipes all persisted state, then resets the platform.
    pub fn factory_reset(&mut self) {
        info!("[NODE] Factory reset");
        if let Err(e) = settings::wipe(&mut self.settings) {
            warn!("[NODE] Settings wipe failed during factory reset: {}", e);
        }
        self.platform.reset();
    }

    /// Wipes all persisted state. Only allowed while Disabled.
    ///
    /// The in-memory datasets are kept until the next restart.
    pub fn persistent_info_erase(&mut self) -> Result<(), MeshError> {
        if self.role.role() != NodeRole::Disabled {
            warn!("[SETTINGS] Erase refused in role {:?}", self.role.role());
            return Err(MeshError::InvalidState);
        }
        info!("[SETTINGS] Erasing persistent info");
        settings::wipe(&mut self.settings)
    }

    /// Persists whether the protocol starts on the next boot.
    #[cfg(feature = "auto-start")]
    pub fn set_auto_start(&mut self, enabled: bool) -> Result<(), MeshError> {
        info!("[SETTINGS] Auto-start {}", if enabled { "enabled" } else { "disabled" });
        settings::save_auto_start(&mut self.settings, enabled)
    }

    /// Persists whether the protocol starts on the next boot.
    #[cfg(not(feature = "auto-start"))]
    pub fn set_auto_start(&mut self, _enabled: bool) -> Result<(), MeshError> {
        Err(MeshError::NotImplemented)
    }

    /// True if the protocol starts on boot. Unreadable settings mean false.
    #[cfg(feature = "auto-start")]
    pub fn auto_start(&mut self) -> bool {
        settings::load_auto_start(&mut self.settings)
    }

    /// True if the protocol starts on boot. Always false in this build.
    #[cfg(not(feature = "auto-start"))]
    pub fn auto_start(&mut self) -> bool {
        false
    }
}
