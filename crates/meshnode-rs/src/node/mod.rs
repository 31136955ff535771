// crates/meshnode-rs/src/node/mod.rs

//! The node instance: the control-plane API an application drives.
//!
//! The methods of `Instance` are split by concern across the submodules of
//! this module; each adds an `impl` block.

mod dataset;
mod events;
mod network;
mod system;
mod thread;
mod topology;

pub use events::EngineEvent;

use crate::config::{MAX_STATE_CHANGE_HANDLERS, NodeConfig};
use crate::dataset::{DatasetKind, DatasetManager, OperationalDataset};
use crate::hal::{MeshEngine, MeshError, Platform, SettingsStore};
use crate::key::KeyRotationTracker;
use crate::notifier::{CallbackContext, ChangedFlags, Notifier, StateChangedHandler};
use crate::role::{DiscoverHandler, RoleController};
use log::{debug, info, warn};

/// One mesh node.
///
/// Owns the protocol engine, the platform services and the settings store,
/// plus the control-plane state layered on top of them. All calls are
/// synchronous and non-reentrant. State-change callbacks run only from
/// `process_event` and `process_notifications`, never from inside the call
/// that caused the change.
pub struct Instance<E: MeshEngine, P: Platform, S: SettingsStore> {
    engine: E,
    platform: P,
    settings: S,
    role: RoleController,
    datasets: DatasetManager,
    keys: KeyRotationTracker,
    notifier: Notifier<MAX_STATE_CHANGE_HANDLERS>,
    /// Receiver of the running discovery scan's results.
    discover_handler: Option<(DiscoverHandler, CallbackContext)>,
}

impl<E: MeshEngine, P: Platform, S: SettingsStore> Instance<E, P, S> {
    /// Creates a node, initialises the settings store and restores the
    /// persisted datasets.
    ///
    /// With the `auto-start` feature, the node starts immediately if the
    /// persisted auto-start flag is set. A failed auto-start is logged and
    /// leaves the node Disabled.
    pub fn new(engine: E, platform: P, mut settings: S, config: NodeConfig) -> Result<Self, MeshError> {
        info!("[NODE] Creating node instance ({})", crate::version_string());
        settings.init()?;

        let mut node = Self {
            engine,
            platform,
            settings,
            role: RoleController::new(),
            datasets: DatasetManager::new(config.delay_timer_minimal),
            keys: KeyRotationTracker::new(config.key_switch_guard_time),
            notifier: Notifier::new(),
            discover_handler: None,
        };

        if config.restore_datasets {
            node.datasets.restore(&mut node.settings)?;
            if !node.datasets.active().is_empty() {
                let active = node.datasets.active().clone();
                if let Err(e) = node.apply_network_parameters(&active) {
                    warn!("[NODE] Engine refused restored Active dataset: {}", e);
                }
            }
        }

        #[cfg(feature = "auto-start")]
        if crate::settings::load_auto_start(&mut node.settings) {
            info!("[NODE] Auto-start enabled, starting protocol");
            if let Err(e) = node.role.start(&mut node.engine) {
                warn!("[NODE] Auto-start failed: {}", e);
            }
        }

        // No callback can be registered yet. Construction is not a change.
        node.notifier.flush();
        Ok(node)
    }

    /// Stops the protocol and hands back the collaborators.
    ///
    /// Pending changes, including the move to Disabled, are delivered to the
    /// registered callbacks before the instance is consumed.
    pub fn finalize(mut self) -> (E, P, S) {
        info!("[NODE] Finalizing node instance");
        if self.role.stop(&mut self.engine) {
            self.notifier.signal(ChangedFlags::ROLE);
        }
        self.notifier.flush();
        (self.engine, self.platform, self.settings)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Direct access to the engine, for the integration glue that feeds it.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    // --- State-change callbacks ---

    /// Registers a state-changed callback. `NoBufs` when all slots are taken.
    pub fn set_state_changed_callback(
        &mut self,
        handler: StateChangedHandler,
        context: CallbackContext,
    ) -> Result<(), MeshError> {
        self.notifier.register(handler, context)
    }

    /// Removes a previously registered callback. Unknown pairs are ignored.
    pub fn remove_state_changed_callback(
        &mut self,
        handler: StateChangedHandler,
        context: CallbackContext,
    ) {
        self.notifier.remove(handler, context);
    }

    /// Delivers the state changes accumulated since the last processing point.
    pub fn process_notifications(&mut self) -> ChangedFlags {
        self.notifier.flush()
    }

    /// Changes waiting for the next processing point.
    pub fn pending_notifications(&self) -> ChangedFlags {
        self.notifier.pending()
    }

    // --- Internal helpers shared by the submodules ---

    fn now_ms(&self) -> u64 {
        self.platform.now_ms()
    }

    /// Pushes the network parameters present in `dataset` into the engine
    /// and signals the ones that changed.
    ///
    /// All or nothing: if the engine refuses a value, the parameters already
    /// pushed are restored and the error is returned.
    fn apply_network_parameters(&mut self, dataset: &OperationalDataset) -> Result<(), MeshError> {
        let previous = self.engine_network_parameters();
        match self.push_network_parameters(dataset) {
            Ok(changed) => {
                if !changed.is_empty() {
                    debug!("[NODE] Network parameters updated {:#06x}", changed.0);
                }
                self.notifier.signal(changed);
                Ok(())
            }
            Err(e) => {
                warn!("[NODE] Engine refused network parameters ({}), restoring previous values", e);
                if let Err(e) = self.push_network_parameters(&previous) {
                    warn!("[NODE] Failed to restore network parameters: {}", e);
                }
                Err(e)
            }
        }
    }

    /// The engine's current network parameters, as a dataset.
    fn engine_network_parameters(&self) -> OperationalDataset {
        OperationalDataset {
            pan_id: Some(self.engine.pan_id()),
            channel: Some(self.engine.channel()),
            extended_pan_id: Some(self.engine.extended_pan_id()),
            network_name: Some(self.engine.network_name()),
            mesh_local_prefix: Some(self.engine.mesh_local_prefix()),
            master_key: Some(self.engine.master_key()),
            ..Default::default()
        }
    }

    fn push_network_parameters(&mut self, dataset: &OperationalDataset) -> Result<ChangedFlags, MeshError> {
        let mut changed = ChangedFlags::empty();

        if let Some(pan_id) = dataset.pan_id {
            if self.engine.pan_id() != pan_id {
                self.engine.set_pan_id(pan_id)?;
                changed.insert(ChangedFlags::PAN_ID);
            }
        }
        if let Some(channel) = dataset.channel {
            if self.engine.channel() != channel {
                self.engine.set_channel(channel)?;
                changed.insert(ChangedFlags::CHANNEL);
            }
        }
        if let Some(epid) = dataset.extended_pan_id {
            if self.engine.extended_pan_id() != epid {
                self.engine.set_extended_pan_id(epid);
                changed.insert(ChangedFlags::EXTENDED_PAN_ID);
            }
        }
        if let Some(name) = &dataset.network_name {
            if self.engine.network_name() != *name {
                self.engine.set_network_name(name.clone())?;
                changed.insert(ChangedFlags::NETWORK_NAME);
            }
        }
        if let Some(prefix) = dataset.mesh_local_prefix {
            if self.engine.mesh_local_prefix() != prefix {
                self.engine.set_mesh_local_prefix(prefix)?;
                changed.insert(ChangedFlags::MESH_LOCAL_PREFIX);
            }
        }
        if let Some(key) = dataset.master_key {
            if self.engine.master_key() != key {
                self.engine.set_master_key(key)?;
                changed.insert(ChangedFlags::MASTER_KEY);
            }
        }
        Ok(changed)
    }

    /// Persists one dataset. Failures are logged; the in-memory copy stays.
    fn persist_dataset(&mut self, kind: DatasetKind) {
        if let Err(e) = self.datasets.save(&mut self.settings, kind) {
            warn!("[SETTINGS] Failed to persist {:?} dataset: {}", kind, e);
        }
    }
}
