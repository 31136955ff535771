use super::Instance;
use crate::hal::{MeshEngine, MeshError, MleParameters, Platform, SettingsStore};
use crate::notifier::{CallbackContext, ChangedFlags};
use crate::role::{AttachFilter, DiscoverHandler, DiscoverRequest, NodeRole};
use crate::types::MAX_ROUTER_ID;
use log::{info, warn};

impl<E: MeshEngine, P: Platform, S: SettingsStore> Instance<E, P, S> {
    pub fn role(&self) -> NodeRole {
        self.role.role()
    }

    /// Brings the protocol up. The node is Detached on return; the attach
    /// outcome is reported later.
    ///
    /// Fails with `InvalidState` while the PAN ID is unset.
    pub fn thread_start(&mut self) -> Result<(), MeshError> {
        let changed = self.role.start(&mut self.engine)?;
        self.signal_role(changed);
        Ok(())
    }

    /// Stops the protocol and cancels any attach in progress. Always succeeds.
    pub fn thread_stop(&mut self) -> Result<(), MeshError> {
        let changed = self.role.stop(&mut self.engine);
        // A stopped engine never reports the end of a scan.
        self.discover_handler = None;
        self.signal_role(changed);
        Ok(())
    }

    pub fn become_detached(&mut self) -> Result<(), MeshError> {
        let changed = self.role.become_detached(&mut self.engine)?;
        self.signal_role(changed);
        Ok(())
    }

    /// Starts an attach attempt. The role changes when the engine reports.
    pub fn become_child(&mut self, filter: AttachFilter) -> Result<(), MeshError> {
        let changed = self.role.become_child(&mut self.engine, filter)?;
        self.signal_role(changed);
        Ok(())
    }

    /// Requests a router ID from a Child. Already routing is a no-op success.
    pub fn become_router(&mut self) -> Result<(), MeshError> {
        let changed = self.role.become_router(&mut self.engine)?;
        self.signal_role(changed);
        Ok(())
    }

    pub fn become_leader(&mut self) -> Result<(), MeshError> {
        let changed = self.role.become_leader(&mut self.engine)?;
        self.signal_role(changed);
        Ok(())
    }

    /// Releases a router ID from the partition (leader operation).
    pub fn release_router_id(&mut self, router_id: u8) -> Result<(), MeshError> {
        if router_id > MAX_ROUTER_ID {
            return Err(MeshError::InvalidArgs);
        }
        info!("[ROLE] Releasing router ID {}", router_id);
        self.engine.release_router_id(router_id)
    }

    pub fn is_singleton(&self) -> bool {
        self.engine.is_singleton()
    }

    // --- Discovery and polling ---

    /// Starts an MLE discovery scan.
    ///
    /// `handler` gets each response from `process_event`, then `None` when
    /// the scan is over. Only one scan runs at a time.
    pub fn discover(
        &mut self,
        request: DiscoverRequest,
        handler: DiscoverHandler,
        context: CallbackContext,
    ) -> Result<(), MeshError> {
        if self.role.role() == NodeRole::Disabled || self.is_discover_in_progress() {
            return Err(MeshError::InvalidState);
        }
        self.engine.discover(request)?;
        info!(
            "[ROLE] Discovery scan on mask {:#010x} (PAN ID {:#06x})",
            request.channel_mask(),
            request.pan_id
        );
        self.discover_handler = Some((handler, context));
        Ok(())
    }

    pub fn is_discover_in_progress(&self) -> bool {
        self.discover_handler.is_some() || self.engine.is_discover_in_progress()
    }

    /// Asks the parent for frames buffered for this node. Child only.
    pub fn send_mac_data_request(&mut self) -> Result<(), MeshError> {
        if self.role.role() != NodeRole::Child {
            return Err(MeshError::InvalidState);
        }
        self.engine.send_mac_data_request()
    }

    // --- Router and leader tunables ---

    pub fn is_router_role_enabled(&self) -> bool {
        self.engine.mle_parameters().router_role_enabled
    }

    pub fn set_router_role_enabled(&mut self, enabled: bool) -> Result<(), MeshError> {
        self.update_mle_parameters(|p| p.router_role_enabled = enabled)
    }

    pub fn local_leader_weight(&self) -> u8 {
        self.engine.mle_parameters().leader_weight
    }

    pub fn set_local_leader_weight(&mut self, weight: u8) -> Result<(), MeshError> {
        self.update_mle_parameters(|p| p.leader_weight = weight)
    }

    pub fn local_leader_partition_id(&self) -> u32 {
        self.engine.mle_parameters().leader_partition_id
    }

    /// Partition ID to use when this node next forms a partition.
    pub fn set_local_leader_partition_id(&mut self, partition_id: u32) -> Result<(), MeshError> {
        self.update_mle_parameters(|p| p.leader_partition_id = partition_id)
    }

    pub fn child_timeout(&self) -> u32 {
        self.engine.mle_parameters().child_timeout
    }

    pub fn set_child_timeout(&mut self, timeout_secs: u32) -> Result<(), MeshError> {
        self.update_mle_parameters(|p| p.child_timeout = timeout_secs)
    }

    pub fn network_id_timeout(&self) -> u8 {
        self.engine.mle_parameters().network_id_timeout
    }

    pub fn set_network_id_timeout(&mut self, timeout_secs: u8) -> Result<(), MeshError> {
        self.update_mle_parameters(|p| p.network_id_timeout = timeout_secs)
    }

    pub fn router_upgrade_threshold(&self) -> u8 {
        self.engine.mle_parameters().router_upgrade_threshold
    }

    pub fn set_router_upgrade_threshold(&mut self, threshold: u8) -> Result<(), MeshError> {
        self.update_mle_parameters(|p| p.router_upgrade_threshold = threshold)
    }

    pub fn router_downgrade_threshold(&self) -> u8 {
        self.engine.mle_parameters().router_downgrade_threshold
    }

    pub fn set_router_downgrade_threshold(&mut self, threshold: u8) -> Result<(), MeshError> {
        self.update_mle_parameters(|p| p.router_downgrade_threshold = threshold)
    }

    pub fn router_selection_jitter(&self) -> u8 {
        self.engine.mle_parameters().router_selection_jitter
    }

    pub fn set_router_selection_jitter(&mut self, jitter_secs: u8) -> Result<(), MeshError> {
        self.update_mle_parameters(|p| p.router_selection_jitter = jitter_secs)
    }

    /// Router ID to request when upgrading to Router.
    pub fn set_preferred_router_id(&mut self, router_id: u8) -> Result<(), MeshError> {
        if router_id > MAX_ROUTER_ID {
            return Err(MeshError::InvalidArgs);
        }
        self.update_mle_parameters(|p| p.preferred_router_id = Some(router_id))
    }

    pub fn max_allowed_children(&self) -> u8 {
        self.engine.max_children()
    }

    pub fn set_max_allowed_children(&mut self, max_children: u8) -> Result<(), MeshError> {
        self.engine.set_max_children(max_children)
    }

    fn update_mle_parameters<F>(&mut self, update: F) -> Result<(), MeshError>
    where
        F: FnOnce(&mut MleParameters),
    {
        let mut params = self.engine.mle_parameters();
        update(&mut params);
        self.engine
            .set_mle_parameters(params)
            .inspect_err(|e| warn!("[ROLE] Engine refused MLE parameters: {}", e))
    }

    fn signal_role(&mut self, changed: bool) {
        if changed {
            self.notifier.signal(ChangedFlags::ROLE);
        }
    }
}
