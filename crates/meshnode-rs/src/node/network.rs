use super::Instance;
use crate::hal::{MeshEngine, MeshError, Platform, SettingsStore};
use crate::link_mode::LinkModeConfig;
use crate::notifier::ChangedFlags;
use crate::types::{ExtendedPanId, Ip6Address, MasterKey, MeshLocalPrefix, NetworkName, PanId};
use log::{debug, info};

impl<E: MeshEngine, P: Platform, S: SettingsStore> Instance<E, P, S> {
    pub fn pan_id(&self) -> PanId {
        self.engine.pan_id()
    }

    pub fn set_pan_id(&mut self, pan_id: PanId) -> Result<(), MeshError> {
        self.engine.set_pan_id(pan_id)?;
        debug!("[NODE] PAN ID set to {:#06x}", pan_id);
        self.notifier.signal(ChangedFlags::PAN_ID);
        Ok(())
    }

    pub fn channel(&self) -> u16 {
        self.engine.channel()
    }

    pub fn set_channel(&mut self, channel: u16) -> Result<(), MeshError> {
        self.engine.set_channel(channel)?;
        self.notifier.signal(ChangedFlags::CHANNEL);
        Ok(())
    }

    pub fn extended_pan_id(&self) -> ExtendedPanId {
        self.engine.extended_pan_id()
    }

    /// Sets the extended PAN ID and the mesh-local prefix derived from it.
    pub fn set_extended_pan_id(&mut self, ext_pan_id: ExtendedPanId) -> Result<(), MeshError> {
        self.engine.set_extended_pan_id(ext_pan_id);
        let prefix = MeshLocalPrefix::from_extended_pan_id(&ext_pan_id);
        self.engine.set_mesh_local_prefix(prefix)?;
        debug!("[NODE] Extended PAN ID set, mesh-local prefix {:02x?}", prefix.0);
        self.notifier
            .signal(ChangedFlags::EXTENDED_PAN_ID | ChangedFlags::MESH_LOCAL_PREFIX);
        Ok(())
    }

    pub fn network_name(&self) -> NetworkName {
        self.engine.network_name()
    }

    /// Sets the network name. Names over 16 bytes are `InvalidArgs`.
    pub fn set_network_name(&mut self, name: &str) -> Result<(), MeshError> {
        let name = NetworkName::try_from(name)?;
        self.engine.set_network_name(name)?;
        self.notifier.signal(ChangedFlags::NETWORK_NAME);
        Ok(())
    }

    pub fn mesh_local_prefix(&self) -> MeshLocalPrefix {
        self.engine.mesh_local_prefix()
    }

    pub fn set_mesh_local_prefix(&mut self, prefix: MeshLocalPrefix) -> Result<(), MeshError> {
        self.engine.set_mesh_local_prefix(prefix)?;
        self.notifier.signal(ChangedFlags::MESH_LOCAL_PREFIX);
        Ok(())
    }

    pub fn master_key(&self) -> MasterKey {
        self.engine.master_key()
    }

    pub fn set_master_key(&mut self, key: MasterKey) -> Result<(), MeshError> {
        self.engine.set_master_key(key)?;
        info!("[KEY] Master key replaced");
        self.notifier.signal(ChangedFlags::MASTER_KEY);
        Ok(())
    }

    /// The mesh-local EID: the node's stable address under the mesh-local prefix.
    pub fn mesh_local_eid(&self) -> Ip6Address {
        self.engine.mesh_local_eid()
    }

    pub fn joiner_udp_port(&self) -> u16 {
        self.engine.joiner_udp_port()
    }

    pub fn set_joiner_udp_port(&mut self, port: u16) -> Result<(), MeshError> {
        self.engine.set_joiner_udp_port(port)?;
        debug!("[NODE] Joiner UDP port set to {}", port);
        Ok(())
    }

    /// Context ID reuse delay in seconds.
    pub fn context_id_reuse_delay(&self) -> u32 {
        self.engine.context_id_reuse_delay()
    }

    pub fn set_context_id_reuse_delay(&mut self, delay_secs: u32) {
        self.engine.set_context_id_reuse_delay(delay_secs);
    }

    pub fn link_mode(&self) -> LinkModeConfig {
        LinkModeConfig::from_mode(self.engine.device_mode())
    }

    pub fn set_link_mode(&mut self, config: LinkModeConfig) -> Result<(), MeshError> {
        let mode = config.to_mode();
        self.engine.set_device_mode(mode)?;
        debug!("[NODE] Link mode set to {:#04x}", mode.bits());
        self.notifier.signal(ChangedFlags::LINK_MODE);
        Ok(())
    }

    // --- Key rotation ---

    pub fn key_sequence_counter(&self) -> u32 {
        self.keys.key_sequence()
    }

    /// Operator override of the key sequence. Always honoured.
    pub fn set_key_sequence_counter(&mut self, key_sequence: u32) {
        let now = self.now_ms();
        self.keys.set_key_sequence(key_sequence, now);
        self.engine.set_key_sequence(key_sequence);
        self.notifier.signal(ChangedFlags::KEY_SEQUENCE);
    }

    /// Key switch guard time in hours.
    pub fn key_switch_guard_time(&self) -> u32 {
        self.keys.guard_time()
    }

    /// Zero disables the guard.
    pub fn set_key_switch_guard_time(&mut self, hours: u32) {
        self.keys.set_guard_time(hours);
    }
}
