use log::{debug, info};
use meshnode_rs::dataset::{DatasetKind, tlv};
use meshnode_rs::hal::MleParameters;
use meshnode_rs::role::DiscoverRequest;
use meshnode_rs::role::topology::{
    AttachFilter, ChildEntry, LeaderData, NeighborEntry, RouterEntry, RouterUpgradeReason,
};
use meshnode_rs::types::{PAN_ID_BROADCAST, Rloc16};
use meshnode_rs::{
    DeviceMode, EngineEvent, ExtendedPanId, Ip6Address, MasterKey, MeshEngine, MeshError,
    MeshLocalPrefix, NetworkName, NodeRole, PanId,
};
use std::collections::VecDeque;

/// RLOC16 of a node that has no address yet.
const INVALID_RLOC16: Rloc16 = 0xfffe;

/// Interface identifier of the mesh-local EID.
const ML_EID_IID: [u8; 8] = [0x02, 0x00, 0x5e, 0xff, 0xfe, 0x00, 0x00, 0x01];

/// A protocol engine for a node alone on its network.
///
/// There is no radio: every attach attempt finds no parent, so the node
/// forms its own partition and leads it. Management requests are answered
/// locally, as the leader would. Outcomes are queued and must be fed back
/// into the node with `Instance::process_event`.
pub struct LoopbackEngine {
    events: VecDeque<EngineEvent>,
    running: bool,
    role: NodeRole,
    partition_id: u32,

    pan_id: PanId,
    channel: u16,
    extended_pan_id: ExtendedPanId,
    network_name: NetworkName,
    mesh_local_prefix: MeshLocalPrefix,
    master_key: MasterKey,
    device_mode: DeviceMode,
    key_sequence: u32,
    mle: MleParameters,
    joiner_udp_port: u16,
    context_id_reuse_delay: u32,
    max_children: u8,
    router_id_sequence: u8,
}

impl Default for LoopbackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackEngine {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            running: false,
            role: NodeRole::Disabled,
            partition_id: 0,
            pan_id: PAN_ID_BROADCAST,
            channel: 11,
            extended_pan_id: ExtendedPanId::default(),
            network_name: NetworkName::default(),
            mesh_local_prefix: MeshLocalPrefix::default(),
            master_key: MasterKey::default(),
            device_mode: DeviceMode::RX_ON_WHEN_IDLE
                | DeviceMode::SECURE_DATA_REQUESTS
                | DeviceMode::FULL_FUNCTION_DEVICE
                | DeviceMode::FULL_NETWORK_DATA,
            key_sequence: 0,
            mle: MleParameters::default(),
            joiner_udp_port: 1000,
            context_id_reuse_delay: 48 * 60 * 60,
            max_children: 10,
            router_id_sequence: 0,
        }
    }

    /// Takes the next queued outcome.
    pub fn poll_event(&mut self) -> Option<EngineEvent> {
        self.events.pop_front()
    }

    pub fn key_sequence(&self) -> u32 {
        self.key_sequence
    }

    fn router_id(&self) -> u8 {
        self.mle.preferred_router_id.unwrap_or(0)
    }

    fn report_role(&mut self, role: NodeRole) {
        self.role = role;
        self.events.push_back(EngineEvent::RoleChanged(role));
    }

    fn form_partition(&mut self) {
        let partition_id = match self.mle.leader_partition_id {
            0 => 0x0000_0001,
            id => id,
        };
        if partition_id != self.partition_id {
            self.partition_id = partition_id;
            self.events
                .push_back(EngineEvent::PartitionIdChanged(partition_id));
        }
        self.router_id_sequence = self.router_id_sequence.wrapping_add(1);
        info!("[NODE] Loopback partition {:#010x} formed", partition_id);
        self.report_role(NodeRole::Leader);
    }

    fn require_running(&self) -> Result<(), MeshError> {
        if self.running {
            Ok(())
        } else {
            Err(MeshError::InvalidState)
        }
    }
}

impl MeshEngine for LoopbackEngine {
    fn start(&mut self) -> Result<(), MeshError> {
        self.running = true;
        self.role = NodeRole::Detached;
        // No parent responds, so the attach ends in a new partition.
        if self.mle.router_role_enabled {
            self.form_partition();
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
        self.role = NodeRole::Disabled;
        self.events.clear();
    }

    fn become_detached(&mut self) -> Result<(), MeshError> {
        self.require_running()?;
        self.role = NodeRole::Detached;
        Ok(())
    }

    fn become_child(&mut self, filter: AttachFilter) -> Result<(), MeshError> {
        self.require_running()?;
        debug!("[NODE] Loopback attach ({:?}): no parent found", filter);
        if self.role == NodeRole::Detached && self.mle.router_role_enabled {
            self.form_partition();
        }
        Ok(())
    }

    fn become_router(&mut self, reason: RouterUpgradeReason) -> Result<(), MeshError> {
        self.require_running()?;
        debug!("[NODE] Loopback router upgrade ({:?})", reason);
        if !self.mle.router_role_enabled {
            return Err(MeshError::InvalidState);
        }
        self.report_role(NodeRole::Router);
        Ok(())
    }

    fn become_leader(&mut self) -> Result<(), MeshError> {
        self.require_running()?;
        self.form_partition();
        Ok(())
    }

    fn release_router_id(&mut self, router_id: u8) -> Result<(), MeshError> {
        if self.role != NodeRole::Leader {
            return Err(MeshError::InvalidState);
        }
        if router_id == self.router_id() {
            return Err(MeshError::InvalidArgs);
        }
        self.router_id_sequence = self.router_id_sequence.wrapping_add(1);
        Ok(())
    }

    fn pan_id(&self) -> PanId {
        self.pan_id
    }

    fn set_pan_id(&mut self, pan_id: PanId) -> Result<(), MeshError> {
        self.pan_id = pan_id;
        Ok(())
    }

    fn channel(&self) -> u16 {
        self.channel
    }

    fn set_channel(&mut self, channel: u16) -> Result<(), MeshError> {
        if !(11..=26).contains(&channel) {
            return Err(MeshError::InvalidArgs);
        }
        self.channel = channel;
        Ok(())
    }

    fn extended_pan_id(&self) -> ExtendedPanId {
        self.extended_pan_id
    }

    fn set_extended_pan_id(&mut self, ext_pan_id: ExtendedPanId) {
        self.extended_pan_id = ext_pan_id;
    }

    fn network_name(&self) -> NetworkName {
        self.network_name.clone()
    }

    fn set_network_name(&mut self, name: NetworkName) -> Result<(), MeshError> {
        self.network_name = name;
        Ok(())
    }

    fn mesh_local_prefix(&self) -> MeshLocalPrefix {
        self.mesh_local_prefix
    }

    fn set_mesh_local_prefix(&mut self, prefix: MeshLocalPrefix) -> Result<(), MeshError> {
        self.mesh_local_prefix = prefix;
        Ok(())
    }

    fn master_key(&self) -> MasterKey {
        self.master_key
    }

    fn set_master_key(&mut self, key: MasterKey) -> Result<(), MeshError> {
        self.master_key = key;
        Ok(())
    }

    fn device_mode(&self) -> DeviceMode {
        self.device_mode
    }

    fn set_device_mode(&mut self, mode: DeviceMode) -> Result<(), MeshError> {
        self.device_mode = mode;
        Ok(())
    }

    fn set_key_sequence(&mut self, key_sequence: u32) {
        self.key_sequence = key_sequence;
    }

    fn mle_parameters(&self) -> MleParameters {
        self.mle
    }

    fn set_mle_parameters(&mut self, params: MleParameters) -> Result<(), MeshError> {
        self.mle = params;
        Ok(())
    }

    fn joiner_udp_port(&self) -> u16 {
        self.joiner_udp_port
    }

    fn set_joiner_udp_port(&mut self, port: u16) -> Result<(), MeshError> {
        if port == 0 {
            return Err(MeshError::InvalidArgs);
        }
        self.joiner_udp_port = port;
        Ok(())
    }

    fn context_id_reuse_delay(&self) -> u32 {
        self.context_id_reuse_delay
    }

    fn set_context_id_reuse_delay(&mut self, delay_secs: u32) {
        self.context_id_reuse_delay = delay_secs;
    }

    fn mesh_local_eid(&self) -> Ip6Address {
        let mut addr = [0u8; 16];
        addr[..8].copy_from_slice(&self.mesh_local_prefix.0);
        addr[8..].copy_from_slice(&ML_EID_IID);
        Ip6Address(addr)
    }

    fn discover(&mut self, request: DiscoverRequest) -> Result<(), MeshError> {
        self.require_running()?;
        // Nobody else is on the air, so the scan ends without responses.
        debug!(
            "[ROLE] Loopback discovery on mask {:#010x}: no responses",
            request.channel_mask()
        );
        self.events.push_back(EngineEvent::DiscoverDone);
        Ok(())
    }

    fn is_discover_in_progress(&self) -> bool {
        self.events.contains(&EngineEvent::DiscoverDone)
    }

    fn send_mac_data_request(&mut self) -> Result<(), MeshError> {
        // Never a child, so there is no parent to poll.
        Err(MeshError::InvalidState)
    }

    fn rloc16(&self) -> Rloc16 {
        match self.role {
            NodeRole::Router | NodeRole::Leader => u16::from(self.router_id()) << 10,
            _ => INVALID_RLOC16,
        }
    }

    fn router_id_sequence(&self) -> u8 {
        self.router_id_sequence
    }

    fn is_singleton(&self) -> bool {
        true
    }

    fn parent(&self) -> Option<RouterEntry> {
        None
    }

    fn max_children(&self) -> u8 {
        self.max_children
    }

    fn set_max_children(&mut self, max_children: u8) -> Result<(), MeshError> {
        if max_children == 0 {
            return Err(MeshError::InvalidArgs);
        }
        self.max_children = max_children;
        Ok(())
    }

    fn child(&self, _index: u8) -> Option<ChildEntry> {
        None
    }

    fn router(&self, router_id: u8) -> Option<RouterEntry> {
        if self.role == NodeRole::Leader && router_id == self.router_id() {
            Some(RouterEntry {
                rloc16: self.rloc16(),
                next_hop: router_id,
                allocated: true,
                ..Default::default()
            })
        } else {
            None
        }
    }

    fn neighbor(&self, _index: u16) -> Option<NeighborEntry> {
        None
    }

    fn leader_data(&self) -> Option<LeaderData> {
        (self.role == NodeRole::Leader).then(|| LeaderData {
            partition_id: self.partition_id,
            weighting: self.mle.leader_weight,
            data_version: 0,
            stable_data_version: 0,
            leader_router_id: self.router_id(),
        })
    }

    fn leader_rloc(&self) -> Option<Ip6Address> {
        if self.role != NodeRole::Leader {
            return None;
        }
        // <mesh-local prefix>:0:ff:fe00:<rloc16>
        let mut addr = [0u8; 16];
        addr[..8].copy_from_slice(&self.mesh_local_prefix.0);
        addr[11] = 0xff;
        addr[12] = 0xfe;
        addr[14..].copy_from_slice(&self.rloc16().to_be_bytes());
        Some(Ip6Address(addr))
    }

    fn send_dataset_get(
        &mut self,
        kind: DatasetKind,
        tlv_types: &[u8],
        destination: Ip6Address,
    ) -> Result<(), MeshError> {
        self.require_running()?;
        debug!(
            "[DATASET] Loopback {:?} get for {} types to {:02x?}",
            kind,
            tlv_types.len(),
            destination.0
        );
        Ok(())
    }

    fn send_dataset_set(&mut self, kind: DatasetKind, tlvs: &[u8]) -> Result<(), MeshError> {
        self.require_running()?;
        // Acting as our own leader: accept and distribute the proposal.
        let dataset = tlv::decode(tlvs)?;
        let event = match kind {
            DatasetKind::Active => EngineEvent::ActiveDatasetReceived(dataset),
            DatasetKind::Pending => EngineEvent::PendingDatasetReceived(dataset),
        };
        self.events.push_back(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_forms_partition() {
        let mut engine = LoopbackEngine::new();
        engine.start().unwrap();
        assert_eq!(
            engine.poll_event(),
            Some(EngineEvent::PartitionIdChanged(1))
        );
        assert_eq!(
            engine.poll_event(),
            Some(EngineEvent::RoleChanged(NodeRole::Leader))
        );
        assert_eq!(engine.poll_event(), None);
        assert_eq!(engine.rloc16(), 0x0000);
        assert!(engine.leader_data().is_some());
    }

    #[test]
    fn test_requests_need_running_engine() {
        let mut engine = LoopbackEngine::new();
        assert_eq!(engine.become_leader(), Err(MeshError::InvalidState));
        assert_eq!(
            engine.send_dataset_set(DatasetKind::Active, &[]),
            Err(MeshError::InvalidState)
        );
    }

    #[test]
    fn test_discovery_finishes_without_responses() {
        let mut engine = LoopbackEngine::new();
        assert_eq!(
            engine.discover(DiscoverRequest::default()),
            Err(MeshError::InvalidState)
        );

        engine.mle.router_role_enabled = false;
        engine.start().unwrap();
        engine.discover(DiscoverRequest::default()).unwrap();
        assert!(engine.is_discover_in_progress());
        assert_eq!(engine.poll_event(), Some(EngineEvent::DiscoverDone));
        assert!(!engine.is_discover_in_progress());
    }

    #[test]
    fn test_mesh_local_eid_uses_prefix() {
        let mut engine = LoopbackEngine::new();
        engine
            .set_mesh_local_prefix(MeshLocalPrefix([0xfd, 1, 2, 3, 4, 5, 0, 0]))
            .unwrap();
        let eid = engine.mesh_local_eid();
        assert_eq!(eid.0[..8], [0xfd, 1, 2, 3, 4, 5, 0, 0]);
        assert_eq!(eid.0[8..], ML_EID_IID);
    }

    #[test]
    fn test_router_role_disabled_stays_detached() {
        let mut engine = LoopbackEngine::new();
        engine.mle.router_role_enabled = false;
        engine.start().unwrap();
        assert_eq!(engine.poll_event(), None);
        assert_eq!(
            engine.become_router(RouterUpgradeReason::HaveChildIdRequest),
            Err(MeshError::InvalidState)
        );
    }
}
