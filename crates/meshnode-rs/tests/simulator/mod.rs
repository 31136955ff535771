// crates/meshnode-rs/tests/simulator/mod.rs
#![allow(dead_code)]

use meshnode_rs::dataset::DatasetKind;
use meshnode_rs::hal::MleParameters;
use meshnode_rs::role::DiscoverRequest;
use meshnode_rs::role::topology::{
    AttachFilter, ChildEntry, LeaderData, NeighborEntry, RouterEntry, RouterUpgradeReason,
};
use meshnode_rs::types::{PAN_ID_BROADCAST, Rloc16};
use meshnode_rs::{
    DeviceMode, ExtendedPanId, Ip6Address, MasterKey, MeshEngine, MeshError, MeshLocalPrefix,
    NetworkName, NodeConfig, PanId, Platform, SettingsStore,
};
use meshnode_rs::Instance;
use std::collections::BTreeMap;

/// One request the control plane made to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Start,
    Stop,
    BecomeDetached,
    BecomeChild(AttachFilter),
    BecomeRouter(RouterUpgradeReason),
    BecomeLeader,
    ReleaseRouterId(u8),
    SetKeySequence(u32),
    DatasetGet {
        kind: DatasetKind,
        tlv_types: Vec<u8>,
        destination: Ip6Address,
    },
    DatasetSet {
        kind: DatasetKind,
        tlvs: Vec<u8>,
    },
    Discover(DiscoverRequest),
    MacDataRequest,
}

/// A protocol engine that records requests and serves canned topology.
pub struct SimulatedEngine {
    pub calls: Vec<EngineCall>,
    /// When set, every fallible role request fails with this error.
    pub refuse_with: Option<MeshError>,

    pub pan_id: PanId,
    pub channel: u16,
    pub extended_pan_id: ExtendedPanId,
    pub network_name: NetworkName,
    pub mesh_local_prefix: MeshLocalPrefix,
    pub master_key: MasterKey,
    pub device_mode: DeviceMode,
    pub key_sequence: u32,
    pub mle: MleParameters,
    pub joiner_udp_port: u16,
    pub context_id_reuse_delay: u32,
    pub mesh_local_eid: Ip6Address,
    pub discovering: bool,

    pub rloc16: Rloc16,
    pub router_id_sequence: u8,
    pub singleton: bool,
    pub parent: Option<RouterEntry>,
    pub max_children: u8,
    pub children: BTreeMap<u8, ChildEntry>,
    pub routers: BTreeMap<u8, RouterEntry>,
    pub neighbors: Vec<NeighborEntry>,
    pub leader_data: Option<LeaderData>,
    pub leader_rloc: Option<Ip6Address>,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            refuse_with: None,
            pan_id: PAN_ID_BROADCAST,
            channel: 11,
            extended_pan_id: ExtendedPanId::default(),
            network_name: NetworkName::default(),
            mesh_local_prefix: MeshLocalPrefix::default(),
            master_key: MasterKey::default(),
            device_mode: DeviceMode::empty(),
            key_sequence: 0,
            mle: MleParameters::default(),
            joiner_udp_port: 1000,
            context_id_reuse_delay: 48 * 60 * 60,
            mesh_local_eid: Ip6Address::default(),
            discovering: false,
            rloc16: 0xfffe,
            router_id_sequence: 0,
            singleton: true,
            parent: None,
            max_children: 10,
            children: BTreeMap::new(),
            routers: BTreeMap::new(),
            neighbors: Vec::new(),
            leader_data: None,
            leader_rloc: None,
        }
    }

    /// Same as `new`, with a PAN ID so the node may start.
    pub fn configured() -> Self {
        Self {
            pan_id: 0xface,
            ..Self::new()
        }
    }

    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    fn request(&mut self, call: EngineCall) -> Result<(), MeshError> {
        self.calls.push(call);
        match self.refuse_with {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl MeshEngine for SimulatedEngine {
    fn start(&mut self) -> Result<(), MeshError> {
        self.request(EngineCall::Start)
    }

    fn stop(&mut self) {
        self.calls.push(EngineCall::Stop);
    }

    fn become_detached(&mut self) -> Result<(), MeshError> {
        self.request(EngineCall::BecomeDetached)
    }

    fn become_child(&mut self, filter: AttachFilter) -> Result<(), MeshError> {
        self.request(EngineCall::BecomeChild(filter))
    }

    fn become_router(&mut self, reason: RouterUpgradeReason) -> Result<(), MeshError> {
        self.request(EngineCall::BecomeRouter(reason))
    }

    fn become_leader(&mut self) -> Result<(), MeshError> {
        self.request(EngineCall::BecomeLeader)
    }

    fn release_router_id(&mut self, router_id: u8) -> Result<(), MeshError> {
        self.request(EngineCall::ReleaseRouterId(router_id))
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
        self.calls.push(EngineCall::SetKeySequence(key_sequence));
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
        self.mesh_local_eid
    }

    fn discover(&mut self, request: DiscoverRequest) -> Result<(), MeshError> {
        self.request(EngineCall::Discover(request))?;
        self.discovering = true;
        Ok(())
    }
    fn is_discover_in_progress(&self) -> bool {
        self.discovering
    }
    fn send_mac_data_request(&mut self) -> Result<(), MeshError> {
        self.request(EngineCall::MacDataRequest)
    }

    fn rloc16(&self) -> Rloc16 {
        self.rloc16
    }
    fn router_id_sequence(&self) -> u8 {
        self.router_id_sequence
    }
    fn is_singleton(&self) -> bool {
        self.singleton
    }
    fn parent(&self) -> Option<RouterEntry> {
        self.parent
    }
    fn max_children(&self) -> u8 {
        self.max_children
    }
    fn set_max_children(&mut self, max_children: u8) -> Result<(), MeshError> {
        self.max_children = max_children;
        Ok(())
    }
    fn child(&self, index: u8) -> Option<ChildEntry> {
        self.children.get(&index).copied()
    }
    fn router(&self, router_id: u8) -> Option<RouterEntry> {
        self.routers.get(&router_id).copied()
    }
    fn neighbor(&self, index: u16) -> Option<NeighborEntry> {
        self.neighbors.get(usize::from(index)).copied()
    }
    fn leader_data(&self) -> Option<LeaderData> {
        self.leader_data
    }
    fn leader_rloc(&self) -> Option<Ip6Address> {
        self.leader_rloc
    }

    fn send_dataset_get(
        &mut self,
        kind: DatasetKind,
        tlv_types: &[u8],
        destination: Ip6Address,
    ) -> Result<(), MeshError> {
        self.calls.push(EngineCall::DatasetGet {
            kind,
            tlv_types: tlv_types.to_vec(),
            destination,
        });
        Ok(())
    }

    fn send_dataset_set(&mut self, kind: DatasetKind, tlvs: &[u8]) -> Result<(), MeshError> {
        self.calls.push(EngineCall::DatasetSet {
            kind,
            tlvs: tlvs.to_vec(),
        });
        Ok(())
    }
}

/// A hand-driven clock.
pub struct ManualPlatform {
    pub now_ms: u64,
    pub noise_floor: i8,
    pub resets: usize,
}

impl ManualPlatform {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            noise_floor: -100,
            resets: 0,
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Platform for ManualPlatform {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
    fn noise_floor(&self) -> i8 {
        self.noise_floor
    }
    fn reset(&mut self) {
        self.resets += 1;
    }
}

/// Settings kept in a map.
#[derive(Default, Clone)]
pub struct MemorySettings {
    pub map: BTreeMap<u16, Vec<u8>>,
    pub init_calls: usize,
    pub wipes: usize,
}

impl SettingsStore for MemorySettings {
    fn init(&mut self) -> Result<(), MeshError> {
        self.init_calls += 1;
        Ok(())
    }
    fn wipe(&mut self) -> Result<(), MeshError> {
        self.wipes += 1;
        self.map.clear();
        Ok(())
    }
    fn get(&mut self, key: u16) -> Result<Vec<u8>, MeshError> {
        self.map.get(&key).cloned().ok_or(MeshError::NotFound)
    }
    fn set(&mut self, key: u16, value: &[u8]) -> Result<(), MeshError> {
        self.map.insert(key, value.to_vec());
        Ok(())
    }
    fn delete(&mut self, key: u16) -> Result<(), MeshError> {
        self.map.remove(&key);
        Ok(())
    }
}

pub type TestNode = Instance<SimulatedEngine, ManualPlatform, MemorySettings>;

/// Initialises logging once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A node whose PAN ID is configured, so it may start.
pub fn configured_node() -> TestNode {
    init_logging();
    node_with(SimulatedEngine::configured(), MemorySettings::default())
}

pub fn node_with(engine: SimulatedEngine, settings: MemorySettings) -> TestNode {
    Instance::new(engine, ManualPlatform::new(), settings, NodeConfig::default())
        .expect("node construction")
}
