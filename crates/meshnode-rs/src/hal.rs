use crate::dataset::DatasetKind;
use crate::link_mode::DeviceMode;
use crate::role::discover::DiscoverRequest;
use crate::role::topology::{
    AttachFilter, ChildEntry, LeaderData, NeighborEntry, RouterEntry, RouterUpgradeReason,
};
use crate::types::{
    ExtendedPanId, Ip6Address, MasterKey, MeshLocalPrefix, NetworkName, NetworkNameError, PanId,
    Rloc16,
};
use alloc::vec::Vec;
use core::fmt;

/// Result codes of the mesh control plane. Success is `Ok(..)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    /// A required argument is missing or out of range.
    InvalidArgs,
    /// The operation is illegal in the node's current role or state.
    InvalidState,
    /// A bounded resource (e.g. the callback table) is full.
    NoBufs,
    /// The requested value is genuinely unavailable (e.g. no RSS sample yet).
    Failed,
    /// The feature was compiled out of this build.
    NotImplemented,
    /// The requested entry does not exist, or an iteration is exhausted.
    NotFound,
    /// A TLV or settings blob could not be parsed.
    Parse(&'static str),
    /// An error occurred in the settings backend.
    Storage(&'static str),
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgs => write!(f, "Invalid arguments"),
            Self::InvalidState => write!(f, "Operation not allowed in the current state"),
            Self::NoBufs => write!(f, "Insufficient buffers"),
            Self::Failed => write!(f, "Operation failed"),
            Self::NotImplemented => write!(f, "Feature not implemented in this build"),
            Self::NotFound => write!(f, "Entry not found"),
            Self::Parse(s) => write!(f, "Parse error: {}", s),
            Self::Storage(s) => write!(f, "Storage error: {}", s),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MeshError {}

// --- From Implementations for Error Conversion ---

impl From<NetworkNameError> for MeshError {
    fn from(_: NetworkNameError) -> Self {
        MeshError::InvalidArgs
    }
}

/// A trait abstracting the non-volatile settings store.
///
/// The store is an opaque map of small integer keys to small blobs.
/// It is loaded once at node construction and wiped on factory reset.
pub trait SettingsStore {
    /// Prepares the store for use. Called once from `Instance::new`.
    fn init(&mut self) -> Result<(), MeshError>;

    /// Erases every stored key.
    fn wipe(&mut self) -> Result<(), MeshError>;

    /// Reads the blob stored under `key`. Returns `NotFound` if the key is absent.
    fn get(&mut self, key: u16) -> Result<Vec<u8>, MeshError>;

    /// Stores `value` under `key`, replacing any previous blob.
    fn set(&mut self, key: u16, value: &[u8]) -> Result<(), MeshError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: u16) -> Result<(), MeshError>;
}

/// Platform services: a monotonic clock, the radio noise floor and reset.
pub trait Platform {
    /// Monotonic time in milliseconds.
    fn now_ms(&self) -> u64;

    /// Current noise floor of the radio in dBm.
    fn noise_floor(&self) -> i8;

    /// Requests a platform reset. On real hardware this does not return.
    fn reset(&mut self);
}

/// The protocol engine behind the control plane: attach and MLE handling,
/// the MAC parameters, the key manager and the management (MGMT) client.
///
/// Requests made through this trait complete asynchronously. Their outcome
/// is reported back through `Instance::process_event`.
pub trait MeshEngine {
    // --- Attach / Role ---

    /// Brings the protocol up and starts the attach process.
    fn start(&mut self) -> Result<(), MeshError>;

    /// Stops all protocol operation. Cancels any attach in progress.
    fn stop(&mut self);

    /// Drops the current attachment.
    fn become_detached(&mut self) -> Result<(), MeshError>;

    /// Tries to (re-)attach as a child using the given parent filter.
    fn become_child(&mut self, filter: AttachFilter) -> Result<(), MeshError>;

    /// Requests a router ID from the leader.
    fn become_router(&mut self, reason: RouterUpgradeReason) -> Result<(), MeshError>;

    /// Starts a new partition with this node as leader.
    fn become_leader(&mut self) -> Result<(), MeshError>;

    /// Releases a router ID (leader only).
    fn release_router_id(&mut self, router_id: u8) -> Result<(), MeshError>;

    // --- MAC / MLE / Key Manager Parameters ---

    fn pan_id(&self) -> PanId;
    fn set_pan_id(&mut self, pan_id: PanId) -> Result<(), MeshError>;
    fn channel(&self) -> u16;
    fn set_channel(&mut self, channel: u16) -> Result<(), MeshError>;
    fn extended_pan_id(&self) -> ExtendedPanId;
    fn set_extended_pan_id(&mut self, ext_pan_id: ExtendedPanId);
    fn network_name(&self) -> NetworkName;
    fn set_network_name(&mut self, name: NetworkName) -> Result<(), MeshError>;
    fn mesh_local_prefix(&self) -> MeshLocalPrefix;
    fn set_mesh_local_prefix(&mut self, prefix: MeshLocalPrefix) -> Result<(), MeshError>;
    fn master_key(&self) -> MasterKey;
    fn set_master_key(&mut self, key: MasterKey) -> Result<(), MeshError>;
    fn device_mode(&self) -> DeviceMode;
    fn set_device_mode(&mut self, mode: DeviceMode) -> Result<(), MeshError>;

    /// Installs a new key sequence in the key manager (re-derives MAC/MLE keys).
    fn set_key_sequence(&mut self, key_sequence: u32);

    /// Router and leader tunables.
    fn mle_parameters(&self) -> MleParameters;
    fn set_mle_parameters(&mut self, params: MleParameters) -> Result<(), MeshError>;

    /// UDP port the joiner router relays joiner traffic on.
    fn joiner_udp_port(&self) -> u16;
    fn set_joiner_udp_port(&mut self, port: u16) -> Result<(), MeshError>;

    /// Seconds the network-data leader waits before reusing a released
    /// 6LoWPAN context ID.
    fn context_id_reuse_delay(&self) -> u32;
    fn set_context_id_reuse_delay(&mut self, delay_secs: u32);

    /// The mesh-local endpoint identifier (ML-EID) of this node.
    fn mesh_local_eid(&self) -> Ip6Address;

    // --- Discovery and polling ---

    /// Starts an MLE discovery scan. Each response and the end of the scan
    /// are reported as engine events.
    fn discover(&mut self, request: DiscoverRequest) -> Result<(), MeshError>;
    fn is_discover_in_progress(&self) -> bool;

    /// Polls the parent for buffered frames with a MAC Data Request.
    fn send_mac_data_request(&mut self) -> Result<(), MeshError>;

    // --- Topology ---

    fn rloc16(&self) -> Rloc16;
    fn router_id_sequence(&self) -> u8;

    /// True if this node is the only router in its partition.
    fn is_singleton(&self) -> bool;

    /// The current parent, if attached as a child.
    fn parent(&self) -> Option<RouterEntry>;

    fn max_children(&self) -> u8;
    fn set_max_children(&mut self, max_children: u8) -> Result<(), MeshError>;

    /// The child table slot at `index`, if occupied.
    fn child(&self, index: u8) -> Option<ChildEntry>;

    /// The router table entry for `router_id`, if allocated.
    fn router(&self, router_id: u8) -> Option<RouterEntry>;

    /// The neighbor table entry at `index` in table order.
    fn neighbor(&self, index: u16) -> Option<NeighborEntry>;

    fn leader_data(&self) -> Option<LeaderData>;
    fn leader_rloc(&self) -> Option<Ip6Address>;

    // --- Management Client ---

    /// Sends a MGMT_*_GET.req for the given TLV types.
    fn send_dataset_get(
        &mut self,
        kind: DatasetKind,
        tlv_types: &[u8],
        destination: Ip6Address,
    ) -> Result<(), MeshError>;

    /// Sends a MGMT_*_SET.req carrying the given TLVs to the leader.
    fn send_dataset_set(&mut self, kind: DatasetKind, tlvs: &[u8]) -> Result<(), MeshError>;
}

/// Router and leader tunables held by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MleParameters {
    pub router_role_enabled: bool,
    pub leader_weight: u8,
    pub leader_partition_id: u32,
    /// Child timeout in seconds.
    pub child_timeout: u32,
    /// Network ID timeout in seconds.
    pub network_id_timeout: u8,
    pub router_upgrade_threshold: u8,
    pub router_downgrade_threshold: u8,
    /// Router selection jitter in seconds.
    pub router_selection_jitter: u8,
    pub preferred_router_id: Option<u8>,
}

impl Default for MleParameters {
    fn default() -> Self {
        Self {
            router_role_enabled: true,
            leader_weight: 64,
            leader_partition_id: 0,
            child_timeout: 240,
            network_id_timeout: 120,
            router_upgrade_threshold: 16,
            router_downgrade_threshold: 23,
            router_selection_jitter: 120,
            preferred_router_id: None,
        }
    }
}
