// crates/meshnode-rs/src/dataset/mod.rs

pub mod manager;
pub mod tlv;

pub use manager::DatasetManager;
pub use tlv::TlvType;

use crate::types::{ExtendedPanId, MasterKey, MeshLocalPrefix, NetworkName, PanId, Pskc};

/// Selects one of the two operational datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// The dataset currently governing the network.
    Active,
    /// A staged dataset that replaces Active once its delay timer expires.
    Pending,
}

/// Security policy attribute: key rotation period and policy flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityPolicy {
    /// Key rotation time in hours.
    pub rotation_time: u16,
    pub flags: u8,
}

/// The network's shared configuration bundle.
///
/// Every attribute is optional: `None` means "not configured", which is
/// different from "configured to a default value".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationalDataset {
    pub active_timestamp: Option<u64>,
    pub pending_timestamp: Option<u64>,
    pub master_key: Option<MasterKey>,
    pub network_name: Option<NetworkName>,
    pub extended_pan_id: Option<ExtendedPanId>,
    pub mesh_local_prefix: Option<MeshLocalPrefix>,
    /// Delay timer in milliseconds (Pending only).
    pub delay: Option<u32>,
    pub pan_id: Option<PanId>,
    pub channel: Option<u16>,
    pub pskc: Option<Pskc>,
    pub security_policy: Option<SecurityPolicy>,
    /// Channel mask for channel page 0.
    pub channel_mask_page0: Option<u32>,
}

impl OperationalDataset {
    /// True if the five attributes needed to operate on a network are present:
    /// master key, network name, extended PAN ID, PAN ID and channel.
    pub fn is_commissioned(&self) -> bool {
        self.master_key.is_some()
            && self.network_name.is_some()
            && self.extended_pan_id.is_some()
            && self.pan_id.is_some()
            && self.channel.is_some()
    }

    /// True if no attribute is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Sets the extended PAN ID and re-derives the mesh-local prefix from it.
    pub fn set_extended_pan_id(&mut self, ext_pan_id: ExtendedPanId) {
        self.extended_pan_id = Some(ext_pan_id);
        self.mesh_local_prefix = Some(MeshLocalPrefix::from_extended_pan_id(&ext_pan_id));
    }
}
