#![cfg_attr(not(feature = "std"), no_std)]

// 'alloc' is used for dynamic allocation (e.g., Vec<u8> for TLV buffers)
extern crate alloc;

// --- Foundation Modules ---
pub mod types;
pub mod hal;
pub mod config;

// --- Leaf Components ---
pub mod link_mode;
pub mod key;
pub mod notifier;
pub mod settings;

// --- Controllers ---
pub mod dataset;
pub mod role;

// --- Node Abstraction ---
pub mod node;

// --- Top-level Exports ---
pub use types::{ExtAddress, ExtendedPanId, Ip6Address, MasterKey, MeshLocalPrefix, NetworkName, PanId};
pub use hal::{MeshEngine, MeshError, Platform, SettingsStore};
pub use config::NodeConfig;
pub use link_mode::{DeviceMode, LinkModeConfig};
pub use notifier::{CallbackContext, ChangedFlags, StateChangedHandler};
pub use dataset::{DatasetKind, OperationalDataset};
pub use role::states::NodeRole;
pub use node::{EngineEvent, Instance};

/// Returns the version string of this stack, e.g. `meshnode-rs/0.0.0`.
pub fn version_string() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
}
