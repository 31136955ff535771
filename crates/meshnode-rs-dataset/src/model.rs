// crates/meshnode-rs-dataset/src/model.rs

//! Serde mirror of the commissioning file layout.
//!
//! Every value is kept as the raw string found in the XML. Conversion to
//! typed values happens in `parser.rs` so that errors can name the element.

use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Represents the root `<Commissioning>` element.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename = "Commissioning")]
pub struct Commissioning {
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(rename = "ActiveDataset", default, skip_serializing_if = "Option::is_none")]
    pub active_dataset: Option<Dataset>,

    #[serde(rename = "PendingDataset", default, skip_serializing_if = "Option::is_none")]
    pub pending_dataset: Option<Dataset>,
}

/// Represents `<ActiveDataset>` or `<PendingDataset>`.
///
/// Element order follows the TLV type order of the wire encoding.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Dataset {
    #[serde(rename = "Channel", default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Hex, e.g. `0x1234`.
    #[serde(rename = "PanId", default, skip_serializing_if = "Option::is_none")]
    pub pan_id: Option<String>,

    /// 8 bytes of hex.
    #[serde(rename = "ExtendedPanId", default, skip_serializing_if = "Option::is_none")]
    pub extended_pan_id: Option<String>,

    #[serde(rename = "NetworkName", default, skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,

    /// 16 bytes of hex.
    #[serde(rename = "Pskc", default, skip_serializing_if = "Option::is_none")]
    pub pskc: Option<String>,

    /// 16 bytes of hex.
    #[serde(rename = "MasterKey", default, skip_serializing_if = "Option::is_none")]
    pub master_key: Option<String>,

    /// 8 bytes of hex.
    #[serde(rename = "MeshLocalPrefix", default, skip_serializing_if = "Option::is_none")]
    pub mesh_local_prefix: Option<String>,

    #[serde(rename = "SecurityPolicy", default, skip_serializing_if = "Option::is_none")]
    pub security_policy: Option<SecurityPolicy>,

    #[serde(rename = "ActiveTimestamp", default, skip_serializing_if = "Option::is_none")]
    pub active_timestamp: Option<String>,

    #[serde(rename = "PendingTimestamp", default, skip_serializing_if = "Option::is_none")]
    pub pending_timestamp: Option<String>,

    /// Delay timer in milliseconds.
    #[serde(rename = "Delay", default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,

    #[serde(rename = "ChannelMask", default, skip_serializing_if = "Option::is_none")]
    pub channel_mask: Option<ChannelMask>,
}

/// Represents `<SecurityPolicy rotationTime="672" flags="0xf7"/>`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SecurityPolicy {
    /// Decimal, in hours.
    #[serde(rename = "@rotationTime")]
    pub rotation_time: String,
    #[serde(rename = "@flags")]
    pub flags: String,
}

/// Represents `<ChannelMask page0="0x07fff800"/>`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ChannelMask {
    #[serde(rename = "@page0")]
    pub page0: String,
}
