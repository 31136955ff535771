//! Serializes a `CommissioningFile` back into the XML commissioning format.
//!
//! The typed datasets are converted to the internal `model` structs first,
//! so the written file is read back by `load_commissioning_from_str`.

use crate::error::DatasetFileError;
use crate::model;
use crate::types::{CommissioningFile, FILE_FORMAT_VERSION};
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::Write;
use meshnode_rs::OperationalDataset;
use serde::Serialize;

/// Serializes a `CommissioningFile` into an XML string.
///
/// Keys are written in plain hex. Treat the output as secret material.
///
/// # Errors
/// Returns a `DatasetFileError` if serialization fails.
pub fn save_commissioning_to_string(file: &CommissioningFile) -> Result<String, DatasetFileError> {
    let container = model::Commissioning {
        version: Some(FILE_FORMAT_VERSION.to_string()),
        active_dataset: Some(build_dataset(&file.active)),
        pending_dataset: file.pending.as_ref().map(build_dataset),
    };

    let mut buffer = String::new();
    write!(&mut buffer, "{}", "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n")?;

    let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
    serializer.indent(' ', 2);

    container.serialize(serializer)?;
    Ok(buffer)
}

/// Constructs the internal `model::Dataset` from a typed dataset.
fn build_dataset(dataset: &OperationalDataset) -> model::Dataset {
    model::Dataset {
        channel: dataset.channel.map(|c| c.to_string()),
        pan_id: dataset.pan_id.map(|p| format!("0x{:04x}", p)),
        extended_pan_id: dataset.extended_pan_id.map(|e| hex_bytes(&e.0)),
        network_name: dataset.network_name.as_ref().map(|n| n.as_str().to_string()),
        pskc: dataset.pskc.map(|p| hex_bytes(&p.0)),
        master_key: dataset.master_key.map(|k| hex_bytes(&k.0)),
        mesh_local_prefix: dataset.mesh_local_prefix.map(|m| hex_bytes(&m.0)),
        security_policy: dataset.security_policy.map(|s| model::SecurityPolicy {
            rotation_time: s.rotation_time.to_string(),
            flags: format!("0x{:02x}", s.flags),
        }),
        active_timestamp: dataset.active_timestamp.map(|t| t.to_string()),
        pending_timestamp: dataset.pending_timestamp.map(|t| t.to_string()),
        delay: dataset.delay.map(|d| d.to_string()),
        channel_mask: dataset.channel_mask_page0.map(|m| model::ChannelMask {
            page0: format!("0x{:08x}", m),
        }),
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
