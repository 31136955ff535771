// crates/meshnode-rs-dataset/src/parser.rs

use crate::error::DatasetFileError;
use crate::model;
use crate::types::CommissioningFile;
use alloc::vec::Vec;
use core::num::ParseIntError;
use log::warn;
use meshnode_rs::dataset::SecurityPolicy;
use meshnode_rs::types::{
    EXTENDED_PAN_ID_SIZE, ExtendedPanId, MASTER_KEY_SIZE, MESH_LOCAL_PREFIX_SIZE, MasterKey,
    MeshLocalPrefix, NetworkName, Pskc,
};
use meshnode_rs::{DatasetKind, OperationalDataset};

/// Parses a commissioning file from a string slice.
///
/// The file must contain an `<ActiveDataset>` with at least one value.
/// A `<PendingDataset>` is optional.
///
/// # Errors
/// Returns a `DatasetFileError` if the XML is malformed, a value cannot be
/// parsed, or the datasets are inconsistent (e.g. a delay timer in Active).
pub fn load_commissioning_from_str(xml_content: &str) -> Result<CommissioningFile, DatasetFileError> {
    // 1. Deserialize the raw XML string into our internal model.
    let container: model::Commissioning = quick_xml::de::from_str(xml_content)?;

    // 2. The Active dataset is mandatory.
    let active_model = container
        .active_dataset
        .as_ref()
        .ok_or(DatasetFileError::MissingElement {
            element: "ActiveDataset",
        })?;
    let active = parse_dataset(active_model, DatasetKind::Active)?;
    if active.is_empty() {
        return Err(DatasetFileError::ValidationError(
            "ActiveDataset contains no values",
        ));
    }
    if !active.is_commissioned() {
        warn!("Active dataset in commissioning file is incomplete; the node will not be commissioned");
    }

    // 3. The Pending dataset is optional.
    let pending = container
        .pending_dataset
        .as_ref()
        .map(|p| parse_dataset(p, DatasetKind::Pending))
        .transpose()?;

    Ok(CommissioningFile { active, pending })
}

/// Converts one `model::Dataset` into a typed `OperationalDataset`.
fn parse_dataset(
    model: &model::Dataset,
    kind: DatasetKind,
) -> Result<OperationalDataset, DatasetFileError> {
    if kind == DatasetKind::Active && (model.delay.is_some() || model.pending_timestamp.is_some()) {
        return Err(DatasetFileError::ValidationError(
            "Delay and PendingTimestamp are only valid in a PendingDataset",
        ));
    }

    let network_name = model
        .network_name
        .as_deref()
        .map(NetworkName::try_from)
        .transpose()
        .map_err(|_| DatasetFileError::InvalidValue {
            element: "NetworkName",
        })?;

    let security_policy = model
        .security_policy
        .as_ref()
        .map(parse_security_policy)
        .transpose()?;

    let channel_mask_page0 = model
        .channel_mask
        .as_ref()
        .map(|m| parse_hex_u32(&m.page0).map_err(invalid("ChannelMask")))
        .transpose()?;

    Ok(OperationalDataset {
        active_timestamp: parse_optional(&model.active_timestamp, "ActiveTimestamp", |s| {
            s.parse::<u64>()
        })?,
        pending_timestamp: parse_optional(&model.pending_timestamp, "PendingTimestamp", |s| {
            s.parse::<u64>()
        })?,
        master_key: parse_optional_bytes::<MASTER_KEY_SIZE>(&model.master_key, "MasterKey")?
            .map(MasterKey),
        network_name,
        extended_pan_id: parse_optional_bytes::<EXTENDED_PAN_ID_SIZE>(
            &model.extended_pan_id,
            "ExtendedPanId",
        )?
        .map(ExtendedPanId),
        mesh_local_prefix: parse_optional_bytes::<MESH_LOCAL_PREFIX_SIZE>(
            &model.mesh_local_prefix,
            "MeshLocalPrefix",
        )?
        .map(MeshLocalPrefix),
        delay: parse_optional(&model.delay, "Delay", |s| s.parse::<u32>())?,
        pan_id: parse_optional(&model.pan_id, "PanId", parse_hex_u16)?,
        channel: parse_optional(&model.channel, "Channel", |s| s.parse::<u16>())?,
        pskc: parse_optional_bytes::<16>(&model.pskc, "Pskc")?.map(Pskc),
        security_policy,
        channel_mask_page0,
    })
}

fn parse_security_policy(
    model: &model::SecurityPolicy,
) -> Result<SecurityPolicy, DatasetFileError> {
    Ok(SecurityPolicy {
        rotation_time: model
            .rotation_time
            .parse()
            .map_err(invalid("SecurityPolicy@rotationTime"))?,
        flags: parse_hex_u8(&model.flags).map_err(invalid("SecurityPolicy@flags"))?,
    })
}

/// Maps a `ParseIntError` to an error naming the offending element.
fn invalid(element: &'static str) -> impl Fn(ParseIntError) -> DatasetFileError {
    move |_| DatasetFileError::InvalidValue { element }
}

fn parse_optional<T>(
    value: &Option<alloc::string::String>,
    element: &'static str,
    parse: impl Fn(&str) -> Result<T, ParseIntError>,
) -> Result<Option<T>, DatasetFileError> {
    value
        .as_deref()
        .map(|s| parse(s.trim()).map_err(invalid(element)))
        .transpose()
}

fn parse_optional_bytes<const N: usize>(
    value: &Option<alloc::string::String>,
    element: &'static str,
) -> Result<Option<[u8; N]>, DatasetFileError> {
    value
        .as_deref()
        .map(|s| parse_hex_array::<N>(s.trim(), element))
        .transpose()
}

// --- Helper Functions ---

/// Parses a "0x..." or "..." hex string into a u32.
pub fn parse_hex_u32(s: &str) -> Result<u32, ParseIntError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    u32::from_str_radix(trimmed, 16)
}

/// Parses a "0x..." or "..." hex string into a u16.
pub fn parse_hex_u16(s: &str) -> Result<u16, ParseIntError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    u16::from_str_radix(trimmed, 16)
}

/// Parses a "0x..." or "..." hex string into a u8.
pub fn parse_hex_u8(s: &str) -> Result<u8, ParseIntError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    u8::from_str_radix(trimmed, 16)
}

/// Parses a "0x..." or "..." hex string into a Vec<u8>.
pub fn parse_hex_string(s: &str) -> Result<Vec<u8>, DatasetFileError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    if trimmed.len() % 2 != 0 {
        return Err(DatasetFileError::HexParsing(hex::FromHexError::OddLength));
    }
    hex::decode(trimmed).map_err(DatasetFileError::HexParsing)
}

/// Parses a hex string that must decode to exactly `N` bytes.
fn parse_hex_array<const N: usize>(
    s: &str,
    element: &'static str,
) -> Result<[u8; N], DatasetFileError> {
    let bytes = parse_hex_string(s)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| DatasetFileError::InvalidLength {
        element,
        expected: N,
        actual: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_helpers_accept_optional_prefix() {
        assert_eq!(parse_hex_u16("0x1234"), Ok(0x1234));
        assert_eq!(parse_hex_u16("beef"), Ok(0xbeef));
        assert_eq!(parse_hex_u8("0xf7"), Ok(0xf7));
        assert_eq!(parse_hex_u32("07fff800"), Ok(0x07ff_f800));
        assert!(parse_hex_u16("0x12345").is_err());
    }

    #[test]
    fn test_hex_string_rejects_odd_length() {
        assert!(matches!(
            parse_hex_string("0xabc"),
            Err(DatasetFileError::HexParsing(hex::FromHexError::OddLength))
        ));
    }

    #[test]
    fn test_hex_array_checks_length() {
        assert_eq!(
            parse_hex_array::<2>("0xcafe", "PanId").unwrap(),
            [0xca, 0xfe]
        );
        assert!(matches!(
            parse_hex_array::<8>("0xcafe", "ExtendedPanId"),
            Err(DatasetFileError::InvalidLength {
                element: "ExtendedPanId",
                expected: 8,
                actual: 2,
            })
        ));
    }

    #[test]
    fn test_active_dataset_rejects_delay() {
        let model = model::Dataset {
            channel: Some("15".into()),
            delay: Some("30000".into()),
            ..Default::default()
        };
        assert!(matches!(
            parse_dataset(&model, DatasetKind::Active),
            Err(DatasetFileError::ValidationError(_))
        ));
        let pending = parse_dataset(&model, DatasetKind::Pending).unwrap();
        assert_eq!(pending.delay, Some(30_000));
    }
}
