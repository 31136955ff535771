// crates/meshnode-rs/src/dataset/tlv.rs

//! Type-length-value encoding of operational dataset attributes.
//!
//! Each record is `type (1 byte) | length (1 byte) | value`. Multi-byte
//! integers are big-endian. Unknown types are skipped when decoding.

use super::{OperationalDataset, SecurityPolicy};
use crate::hal::MeshError;
use crate::types::{ExtendedPanId, MasterKey, MeshLocalPrefix, NetworkName, Pskc};
use alloc::vec::Vec;
use core::convert::TryFrom;
use log::trace;

/// Maximum value length of a single TLV.
pub const MAX_TLV_LENGTH: usize = 254;

/// Channel page carried in the Channel TLV.
const CHANNEL_PAGE_0: u8 = 0;

/// Dataset attribute type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum TlvType {
    Channel = 0,
    PanId = 1,
    ExtendedPanId = 2,
    NetworkName = 3,
    Pskc = 4,
    MasterKey = 5,
    MeshLocalPrefix = 7,
    SecurityPolicy = 12,
    ActiveTimestamp = 14,
    PendingTimestamp = 51,
    DelayTimer = 52,
    ChannelMask = 53,
}

/// Error type for an unknown TLV type code.
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownTlvType(pub u8);

impl TryFrom<u8> for TlvType {
    type Error = UnknownTlvType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TlvType::Channel),
            1 => Ok(TlvType::PanId),
            2 => Ok(TlvType::ExtendedPanId),
            3 => Ok(TlvType::NetworkName),
            4 => Ok(TlvType::Pskc),
            5 => Ok(TlvType::MasterKey),
            7 => Ok(TlvType::MeshLocalPrefix),
            12 => Ok(TlvType::SecurityPolicy),
            14 => Ok(TlvType::ActiveTimestamp),
            51 => Ok(TlvType::PendingTimestamp),
            52 => Ok(TlvType::DelayTimer),
            53 => Ok(TlvType::ChannelMask),
            other => Err(UnknownTlvType(other)),
        }
    }
}

/// A borrowed view of one TLV record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tlv_type: u8,
    pub value: &'a [u8],
}

/// Iterates over the TLV records in a buffer.
pub struct TlvIter<'a> {
    buffer: &'a [u8],
}

impl<'a> TlvIter<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }
}

impl<'a> Iterator for TlvIter<'a> {
    type Item = Result<Tlv<'a>, MeshError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() {
            return None;
        }
        if self.buffer.len() < 2 {
            self.buffer = &[];
            return Some(Err(MeshError::Parse("truncated TLV header")));
        }
        let tlv_type = self.buffer[0];
        let length = self.buffer[1] as usize;
        if self.buffer.len() < 2 + length {
            self.buffer = &[];
            return Some(Err(MeshError::Parse("truncated TLV value")));
        }
        let value = &self.buffer[2..2 + length];
        self.buffer = &self.buffer[2 + length..];
        Some(Ok(Tlv { tlv_type, value }))
    }
}

/// Appends one TLV record.
pub fn write_tlv(buffer: &mut Vec<u8>, tlv_type: TlvType, value: &[u8]) {
    buffer.push(tlv_type as u8);
    buffer.push(value.len() as u8);
    buffer.extend_from_slice(value);
}

/// Encodes every present attribute of `dataset`, in ascending type order.
pub fn encode(dataset: &OperationalDataset) -> Vec<u8> {
    let mut buffer = Vec::new();

    if let Some(channel) = dataset.channel {
        let [hi, lo] = channel.to_be_bytes();
        write_tlv(&mut buffer, TlvType::Channel, &[CHANNEL_PAGE_0, hi, lo]);
    }
    if let Some(pan_id) = dataset.pan_id {
        write_tlv(&mut buffer, TlvType::PanId, &pan_id.to_be_bytes());
    }
    if let Some(epid) = &dataset.extended_pan_id {
        write_tlv(&mut buffer, TlvType::ExtendedPanId, &epid.0);
    }
    if let Some(name) = &dataset.network_name {
        write_tlv(&mut buffer, TlvType::NetworkName, name.as_bytes());
    }
    if let Some(pskc) = &dataset.pskc {
        write_tlv(&mut buffer, TlvType::Pskc, &pskc.0);
    }
    if let Some(key) = &dataset.master_key {
        write_tlv(&mut buffer, TlvType::MasterKey, &key.0);
    }
    if let Some(prefix) = &dataset.mesh_local_prefix {
        write_tlv(&mut buffer, TlvType::MeshLocalPrefix, &prefix.0);
    }
    if let Some(policy) = &dataset.security_policy {
        let [hi, lo] = policy.rotation_time.to_be_bytes();
        write_tlv(&mut buffer, TlvType::SecurityPolicy, &[hi, lo, policy.flags]);
    }
    if let Some(ts) = dataset.active_timestamp {
        write_tlv(&mut buffer, TlvType::ActiveTimestamp, &ts.to_be_bytes());
    }
    if let Some(ts) = dataset.pending_timestamp {
        write_tlv(&mut buffer, TlvType::PendingTimestamp, &ts.to_be_bytes());
    }
    if let Some(delay) = dataset.delay {
        write_tlv(&mut buffer, TlvType::DelayTimer, &delay.to_be_bytes());
    }
    if let Some(mask) = dataset.channel_mask_page0 {
        // One channel mask entry: page, mask length, mask.
        let mut entry = [0u8; 6];
        entry[0] = CHANNEL_PAGE_0;
        entry[1] = 4;
        entry[2..6].copy_from_slice(&mask.to_be_bytes());
        write_tlv(&mut buffer, TlvType::ChannelMask, &entry);
    }

    buffer
}

fn fixed<const L: usize>(value: &[u8], what: &'static str) -> Result<[u8; L], MeshError> {
    value.try_into().map_err(|_| MeshError::Parse(what))
}

/// Decodes a dataset from a TLV buffer. Unknown TLV types are skipped.
pub fn decode(buffer: &[u8]) -> Result<OperationalDataset, MeshError> {
    let mut dataset = OperationalDataset::default();

    for tlv in TlvIter::new(buffer) {
        let tlv = tlv?;
        let Ok(tlv_type) = TlvType::try_from(tlv.tlv_type) else {
            trace!("[DATASET] Skipping unknown TLV type {}", tlv.tlv_type);
            continue;
        };
        let v = tlv.value;
        match tlv_type {
            TlvType::Channel => {
                let raw: [u8; 3] = fixed(v, "bad Channel TLV")?;
                dataset.channel = Some(u16::from_be_bytes([raw[1], raw[2]]));
            }
            TlvType::PanId => {
                dataset.pan_id = Some(u16::from_be_bytes(fixed(v, "bad PAN ID TLV")?));
            }
            TlvType::ExtendedPanId => {
                dataset.extended_pan_id = Some(ExtendedPanId(fixed(v, "bad Extended PAN ID TLV")?));
            }
            TlvType::NetworkName => {
                let name = core::str::from_utf8(v)
                    .map_err(|_| MeshError::Parse("network name is not UTF-8"))?;
                dataset.network_name = Some(
                    NetworkName::try_from(name)
                        .map_err(|_| MeshError::Parse("network name too long"))?,
                );
            }
            TlvType::Pskc => {
                dataset.pskc = Some(Pskc(fixed(v, "bad PSKc TLV")?));
            }
            TlvType::MasterKey => {
                dataset.master_key = Some(MasterKey(fixed(v, "bad Master Key TLV")?));
            }
            TlvType::MeshLocalPrefix => {
                dataset.mesh_local_prefix =
                    Some(MeshLocalPrefix(fixed(v, "bad Mesh-Local Prefix TLV")?));
            }
            TlvType::SecurityPolicy => {
                let raw: [u8; 3] = fixed(v, "bad Security Policy TLV")?;
                dataset.security_policy = Some(SecurityPolicy {
                    rotation_time: u16::from_be_bytes([raw[0], raw[1]]),
                    flags: raw[2],
                });
            }
            TlvType::ActiveTimestamp => {
                dataset.active_timestamp =
                    Some(u64::from_be_bytes(fixed(v, "bad Active Timestamp TLV")?));
            }
            TlvType::PendingTimestamp => {
                dataset.pending_timestamp =
                    Some(u64::from_be_bytes(fixed(v, "bad Pending Timestamp TLV")?));
            }
            TlvType::DelayTimer => {
                dataset.delay = Some(u32::from_be_bytes(fixed(v, "bad Delay Timer TLV")?));
            }
            TlvType::ChannelMask => {
                dataset.channel_mask_page0 = decode_channel_mask_page0(v)?;
            }
        }
    }

    Ok(dataset)
}

/// Walks the channel mask entries and returns the page 0 mask, if any.
fn decode_channel_mask_page0(mut v: &[u8]) -> Result<Option<u32>, MeshError> {
    let mut result = None;
    while !v.is_empty() {
        if v.len() < 2 {
            return Err(MeshError::Parse("truncated channel mask entry"));
        }
        let page = v[0];
        let len = v[1] as usize;
        if v.len() < 2 + len {
            return Err(MeshError::Parse("truncated channel mask entry"));
        }
        if page == CHANNEL_PAGE_0 && len == 4 {
            result = Some(u32::from_be_bytes(fixed(&v[2..6], "bad channel mask")?));
        }
        v = &v[2 + len..];
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> OperationalDataset {
        OperationalDataset {
            active_timestamp: Some(1),
            pending_timestamp: None,
            master_key: Some(MasterKey([
                0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
                0xee, 0xff,
            ])),
            network_name: Some(NetworkName::try_from("OpenMesh").unwrap()),
            extended_pan_id: Some(ExtendedPanId([0xde, 0xad, 0x00, 0xbe, 0xef, 0x00, 0xca, 0xfe])),
            mesh_local_prefix: Some(MeshLocalPrefix([0xfd, 0xde, 0xad, 0x00, 0xbe, 0xef, 0, 0])),
            delay: None,
            pan_id: Some(0xface),
            channel: Some(11),
            pskc: None,
            security_policy: Some(SecurityPolicy {
                rotation_time: 672,
                flags: 0xf7,
            }),
            channel_mask_page0: Some(0x07ff_f800),
        }
    }

    #[test]
    fn test_encode_channel_and_pan_id_layout() {
        let ds = OperationalDataset {
            channel: Some(0x000f),
            pan_id: Some(0xface),
            ..Default::default()
        };
        assert_eq!(encode(&ds), [0, 3, 0, 0x00, 0x0f, 1, 2, 0xfa, 0xce]);
    }

    #[test]
    fn test_decode_recovers_encoded_dataset() {
        let ds = sample_dataset();
        assert_eq!(decode(&encode(&ds)).unwrap(), ds);
    }

    #[test]
    fn test_decode_skips_unknown_types() {
        // Unknown type 0x80 followed by a PAN ID TLV.
        let buffer = [0x80, 2, 0xAA, 0xBB, 1, 2, 0x12, 0x34];
        let ds = decode(&buffer).unwrap();
        assert_eq!(ds.pan_id, Some(0x1234));
    }

    #[test]
    fn test_decode_rejects_truncated_buffer() {
        assert!(matches!(decode(&[1, 2, 0x12]), Err(MeshError::Parse(_))));
        assert!(matches!(decode(&[1]), Err(MeshError::Parse(_))));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        // PAN ID with 3 bytes
        assert!(matches!(
            decode(&[1, 3, 0x12, 0x34, 0x56]),
            Err(MeshError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_buffer_is_empty_dataset() {
        assert!(decode(&[]).unwrap().is_empty());
        assert!(encode(&OperationalDataset::default()).is_empty());
    }
}
