//! MLE discovery: scanning for networks with Discovery Request messages.

use crate::notifier::CallbackContext;
use crate::types::{ExtAddress, ExtendedPanId, NetworkName, PAN_ID_BROADCAST, PanId};

/// Channel mask bit for every 2.4 GHz channel (11..=26).
pub const ALL_CHANNELS_MASK: u32 = 0x07ff_f800;

/// Parameters of a discovery scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverRequest {
    /// Bit `n` selects channel `n`. Zero scans every channel.
    pub scan_channels: u32,
    /// Time spent listening on each channel, in milliseconds. Zero lets the
    /// engine pick its default.
    pub scan_duration_ms: u16,
    /// Only networks with this PAN ID answer. Broadcast accepts any.
    pub pan_id: PanId,
}

impl Default for DiscoverRequest {
    fn default() -> Self {
        Self {
            scan_channels: ALL_CHANNELS_MASK,
            scan_duration_ms: 0,
            pan_id: PAN_ID_BROADCAST,
        }
    }
}

impl DiscoverRequest {
    /// The channel mask with "zero means all" resolved.
    pub fn channel_mask(&self) -> u32 {
        match self.scan_channels {
            0 => ALL_CHANNELS_MASK,
            mask => mask,
        }
    }
}

/// One Discovery Response heard during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverResult {
    pub ext_address: ExtAddress,
    pub network_name: NetworkName,
    pub extended_pan_id: ExtendedPanId,
    pub pan_id: PanId,
    pub channel: u8,
    /// RSS of the response in dBm.
    pub rssi: i8,
    pub lqi: u8,
    /// The responder accepts joiners.
    pub joinable: bool,
}

/// Receives each discovery result, then `None` once the scan is over.
pub type DiscoverHandler = fn(Option<&DiscoverResult>, CallbackContext);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_mask_scans_all_channels() {
        let request = DiscoverRequest {
            scan_channels: 0,
            ..Default::default()
        };
        assert_eq!(request.channel_mask(), ALL_CHANNELS_MASK);

        let request = DiscoverRequest {
            scan_channels: 1 << 15,
            ..Default::default()
        };
        assert_eq!(request.channel_mask(), 1 << 15);
    }
}
