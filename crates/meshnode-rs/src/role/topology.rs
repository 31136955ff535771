//! Topology records supplied by the engine and the views derived from them.
//!
//! The engine hands out raw table entries (`RouterEntry`, `ChildEntry`,
//! `NeighborEntry`). The `*Info` types are what the control plane reports:
//! ages in seconds and link quality computed against the radio noise floor.

use crate::hal::MeshError;
use crate::link_mode::{DeviceMode, LinkModeConfig};
use crate::types::{ExtAddress, Rloc16, child_id_from_rloc16, router_id_from_rloc16};
use log::trace;

const MS_PER_SECOND: u64 = 1000;

/// Link margin thresholds (dB) for link quality 3, 2 and 1.
const LINK_QUALITY_3_MARGIN: u8 = 20;
const LINK_QUALITY_2_MARGIN: u8 = 10;
const LINK_QUALITY_1_MARGIN: u8 = 2;

/// Which partitions an attach attempt may join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachFilter {
    AnyPartition,
    SamePartition,
    BetterPartition,
}

/// Status sent with a router ID request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterUpgradeReason {
    /// The child has a pending child ID request to serve.
    HaveChildIdRequest,
}

/// State of a neighbor link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborState {
    #[default]
    Invalid,
    Restored,
    ParentRequest,
    ChildIdRequest,
    LinkRequest,
    ChildUpdateRequest,
    Valid,
}

/// Received signal statistics of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkQualityInfo {
    /// Average RSS in dBm, `None` until the first frame is received.
    pub average_rss: Option<i8>,
    /// RSS of the last received frame in dBm.
    pub last_rss: Option<i8>,
}

impl LinkQualityInfo {
    /// Link margin in dB above the noise floor. Unknown RSS gives 0.
    pub fn link_margin(&self, noise_floor: i8) -> u8 {
        match self.average_rss {
            Some(rss) => (i16::from(rss) - i16::from(noise_floor)).clamp(0, 255) as u8,
            None => 0,
        }
    }

    /// Link quality 0..=3 derived from the link margin.
    pub fn link_quality(&self, noise_floor: i8) -> u8 {
        link_quality_from_margin(self.link_margin(noise_floor))
    }
}

pub fn link_quality_from_margin(margin: u8) -> u8 {
    if margin > LINK_QUALITY_3_MARGIN {
        3
    } else if margin > LINK_QUALITY_2_MARGIN {
        2
    } else if margin > LINK_QUALITY_1_MARGIN {
        1
    } else {
        0
    }
}

fn age_secs(now_ms: u64, last_heard_ms: u64) -> u64 {
    now_ms.saturating_sub(last_heard_ms) / MS_PER_SECOND
}

/// A router table entry as held by the engine. Also used for the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouterEntry {
    pub ext_address: ExtAddress,
    pub rloc16: Rloc16,
    pub next_hop: u8,
    pub path_cost: u8,
    pub link_quality_out: u8,
    pub allocated: bool,
    pub state: NeighborState,
    pub last_heard_ms: u64,
    pub link_info: LinkQualityInfo,
}

/// A child table entry as held by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChildEntry {
    pub ext_address: ExtAddress,
    pub rloc16: Rloc16,
    /// Child timeout in seconds.
    pub timeout: u32,
    pub network_data_version: u8,
    pub mode: DeviceMode,
    pub state: NeighborState,
    pub last_heard_ms: u64,
    pub link_info: LinkQualityInfo,
}

/// A neighbor table entry (router or child) as held by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborEntry {
    pub ext_address: ExtAddress,
    pub rloc16: Rloc16,
    pub mode: DeviceMode,
    pub is_child: bool,
    pub last_heard_ms: u64,
    pub link_info: LinkQualityInfo,
}

/// Leader data of the current partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeaderData {
    pub partition_id: u32,
    pub weighting: u8,
    pub data_version: u8,
    pub stable_data_version: u8,
    pub leader_router_id: u8,
}

/// Diagnostic view of a router (or of the parent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterInfo {
    pub ext_address: ExtAddress,
    pub rloc16: Rloc16,
    pub router_id: u8,
    pub next_hop: u8,
    pub path_cost: u8,
    pub link_quality_in: u8,
    pub link_quality_out: u8,
    /// Seconds since last heard, saturated at 255.
    pub age: u8,
    pub allocated: bool,
    pub link_established: bool,
}

impl RouterInfo {
    pub fn from_entry(entry: &RouterEntry, now_ms: u64, noise_floor: i8) -> Self {
        Self {
            ext_address: entry.ext_address,
            rloc16: entry.rloc16,
            router_id: router_id_from_rloc16(entry.rloc16),
            next_hop: entry.next_hop,
            path_cost: entry.path_cost,
            link_quality_in: entry.link_info.link_quality(noise_floor),
            link_quality_out: entry.link_quality_out,
            age: age_secs(now_ms, entry.last_heard_ms).min(u64::from(u8::MAX)) as u8,
            allocated: entry.allocated,
            link_established: entry.state == NeighborState::Valid,
        }
    }
}

/// Diagnostic view of a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildInfo {
    pub ext_address: ExtAddress,
    pub rloc16: Rloc16,
    pub child_id: u16,
    pub timeout: u32,
    /// Seconds since last heard.
    pub age: u32,
    pub network_data_version: u8,
    pub link_quality_in: u8,
    pub average_rssi: Option<i8>,
    pub last_rssi: Option<i8>,
    pub mode: LinkModeConfig,
}

impl ChildInfo {
    pub fn from_entry(entry: &ChildEntry, now_ms: u64, noise_floor: i8) -> Self {
        Self {
            ext_address: entry.ext_address,
            rloc16: entry.rloc16,
            child_id: child_id_from_rloc16(entry.rloc16),
            timeout: entry.timeout,
            age: age_secs(now_ms, entry.last_heard_ms).min(u64::from(u32::MAX)) as u32,
            network_data_version: entry.network_data_version,
            link_quality_in: entry.link_info.link_quality(noise_floor),
            average_rssi: entry.link_info.average_rss,
            last_rssi: entry.link_info.last_rss,
            mode: LinkModeConfig::from_mode(entry.mode),
        }
    }

    /// True if `id` names this child, either as its RLOC16 or as its child ID.
    pub fn matches_id(&self, id: u16) -> bool {
        self.rloc16 == id || self.child_id == id
    }
}

/// Diagnostic view of a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborInfo {
    pub ext_address: ExtAddress,
    pub rloc16: Rloc16,
    /// Seconds since last heard.
    pub age: u32,
    pub link_quality_in: u8,
    pub average_rssi: Option<i8>,
    pub last_rssi: Option<i8>,
    pub mode: LinkModeConfig,
    pub is_child: bool,
}

impl NeighborInfo {
    pub fn from_entry(entry: &NeighborEntry, now_ms: u64, noise_floor: i8) -> Self {
        Self {
            ext_address: entry.ext_address,
            rloc16: entry.rloc16,
            age: age_secs(now_ms, entry.last_heard_ms).min(u64::from(u32::MAX)) as u32,
            link_quality_in: entry.link_info.link_quality(noise_floor),
            average_rssi: entry.link_info.average_rss,
            last_rssi: entry.link_info.last_rss,
            mode: LinkModeConfig::from_mode(entry.mode),
            is_child: entry.is_child,
        }
    }
}

/// Caller-held cursor over the neighbor table.
///
/// Once the end of the table is reached the cursor stays exhausted, even if
/// new neighbors appear later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborIterator {
    next: u16,
}

impl NeighborIterator {
    const EXHAUSTED: u16 = u16::MAX;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_exhausted(&self) -> bool {
        self.next == Self::EXHAUSTED
    }

    /// Looks up the next entry with `lookup`, which maps a table index to
    /// the entry at that index. Returns `NotFound` once exhausted.
    pub fn advance<F>(&mut self, lookup: F) -> Result<NeighborEntry, MeshError>
    where
        F: Fn(u16) -> Option<NeighborEntry>,
    {
        if self.is_exhausted() {
            return Err(MeshError::NotFound);
        }
        match lookup(self.next) {
            Some(entry) => {
                trace!("[ROLE] Neighbor {} -> {:#06x}", self.next, entry.rloc16);
                // Reaching u16::MAX marks the cursor exhausted.
                self.next += 1;
                Ok(entry)
            }
            None => {
                self.next = Self::EXHAUSTED;
                Err(MeshError::NotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_link_quality_thresholds() {
        let noise_floor = -100;
        let lq = |rss: Option<i8>| {
            LinkQualityInfo {
                average_rss: rss,
                last_rss: None,
            }
            .link_quality(noise_floor)
        };
        assert_eq!(lq(None), 0);
        assert_eq!(lq(Some(-98)), 0); // margin 2
        assert_eq!(lq(Some(-97)), 1); // margin 3
        assert_eq!(lq(Some(-90)), 1); // margin 10
        assert_eq!(lq(Some(-89)), 2); // margin 11
        assert_eq!(lq(Some(-80)), 2); // margin 20
        assert_eq!(lq(Some(-79)), 3); // margin 21
        // Below the noise floor
        assert_eq!(lq(Some(-110)), 0);
    }

    #[test]
    fn test_router_info_derivation() {
        let entry = RouterEntry {
            ext_address: ExtAddress([1; 8]),
            rloc16: 0x1400, // Router 5
            next_hop: 5,
            path_cost: 1,
            link_quality_out: 3,
            allocated: true,
            state: NeighborState::Valid,
            last_heard_ms: 1_000,
            link_info: LinkQualityInfo {
                average_rss: Some(-70),
                last_rss: Some(-71),
            },
        };
        let info = RouterInfo::from_entry(&entry, 8_999, -100);
        assert_eq!(info.router_id, 5);
        assert_eq!(info.age, 7);
        assert_eq!(info.link_quality_in, 3);
        assert!(info.link_established);

        let stale = RouterEntry {
            state: NeighborState::LinkRequest,
            ..entry
        };
        let info = RouterInfo::from_entry(&stale, 1_000 + 1_000_000, -100);
        assert_eq!(info.age, u8::MAX);
        assert!(!info.link_established);
    }

    #[test]
    fn test_child_info_matches_rloc_or_child_id() {
        let entry = ChildEntry {
            rloc16: 0x0c02,
            ..Default::default()
        };
        let info = ChildInfo::from_entry(&entry, 0, -100);
        assert_eq!(info.child_id, 2);
        assert!(info.matches_id(0x0c02));
        assert!(info.matches_id(2));
        assert!(!info.matches_id(3));
    }

    #[test]
    fn test_neighbor_iterator_is_sticky() {
        let mut table: Vec<NeighborEntry> = (0..3)
            .map(|i| NeighborEntry {
                rloc16: i,
                ..Default::default()
            })
            .collect();

        let mut iter = NeighborIterator::new();
        for i in 0..3 {
            let entry = iter.advance(|idx| table.get(idx as usize).copied()).unwrap();
            assert_eq!(entry.rloc16, i);
        }
        assert_eq!(
            iter.advance(|idx| table.get(idx as usize).copied()),
            Err(MeshError::NotFound)
        );
        assert!(iter.is_exhausted());

        // A neighbor added later is not picked up by the exhausted cursor.
        table.push(NeighborEntry::default());
        assert_eq!(
            iter.advance(|idx| table.get(idx as usize).copied()),
            Err(MeshError::NotFound)
        );

        // A fresh cursor sees all four.
        let mut fresh = NeighborIterator::new();
        let mut count = 0;
        while fresh.advance(|idx| table.get(idx as usize).copied()).is_ok() {
            count += 1;
        }
        assert_eq!(count, 4);
    }
}
