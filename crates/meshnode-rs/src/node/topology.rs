use super::Instance;
use crate::hal::{MeshEngine, MeshError, Platform, SettingsStore};
use crate::role::topology::RouterEntry;
use crate::role::{ChildInfo, LeaderData, NeighborInfo, NeighborIterator, NodeRole, RouterInfo};
use crate::types::{Ip6Address, MAX_ROUTER_ID, Rloc16};
use log::trace;

impl<E: MeshEngine, P: Platform, S: SettingsStore> Instance<E, P, S> {
    pub fn rloc16(&self) -> Rloc16 {
        self.engine.rloc16()
    }

    pub fn router_id_sequence(&self) -> u8 {
        self.engine.router_id_sequence()
    }

    /// Diagnostic view of the parent. `InvalidState` unless attached as Child.
    pub fn parent_info(&self) -> Result<RouterInfo, MeshError> {
        let parent = self.parent_entry()?;
        Ok(RouterInfo::from_entry(
            &parent,
            self.now_ms(),
            self.platform.noise_floor(),
        ))
    }

    /// Average RSS of the parent link. `Failed` if no frame was received yet.
    pub fn parent_average_rssi(&self) -> Result<i8, MeshError> {
        self.parent_entry()?
            .link_info
            .average_rss
            .ok_or(MeshError::Failed)
    }

    /// The child in table slot `index`.
    pub fn child_info_by_index(&self, index: u8) -> Result<ChildInfo, MeshError> {
        if index >= self.engine.max_children() {
            return Err(MeshError::InvalidArgs);
        }
        let entry = self.engine.child(index).ok_or(MeshError::NotFound)?;
        Ok(ChildInfo::from_entry(
            &entry,
            self.now_ms(),
            self.platform.noise_floor(),
        ))
    }

    /// The child with the given RLOC16 or child ID.
    pub fn child_info_by_id(&self, child_id: u16) -> Result<ChildInfo, MeshError> {
        let now = self.now_ms();
        let noise_floor = self.platform.noise_floor();
        (0..self.engine.max_children())
            .filter_map(|i| self.engine.child(i))
            .map(|entry| ChildInfo::from_entry(&entry, now, noise_floor))
            .find(|info| info.matches_id(child_id))
            .ok_or(MeshError::NotFound)
    }

    /// Advances `iter` and returns the next neighbor.
    ///
    /// `NotFound` at the end of the table and on every call after that.
    pub fn next_neighbor_info(&self, iter: &mut NeighborIterator) -> Result<NeighborInfo, MeshError> {
        let entry = iter.advance(|index| self.engine.neighbor(index))?;
        Ok(NeighborInfo::from_entry(
            &entry,
            self.now_ms(),
            self.platform.noise_floor(),
        ))
    }

    /// Diagnostic view of router `router_id` (0..=62).
    pub fn router_info(&self, router_id: u8) -> Result<RouterInfo, MeshError> {
        if router_id > MAX_ROUTER_ID {
            return Err(MeshError::InvalidArgs);
        }
        let entry = self.engine.router(router_id).ok_or(MeshError::NotFound)?;
        Ok(RouterInfo::from_entry(
            &entry,
            self.now_ms(),
            self.platform.noise_floor(),
        ))
    }

    /// Leader data of the current partition. `InvalidState` while not attached.
    pub fn leader_data(&self) -> Result<LeaderData, MeshError> {
        self.require_attached()?;
        self.engine.leader_data().ok_or(MeshError::InvalidState)
    }

    /// Leader's RLOC address. `InvalidState` while not attached.
    pub fn leader_rloc(&self) -> Result<Ip6Address, MeshError> {
        self.require_attached()?;
        self.engine.leader_rloc().ok_or(MeshError::InvalidState)
    }

    pub fn leader_router_id(&self) -> Result<u8, MeshError> {
        Ok(self.leader_data()?.leader_router_id)
    }

    pub fn leader_weight(&self) -> Result<u8, MeshError> {
        Ok(self.leader_data()?.weighting)
    }

    pub fn partition_id(&self) -> Result<u32, MeshError> {
        Ok(self.leader_data()?.partition_id)
    }

    fn parent_entry(&self) -> Result<RouterEntry, MeshError> {
        if self.role.role() != NodeRole::Child {
            trace!("[ROLE] No parent in role {:?}", self.role.role());
            return Err(MeshError::InvalidState);
        }
        self.engine.parent().ok_or(MeshError::InvalidState)
    }

    fn require_attached(&self) -> Result<(), MeshError> {
        match self.role.role() {
            NodeRole::Disabled | NodeRole::Detached => Err(MeshError::InvalidState),
            _ => Ok(()),
        }
    }
}
