use super::topology::AttachFilter;

/// The node's participation role in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeRole {
    /// The protocol is stopped.
    #[default]
    Disabled,
    /// Running but not attached to any partition.
    Detached,
    /// Attached to a parent router.
    Child,
    /// Routes for its children and neighbors.
    Router,
    /// Router that also holds the leader role of its partition.
    Leader,
}

impl NodeRole {
    /// True if the node is attached to a partition (Child, Router or Leader).
    pub fn is_attached(self) -> bool {
        matches!(self, NodeRole::Child | NodeRole::Router | NodeRole::Leader)
    }

    /// True if the node routes (Router or Leader).
    pub fn is_router_or_leader(self) -> bool {
        matches!(self, NodeRole::Router | NodeRole::Leader)
    }
}

/// Requests that drive the role state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleOperation {
    Start,
    Stop,
    BecomeDetached,
    BecomeChild(AttachFilter),
    BecomeRouter,
    BecomeLeader,
}
