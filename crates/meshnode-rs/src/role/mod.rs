// crates/meshnode-rs/src/role/mod.rs

pub mod controller;
pub mod discover;
pub mod states;
pub mod topology;
pub mod transitions;

pub use controller::RoleController;
pub use discover::{DiscoverHandler, DiscoverRequest, DiscoverResult};
pub use states::{NodeRole, RoleOperation};
pub use topology::{
    AttachFilter, ChildInfo, LeaderData, NeighborInfo, NeighborIterator, RouterInfo,
};
