use super::states::{NodeRole, RoleOperation};
use super::topology::{AttachFilter, RouterUpgradeReason};
use super::transitions::{Transition, transition};
use crate::hal::{MeshEngine, MeshError};
use crate::types::PAN_ID_BROADCAST;
use log::{debug, info, warn};

/// Owns the node role and drives role operations through the engine.
///
/// Every operation returns `Ok(true)` when it changed the role, `Ok(false)`
/// when the role is unchanged (including requests whose outcome the engine
/// reports later).
#[derive(Debug, Default)]
pub struct RoleController {
    role: NodeRole,
}

impl RoleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Applies a role reported by the engine. Returns true if it changed.
    pub fn set_role(&mut self, role: NodeRole) -> bool {
        if self.role == role {
            return false;
        }
        info!("[ROLE] {:?} -> {:?}", self.role, role);
        self.role = role;
        true
    }

    /// Starts the protocol. Refused while the PAN ID is unset.
    pub fn start<E: MeshEngine>(&mut self, engine: &mut E) -> Result<bool, MeshError> {
        if engine.pan_id() == PAN_ID_BROADCAST {
            warn!("[ROLE] Start refused: PAN ID not configured");
            return Err(MeshError::InvalidState);
        }
        self.run(engine, RoleOperation::Start)
    }

    /// Stops the protocol. Never fails.
    pub fn stop<E: MeshEngine>(&mut self, engine: &mut E) -> bool {
        // Stop has no reject arm and its engine request is infallible.
        self.run(engine, RoleOperation::Stop).unwrap_or(false)
    }

    pub fn become_detached<E: MeshEngine>(&mut self, engine: &mut E) -> Result<bool, MeshError> {
        self.run(engine, RoleOperation::BecomeDetached)
    }

    pub fn become_child<E: MeshEngine>(
        &mut self,
        engine: &mut E,
        filter: AttachFilter,
    ) -> Result<bool, MeshError> {
        self.run(engine, RoleOperation::BecomeChild(filter))
    }

    pub fn become_router<E: MeshEngine>(&mut self, engine: &mut E) -> Result<bool, MeshError> {
        self.run(engine, RoleOperation::BecomeRouter)
    }

    pub fn become_leader<E: MeshEngine>(&mut self, engine: &mut E) -> Result<bool, MeshError> {
        self.run(engine, RoleOperation::BecomeLeader)
    }

    fn run<E: MeshEngine>(&mut self, engine: &mut E, op: RoleOperation) -> Result<bool, MeshError> {
        match transition(self.role, op) {
            Transition::Reject(err) => {
                warn!("[ROLE] {:?} rejected in role {:?}: {}", op, self.role, err);
                Err(err)
            }
            Transition::Stay => {
                debug!("[ROLE] {:?} in role {:?}: nothing to do", op, self.role);
                Ok(false)
            }
            Transition::Request { settle } => {
                request(engine, op)
                    .inspect_err(|e| warn!("[ROLE] Engine refused {:?}: {}", op, e))?;
                Ok(settle.is_some_and(|role| self.set_role(role)))
            }
        }
    }
}

fn request<E: MeshEngine>(engine: &mut E, op: RoleOperation) -> Result<(), MeshError> {
    match op {
        RoleOperation::Start => engine.start(),
        RoleOperation::Stop => {
            engine.stop();
            Ok(())
        }
        RoleOperation::BecomeDetached => engine.become_detached(),
        RoleOperation::BecomeChild(filter) => engine.become_child(filter),
        RoleOperation::BecomeRouter => {
            engine.become_router(RouterUpgradeReason::HaveChildIdRequest)
        }
        RoleOperation::BecomeLeader => engine.become_leader(),
    }
}
