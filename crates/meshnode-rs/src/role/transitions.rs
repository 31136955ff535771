use super::states::{NodeRole, RoleOperation};
use crate::hal::MeshError;

/// What the controller does with a role operation in a given role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The operation is refused; the role does not change.
    Reject(MeshError),
    /// Succeed without touching the engine or the role.
    Stay,
    /// Forward the request to the engine. If the engine accepts it and
    /// `settle` is set, the role moves there immediately; otherwise the
    /// engine reports the outcome later.
    Request { settle: Option<NodeRole> },
}

/// The role transition table.
pub fn transition(role: NodeRole, op: RoleOperation) -> Transition {
    use NodeRole::*;
    use RoleOperation as Op;

    match (role, op) {
        // Start only does work from Disabled; a running node stays as is.
        (Disabled, Op::Start) => Transition::Request {
            settle: Some(Detached),
        },
        (_, Op::Start) => Transition::Stay,

        // Stop is idempotent and always succeeds.
        (Disabled, Op::Stop) => Transition::Stay,
        (_, Op::Stop) => Transition::Request {
            settle: Some(Disabled),
        },

        // Attach operations need a running protocol; only Start leaves Disabled.
        (Disabled, Op::BecomeDetached | Op::BecomeChild(_) | Op::BecomeLeader) => {
            Transition::Reject(MeshError::InvalidState)
        }

        (_, Op::BecomeDetached) => Transition::Request {
            settle: Some(Detached),
        },

        // Attach outcome arrives as an engine event.
        (_, Op::BecomeChild(_)) => Transition::Request { settle: None },

        // Router upgrade is only meaningful from Child.
        (Disabled | Detached, Op::BecomeRouter) => Transition::Reject(MeshError::InvalidState),
        (Child, Op::BecomeRouter) => Transition::Request { settle: None },
        (Router | Leader, Op::BecomeRouter) => Transition::Stay,

        (_, Op::BecomeLeader) => Transition::Request {
            settle: Some(Leader),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::topology::AttachFilter;

    const ALL_ROLES: [NodeRole; 5] = [
        NodeRole::Disabled,
        NodeRole::Detached,
        NodeRole::Child,
        NodeRole::Router,
        NodeRole::Leader,
    ];

    #[test]
    fn test_become_router_table() {
        let expected = [
            Transition::Reject(MeshError::InvalidState),
            Transition::Reject(MeshError::InvalidState),
            Transition::Request { settle: None },
            Transition::Stay,
            Transition::Stay,
        ];
        for (role, want) in ALL_ROLES.into_iter().zip(expected) {
            assert_eq!(
                transition(role, RoleOperation::BecomeRouter),
                want,
                "role {:?}",
                role
            );
        }
    }

    #[test]
    fn test_stop_from_every_role() {
        assert_eq!(
            transition(NodeRole::Disabled, RoleOperation::Stop),
            Transition::Stay
        );
        for role in &ALL_ROLES[1..] {
            assert_eq!(
                transition(*role, RoleOperation::Stop),
                Transition::Request {
                    settle: Some(NodeRole::Disabled)
                }
            );
        }
    }

    #[test]
    fn test_start_only_from_disabled() {
        assert_eq!(
            transition(NodeRole::Disabled, RoleOperation::Start),
            Transition::Request {
                settle: Some(NodeRole::Detached)
            }
        );
        for role in &ALL_ROLES[1..] {
            assert_eq!(transition(*role, RoleOperation::Start), Transition::Stay);
        }
    }

    #[test]
    fn test_attach_operations_rejected_while_disabled() {
        for op in [
            RoleOperation::BecomeDetached,
            RoleOperation::BecomeLeader,
            RoleOperation::BecomeChild(AttachFilter::SamePartition),
        ] {
            assert_eq!(
                transition(NodeRole::Disabled, op),
                Transition::Reject(MeshError::InvalidState),
                "op {:?}",
                op
            );
        }
    }

    #[test]
    fn test_unconditional_operations() {
        for role in &ALL_ROLES[1..] {
            let role = *role;
            assert_eq!(
                transition(role, RoleOperation::BecomeDetached),
                Transition::Request {
                    settle: Some(NodeRole::Detached)
                }
            );
            assert_eq!(
                transition(role, RoleOperation::BecomeLeader),
                Transition::Request {
                    settle: Some(NodeRole::Leader)
                }
            );
            assert_eq!(
                transition(role, RoleOperation::BecomeChild(AttachFilter::AnyPartition)),
                Transition::Request { settle: None }
            );
        }
    }
}
