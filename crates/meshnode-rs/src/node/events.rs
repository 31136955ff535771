use super::Instance;
use crate::dataset::{DatasetKind, OperationalDataset};
use crate::hal::{MeshEngine, Platform, SettingsStore};
use crate::notifier::ChangedFlags;
use crate::role::{DiscoverResult, NodeRole};
use crate::types::Rloc16;
use log::{debug, info};

/// Asynchronous outcomes reported by the protocol engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// An attach, upgrade, downgrade or detach completed.
    RoleChanged(NodeRole),
    /// The network uses a newer key sequence.
    KeySequenceReceived(u32),
    /// The leader distributed a new Active dataset.
    ActiveDatasetReceived(OperationalDataset),
    /// The leader distributed a new Pending dataset.
    PendingDatasetReceived(OperationalDataset),
    /// The Pending dataset's delay timer ran out.
    PendingDelayExpired,
    /// The node joined or formed a different partition.
    PartitionIdChanged(u32),
    ChildAdded(Rloc16),
    ChildRemoved(Rloc16),
    /// A network answered the running discovery scan.
    DiscoverResponse(DiscoverResult),
    /// The discovery scan finished.
    DiscoverDone,
}

impl<E: MeshEngine, P: Platform, S: SettingsStore> Instance<E, P, S> {
    /// Applies an engine event and then delivers every pending state change
    /// to the registered callbacks. Returns the delivered flags.
    pub fn process_event(&mut self, event: EngineEvent) -> ChangedFlags {
        debug!("[NODE] Processing engine event {:?}", event);

        match event {
            EngineEvent::RoleChanged(role) => {
                if self.role.set_role(role) {
                    self.notifier.signal(ChangedFlags::ROLE);
                }
            }
            EngineEvent::KeySequenceReceived(key_sequence) => {
                let now = self.now_ms();
                if self.keys.try_advance(key_sequence, now) {
                    self.engine.set_key_sequence(key_sequence);
                    self.notifier.signal(ChangedFlags::KEY_SEQUENCE);
                }
            }
            EngineEvent::ActiveDatasetReceived(dataset) => {
                info!("[DATASET] Active dataset received from the network");
                self.adopt_dataset(DatasetKind::Active, dataset);
            }
            EngineEvent::PendingDatasetReceived(dataset) => {
                info!("[DATASET] Pending dataset received from the network");
                self.adopt_dataset(DatasetKind::Pending, dataset);
            }
            EngineEvent::PendingDelayExpired => self.promote_pending_dataset(),
            EngineEvent::PartitionIdChanged(partition_id) => {
                info!("[ROLE] Partition ID now {:#010x}", partition_id);
                self.notifier.signal(ChangedFlags::PARTITION_ID);
            }
            EngineEvent::ChildAdded(rloc16) => {
                debug!("[ROLE] Child {:#06x} added", rloc16);
                self.notifier.signal(ChangedFlags::CHILD_ADDED);
            }
            EngineEvent::ChildRemoved(rloc16) => {
                debug!("[ROLE] Child {:#06x} removed", rloc16);
                self.notifier.signal(ChangedFlags::CHILD_REMOVED);
            }
            EngineEvent::DiscoverResponse(result) => match self.discover_handler {
                Some((handler, context)) => handler(Some(&result), context),
                None => debug!("[ROLE] Discovery response with no scan running"),
            },
            EngineEvent::DiscoverDone => {
                if let Some((handler, context)) = self.discover_handler.take() {
                    info!("[ROLE] Discovery scan finished");
                    handler(None, context);
                }
            }
        }

        self.notifier.flush()
    }
}
