use super::Instance;
use crate::dataset::{DatasetKind, DatasetManager, OperationalDataset};
use crate::hal::{MeshEngine, MeshError, Platform, SettingsStore};
use crate::notifier::ChangedFlags;
use crate::types::Ip6Address;
use log::{debug, info, warn};

fn dataset_flag(kind: DatasetKind) -> ChangedFlags {
    match kind {
        DatasetKind::Active => ChangedFlags::ACTIVE_DATASET,
        DatasetKind::Pending => ChangedFlags::PENDING_DATASET,
    }
}

impl<E: MeshEngine, P: Platform, S: SettingsStore> Instance<E, P, S> {
    /// A copy of the Active dataset.
    pub fn active_dataset(&self) -> OperationalDataset {
        self.datasets.active().clone()
    }

    /// A copy of the Pending dataset.
    pub fn pending_dataset(&self) -> OperationalDataset {
        self.datasets.pending().clone()
    }

    /// Pushes the network parameters of a new Active dataset into the
    /// engine, then commits and persists it.
    ///
    /// If the engine refuses a parameter, nothing is committed and the
    /// engine keeps its previous values.
    pub fn set_active_dataset(&mut self, dataset: OperationalDataset) -> Result<(), MeshError> {
        self.commit_dataset(DatasetKind::Active, dataset)
    }

    /// Commits and persists a new Pending dataset.
    pub fn set_pending_dataset(&mut self, dataset: OperationalDataset) -> Result<(), MeshError> {
        self.commit_dataset(DatasetKind::Pending, dataset)
    }

    /// True if the Active dataset holds all five network parameters.
    pub fn is_node_commissioned(&self) -> bool {
        self.datasets.is_commissioned()
    }

    /// Asks the network for the listed dataset TLVs.
    ///
    /// Without a destination the request goes to the realm-local
    /// all-routers address. The answer arrives as an engine event.
    pub fn send_dataset_get(
        &mut self,
        kind: DatasetKind,
        tlv_types: &[u8],
        destination: Option<Ip6Address>,
    ) -> Result<(), MeshError> {
        self.datasets.validate_get_request(tlv_types)?;
        let destination = destination.unwrap_or(Ip6Address::REALM_LOCAL_ALL_ROUTERS);
        self.engine.send_dataset_get(kind, tlv_types, destination)
    }

    /// Proposes a dataset to the leader, with extra raw TLVs appended.
    ///
    /// Pending proposals carry a delay timer of at least the configured
    /// minimum. Acceptance is reported later through engine events.
    pub fn send_dataset_set(
        &mut self,
        kind: DatasetKind,
        dataset: &OperationalDataset,
        raw_tlvs: &[u8],
    ) -> Result<(), MeshError> {
        let payload = self.datasets.build_set_request(kind, dataset, raw_tlvs)?;
        info!("[DATASET] Sending {:?} set request ({} bytes)", kind, payload.len());
        self.engine.send_dataset_set(kind, &payload)
    }

    pub fn delay_timer_minimal(&self) -> u32 {
        self.datasets.delay_timer_minimal()
    }

    pub fn set_delay_timer_minimal(&mut self, delay_ms: u32) -> Result<(), MeshError> {
        self.datasets.set_delay_timer_minimal(delay_ms)
    }

    fn commit_dataset(&mut self, kind: DatasetKind, dataset: OperationalDataset) -> Result<(), MeshError> {
        let prepared = DatasetManager::prepare(kind, dataset);
        if kind == DatasetKind::Active {
            self.apply_network_parameters(&prepared)?;
        }
        self.datasets.set(kind, prepared);
        self.notifier.signal(dataset_flag(kind));
        self.datasets.save(&mut self.settings, kind)
    }

    /// Applies a dataset learned from the network. Persistence failures are
    /// logged, since the network's view has already changed. An Active
    /// dataset the engine refuses is dropped.
    pub(super) fn adopt_dataset(&mut self, kind: DatasetKind, dataset: OperationalDataset) {
        let prepared = DatasetManager::prepare(kind, dataset);
        if kind == DatasetKind::Active {
            if let Err(e) = self.apply_network_parameters(&prepared) {
                warn!("[DATASET] Engine refused Active dataset parameters: {}", e);
                return;
            }
        }
        self.datasets.set(kind, prepared);
        self.notifier.signal(dataset_flag(kind));
        self.persist_dataset(kind);
    }

    /// Promotes Pending to Active once its delay timer has run out.
    ///
    /// If the engine refuses the promoted parameters, both datasets stay.
    pub(super) fn promote_pending_dataset(&mut self) {
        let Some(promoted) = self.datasets.pending_promotion() else {
            debug!("[DATASET] Delay expired with no Pending dataset");
            return;
        };
        if let Err(e) = self.apply_network_parameters(&promoted) {
            warn!("[DATASET] Engine refused promoted dataset parameters: {}", e);
            return;
        }
        self.datasets.promote_pending();
        self.notifier
            .signal(ChangedFlags::ACTIVE_DATASET | ChangedFlags::PENDING_DATASET);
        self.persist_dataset(DatasetKind::Active);
        self.persist_dataset(DatasetKind::Pending);
    }
}
