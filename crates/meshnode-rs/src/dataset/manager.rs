// crates/meshnode-rs/src/dataset/manager.rs

use super::{DatasetKind, OperationalDataset, tlv};
use crate::hal::{MeshError, SettingsStore};
use crate::settings::{self, SettingsKey};
use crate::types::MeshLocalPrefix;
use alloc::vec::Vec;
use log::{debug, info, warn};

/// Maximum number of TLV types in a single get request.
pub const MAX_GET_REQUEST_TLV_TYPES: usize = 32;

/// Maximum length of the raw TLVs appended to a set request.
pub const MAX_RAW_TLVS_LENGTH: usize = tlv::MAX_TLV_LENGTH;

/// Owns the Active and Pending datasets and their persistence.
#[derive(Debug, Clone)]
pub struct DatasetManager {
    active: OperationalDataset,
    pending: OperationalDataset,
    /// Floor for the Pending delay timer in milliseconds.
    delay_timer_minimal: u32,
}

impl DatasetManager {
    pub fn new(delay_timer_minimal: u32) -> Self {
        Self {
            active: OperationalDataset::default(),
            pending: OperationalDataset::default(),
            delay_timer_minimal,
        }
    }

    pub fn get(&self, kind: DatasetKind) -> &OperationalDataset {
        match kind {
            DatasetKind::Active => &self.active,
            DatasetKind::Pending => &self.pending,
        }
    }

    pub fn active(&self) -> &OperationalDataset {
        &self.active
    }

    pub fn pending(&self) -> &OperationalDataset {
        &self.pending
    }

    /// Returns `dataset` as it would be stored under `kind`.
    ///
    /// For Active, a present extended PAN ID re-derives the mesh-local prefix.
    pub fn prepare(kind: DatasetKind, mut dataset: OperationalDataset) -> OperationalDataset {
        if kind == DatasetKind::Active {
            if let Some(epid) = &dataset.extended_pan_id {
                dataset.mesh_local_prefix = Some(MeshLocalPrefix::from_extended_pan_id(epid));
            }
        }
        dataset
    }

    /// Commits `dataset` locally and returns a reference to the stored copy.
    pub fn set(&mut self, kind: DatasetKind, dataset: OperationalDataset) -> &OperationalDataset {
        let dataset = Self::prepare(kind, dataset);
        info!(
            "[DATASET] {:?} dataset committed (commissioned: {})",
            kind,
            dataset.is_commissioned()
        );
        let slot = match kind {
            DatasetKind::Active => &mut self.active,
            DatasetKind::Pending => &mut self.pending,
        };
        *slot = dataset;
        slot
    }

    /// Returns a mutable reference to a dataset for in-place attribute updates.
    pub fn get_mut(&mut self, kind: DatasetKind) -> &mut OperationalDataset {
        match kind {
            DatasetKind::Active => &mut self.active,
            DatasetKind::Pending => &mut self.pending,
        }
    }

    pub fn is_commissioned(&self) -> bool {
        self.active.is_commissioned()
    }

    pub fn delay_timer_minimal(&self) -> u32 {
        self.delay_timer_minimal
    }

    pub fn set_delay_timer_minimal(&mut self, delay_ms: u32) -> Result<(), MeshError> {
        if delay_ms == 0 {
            warn!("[DATASET] Rejected zero delay timer minimal");
            return Err(MeshError::InvalidArgs);
        }
        self.delay_timer_minimal = delay_ms;
        Ok(())
    }

    /// Writes one dataset to the settings store. An empty dataset deletes the key.
    pub fn save<S: SettingsStore>(&self, store: &mut S, kind: DatasetKind) -> Result<(), MeshError> {
        let key = settings_key(kind);
        let dataset = self.get(kind);
        if dataset.is_empty() {
            debug!("[SETTINGS] Deleting {:?}", key);
            store.delete(key.into())
        } else {
            let blob = tlv::encode(dataset);
            debug!("[SETTINGS] Saving {:?} ({} bytes)", key, blob.len());
            store.set(key.into(), &blob)
        }
    }

    /// Loads both datasets from the settings store.
    ///
    /// A missing key leaves the dataset empty. A corrupt blob is logged and
    /// also leaves the dataset empty; only backend failures are returned.
    pub fn restore<S: SettingsStore>(&mut self, store: &mut S) -> Result<(), MeshError> {
        for kind in [DatasetKind::Active, DatasetKind::Pending] {
            let Some(blob) = settings::read_optional(store, settings_key(kind))? else {
                continue;
            };
            match tlv::decode(&blob) {
                Ok(dataset) => {
                    info!("[SETTINGS] Restored {:?} dataset ({} bytes)", kind, blob.len());
                    *self.get_mut(kind) = dataset;
                }
                Err(e) => warn!("[SETTINGS] Ignoring corrupt {:?} dataset: {}", kind, e),
            }
        }
        Ok(())
    }

    /// Checks a get request's TLV type list.
    pub fn validate_get_request(&self, tlv_types: &[u8]) -> Result<(), MeshError> {
        if tlv_types.len() > MAX_GET_REQUEST_TLV_TYPES {
            warn!(
                "[DATASET] Get request with {} TLV types (max {})",
                tlv_types.len(),
                MAX_GET_REQUEST_TLV_TYPES
            );
            return Err(MeshError::InvalidArgs);
        }
        Ok(())
    }

    /// Builds the TLV payload of a set request.
    ///
    /// Pending requests always carry a delay timer no smaller than the
    /// configured minimal value.
    pub fn build_set_request(
        &self,
        kind: DatasetKind,
        dataset: &OperationalDataset,
        raw_tlvs: &[u8],
    ) -> Result<Vec<u8>, MeshError> {
        if raw_tlvs.len() > MAX_RAW_TLVS_LENGTH {
            warn!(
                "[DATASET] Raw TLVs too long: {} bytes (max {})",
                raw_tlvs.len(),
                MAX_RAW_TLVS_LENGTH
            );
            return Err(MeshError::InvalidArgs);
        }

        let mut request = dataset.clone();
        if kind == DatasetKind::Pending {
            let delay = request.delay.unwrap_or(0);
            if delay < self.delay_timer_minimal {
                warn!(
                    "[DATASET] Pending delay {} ms raised to minimal {} ms",
                    delay, self.delay_timer_minimal
                );
                request.delay = Some(self.delay_timer_minimal);
            }
        }

        let mut payload = tlv::encode(&request);
        payload.extend_from_slice(raw_tlvs);
        Ok(payload)
    }

    /// The Active dataset that promoting Pending would produce, without the
    /// delay timer and pending timestamp. `None` if Pending is empty.
    pub fn pending_promotion(&self) -> Option<OperationalDataset> {
        if self.pending.is_empty() {
            return None;
        }
        let mut promoted = self.pending.clone();
        promoted.delay = None;
        promoted.pending_timestamp = None;
        Some(Self::prepare(DatasetKind::Active, promoted))
    }

    /// Replaces Active with the Pending dataset and clears Pending.
    ///
    /// Returns false if there was nothing to promote.
    pub fn promote_pending(&mut self) -> bool {
        let Some(promoted) = self.pending_promotion() else {
            debug!("[DATASET] Delay expired with no Pending dataset");
            return false;
        };
        self.pending = OperationalDataset::default();
        self.set(DatasetKind::Active, promoted);
        info!("[DATASET] Pending dataset promoted to Active");
        true
    }
}

fn settings_key(kind: DatasetKind) -> SettingsKey {
    match kind {
        DatasetKind::Active => SettingsKey::ActiveDataset,
        DatasetKind::Pending => SettingsKey::PendingDataset,
    }
}
