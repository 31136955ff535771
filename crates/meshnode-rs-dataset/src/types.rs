// crates/meshnode-rs-dataset/src/types.rs

use meshnode_rs::OperationalDataset;

/// Version written to the `version` attribute of saved files.
pub const FILE_FORMAT_VERSION: &str = "1.0";

/// The contents of a commissioning file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommissioningFile {
    /// The dataset the node should operate on.
    pub active: OperationalDataset,
    /// An optional staged dataset, e.g. for a planned channel migration.
    pub pending: Option<OperationalDataset>,
}
