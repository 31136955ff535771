use core::ops::BitOr;

/// Set of observable state changes delivered to state-changed callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangedFlags(pub u32);

impl ChangedFlags {
    // --- Flag Constants ---
    pub const ROLE: Self = Self(1 << 0);
    pub const PARTITION_ID: Self = Self(1 << 1);
    pub const KEY_SEQUENCE: Self = Self(1 << 2);
    pub const ACTIVE_DATASET: Self = Self(1 << 3);
    pub const PENDING_DATASET: Self = Self(1 << 4);
    pub const PAN_ID: Self = Self(1 << 5);
    pub const CHANNEL: Self = Self(1 << 6);
    pub const EXTENDED_PAN_ID: Self = Self(1 << 7);
    pub const MESH_LOCAL_PREFIX: Self = Self(1 << 8);
    pub const NETWORK_NAME: Self = Self(1 << 9);
    pub const MASTER_KEY: Self = Self(1 << 10);
    pub const LINK_MODE: Self = Self(1 << 11);
    pub const CHILD_ADDED: Self = Self(1 << 12);
    pub const CHILD_REMOVED: Self = Self(1 << 13);

    const ALL: u32 = (1 << 14) - 1;

    /// Creates a new `ChangedFlags` from a raw u32 value, dropping undefined bits.
    pub fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL)
    }

    /// Checks if all of the specified flags are set.
    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns an empty set of flags.
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Inserts the specified flags.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for ChangedFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}
