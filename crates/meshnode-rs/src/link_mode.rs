use core::ops::BitOr;

/// The MLE Mode TLV byte as a type-safe bitmask.
///
/// Only the four capability bits are defined; every other bit is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceMode(u8);

impl DeviceMode {
    // --- Flag Constants ---
    pub const FULL_NETWORK_DATA: Self = Self(1 << 0);
    pub const FULL_FUNCTION_DEVICE: Self = Self(1 << 1);
    pub const SECURE_DATA_REQUESTS: Self = Self(1 << 2);
    pub const RX_ON_WHEN_IDLE: Self = Self(1 << 3);

    /// Union of all defined bits.
    const DEFINED: u8 = 0x0F;

    // --- Methods ---

    /// Creates a `DeviceMode` from a raw byte, dropping reserved bits.
    pub fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::DEFINED)
    }

    /// Returns the raw byte.
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Checks if all of the specified flags are set.
    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns an empty set of flags.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Inserts the specified flags.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for DeviceMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// The application-facing view of the device mode: four independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkModeConfig {
    /// The receiver stays on while the node is idle.
    pub rx_on_when_idle: bool,
    /// Data requests are secured at the MAC layer.
    pub secure_data_requests: bool,
    /// The node is a full function device (router-capable).
    pub full_function_device: bool,
    /// The node wants the full network data, not only stable entries.
    pub full_network_data: bool,
}

impl LinkModeConfig {
    /// Packs the four flags into a `DeviceMode`. Reserved bits are zero.
    pub fn to_mode(&self) -> DeviceMode {
        let mut mode = DeviceMode::empty();
        if self.rx_on_when_idle {
            mode.insert(DeviceMode::RX_ON_WHEN_IDLE);
        }
        if self.secure_data_requests {
            mode.insert(DeviceMode::SECURE_DATA_REQUESTS);
        }
        if self.full_function_device {
            mode.insert(DeviceMode::FULL_FUNCTION_DEVICE);
        }
        if self.full_network_data {
            mode.insert(DeviceMode::FULL_NETWORK_DATA);
        }
        mode
    }

    /// Unpacks the four flags from a `DeviceMode`.
    pub fn from_mode(mode: DeviceMode) -> Self {
        Self {
            rx_on_when_idle: mode.contains(DeviceMode::RX_ON_WHEN_IDLE),
            secure_data_requests: mode.contains(DeviceMode::SECURE_DATA_REQUESTS),
            full_function_device: mode.contains(DeviceMode::FULL_FUNCTION_DEVICE),
            full_network_data: mode.contains(DeviceMode::FULL_NETWORK_DATA),
        }
    }

    /// Encodes directly to the wire byte.
    pub fn encode(&self) -> u8 {
        self.to_mode().bits()
    }

    /// Decodes from a wire byte, ignoring reserved bits.
    pub fn decode(byte: u8) -> Self {
        Self::from_mode(DeviceMode::from_bits_truncate(byte))
    }
}

impl From<LinkModeConfig> for DeviceMode {
    fn from(config: LinkModeConfig) -> Self {
        config.to_mode()
    }
}

impl From<DeviceMode> for LinkModeConfig {
    fn from(mode: DeviceMode) -> Self {
        LinkModeConfig::from_mode(mode)
    }
}
