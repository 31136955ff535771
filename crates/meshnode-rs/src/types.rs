use alloc::string::String;
use core::fmt;

// --- Protocol Constants ---

/// PAN ID used as "not configured" and as the 802.15.4 broadcast PAN ID.
pub const PAN_ID_BROADCAST: PanId = 0xFFFF;

/// Maximum length of a network name in bytes (UTF-8 encoded).
pub const NETWORK_NAME_MAX_SIZE: usize = 16;

/// Size of the network master key in bytes.
pub const MASTER_KEY_SIZE: usize = 16;

/// Size of an Extended PAN ID in bytes.
pub const EXTENDED_PAN_ID_SIZE: usize = 8;

/// Size of a mesh-local prefix in bytes (a /64 prefix).
pub const MESH_LOCAL_PREFIX_SIZE: usize = 8;

/// Highest valid router ID.
pub const MAX_ROUTER_ID: u8 = 62;

/// First byte of every derived mesh-local prefix (ULA range).
const MESH_LOCAL_PREFIX_ULA: u8 = 0xfd;

/// Number of Extended PAN ID bytes copied into a derived mesh-local prefix.
const MESH_LOCAL_PREFIX_EPID_BYTES: usize = 5;

/// Number of bits the router ID is shifted by inside an RLOC16.
const ROUTER_ID_OFFSET: u16 = 10;

/// Mask of the child ID bits inside an RLOC16.
const CHILD_ID_MASK: u16 = 0x01FF;

/// 2-byte personal area network identifier.
pub type PanId = u16;

/// 16-bit routing locator of a node.
pub type Rloc16 = u16;

/// Extracts the router ID from an RLOC16.
pub fn router_id_from_rloc16(rloc16: Rloc16) -> u8 {
    (rloc16 >> ROUTER_ID_OFFSET) as u8
}

/// Extracts the child ID bits from an RLOC16.
pub fn child_id_from_rloc16(rloc16: Rloc16) -> u16 {
    rloc16 & CHILD_ID_MASK
}

/// IEEE 802.15.4 extended (64-bit) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ExtAddress(pub [u8; 8]);

/// 8-byte network identifier; source of the derived mesh-local prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ExtendedPanId(pub [u8; EXTENDED_PAN_ID_SIZE]);

/// 8-byte IPv6 prefix used for mesh-local addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MeshLocalPrefix(pub [u8; MESH_LOCAL_PREFIX_SIZE]);

impl MeshLocalPrefix {
    /// Derives the mesh-local prefix from an Extended PAN ID.
    ///
    /// Layout: `[0xfd, epid[0..5], 0x00, 0x00]`.
    pub fn from_extended_pan_id(ext_pan_id: &ExtendedPanId) -> Self {
        let mut prefix = [0u8; MESH_LOCAL_PREFIX_SIZE];
        prefix[0] = MESH_LOCAL_PREFIX_ULA;
        prefix[1..=MESH_LOCAL_PREFIX_EPID_BYTES]
            .copy_from_slice(&ext_pan_id.0[..MESH_LOCAL_PREFIX_EPID_BYTES]);
        Self(prefix)
    }
}

/// 128-bit network master key.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct MasterKey(pub [u8; MASTER_KEY_SIZE]);

impl fmt::Debug for MasterKey {
    // Key material is never printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

/// 128-bit pre-shared key for the commissioner.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Pskc(pub [u8; 16]);

impl fmt::Debug for Pskc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pskc(..)")
    }
}

/// A plain IPv6 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Ip6Address(pub [u8; 16]);

impl Ip6Address {
    /// Realm-local All-Routers multicast address (`ff03::2`).
    pub const REALM_LOCAL_ALL_ROUTERS: Self =
        Self([0xff, 0x03, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x02]);
}

/// Human-readable network name, at most 16 bytes of UTF-8.
///
/// The length limit is enforced on construction, so a `NetworkName` held
/// anywhere in the stack is always valid on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct NetworkName(String);

/// Error type for invalid network name creation.
#[derive(Debug, PartialEq, Eq)]
pub enum NetworkNameError {
    /// The name is longer than 16 bytes.
    TooLong(usize),
}

impl fmt::Display for NetworkNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkNameError::TooLong(len) => write!(
                f,
                "Network name is {} bytes long. Maximum is {} bytes.",
                len, NETWORK_NAME_MAX_SIZE
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NetworkNameError {}

impl NetworkName {
    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the UTF-8 bytes of the name.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<&str> for NetworkName {
    type Error = NetworkNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.len() > NETWORK_NAME_MAX_SIZE {
            return Err(NetworkNameError::TooLong(value.len()));
        }
        Ok(NetworkName(String::from(value)))
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
