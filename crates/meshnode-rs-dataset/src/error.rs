// crates/meshnode-rs-dataset/src/error.rs

use alloc::fmt;
use hex::FromHexError;
use meshnode_rs::MeshError;
use quick_xml::errors::serialize::DeError;
use quick_xml::errors::serialize::SeError;

/// Errors that can occur while loading or saving a commissioning file.
#[derive(Debug)]
pub enum DatasetFileError {
    /// An error from the underlying `quick-xml` deserializer.
    XmlParsing(DeError),

    /// An error from the underlying `quick-xml` serializer.
    XmlSerializing(SeError),

    /// A key, prefix or extended PAN ID contained invalid hex.
    HexParsing(FromHexError),

    /// An error occurred during string formatting.
    FmtError(fmt::Error),

    /// A required XML element was missing (e.g. ActiveDataset).
    MissingElement { element: &'static str },

    /// A numeric element or attribute could not be parsed or is out of range.
    InvalidValue { element: &'static str },

    /// A hex value decoded to the wrong number of bytes.
    InvalidLength {
        element: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The values parsed, but do not form a usable dataset.
    ValidationError(&'static str),
}

impl From<DeError> for DatasetFileError {
    fn from(e: DeError) -> Self {
        DatasetFileError::XmlParsing(e)
    }
}

impl From<SeError> for DatasetFileError {
    fn from(e: SeError) -> Self {
        DatasetFileError::XmlSerializing(e)
    }
}

impl From<FromHexError> for DatasetFileError {
    fn from(e: FromHexError) -> Self {
        DatasetFileError::HexParsing(e)
    }
}

impl From<fmt::Error> for DatasetFileError {
    fn from(e: fmt::Error) -> Self {
        DatasetFileError::FmtError(e)
    }
}

/// Lets applications feed a loaded file into a node with a single `?` chain.
impl From<DatasetFileError> for MeshError {
    fn from(e: DatasetFileError) -> Self {
        match e {
            DatasetFileError::XmlSerializing(_) | DatasetFileError::FmtError(_) => {
                MeshError::Failed
            }
            _ => MeshError::Parse("invalid commissioning file"),
        }
    }
}

impl fmt::Display for DatasetFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetFileError::XmlParsing(e) => write!(f, "XML parsing error: {}", e),
            DatasetFileError::XmlSerializing(e) => write!(f, "XML serializing error: {}", e),
            DatasetFileError::HexParsing(e) => write!(f, "Hex parsing error: {}", e),
            DatasetFileError::FmtError(e) => write!(f, "Formatting error: {}", e),
            DatasetFileError::MissingElement { element } => {
                write!(f, "Missing required XML element: {}", element)
            }
            DatasetFileError::InvalidValue { element } => {
                write!(f, "Invalid value for: {}", element)
            }
            DatasetFileError::InvalidLength {
                element,
                expected,
                actual,
            } => write!(
                f,
                "Invalid length for {}: expected {} bytes but got {} bytes",
                element, expected, actual
            ),
            DatasetFileError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}
