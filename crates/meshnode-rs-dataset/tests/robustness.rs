// crates/meshnode-rs-dataset/tests/robustness.rs

use meshnode_rs::MeshError;
use meshnode_rs_dataset::{DatasetFileError, load_commissioning_from_str};

fn wrap_active(body: &str) -> String {
    format!(
        "<Commissioning><ActiveDataset>{}</ActiveDataset></Commissioning>",
        body
    )
}

#[test]
fn test_malformed_xml_is_rejected() {
    let result = load_commissioning_from_str("<Commissioning><ActiveDataset>");
    assert!(matches!(result, Err(DatasetFileError::XmlParsing(_))));
}

#[test]
fn test_missing_active_dataset() {
    let result = load_commissioning_from_str("<Commissioning version=\"1.0\"></Commissioning>");
    assert!(matches!(
        result,
        Err(DatasetFileError::MissingElement {
            element: "ActiveDataset"
        })
    ));
}

#[test]
fn test_empty_active_dataset() {
    // An empty element may come back from the deserializer as absent.
    let result = load_commissioning_from_str(&wrap_active(""));
    assert!(matches!(
        result,
        Err(DatasetFileError::ValidationError(_)) | Err(DatasetFileError::MissingElement { .. })
    ));
}

#[test]
fn test_network_name_too_long() {
    let result =
        load_commissioning_from_str(&wrap_active("<NetworkName>ThisNameIsFarTooLong</NetworkName>"));
    assert!(matches!(
        result,
        Err(DatasetFileError::InvalidValue {
            element: "NetworkName"
        })
    ));
}

#[test]
fn test_master_key_wrong_length() {
    let result = load_commissioning_from_str(&wrap_active("<MasterKey>0x0011223344</MasterKey>"));
    assert!(matches!(
        result,
        Err(DatasetFileError::InvalidLength {
            element: "MasterKey",
            expected: 16,
            actual: 5,
        })
    ));
}

#[test]
fn test_bad_hex_in_extended_pan_id() {
    let result =
        load_commissioning_from_str(&wrap_active("<ExtendedPanId>0xzz00beef00cafe00</ExtendedPanId>"));
    assert!(matches!(result, Err(DatasetFileError::HexParsing(_))));
}

#[test]
fn test_channel_out_of_u16_range() {
    let result = load_commissioning_from_str(&wrap_active("<Channel>70000</Channel>"));
    assert!(matches!(
        result,
        Err(DatasetFileError::InvalidValue { element: "Channel" })
    ));
}

#[test]
fn test_delay_in_active_dataset() {
    let result = load_commissioning_from_str(&wrap_active(
        "<Channel>15</Channel><Delay>30000</Delay>",
    ));
    assert!(matches!(result, Err(DatasetFileError::ValidationError(_))));
}

#[test]
fn test_errors_convert_for_node_calls() {
    let err = load_commissioning_from_str(&wrap_active("<PanId>0xzzzz</PanId>")).unwrap_err();
    assert!(!err.to_string().is_empty());
    assert!(matches!(MeshError::from(err), MeshError::Parse(_)));
}
