// crates/meshnode-rs-dataset/tests/parsing.rs

use meshnode_rs::dataset::SecurityPolicy;
use meshnode_rs::types::{ExtendedPanId, MasterKey, MeshLocalPrefix};
use meshnode_rs_dataset::{
    CommissioningFile, FILE_FORMAT_VERSION, load_commissioning_from_str,
    save_commissioning_to_string,
};
use std::fs;
use std::path::PathBuf;

/// Helper function to load a test file from the `tests/data/` directory.
fn load_test_file(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e))
}

#[test]
fn test_load_full_active_dataset() {
    let xml_content = load_test_file("home_network.xml");
    let file = load_commissioning_from_str(&xml_content).expect("Failed to parse home network");

    let active = &file.active;
    assert!(active.is_commissioned());
    assert_eq!(active.channel, Some(15));
    assert_eq!(active.pan_id, Some(0x1234));
    assert_eq!(
        active.extended_pan_id,
        Some(ExtendedPanId([0xde, 0xad, 0x00, 0xbe, 0xef, 0x00, 0xca, 0xfe]))
    );
    assert_eq!(
        active.network_name.as_ref().map(|n| n.as_str()),
        Some("OpenMesh")
    );
    assert_eq!(
        active.master_key,
        Some(MasterKey([
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ]))
    );
    assert_eq!(
        active.mesh_local_prefix,
        Some(MeshLocalPrefix([0xfd, 0xde, 0xad, 0x00, 0xbe, 0xef, 0x00, 0x00]))
    );
    assert_eq!(
        active.security_policy,
        Some(SecurityPolicy {
            rotation_time: 672,
            flags: 0xf7,
        })
    );
    assert!(active.pskc.is_some());
    assert_eq!(active.active_timestamp, Some(1));
    assert_eq!(active.channel_mask_page0, Some(0x07ff_f800));
    assert_eq!(active.delay, None);

    assert!(file.pending.is_none());
}

#[test]
fn test_load_pending_migration() {
    let xml_content = load_test_file("channel_migration.xml");
    let file = load_commissioning_from_str(&xml_content).expect("Failed to parse migration");

    assert_eq!(file.active.channel, Some(15));
    let pending = file.pending.expect("PendingDataset was not parsed");
    assert_eq!(pending.channel, Some(20));
    assert_eq!(pending.active_timestamp, Some(2));
    assert_eq!(pending.pending_timestamp, Some(2));
    assert_eq!(pending.delay, Some(300_000));
}

#[test]
fn test_partial_dataset_loads_and_ignores_unknown_elements() {
    let xml_content = load_test_file("partial_network.xml");
    let file = load_commissioning_from_str(&xml_content).expect("Failed to parse partial file");

    assert!(!file.active.is_commissioned());
    assert_eq!(file.active.channel, Some(26));
    assert_eq!(
        file.active.network_name.as_ref().map(|n| n.as_str()),
        Some("Lab Bench")
    );
    assert_eq!(file.active.pan_id, None);
}

/// Save a parsed file and load it again: the datasets must be unchanged.
#[test]
fn test_saved_file_loads_back() {
    let original = load_commissioning_from_str(&load_test_file("channel_migration.xml")).unwrap();

    let saved = save_commissioning_to_string(&original).expect("Failed to save");
    assert!(saved.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(saved.contains(&format!("version=\"{}\"", FILE_FORMAT_VERSION)));
    assert!(saved.contains("<Delay>300000</Delay>"));

    let reloaded: CommissioningFile = load_commissioning_from_str(&saved).unwrap();
    assert_eq!(reloaded, original);
}
