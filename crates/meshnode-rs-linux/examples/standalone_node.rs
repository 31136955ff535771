use meshnode_rs::{
    CallbackContext, ChangedFlags, ExtendedPanId, Instance, MasterKey, NetworkName, NodeConfig,
    OperationalDataset,
};
use meshnode_rs_linux::{FileSettingsStore, LoopbackEngine, SystemPlatform};
use std::thread;
use std::time::Duration;

fn on_state_changed(flags: ChangedFlags, _context: CallbackContext) {
    println!("State changed: {:#06x}", flags.0);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Settings persist between runs; delete the directory to start over.
    let mut node = Instance::new(
        LoopbackEngine::new(),
        SystemPlatform::new(),
        FileSettingsStore::new("meshnode-settings"),
        NodeConfig::default(),
    )?;
    node.set_state_changed_callback(on_state_changed, 0)?;

    if !node.is_node_commissioned() {
        println!("Commissioning a new network...");
        node.set_active_dataset(OperationalDataset {
            active_timestamp: Some(1),
            master_key: Some(MasterKey([
                0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc,
                0xdd, 0xee, 0xff,
            ])),
            network_name: Some(NetworkName::try_from("OpenMesh")?),
            extended_pan_id: Some(ExtendedPanId([0xde, 0xad, 0x00, 0xbe, 0xef, 0x00, 0xca, 0xfe])),
            pan_id: Some(0x1234),
            channel: Some(15),
            ..Default::default()
        })?;
        node.set_auto_start(true)?;
    }

    if !node.role().is_attached() {
        node.thread_start()?;
    }
    node.process_notifications();

    for _ in 0..10 {
        while let Some(event) = node.engine_mut().poll_event() {
            node.process_event(event);
        }
        println!(
            "Role {:?}, RLOC16 {:#06x}, partition {:?}",
            node.role(),
            node.rloc16(),
            node.partition_id().ok()
        );
        thread::sleep(Duration::from_millis(500));
    }

    node.finalize();
    Ok(())
}
