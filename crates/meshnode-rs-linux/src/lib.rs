// crates/meshnode-rs-linux/src/lib.rs

//! Host implementations of the meshnode-rs platform traits.

mod loopback;
mod platform;
mod settings;

pub use loopback::LoopbackEngine;
pub use platform::SystemPlatform;
pub use settings::FileSettingsStore;
