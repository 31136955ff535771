//! Static configuration applied when a node instance is constructed.

/// Maximum number of state-change callbacks an instance can hold.
pub const MAX_STATE_CHANGE_HANDLERS: usize = 1;

/// Default key switch guard time in hours.
pub const DEFAULT_KEY_SWITCH_GUARD_TIME: u32 = 624;

/// Default minimal delay timer for Pending datasets in milliseconds.
pub const DEFAULT_DELAY_TIMER_MINIMAL: u32 = 30_000;

/// Construction-time options for an `Instance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    /// Initial key switch guard time in hours.
    pub key_switch_guard_time: u32,
    /// Initial floor for the Pending dataset delay timer in milliseconds.
    pub delay_timer_minimal: u32,
    /// Load the Active and Pending datasets from the settings store on boot.
    pub restore_datasets: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            key_switch_guard_time: DEFAULT_KEY_SWITCH_GUARD_TIME,
            delay_timer_minimal: DEFAULT_DELAY_TIMER_MINIMAL,
            restore_datasets: true,
        }
    }
}
