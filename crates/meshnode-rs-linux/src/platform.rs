use log::warn;
use meshnode_rs::Platform;
use std::time::Instant;

/// Noise floor reported when none is configured, in dBm.
const DEFAULT_NOISE_FLOOR: i8 = -100;

/// Platform backed by the host's monotonic clock.
///
/// A host process cannot reset its radio, so `reset` only counts the
/// requests and runs the optional reset hook.
pub struct SystemPlatform {
    epoch: Instant,
    noise_floor: i8,
    resets: usize,
    reset_hook: Option<Box<dyn FnMut() + Send>>,
}

impl Default for SystemPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPlatform {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            noise_floor: DEFAULT_NOISE_FLOOR,
            resets: 0,
            reset_hook: None,
        }
    }

    pub fn with_noise_floor(mut self, noise_floor: i8) -> Self {
        self.noise_floor = noise_floor;
        self
    }

    /// Runs `hook` on every reset request, e.g. to restart the process.
    pub fn with_reset_hook(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.reset_hook = Some(Box::new(hook));
        self
    }

    pub fn set_noise_floor(&mut self, noise_floor: i8) {
        self.noise_floor = noise_floor;
    }

    /// Number of reset requests seen so far.
    pub fn resets(&self) -> usize {
        self.resets
    }
}

impl Platform for SystemPlatform {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn noise_floor(&self) -> i8 {
        self.noise_floor
    }

    fn reset(&mut self) {
        self.resets += 1;
        match self.reset_hook.as_mut() {
            Some(hook) => hook(),
            None => warn!("[NODE] Platform reset requested; no reset hook installed"),
        }
    }
}
