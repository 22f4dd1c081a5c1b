/// How `LD Vx, K` decides a key press is complete.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyWait {
    /// Resume as soon as a key is down.
    Press,
    /// Resume once the key that was seen down is released again, so one
    /// physical press cannot satisfy two consecutive waits.
    PressAndRelease,
}

impl Default for KeyWait {
    fn default() -> Self {
        KeyWait::PressAndRelease
    }
}

/// Interpreter behaviours that differ between Chip-8 implementations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quirks {
    /// `Fx55`/`Fx65` leave I pointing just past the last byte transferred.
    pub increment_index: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            increment_index: true,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub key_wait: KeyWait,
    pub quirks: Quirks,
    /// Seed for `Cxkk`; `None` draws one from the OS.
    pub seed: Option<u64>,
}
