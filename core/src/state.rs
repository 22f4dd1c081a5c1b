use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Quirks;
use crate::constants::START_ADDR;
use crate::display::FrameBuffer;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::registers::RegFile;
use crate::stack::Stack;
use crate::timer::Timers;

/// The Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register, holding a 12-bit address
///
/// Counter
/// - (pc) a 16-bit program counter, holding a 12-bit address
///
/// Timers
/// - 2 8-bit timers (delay & sound) decremented at 60Hz
///
/// ## Memory
/// - 16 frame stack of return addresses
/// - 4096 bytes of addressable memory
/// - 64x32 pixel frame buffer
///     - `draw_flag` is set whenever it changes
///
/// ## Input
/// - 16 key keypad
#[derive(Debug, Clone)]
pub struct State {
    pub v: RegFile,
    pub i: u16,
    pub pc: u16,
    pub stack: Stack,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keypad: Keypad,
    pub timers: Timers,
    pub quirks: Quirks,
    /// The last byte drawn by `Cxkk` or `random_byte`.
    pub last_random: u8,
    rng: StdRng,
}

impl State {
    pub fn new(quirks: Quirks, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        State {
            v: RegFile::new(),
            i: 0,
            // 0x200 is where ROMs are loaded into memory
            pc: START_ADDR,
            stack: Stack::new(),
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            keypad: Keypad::new(),
            timers: Timers::new(),
            quirks,
            last_random: 0,
            rng,
        }
    }

    pub fn random_byte(&mut self) -> u8 {
        self.last_random = self.rng.gen();
        self.last_random
    }
}

impl Default for State {
    /// Default quirks and a fixed seed, so runs are repeatable.
    fn default() -> Self {
        State::new(Quirks::default(), Some(0))
    }
}
