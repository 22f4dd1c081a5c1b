use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// # Keypad
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
///
/// Any number of keys may be held at once. Where a single key is needed the
/// lowest one held wins.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed: [bool; 16],
}

/// A hex key, 0x0..0xF.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(u8);

impl Key {
    /// Only the low nibble is considered.
    pub fn new(value: u8) -> Self {
        Key(value & 0xF)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl FromStr for Key {
    type Err = ParseError;

    /// A single hex digit, optionally prefixed with `K`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digit = s
            .strip_prefix('K')
            .or_else(|| s.strip_prefix('k'))
            .unwrap_or(s);
        if digit.len() != 1 {
            return Err(ParseError::Key(s.to_string()));
        }
        u8::from_str_radix(digit, 16)
            .map(Key::new)
            .map_err(|_| ParseError::Key(s.to_string()))
    }
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            pressed: [false; 16],
        }
    }

    pub fn press(&mut self, key: Key) {
        self.set_state(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.set_state(key, false);
    }

    pub fn set_state(&mut self, key: Key, down: bool) {
        self.pressed[key.value() as usize] = down;
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.pressed[key.value() as usize]
    }

    /// The lowest key currently held, if any.
    pub fn any_pressed(&self) -> Option<Key> {
        self.pressed
            .iter()
            .position(|down| *down)
            .map(|index| Key::new(index as u8))
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.pressed = [false; 16];
    }
}
