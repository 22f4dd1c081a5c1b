use std::time::Duration;

/// Bytes of addressable memory.
pub const MEMORY_SIZE: usize = 0x1000;

/// Addresses are 12 bits wide.
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Where ROMs and programs are loaded, and where the pc starts.
pub const START_ADDR: u16 = 0x200;

/// Where the built-in hex font lives.
pub const FONT_ADDR: u16 = 0x050;

/// Bytes per font glyph.
pub const FONT_GLYPH_SIZE: u16 = 5;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Nested calls the stack can hold.
pub const STACK_SIZE: usize = 16;

/// Period of the 60Hz delay/sound timer decay.
pub const TIMER_PERIOD: Duration = Duration::from_millis(16);

/// # Sprite Sheet
/// Glyphs for the hex digits 0..F, five rows of four pixels each.
/// Loaded into memory at `FONT_ADDR` when the machine is created.
///
/// ```text
/// 0xF0 -> 1111 0000 -> ####
/// 0x90 -> 1001 0000 -> #  #
/// 0x90 -> 1001 0000 -> #  #
/// 0x90 -> 1001 0000 -> #  #
/// 0xF0 -> 1111 0000 -> ####
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Masks an address down to the 12 bits the machine can address.
pub fn address(addr: u16) -> u16 {
    addr & ADDRESS_MASK
}
