use std::fmt;

use log::debug;

use crate::constants::{address, FONT_ADDR, MEMORY_SIZE, SPRITE_SHEET, START_ADDR};

/// # Memory
/// 4096 bytes, font glyphs preloaded at `FONT_ADDR`.
///
/// Every address handed in is masked to 12 bits before it is used, so
/// accesses never fall outside the array. Programs compute addresses with
/// plain arithmetic and rely on this wrapping.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    pub fn new() -> Self {
        let mut memory = Memory {
            bytes: Box::new([0; MEMORY_SIZE]),
        };
        memory.write_slice(FONT_ADDR, &SPRITE_SHEET);
        memory
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[address(addr) as usize]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[address(addr) as usize] = value;
    }

    /// Big-endian: the high byte lives at `addr`.
    pub fn read16(&self, addr: u16) -> u16 {
        let hi = u16::from(self.read(addr));
        let lo = u16::from(self.read(addr.wrapping_add(1)));
        hi << 8 | lo
    }

    pub fn write16(&mut self, addr: u16, value: u16) {
        self.write(addr, (value >> 8) as u8);
        self.write(addr.wrapping_add(1), (value & 0x00FF) as u8);
    }

    /// Copies `data` byte by byte from `addr`, wrapping at the end of memory.
    pub fn write_slice(&mut self, addr: u16, data: &[u8]) {
        for (offset, byte) in data.iter().enumerate() {
            self.write(addr.wrapping_add(offset as u16), *byte);
        }
    }

    /// Copies a ROM image to `START_ADDR`, dropping whatever does not fit.
    /// Returns the number of bytes loaded.
    pub fn load_rom(&mut self, rom: &[u8]) -> usize {
        let start = START_ADDR as usize;
        let len = rom.len().min(MEMORY_SIZE - start);
        if len < rom.len() {
            debug!(
                "rom is {} bytes, truncating to the {} that fit",
                rom.len(),
                len
            );
        }
        self.bytes[start..start + len].copy_from_slice(&rom[..len]);
        len
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Memory({} bytes)", MEMORY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_is_preloaded() {
        let memory = Memory::new();
        let font = FONT_ADDR as usize;
        assert_eq!(memory.as_slice()[font..font + 80], SPRITE_SHEET[..]);
    }

    #[test]
    fn test_memory_zeroed_outside_font() {
        let memory = Memory::new();
        let font = FONT_ADDR as usize;
        assert!(memory.as_slice()[..font].iter().all(|b| *b == 0));
        assert!(memory.as_slice()[font + 80..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_read_write_byte() {
        let mut memory = Memory::new();
        memory.write(0x0123, 0xAB);
        assert_eq!(memory.read(0x0123), 0xAB);
    }

    #[test]
    fn test_read_write_word() {
        let mut memory = Memory::new();
        memory.write16(0x0123, 0xABCD);
        assert_eq!(memory.read16(0x0123), 0xABCD);
        assert_eq!(memory.read(0x0123), 0xAB);
        assert_eq!(memory.read(0x0124), 0xCD);
    }

    #[test]
    fn test_out_of_range_addresses_are_masked() {
        let mut memory = Memory::new();
        memory.write(0x1234, 0x42);
        assert_eq!(memory.read(0x0234), 0x42);
        assert_eq!(memory.read(0xF234), 0x42);

        for addr in [0x1000u16, 0x1FFF, 0x8050, 0xFFFF].iter() {
            assert_eq!(memory.read(*addr), memory.read(*addr & 0x0FFF));
        }
    }

    #[test]
    fn test_word_at_top_of_memory_wraps() {
        let mut memory = Memory::new();
        memory.write16(0x0FFF, 0xBEEF);
        assert_eq!(memory.read(0x0FFF), 0xBE);
        assert_eq!(memory.read(0x0000), 0xEF);
        assert_eq!(memory.read16(0x0FFF), 0xBEEF);
    }

    #[test]
    fn test_load_rom_at_start() {
        let mut memory = Memory::new();
        assert_eq!(memory.load_rom(&[0x00, 0xE0, 0x12, 0x00]), 4);
        assert_eq!(memory.read16(0x200), 0x00E0);
        assert_eq!(memory.read16(0x202), 0x1200);
    }

    #[test]
    fn test_load_rom_truncates() {
        let mut memory = Memory::new();
        let rom = vec![0xAA; MEMORY_SIZE];
        assert_eq!(memory.load_rom(&rom), MEMORY_SIZE - 0x200);
        assert_eq!(memory.read(0x0FFF), 0xAA);
        // nothing wrapped around onto the font
        assert_eq!(memory.read(FONT_ADDR), SPRITE_SHEET[0]);
    }
}
