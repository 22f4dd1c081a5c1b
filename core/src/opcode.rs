use crate::constants::address;

/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each. Their behavior is cased on some combination of:
/// - `(n, _, _, _)` broad categorization; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a category
/// - `(_, _, n, n)` more specific behavior within a category
/// - `(n, n, n, n)` some fixed function that doesn't require variables (e.g. CLS; clear screen)
///
/// Nibbles not used to determine the operation often (but not always) carry important data.
/// - `(_, n, n, n)` represent a 12-bit address
/// - `(_, _, n, n)` encodes some data that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` refers either to the register Vx or a range of registers V0..Vx
/// - `(_, _, n, _)` refers to the the register Vy
///
/// Decoding never fails; whether the fields make sense is up to the interpreter.
pub trait Opcode {
    /// The 4-bit field at `index`, counting from the least significant nibble.
    /// Indices past 3 yield 0.
    fn nibble(&self, index: usize) -> u8;

    /// Returns the Opcode's component nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.nibble(3), self.nibble(2), self.nibble(1), self.nibble(0))
    }

    /// `[hi__]`
    fn hi_byte(&self) -> u8;

    /// `[__lo]`
    fn lo_byte(&self) -> u8;

    /// The Opcode's second nibble.
    /// `[_x__]`
    fn x(&self) -> u8 {
        self.nibble(2)
    }

    /// The Opcode's third nibble.
    /// `[__y_]`
    fn y(&self) -> u8 {
        self.nibble(1)
    }

    /// The Opcode's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8 {
        self.nibble(0)
    }

    /// The Opcode's least significant byte.
    /// `[__kk]`
    fn kk(&self) -> u8 {
        self.lo_byte()
    }

    /// The Opcode without its most significant nibble.
    /// `[_adr]`
    fn addr(&self) -> u16;

    /// The whole word, for exact matches and error reporting.
    fn raw(&self) -> u16;
}

impl Opcode for u16 {
    fn nibble(&self, index: usize) -> u8 {
        if index > 3 {
            return 0;
        }
        ((self >> (index * 4)) & 0xF) as u8
    }

    fn hi_byte(&self) -> u8 {
        (self >> 8) as u8
    }

    fn lo_byte(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn addr(&self) -> u16 {
        address(*self)
    }

    fn raw(&self) -> u16 {
        *self
    }
}
