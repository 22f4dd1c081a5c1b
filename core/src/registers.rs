use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::ParseError;

/// One of the sixteen general purpose registers.
///
/// VF doubles as the flag register: arithmetic, shifts and sprite drawing
/// overwrite it with a carry, borrow or collision bit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reg {
    V0,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
    VA,
    VB,
    VC,
    VD,
    VE,
    VF,
}

impl Reg {
    pub const ALL: [Reg; 16] = [
        Reg::V0,
        Reg::V1,
        Reg::V2,
        Reg::V3,
        Reg::V4,
        Reg::V5,
        Reg::V6,
        Reg::V7,
        Reg::V8,
        Reg::V9,
        Reg::VA,
        Reg::VB,
        Reg::VC,
        Reg::VD,
        Reg::VE,
        Reg::VF,
    ];

    /// Only the low nibble is considered, so every byte names a register.
    pub fn from_nibble(nibble: u8) -> Self {
        Reg::ALL[(nibble & 0xF) as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// V0 through `self`, inclusive.
    pub fn up_to(self) -> impl Iterator<Item = Reg> {
        (0..=self.index()).map(|i| Reg::ALL[i])
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "V{:X}", self.index())
    }
}

impl FromStr for Reg {
    type Err = ParseError;

    /// Accepts `V0`..`VF`, case insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('V')
            .or_else(|| s.strip_prefix('v'))
            .ok_or_else(|| ParseError::Register(s.to_string()))?;
        if digits.len() != 1 {
            return Err(ParseError::Register(s.to_string()));
        }
        u8::from_str_radix(digits, 16)
            .map(Reg::from_nibble)
            .map_err(|_| ParseError::Register(s.to_string()))
    }
}

/// V0..VF
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegFile {
    gpr: [u8; 16],
}

impl RegFile {
    pub fn new() -> Self {
        RegFile { gpr: [0; 16] }
    }

    pub fn get(&self, reg: Reg) -> u8 {
        self.gpr[reg.index()]
    }

    pub fn get_mut(&mut self, reg: Reg) -> &mut u8 {
        &mut self.gpr[reg.index()]
    }

    /// Stores a flag bit in VF.
    pub fn set_flag(&mut self, flag: bool) {
        self.gpr[Reg::VF.index()] = u8::from(flag);
    }
}

impl Index<Reg> for RegFile {
    type Output = u8;

    fn index(&self, reg: Reg) -> &u8 {
        &self.gpr[reg.index()]
    }
}

impl IndexMut<Reg> for RegFile {
    fn index_mut(&mut self, reg: Reg) -> &mut u8 {
        &mut self.gpr[reg.index()]
    }
}

impl fmt::Debug for RegFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut dbg = f.debug_struct("RegFile");
        for reg in Reg::ALL.iter() {
            dbg.field(&reg.to_string(), &format_args!("{:02x}", self[*reg]));
        }
        dbg.finish()
    }
}
