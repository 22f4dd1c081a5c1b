//! Instruction builders.
//!
//! One function per instruction, returning the word the interpreter decodes.
//! Addresses are masked to 12 bits and `n` to 4 bits, so every result is a
//! well formed instruction. Handy for assembling programs by hand:
//!
//! ```
//! use chip8_core::encode::*;
//! use chip8_core::Reg;
//!
//! let program = [ld(Reg::V0, 0x05), add(Reg::V0, 0x01), jp(0x202)];
//! assert_eq!(program, [0x6005, 0x7001, 0x1202]);
//! ```

use crate::constants::address;
use crate::registers::Reg;

fn x(reg: Reg) -> u16 {
    (reg.index() as u16) << 8
}

fn y(reg: Reg) -> u16 {
    (reg.index() as u16) << 4
}

fn xkk(prefix: u16, reg: Reg, byte: u8) -> u16 {
    prefix | x(reg) | u16::from(byte)
}

fn xy(prefix: u16, vx: Reg, vy: Reg, suffix: u16) -> u16 {
    prefix | x(vx) | y(vy) | suffix
}

/// `SYS 000`, which the interpreter skips over.
pub fn nop() -> u16 {
    0x0000
}

pub fn sys(addr: u16) -> u16 {
    address(addr)
}

pub fn cls() -> u16 {
    0x00E0
}

pub fn ret() -> u16 {
    0x00EE
}

pub fn jp(addr: u16) -> u16 {
    0x1000 | address(addr)
}

pub fn call(addr: u16) -> u16 {
    0x2000 | address(addr)
}

/// Skip if `Vx == byte`
pub fn se(reg: Reg, byte: u8) -> u16 {
    xkk(0x3000, reg, byte)
}

/// Skip if `Vx != byte`
pub fn sne(reg: Reg, byte: u8) -> u16 {
    xkk(0x4000, reg, byte)
}

/// Skip if `Vx == Vy`
pub fn se_reg(vx: Reg, vy: Reg) -> u16 {
    xy(0x5000, vx, vy, 0x0)
}

pub fn ld(reg: Reg, byte: u8) -> u16 {
    xkk(0x6000, reg, byte)
}

pub fn add(reg: Reg, byte: u8) -> u16 {
    xkk(0x7000, reg, byte)
}

/// `Vx = Vy`
pub fn ld_reg(vx: Reg, vy: Reg) -> u16 {
    xy(0x8000, vx, vy, 0x0)
}

pub fn or(vx: Reg, vy: Reg) -> u16 {
    xy(0x8000, vx, vy, 0x1)
}

pub fn and(vx: Reg, vy: Reg) -> u16 {
    xy(0x8000, vx, vy, 0x2)
}

pub fn xor(vx: Reg, vy: Reg) -> u16 {
    xy(0x8000, vx, vy, 0x3)
}

/// `Vx += Vy` with carry into VF
pub fn add_reg(vx: Reg, vy: Reg) -> u16 {
    xy(0x8000, vx, vy, 0x4)
}

pub fn sub(vx: Reg, vy: Reg) -> u16 {
    xy(0x8000, vx, vy, 0x5)
}

pub fn shr(vx: Reg, vy: Reg) -> u16 {
    xy(0x8000, vx, vy, 0x6)
}

pub fn subn(vx: Reg, vy: Reg) -> u16 {
    xy(0x8000, vx, vy, 0x7)
}

pub fn shl(vx: Reg, vy: Reg) -> u16 {
    xy(0x8000, vx, vy, 0xE)
}

/// Skip if `Vx != Vy`
pub fn sne_reg(vx: Reg, vy: Reg) -> u16 {
    xy(0x9000, vx, vy, 0x0)
}

/// `I = addr`
pub fn ld_i(addr: u16) -> u16 {
    0xA000 | address(addr)
}

/// `PC = V0 + addr`
pub fn jp_v0(addr: u16) -> u16 {
    0xB000 | address(addr)
}

pub fn rnd(reg: Reg, mask: u8) -> u16 {
    xkk(0xC000, reg, mask)
}

pub fn drw(vx: Reg, vy: Reg, n: u8) -> u16 {
    xy(0xD000, vx, vy, u16::from(n & 0xF))
}

pub fn skp(reg: Reg) -> u16 {
    0xE09E | x(reg)
}

pub fn sknp(reg: Reg) -> u16 {
    0xE0A1 | x(reg)
}

/// `Vx = DT`
pub fn ld_from_dt(reg: Reg) -> u16 {
    0xF007 | x(reg)
}

/// `Vx = K`, waiting for a key
pub fn ld_key(reg: Reg) -> u16 {
    0xF00A | x(reg)
}

/// `DT = Vx`
pub fn ld_dt(reg: Reg) -> u16 {
    0xF015 | x(reg)
}

/// `ST = Vx`
pub fn ld_st(reg: Reg) -> u16 {
    0xF018 | x(reg)
}

pub fn add_i(reg: Reg) -> u16 {
    0xF01E | x(reg)
}

/// `I = glyph(Vx)`
pub fn ld_font(reg: Reg) -> u16 {
    0xF029 | x(reg)
}

pub fn ld_bcd(reg: Reg) -> u16 {
    0xF033 | x(reg)
}

/// `[I] = V0..=Vx`
pub fn ld_store(reg: Reg) -> u16 {
    0xF055 | x(reg)
}

/// `V0..=Vx = [I]`
pub fn ld_load(reg: Reg) -> u16 {
    0xF065 | x(reg)
}
