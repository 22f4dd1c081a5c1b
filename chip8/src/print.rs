//! Terminal renderings of the machine for the debug shell.

use std::io::{self, Write};

use chip8_core::constants::MEMORY_SIZE;
use chip8_core::{disassemble, Chip8, Reg};

/// General purpose registers four per line, then the special purpose ones.
pub fn registers(out: &mut dyn Write, chip8: &Chip8) -> io::Result<()> {
    for pairs in Reg::ALL.chunks(4) {
        writeln!(
            out,
            "{}: {:02x}\t{}: {:02x}\t{}: {:02x}\t{}: {:02x}",
            pairs[0],
            chip8.get(pairs[0]),
            pairs[1],
            chip8.get(pairs[1]),
            pairs[2],
            chip8.get(pairs[2]),
            pairs[3],
            chip8.get(pairs[3]),
        )?;
    }

    writeln!(out, "PC: {:04x}\t I: {:04x}", chip8.pc(), chip8.index())?;
    writeln!(
        out,
        "SP: {:02x}\t\t R: {:02x}",
        chip8.stack().size(),
        chip8.last_random()
    )?;
    writeln!(out, "DT: {:02x}\t\tST: {:02x}", chip8.delay(), chip8.sound())?;

    match chip8.keypad().any_pressed() {
        Some(key) => writeln!(out, "Key: {}", key),
        None => writeln!(out, "Key: NONE"),
    }
}

/// Hex dump of `begin..end`, 16 bytes per row. Both ends are expected to
/// be aligned to 16.
pub fn memory(out: &mut dyn Write, chip8: &Chip8, begin: u16, end: u16) -> io::Result<()> {
    write!(out, " hex  ")?;
    for column in 0..0x10 {
        write!(out, "{:2x} ", column)?;
    }

    let end = end.min(MEMORY_SIZE as u16);
    let bytes = chip8.memory().get(begin as usize..end as usize).unwrap_or(&[]);
    for (addr, byte) in (begin..end).zip(bytes) {
        if addr & 0x000F == 0 {
            write!(out, "\n {:02x}0  ", addr >> 4)?;
        }
        write!(out, "{:02x} ", byte)?;
    }

    writeln!(out)
}

/// Return addresses, most recent first.
pub fn stack(out: &mut dyn Write, chip8: &Chip8) -> io::Result<()> {
    let stack = chip8.stack();
    if stack.empty() {
        writeln!(out, "|     |")?;
    }
    for addr in stack.frames().iter().rev() {
        writeln!(out, "| {:03x} |", addr)?;
    }
    writeln!(out, "+-----+")
}

/// One line per word in `begin..end`; the word at the pc is marked.
pub fn listing(out: &mut dyn Write, chip8: &Chip8, begin: u16, end: u16) -> io::Result<()> {
    let end = end.min(MEMORY_SIZE as u16);
    for addr in (begin..end).step_by(2) {
        let word = chip8.read16(addr);
        let marker = if addr == chip8.pc() { " [=]" } else { "" };
        writeln!(
            out,
            "{:03x}{}\t{:04x}\t{}",
            addr,
            marker,
            word,
            disassemble(&word)
        )?;
    }
    Ok(())
}

pub fn screen(out: &mut dyn Write, chip8: &Chip8) -> io::Result<()> {
    writeln!(out, "{}", chip8.frame())
}
