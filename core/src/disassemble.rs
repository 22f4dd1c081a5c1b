use crate::opcode::Opcode;
use crate::registers::Reg;

/// Renders a word as its assembly mnemonic.
///
/// Addresses print as 3 hex digits and bytes as 2. Anything the interpreter
/// would reject comes back as `INVALID xxxx`.
pub fn disassemble(op: &dyn Opcode) -> String {
    let x = Reg::from_nibble(op.x());
    let y = Reg::from_nibble(op.y());
    let addr = op.addr();
    let kk = op.kk();

    match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => "CLS".to_string(),
        (0x0, 0x0, 0xE, 0xE) => "RET".to_string(),
        (0x0, ..) => format!("SYS {:03x}", addr),
        (0x1, ..) => format!("JP {:03x}", addr),
        (0x2, ..) => format!("CALL {:03x}", addr),
        (0x3, ..) => format!("SE {}, {:02x}", x, kk),
        (0x4, ..) => format!("SNE {}, {:02x}", x, kk),
        (0x5, .., 0x0) => format!("SE {}, {}", x, y),
        (0x6, ..) => format!("LD {}, {:02x}", x, kk),
        (0x7, ..) => format!("ADD {}, {:02x}", x, kk),
        (0x8, .., 0x0) => format!("LD {}, {}", x, y),
        (0x8, .., 0x1) => format!("OR {}, {}", x, y),
        (0x8, .., 0x2) => format!("AND {}, {}", x, y),
        (0x8, .., 0x3) => format!("XOR {}, {}", x, y),
        (0x8, .., 0x4) => format!("ADD {}, {}", x, y),
        (0x8, .., 0x5) => format!("SUB {}, {}", x, y),
        (0x8, .., 0x6) => format!("SHR {} (, {})", x, y),
        (0x8, .., 0x7) => format!("SUBN {}, {}", x, y),
        (0x8, .., 0xE) => format!("SHL {} (, {})", x, y),
        (0x9, .., 0x0) => format!("SNE {}, {}", x, y),
        (0xA, ..) => format!("LD I, {:03x}", addr),
        (0xB, ..) => format!("JP V0, {:03x}", addr),
        (0xC, ..) => format!("RND {}, {:02x}", x, kk),
        (0xD, ..) => format!("DRW {}, {}, {}", x, y, op.n()),
        (0xE, _, 0x9, 0xE) => format!("SKP {}", x),
        (0xE, _, 0xA, 0x1) => format!("SKNP {}", x),
        (0xF, _, 0x0, 0x7) => format!("LD {}, DT", x),
        (0xF, _, 0x0, 0xA) => format!("LD {}, K", x),
        (0xF, _, 0x1, 0x5) => format!("LD DT, {}", x),
        (0xF, _, 0x1, 0x8) => format!("LD ST, {}", x),
        (0xF, _, 0x1, 0xE) => format!("ADD I, {}", x),
        (0xF, _, 0x2, 0x9) => format!("LD F, {}", x),
        (0xF, _, 0x3, 0x3) => format!("LD B, {}", x),
        (0xF, _, 0x5, 0x5) => format!("LD [I], {}", x),
        (0xF, _, 0x6, 0x5) => format!("LD {}, [I]", x),
        _ => format!("INVALID {:04x}", op.raw()),
    }
}
