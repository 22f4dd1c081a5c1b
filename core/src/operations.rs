use log::warn;

use crate::constants::{address, FONT_ADDR, FONT_GLYPH_SIZE};
use crate::keypad::Key;
use crate::opcode::Opcode;
use crate::registers::Reg;
use crate::state::State;

/// What the interpreter must do once an operation returns.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Carry on with the next instruction.
    Next,
    /// Block until a key is pressed, then store it in the register.
    AwaitKey(Reg),
}

/// Every operation sees the pc already advanced past its own opcode.
pub type Operation = fn(op: &dyn Opcode, state: &mut State) -> Flow;

fn vx(op: &dyn Opcode) -> Reg {
    Reg::from_nibble(op.x())
}

fn vy(op: &dyn Opcode) -> Reg {
    Reg::from_nibble(op.y())
}

fn skip_if(state: &mut State, condition: bool) -> Flow {
    if condition {
        state.pc = address(state.pc.wrapping_add(2));
    }
    Flow::Next
}

/// SYS addr; machine code routines are not emulated
pub fn sys(op: &dyn Opcode, _state: &mut State) -> Flow {
    warn!("ignoring SYS {:03x}", op.addr());
    Flow::Next
}

/// clear
pub fn clr(_op: &dyn Opcode, state: &mut State) -> Flow {
    state.frame_buffer.clear();
    state.draw_flag = true;
    Flow::Next
}

/// PC = STACK.pop()
pub fn rts(_op: &dyn Opcode, state: &mut State) -> Flow {
    state.pc = address(state.stack.pop());
    Flow::Next
}

/// PC = addr
pub fn jump(op: &dyn Opcode, state: &mut State) -> Flow {
    state.pc = op.addr();
    Flow::Next
}

/// STACK.push(PC); PC = addr
pub fn call(op: &dyn Opcode, state: &mut State) -> Flow {
    state.stack.push(state.pc);
    state.pc = op.addr();
    Flow::Next
}

/// if Vx == kk then pc += 2
pub fn ske(op: &dyn Opcode, state: &mut State) -> Flow {
    let condition = state.v[vx(op)] == op.kk();
    skip_if(state, condition)
}

/// if Vx != kk then pc += 2
pub fn skne(op: &dyn Opcode, state: &mut State) -> Flow {
    let condition = state.v[vx(op)] != op.kk();
    skip_if(state, condition)
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &mut State) -> Flow {
    let condition = state.v[vx(op)] == state.v[vy(op)];
    skip_if(state, condition)
}

/// Vx = kk
pub fn load(op: &dyn Opcode, state: &mut State) -> Flow {
    state.v[vx(op)] = op.kk();
    Flow::Next
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(op: &dyn Opcode, state: &mut State) -> Flow {
    let x = vx(op);
    state.v[x] = state.v[x].wrapping_add(op.kk());
    Flow::Next
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &mut State) -> Flow {
    state.v[vx(op)] = state.v[vy(op)];
    Flow::Next
}

/// Vx |= Vy; VF = 0
pub fn or(op: &dyn Opcode, state: &mut State) -> Flow {
    let res = state.v[vx(op)] | state.v[vy(op)];
    state.v[vx(op)] = res;
    state.v.set_flag(false);
    Flow::Next
}

/// Vx &= Vy; VF = 0
pub fn and(op: &dyn Opcode, state: &mut State) -> Flow {
    let res = state.v[vx(op)] & state.v[vy(op)];
    state.v[vx(op)] = res;
    state.v.set_flag(false);
    Flow::Next
}

/// Vx ^= Vy; VF = 0
pub fn xor(op: &dyn Opcode, state: &mut State) -> Flow {
    let res = state.v[vx(op)] ^ state.v[vy(op)];
    state.v[vx(op)] = res;
    state.v.set_flag(false);
    Flow::Next
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &dyn Opcode, state: &mut State) -> Flow {
    let (res, over) = state.v[vx(op)].overflowing_add(state.v[vy(op)]);
    state.v[vx(op)] = res;
    state.v.set_flag(over);
    Flow::Next
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: &dyn Opcode, state: &mut State) -> Flow {
    let (res, under) = state.v[vx(op)].overflowing_sub(state.v[vy(op)]);
    state.v[vx(op)] = res;
    state.v.set_flag(!under);
    Flow::Next
}

/// Vx = Vy >> 1; VF = shifted out bit
pub fn shr(op: &dyn Opcode, state: &mut State) -> Flow {
    let y = state.v[vy(op)];
    state.v[vx(op)] = y >> 1;
    state.v.set_flag(y & 0x1 == 0x1);
    Flow::Next
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: &dyn Opcode, state: &mut State) -> Flow {
    let (res, under) = state.v[vy(op)].overflowing_sub(state.v[vx(op)]);
    state.v[vx(op)] = res;
    state.v.set_flag(!under);
    Flow::Next
}

/// Vx = Vy << 1; VF = shifted out bit
pub fn shl(op: &dyn Opcode, state: &mut State) -> Flow {
    let y = state.v[vy(op)];
    state.v[vx(op)] = y << 1;
    state.v.set_flag(y & 0x80 == 0x80);
    Flow::Next
}

/// if Vx != Vy then pc +=2
pub fn skrne(op: &dyn Opcode, state: &mut State) -> Flow {
    let condition = state.v[vx(op)] != state.v[vy(op)];
    skip_if(state, condition)
}

/// I = addr
pub fn loadi(op: &dyn Opcode, state: &mut State) -> Flow {
    state.i = op.addr();
    Flow::Next
}

/// PC = V0 + addr
pub fn jumpi(op: &dyn Opcode, state: &mut State) -> Flow {
    state.pc = address(op.addr() + u16::from(state.v[Reg::V0]));
    Flow::Next
}

/// Vx = rand_byte & kk
pub fn rand(op: &dyn Opcode, state: &mut State) -> Flow {
    let rand_byte = state.random_byte();
    state.v[vx(op)] = rand_byte & op.kk();
    Flow::Next
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels would be erased
pub fn draw(op: &dyn Opcode, state: &mut State) -> Flow {
    let x = state.v[vx(op)] as usize;
    let y = state.v[vy(op)] as usize;

    // Reset the carry flag (used for collision detection)
    state.v.set_flag(false);

    let sprite: Vec<u8> = (0..u16::from(op.n()))
        .map(|row| state.memory.read(state.i.wrapping_add(row)))
        .collect();
    let collided = state.frame_buffer.blit(x, y, &sprite);

    state.v.set_flag(collided);
    state.draw_flag = true;
    Flow::Next
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &dyn Opcode, state: &mut State) -> Flow {
    let key = Key::new(state.v[vx(op)]);
    let condition = state.keypad.is_down(key);
    skip_if(state, condition)
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &dyn Opcode, state: &mut State) -> Flow {
    let key = Key::new(state.v[vx(op)]);
    let condition = !state.keypad.is_down(key);
    skip_if(state, condition)
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &mut State) -> Flow {
    state.v[vx(op)] = state.timers.delay;
    Flow::Next
}

/// await keypress for Vx
pub fn keyd(op: &dyn Opcode, _state: &mut State) -> Flow {
    Flow::AwaitKey(vx(op))
}

/// DT = Vx
pub fn loads(op: &dyn Opcode, state: &mut State) -> Flow {
    state.timers.delay = state.v[vx(op)];
    Flow::Next
}

/// ST = Vx
pub fn ld(op: &dyn Opcode, state: &mut State) -> Flow {
    state.timers.sound = state.v[vx(op)];
    Flow::Next
}

/// I += Vx
pub fn addi(op: &dyn Opcode, state: &mut State) -> Flow {
    state.i = address(state.i + u16::from(state.v[vx(op)]));
    Flow::Next
}

/// I = FONT_ADDR + Vx * 5
/// Set I to the memory address of the glyph for the low nibble of Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: &dyn Opcode, state: &mut State) -> Flow {
    let digit = u16::from(state.v[vx(op)] & 0xF);
    state.i = FONT_ADDR + digit * FONT_GLYPH_SIZE;
    Flow::Next
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &dyn Opcode, state: &mut State) -> Flow {
    let value = state.v[vx(op)];
    let bcd = [value / 100 % 10, value / 10 % 10, value % 10];
    state.memory.write_slice(state.i, &bcd);
    Flow::Next
}

/// mem[I..=I+x] = V0..=Vx
/// Fill memory starting at address i with V0..=Vx
pub fn stor(op: &dyn Opcode, state: &mut State) -> Flow {
    let last = vx(op);
    for reg in last.up_to() {
        let addr = state.i.wrapping_add(reg.index() as u16);
        state.memory.write(addr, state.v[reg]);
    }
    advance_index(state, last);
    Flow::Next
}

/// V0..=Vx = mem[I..=I+x]
/// Fill V0..=Vx with memory starting at address i
pub fn read(op: &dyn Opcode, state: &mut State) -> Flow {
    let last = vx(op);
    for reg in last.up_to() {
        let addr = state.i.wrapping_add(reg.index() as u16);
        state.v[reg] = state.memory.read(addr);
    }
    advance_index(state, last);
    Flow::Next
}

fn advance_index(state: &mut State, last: Reg) {
    if state.quirks.increment_index {
        state.i = address(state.i + last.index() as u16 + 1);
    }
}
