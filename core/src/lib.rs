pub use chip8::{Chip8, Halt};
pub use config::{Config, KeyWait, Quirks};
pub use disassemble::disassemble;
pub use display::FrameBuffer;
pub use error::ParseError;
pub use frontend::Frontend;
pub use keypad::{Key, Keypad};
pub use opcode::Opcode;
pub use registers::Reg;
pub use stack::Stack;

mod chip8;
mod config;
pub mod constants;
mod disassemble;
mod display;
pub mod encode;
mod error;
mod frontend;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod operations;
mod registers;
mod stack;
mod state;
mod timer;
