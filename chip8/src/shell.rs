use std::io::{self, BufRead, Write};

use log::info;
use thiserror::Error;

use chip8_core::constants::{address, DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, START_ADDR};
use chip8_core::{Chip8, Key, ParseError, Reg};

use crate::error::Error;
use crate::print;
use crate::run::{open_window, read_rom};

const HELP: &str = "\
Available commands
  regs                 Print all registers
  set [reg] [value]    Set value of register (V0..VF, PC, I, R, DT, ST)
  mem [begin] [end]    Print memory
  dasm [begin] [end]   Disassemble instructions
  si [count]           Execute instructions
  stk                  Print the stack
  push [addr]          Push an address to the stack
  pop                  Pop an address from the stack
  rnd                  Generate a random byte
  press [key|NONE]     Press a key
  display              Display screen state in terminal
  screen [on|off]      Open or close the window
  clear                Clear all pixels on screen
  full                 Fill all pixels on screen
  pixel [x] [y]        Toggle pixel at (x, y)
  rom [path]           Load rom into memory
  exit                 Exit
  help                 Print this menu
";

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("unknown command `{0}`, try `help`")]
    UnknownCommand(String),

    #[error("missing {0}")]
    Missing(&'static str),

    #[error("`{0}` is not a number")]
    Number(String),

    #[error("pixel ({0}, {1}) is off screen")]
    OffScreen(usize, usize),

    #[error("unknown screen mode `{0}`, expected on or off")]
    ScreenMode(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    App(#[from] Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

enum Control {
    Continue,
    Exit,
}

/// Line based debugger. Reads one command per line until `exit` or the end
/// of input. A failed command is reported and the shell carries on.
pub struct Shell<'a, R, W> {
    chip8: &'a mut Chip8,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(chip8: &'a mut Chip8, input: R, output: W) -> Self {
        Shell {
            chip8,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Interactive debug shell!")?;

        let mut line = String::new();
        loop {
            write!(self.output, "{:03x}> ", self.chip8.pc())?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            match self.command(&line) {
                Ok(Control::Continue) => {}
                Ok(Control::Exit) => break,
                Err(ShellError::Io(e)) => return Err(e),
                Err(e) => writeln!(self.output, "error: {}", e)?,
            }

            self.chip8.update_peripherals();
        }

        writeln!(self.output, "exiting...")
    }

    fn command(&mut self, line: &str) -> Result<Control, ShellError> {
        let mut words = line.split_whitespace();
        let name = match words.next() {
            Some(name) => name,
            None => return Ok(Control::Continue),
        };
        let args: Vec<&str> = words.collect();
        let arg = |index: usize| args.get(index).copied();

        match name {
            "regs" => print::registers(&mut self.output, self.chip8)?,
            "set" => {
                let reg = arg(0).ok_or(ShellError::Missing("register"))?;
                let value = arg(1).ok_or(ShellError::Missing("value"))?;
                self.set(reg, value)?;
            }
            "mem" => {
                let begin = u32::from(address(hex_or(arg(0), START_ADDR)?)) & 0xFFF0;
                let mut end = u32::from(hex_or(arg(1), 0)?);
                if begin >= end {
                    end = begin + 0x40;
                }
                let end = end.min(MEMORY_SIZE as u32) & 0xFFF0;
                print::memory(&mut self.output, self.chip8, begin as u16, end as u16)?;
            }
            "dasm" => {
                let begin = u32::from(address(hex_or(arg(0), self.chip8.pc().saturating_sub(4))?));
                let mut end = u32::from(hex_or(arg(1), 0)?);
                if begin >= end {
                    end = begin + 0x10;
                }
                let end = end.min(MEMORY_SIZE as u32);
                print::listing(&mut self.output, self.chip8, begin as u16, end as u16)?;
            }
            "si" => {
                let count = match arg(0) {
                    Some(count) => count
                        .parse::<u64>()
                        .map_err(|_| ShellError::Number(count.to_string()))?,
                    None => 1,
                };
                self.chip8.exec_n(count);
                if let Some(opcode) = self.chip8.invalid_opcode() {
                    writeln!(self.output, "halted on invalid opcode {:04x}", opcode)?;
                }
            }
            "stk" => print::stack(&mut self.output, self.chip8)?,
            "push" => {
                let addr = hex_or(arg(0), 0)?;
                self.chip8.push(addr);
            }
            "pop" => {
                let addr = self.chip8.pop();
                writeln!(self.output, "{:03x}", addr)?;
            }
            "rnd" => {
                let byte = self.chip8.random();
                writeln!(self.output, "{:02x}", byte)?;
            }
            "press" => {
                let key = arg(0).ok_or(ShellError::Missing("key"))?;
                if key.eq_ignore_ascii_case("NONE") {
                    self.chip8.clear_keys();
                } else {
                    let key = key.parse::<Key>()?;
                    self.chip8.clear_keys();
                    self.chip8.press(key);
                }
            }
            "display" => print::screen(&mut self.output, self.chip8)?,
            "screen" => match arg(0) {
                None | Some("on") => {
                    if !self.chip8.has_frontend() {
                        self.chip8.attach(open_window()?);
                    }
                }
                Some("off") => {
                    self.chip8.detach();
                }
                Some(other) => return Err(ShellError::ScreenMode(other.to_string())),
            },
            "clear" => self.chip8.frame_mut().clear(),
            "full" => self.chip8.frame_mut().full(),
            "pixel" => {
                let x = decimal(arg(0).ok_or(ShellError::Missing("x"))?)?;
                let y = decimal(arg(1).ok_or(ShellError::Missing("y"))?)?;
                if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
                    return Err(ShellError::OffScreen(x, y));
                }
                self.chip8.frame_mut().toggle(x, y);
            }
            "rom" => {
                let path = arg(0).ok_or(ShellError::Missing("path"))?;
                let rom = read_rom(path.as_ref())?;
                let loaded = self.chip8.load_rom(&rom);
                info!("loaded {} bytes from {}", loaded, path);
                writeln!(self.output, "loaded {} bytes", loaded)?;
            }
            "help" => write!(self.output, "{}", HELP)?,
            "exit" => return Ok(Control::Exit),
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        }

        Ok(Control::Continue)
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), ShellError> {
        match name.to_ascii_uppercase().as_str() {
            "PC" => self.chip8.set_pc(hex(value)?),
            "I" => self.chip8.set_index(hex(value)?),
            "R" => self.chip8.set_last_random(byte(value)?),
            "DT" => self.chip8.set_delay(byte(value)?),
            "ST" => self.chip8.set_sound(byte(value)?),
            _ => {
                let reg = name.parse::<Reg>()?;
                *self.chip8.get_mut(reg) = byte(value)?;
            }
        }
        Ok(())
    }
}

fn digits(text: &str) -> &str {
    text.strip_prefix("0x").unwrap_or(text)
}

fn hex(text: &str) -> Result<u16, ShellError> {
    u16::from_str_radix(digits(text), 16).map_err(|_| ShellError::Number(text.to_string()))
}

fn hex_or(text: Option<&str>, default: u16) -> Result<u16, ShellError> {
    text.map_or(Ok(default), hex)
}

fn byte(text: &str) -> Result<u8, ShellError> {
    u8::from_str_radix(digits(text), 16).map_err(|_| ShellError::Number(text.to_string()))
}

fn decimal(text: &str) -> Result<usize, ShellError> {
    text.parse()
        .map_err(|_| ShellError::Number(text.to_string()))
}
