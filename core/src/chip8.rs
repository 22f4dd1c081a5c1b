use std::fmt;

use log::{debug, error, trace, warn};

use crate::config::{Config, KeyWait};
use crate::constants::{address, START_ADDR};
use crate::disassemble::disassemble;
use crate::display::FrameBuffer;
use crate::frontend::Frontend;
use crate::instruction::from_op;
use crate::keypad::{Key, Keypad};
use crate::operations::Flow;
use crate::registers::Reg;
use crate::stack::Stack;
use crate::state::State;

/// Why `exec_all` stopped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Halt {
    /// The word at `addr` is not an instruction.
    Invalid { opcode: u16, addr: u16 },
    /// The frontend or the host asked to close.
    Closed,
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Halt::Invalid { opcode, addr } => {
                write!(f, "invalid opcode {:04x} at {:03x}", opcode, addr)
            }
            Halt::Closed => write!(f, "closed"),
        }
    }
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - whether an invalid opcode was hit; this is sticky until a new program is loaded
///  - an optional `Frontend` that displays frames and feeds the keypad
///
/// Supplies interfaces for:
/// - loading programs and roms
/// - inspecting and patching memory, registers and the stack
/// - pressing and releasing keys
/// - executing one, some or all instructions
pub struct Chip8 {
    state: State,
    config: Config,
    invalid: Option<Halt>,
    frontend: Option<Box<dyn Frontend>>,
    close_requested: bool,
}

impl Chip8 {
    pub fn new(config: Config) -> Self {
        Chip8 {
            state: State::new(config.quirks, config.seed),
            config,
            invalid: None,
            frontend: None,
            close_requested: false,
        }
    }

    /// Writes `program` big-endian from `START_ADDR` and points the pc at it.
    pub fn load_program(&mut self, program: &[u16]) {
        let mut addr = START_ADDR;
        for word in program {
            self.state.memory.write16(addr, *word);
            addr = address(addr.wrapping_add(2));
        }
        debug!("loaded {} word program", program.len());
        self.restart();
    }

    /// Copies a rom image to `START_ADDR` and points the pc at it. Bytes that
    /// don't fit are dropped; returns how many were loaded.
    pub fn load_rom(&mut self, rom: &[u8]) -> usize {
        let loaded = self.state.memory.load_rom(rom);
        debug!("loaded {} byte rom", loaded);
        self.restart();
        loaded
    }

    fn restart(&mut self) {
        self.state.pc = START_ADDR;
        self.invalid = None;
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.state.memory.read(addr)
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.state.memory.write(addr, value)
    }

    pub fn read16(&self, addr: u16) -> u16 {
        self.state.memory.read16(addr)
    }

    pub fn write16(&mut self, addr: u16, value: u16) {
        self.state.memory.write16(addr, value)
    }

    /// The whole address space, for dumping.
    pub fn memory(&self) -> &[u8] {
        self.state.memory.as_slice()
    }

    pub fn get(&self, reg: Reg) -> u8 {
        self.state.v.get(reg)
    }

    pub fn get_mut(&mut self, reg: Reg) -> &mut u8 {
        self.state.v.get_mut(reg)
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.state.pc = address(pc);
    }

    pub fn index(&self) -> u16 {
        self.state.i
    }

    pub fn set_index(&mut self, i: u16) {
        self.state.i = address(i);
    }

    pub fn delay(&self) -> u8 {
        self.state.timers.delay
    }

    pub fn set_delay(&mut self, value: u8) {
        self.state.timers.delay = value;
    }

    pub fn sound(&self) -> u8 {
        self.state.timers.sound
    }

    pub fn set_sound(&mut self, value: u8) {
        self.state.timers.sound = value;
    }

    pub fn stack(&self) -> &Stack {
        &self.state.stack
    }

    pub fn push(&mut self, addr: u16) {
        self.state.stack.push(address(addr));
    }

    pub fn pop(&mut self) -> u16 {
        self.state.stack.pop()
    }

    /// Draws a fresh byte from the same source `Cxkk` uses.
    pub fn random(&mut self) -> u8 {
        self.state.random_byte()
    }

    /// The byte most recently drawn by `Cxkk` or `random`.
    pub fn last_random(&self) -> u8 {
        self.state.last_random
    }

    pub fn set_last_random(&mut self, value: u8) {
        self.state.last_random = value;
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Mutable access to the frame buffer; the frame counts as changed.
    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        self.state.draw_flag = true;
        &mut self.state.frame_buffer
    }

    pub fn keypad(&self) -> &Keypad {
        &self.state.keypad
    }

    pub fn press(&mut self, key: Key) {
        self.state.keypad.press(key);
    }

    pub fn release(&mut self, key: Key) {
        self.state.keypad.release(key);
    }

    pub fn clear_keys(&mut self) {
        self.state.keypad.clear();
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid.is_some()
    }

    /// The offending word, if an invalid opcode halted the interpreter.
    pub fn invalid_opcode(&self) -> Option<u16> {
        match self.invalid {
            Some(Halt::Invalid { opcode, .. }) => Some(opcode),
            _ => None,
        }
    }

    /// Installs a frontend, returning the one it replaces. The current frame
    /// is presented on the next peripheral update.
    pub fn attach(&mut self, frontend: Box<dyn Frontend>) -> Option<Box<dyn Frontend>> {
        self.state.draw_flag = true;
        self.frontend.replace(frontend)
    }

    pub fn detach(&mut self) -> Option<Box<dyn Frontend>> {
        self.frontend.take()
    }

    pub fn has_frontend(&self) -> bool {
        self.frontend.is_some()
    }

    /// Asks `exec_all` and any pending key wait to stop.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Whether a close was requested, by the host or the frontend. Once seen
    /// it stays set.
    pub fn check_close(&mut self) -> bool {
        if !self.close_requested {
            if let Some(frontend) = self.frontend.as_mut() {
                self.close_requested = frontend.should_close();
            }
        }
        self.close_requested
    }

    /// Gets the opcode currently pointed at by the pc and moves the pc past it.
    pub fn fetch(&mut self) -> u16 {
        let op = self.state.memory.read16(self.state.pc);
        self.state.pc = address(self.state.pc.wrapping_add(2));
        op
    }

    /// Fetches and executes a single instruction, then services the peripherals.
    pub fn exec(&mut self) {
        let addr = self.state.pc;
        let op = self.fetch();
        trace!("{:03x}  {:04x}  {}", addr, op, disassemble(&op));

        match from_op(&op) {
            Some(operation) => {
                if let Flow::AwaitKey(reg) = operation(&op, &mut self.state) {
                    self.wait_for_key(reg);
                }
            }
            None => {
                error!("invalid opcode {:04x} at {:03x}", op, addr);
                if self.invalid.is_none() {
                    self.invalid = Some(Halt::Invalid { opcode: op, addr });
                }
            }
        }

        self.update_peripherals();
    }

    /// Executes up to `count` instructions, stopping early on an invalid one.
    pub fn exec_n(&mut self, count: u64) {
        for _ in 0..count {
            if self.is_invalid() {
                break;
            }
            self.exec();
        }
    }

    /// Executes until an invalid opcode is hit or a close is requested.
    pub fn exec_all(&mut self) -> Halt {
        loop {
            if let Some(halt) = self.invalid {
                return halt;
            }
            if self.check_close() {
                return Halt::Closed;
            }
            self.exec();
        }
    }

    /// Ticks the timers and, with a frontend attached, refreshes the keypad
    /// and presents the frame if it changed.
    pub fn update_peripherals(&mut self) {
        self.state.timers.tick();

        if let Some(frontend) = self.frontend.as_mut() {
            frontend.poll(&mut self.state.keypad);
            if self.state.draw_flag {
                frontend.present(&self.state.frame_buffer);
                self.state.draw_flag = false;
            }
        }
    }

    /// Blocks until a key is down and stores it in `reg`. Gives up, leaving
    /// `reg` alone, if a close is requested or nothing could ever press a key.
    fn wait_for_key(&mut self, reg: Reg) {
        let key = loop {
            if let Some(key) = self.state.keypad.any_pressed() {
                break key;
            }
            if self.frontend.is_none() {
                warn!("no key held and no frontend attached, skipping wait for {}", reg);
                return;
            }
            self.update_peripherals();
            if self.check_close() {
                return;
            }
        };

        self.state.v[reg] = key.value();

        if self.config.key_wait == KeyWait::PressAndRelease {
            // Without a frontend nothing can release it
            while self.frontend.is_some() && self.state.keypad.is_down(key) {
                self.update_peripherals();
                if self.check_close() {
                    return;
                }
            }
        }
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::thread;
    use std::time::Duration;

    /// Replays one keypad state per poll, then asks to close.
    #[derive(Clone, Default)]
    struct Scripted {
        keys: Rc<RefCell<VecDeque<Option<u8>>>>,
        presented: Rc<RefCell<usize>>,
        poll_delay: Duration,
        closed: bool,
    }

    impl Scripted {
        fn new(keys: &[Option<u8>]) -> Self {
            Scripted {
                keys: Rc::new(RefCell::new(keys.iter().copied().collect())),
                ..Scripted::default()
            }
        }

        /// Each poll blocks for `delay`, like a frontend waiting on input.
        fn slow(keys: &[Option<u8>], delay: Duration) -> Self {
            Scripted {
                poll_delay: delay,
                ..Scripted::new(keys)
            }
        }

        fn remaining(&self) -> usize {
            self.keys.borrow().len()
        }

        fn presented(&self) -> usize {
            *self.presented.borrow()
        }
    }

    impl Frontend for Scripted {
        fn present(&mut self, _frame: &FrameBuffer) {
            *self.presented.borrow_mut() += 1;
        }

        fn poll(&mut self, keypad: &mut Keypad) {
            thread::sleep(self.poll_delay);
            match self.keys.borrow_mut().pop_front() {
                Some(state) => {
                    keypad.clear();
                    if let Some(key) = state {
                        keypad.press(Key::new(key));
                    }
                }
                None => self.closed = true,
            }
        }

        fn should_close(&mut self) -> bool {
            self.closed
        }
    }

    #[test]
    fn test_chip8_fetches_op() {
        let mut chip8 = Chip8::default();
        chip8.write16(0x200, 0xAABB);
        assert_eq!(chip8.fetch(), 0xAABB);
        assert_eq!(chip8.pc(), 0x202);
    }

    #[test]
    fn test_fetch_wraps_pc() {
        let mut chip8 = Chip8::default();
        chip8.set_pc(0xFFE);
        chip8.fetch();
        assert_eq!(chip8.pc(), 0x000);
    }

    #[test]
    fn test_set_pc_masks() {
        let mut chip8 = Chip8::default();
        chip8.set_pc(0x1234);
        assert_eq!(chip8.pc(), 0x234);
        chip8.set_index(0xF001);
        assert_eq!(chip8.index(), 0x001);
    }

    #[test]
    fn test_load_program() {
        let mut chip8 = Chip8::default();
        chip8.set_pc(0x400);
        chip8.load_program(&[cls(), jp(0x300)]);
        assert_eq!(chip8.pc(), 0x200);
        assert_eq!(chip8.read(0x200), 0x00);
        assert_eq!(chip8.read(0x201), 0xE0);
        assert_eq!(chip8.read16(0x202), 0x1300);
    }

    #[test]
    fn test_load_rom_truncates() {
        let mut chip8 = Chip8::default();
        let rom = vec![0xAB; 0x1000];
        assert_eq!(chip8.load_rom(&rom), 0xE00);
        assert_eq!(chip8.read(0xFFF), 0xAB);
        assert_eq!(chip8.memory().len(), 0x1000);
        // the font is below the load address and survives
        assert_eq!(chip8.read(0x050), 0xF0);
    }

    #[test]
    fn test_jump_program() {
        let mut chip8 = Chip8::default();
        chip8.frame_mut().full();
        chip8.load_program(&[cls(), jp(0x300), nop(), ret()]);
        chip8.exec();
        chip8.exec();
        assert_eq!(chip8.pc(), 0x300);
        assert!(chip8.frame().rows().all(|row| row.iter().all(|pixel| !pixel)));
    }

    #[test]
    fn test_and_clears_flag() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[ld(Reg::V5, 0xAA), ld(Reg::VF, 0x55), and(Reg::V5, Reg::VF)]);
        chip8.exec_n(3);
        assert_eq!(chip8.get(Reg::V5), 0x00);
        assert_eq!(chip8.get(Reg::VF), 0x00);
    }

    #[test]
    fn test_add_flag_laws() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[
            ld(Reg::V0, 0xFF),
            ld(Reg::V1, 0x01),
            add_reg(Reg::V0, Reg::V1),
        ]);
        chip8.exec_n(3);
        assert_eq!((chip8.get(Reg::V0), chip8.get(Reg::VF)), (0x00, 0x1));

        chip8.load_program(&[
            ld(Reg::V0, 0x01),
            ld(Reg::V1, 0x01),
            add_reg(Reg::V0, Reg::V1),
        ]);
        chip8.exec_n(3);
        assert_eq!((chip8.get(Reg::V0), chip8.get(Reg::VF)), (0x02, 0x0));
    }

    #[test]
    fn test_sub_flag_laws() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[ld(Reg::V0, 0x05), ld(Reg::V1, 0x03), sub(Reg::V0, Reg::V1)]);
        chip8.exec_n(3);
        assert_eq!((chip8.get(Reg::V0), chip8.get(Reg::VF)), (0x02, 0x1));

        chip8.load_program(&[ld(Reg::V0, 0x03), ld(Reg::V1, 0x05), sub(Reg::V0, Reg::V1)]);
        chip8.exec_n(3);
        assert_eq!((chip8.get(Reg::V0), chip8.get(Reg::VF)), (0xFE, 0x0));
    }

    #[test]
    fn test_store_load_round_trip() {
        let mut chip8 = Chip8::default();
        for reg in Reg::ALL.iter() {
            *chip8.get_mut(*reg) = 0x10 + reg.index() as u8;
        }
        chip8.load_program(&[
            ld_i(0x400),
            ld_store(Reg::V3),
            ld(Reg::V0, 0),
            ld(Reg::V1, 0),
            ld(Reg::V2, 0),
            ld(Reg::V3, 0),
            ld_i(0x400),
            ld_load(Reg::V3),
        ]);
        chip8.exec_n(8);

        for reg in Reg::V3.up_to() {
            assert_eq!(chip8.get(reg), 0x10 + reg.index() as u8);
        }
        assert_eq!(chip8.read(0x404), 0x00);
        for reg in Reg::ALL[4..].iter() {
            assert_eq!(chip8.get(*reg), 0x10 + reg.index() as u8);
        }
    }

    #[test]
    fn test_call_and_return() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[call(0x206), ld(Reg::V1, 0x01), jp(0x204), ret()]);
        chip8.exec();
        assert_eq!(chip8.pc(), 0x206);
        assert_eq!(chip8.stack().top(), 0x202);
        chip8.exec();
        assert_eq!(chip8.pc(), 0x202);
        assert!(chip8.stack().empty());
        chip8.exec();
        assert_eq!(chip8.get(Reg::V1), 0x01);
    }

    #[test]
    fn test_exec_n_stops_on_invalid() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[ld(Reg::V0, 1), 0xFFFF, ld(Reg::V0, 2)]);
        chip8.exec_n(10);
        assert!(chip8.is_invalid());
        assert_eq!(chip8.invalid_opcode(), Some(0xFFFF));
        assert_eq!(chip8.get(Reg::V0), 1);
        assert_eq!(chip8.pc(), 0x204);
    }

    #[test]
    fn test_invalid_is_sticky() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[0xFFFF, ld(Reg::V0, 2)]);
        chip8.exec();
        chip8.exec();
        assert!(chip8.is_invalid());
        assert_eq!(chip8.get(Reg::V0), 2);
        assert_eq!(
            chip8.exec_all(),
            Halt::Invalid {
                opcode: 0xFFFF,
                addr: 0x200
            }
        );

        chip8.load_program(&[cls()]);
        assert!(!chip8.is_invalid());
    }

    #[test]
    fn test_exec_all_stops_on_invalid() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[ld(Reg::V0, 1), add(Reg::V0, 1), 0x5121]);
        let halt = chip8.exec_all();
        assert_eq!(halt.to_string(), "invalid opcode 5121 at 204");
        assert_eq!(chip8.get(Reg::V0), 2);
    }

    #[test]
    fn test_exec_all_stops_on_close() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[jp(0x200)]);
        chip8.request_close();
        assert_eq!(chip8.exec_all(), Halt::Closed);
        assert_eq!(chip8.pc(), 0x200);
    }

    #[test]
    fn test_exec_all_stops_when_frontend_closes() {
        let mut chip8 = Chip8::default();
        chip8.attach(Box::new(Scripted::new(&[None, None, None])));
        chip8.load_program(&[jp(0x200)]);
        assert_eq!(chip8.exec_all(), Halt::Closed);
        assert!(chip8.check_close());
    }

    #[test]
    fn test_timers_run_during_key_wait() {
        let frontend = Scripted::slow(
            &[None, None, None, Some(0x5), None],
            Duration::from_millis(17),
        );
        let mut chip8 = Chip8::default();
        chip8.attach(Box::new(frontend));
        chip8.load_program(&[ld_key(Reg::V1)]);
        chip8.set_delay(0x10);
        chip8.exec();
        assert_eq!(chip8.get(Reg::V1), 0x5);
        assert!(chip8.delay() <= 0x10 - 3, "delay {}", chip8.delay());
    }

    #[test]
    fn test_key_wait_press_and_release() {
        let frontend = Scripted::new(&[None, Some(0x7), Some(0x7), None, None]);
        let mut chip8 = Chip8::default();
        chip8.attach(Box::new(frontend.clone()));
        chip8.load_program(&[ld_key(Reg::V3)]);
        chip8.exec();
        assert_eq!(chip8.get(Reg::V3), 0x7);
        assert_eq!(chip8.pc(), 0x202);
        // two polls for the press, two for the release, one after the op
        assert_eq!(frontend.remaining(), 0);
        assert!(!chip8.check_close());
    }

    #[test]
    fn test_key_wait_press_only() {
        let frontend = Scripted::new(&[None, Some(0x7), Some(0x7), None, None]);
        let config = Config {
            key_wait: KeyWait::Press,
            ..Config::default()
        };
        let mut chip8 = Chip8::new(config);
        chip8.attach(Box::new(frontend.clone()));
        chip8.load_program(&[ld_key(Reg::V3)]);
        chip8.exec();
        assert_eq!(chip8.get(Reg::V3), 0x7);
        assert_eq!(frontend.remaining(), 2);
    }

    #[test]
    fn test_key_wait_lowest_key_wins() {
        let mut chip8 = Chip8::default();
        chip8.press(Key::new(0xC));
        chip8.press(Key::new(0x4));
        chip8.load_program(&[ld_key(Reg::V0)]);
        chip8.exec();
        assert_eq!(chip8.get(Reg::V0), 0x4);
    }

    #[test]
    fn test_key_wait_cancelled_by_close() {
        let mut chip8 = Chip8::default();
        chip8.attach(Box::new(Scripted::new(&[None])));
        chip8.load_program(&[ld(Reg::V3, 0xAA), ld_key(Reg::V3), jp(0x202)]);
        assert_eq!(chip8.exec_all(), Halt::Closed);
        assert_eq!(chip8.get(Reg::V3), 0xAA);
        assert_eq!(chip8.pc(), 0x204);
    }

    #[test]
    fn test_key_wait_headless_gives_up() {
        let mut chip8 = Chip8::default();
        chip8.load_program(&[ld(Reg::V3, 0xAA), ld_key(Reg::V3)]);
        chip8.exec_n(2);
        assert_eq!(chip8.get(Reg::V3), 0xAA);
        assert_eq!(chip8.pc(), 0x204);
        assert!(!chip8.is_invalid());
    }

    #[test]
    fn test_presents_only_changed_frames() {
        let frontend = Scripted::new(&[None; 8]);
        let mut chip8 = Chip8::default();
        chip8.load_program(&[ld(Reg::V0, 1), ld(Reg::V1, 1), cls(), ld(Reg::V2, 1)]);
        chip8.attach(Box::new(frontend.clone()));
        chip8.exec_n(4);
        // once for attaching, once for the clear
        assert_eq!(frontend.presented(), 2);
    }

    #[test]
    fn test_detach() {
        let mut chip8 = Chip8::default();
        assert!(chip8.attach(Box::new(Scripted::new(&[]))).is_none());
        assert!(chip8.has_frontend());
        assert!(chip8.detach().is_some());
        assert!(!chip8.has_frontend());
    }

    #[test]
    fn test_random_is_seeded() {
        let config = Config {
            seed: Some(7),
            ..Config::default()
        };
        let mut a = Chip8::new(config);
        let mut b = Chip8::new(config);
        let draws: Vec<u8> = (0..4).map(|_| a.random()).collect();
        let again: Vec<u8> = (0..4).map(|_| b.random()).collect();
        assert_eq!(draws, again);
        assert_eq!(a.last_random(), draws[3]);
    }

    #[test]
    fn test_push_masks() {
        let mut chip8 = Chip8::default();
        chip8.push(0xF123);
        assert_eq!(chip8.pop(), 0x123);
        assert_eq!(chip8.pop(), 0x000);
    }
}
