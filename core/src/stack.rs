use log::warn;

use crate::constants::STACK_SIZE;

/// Return addresses for nested calls.
///
/// Misuse degrades instead of failing: a push onto a full stack is dropped
/// and a pop from an empty one yields address 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    sp: usize,
    frames: [u16; STACK_SIZE],
}

impl Stack {
    pub fn new() -> Stack {
        Stack {
            sp: 0,
            frames: [0; STACK_SIZE],
        }
    }

    pub fn push(&mut self, value: u16) {
        if self.full() {
            warn!("stack overflow, dropping return address {:03x}", value);
            return;
        }

        self.frames[self.sp] = value;
        self.sp += 1;
    }

    pub fn pop(&mut self) -> u16 {
        if self.empty() {
            return 0x0000;
        }

        self.sp -= 1;
        self.frames[self.sp]
    }

    pub fn top(&self) -> u16 {
        if self.empty() {
            0x0000
        } else {
            self.frames[self.sp - 1]
        }
    }

    pub fn empty(&self) -> bool {
        self.sp == 0
    }

    pub fn full(&self) -> bool {
        self.sp == STACK_SIZE
    }

    pub fn size(&self) -> usize {
        self.sp
    }

    pub fn capacity(&self) -> usize {
        STACK_SIZE
    }

    /// Live frames, bottom first.
    pub fn frames(&self) -> &[u16] {
        &self.frames[..self.sp]
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_from_empty() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), 0x0000);
        assert_eq!(stack.top(), 0x0000);
        assert!(stack.empty());
        assert_eq!(stack.size(), 0);
    }

    #[test]
    fn simple_push_pop() {
        let mut stack = Stack::new();
        stack.push(128);
        assert_eq!(128, stack.pop());
    }

    #[test]
    fn push_pop_order() {
        let mut stack = Stack::new();
        stack.push(0x1234);
        assert_eq!(stack.top(), 0x1234);
        assert_eq!(stack.size(), 1);

        stack.push(0xABCD);
        assert_eq!(stack.top(), 0xABCD);
        assert_eq!(stack.size(), 2);
        assert!(!stack.empty());
        assert!(!stack.full());

        assert_eq!(stack.pop(), 0xABCD);
        assert_eq!(stack.top(), 0x1234);
        assert_eq!(stack.pop(), 0x1234);
        assert!(stack.empty());
    }

    #[test]
    fn push_onto_full_is_dropped() {
        let mut stack = Stack::new();
        for value in 1..=16 {
            stack.push(value);
        }
        assert!(stack.full());

        stack.push(17);
        assert_eq!(stack.top(), 16);
        assert_eq!(stack.size(), stack.capacity());
        assert!(stack.full());
    }

    #[test]
    fn frames_lists_live_entries() {
        let mut stack = Stack::new();
        stack.push(0x202);
        stack.push(0x304);
        assert_eq!(stack.frames(), &[0x202, 0x304]);
        stack.pop();
        assert_eq!(stack.frames(), &[0x202]);
    }
}
