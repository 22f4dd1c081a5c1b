use crate::display::FrameBuffer;
use crate::keypad::Keypad;

/// A display surface and input source the interpreter services between
/// instructions. Windows, terminals and test doubles plug in here so the
/// interpreter never needs to know how pixels reach a screen.
pub trait Frontend {
    /// Show the frame. Only called when it changed since the last call.
    fn present(&mut self, frame: &FrameBuffer);

    /// Bring the keypad up to date with whatever keys are physically held.
    fn poll(&mut self, keypad: &mut Keypad);

    /// Whether the person at the other end asked to quit.
    fn should_close(&mut self) -> bool;
}
