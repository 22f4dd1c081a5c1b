pub use display::Display;
pub use keymap::keymap;

mod display;
mod keymap;
