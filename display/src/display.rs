use log::error;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::WindowCanvas;
use sdl2::EventPump;

use chip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_core::{FrameBuffer, Frontend, Keypad};

use crate::keymap::keymap;

const SCALE: usize = 10;

/// # Display
/// The Chip-8 display is composed of 64x32 black/white pixels, drawn here
/// as an SDL2 window scaled up `SCALE` times.
///
/// The display only gets a call to `present` when the Chip-8 FrameBuffer is updated.
/// Keyboard events feed the keypad through `keymap`; closing the window or
/// pressing Escape asks the interpreter to stop.
pub struct Display {
    canvas: WindowCanvas,
    events: EventPump,
    closed: bool,
}

impl Display {
    /// Initialises SDL2 and opens the window.
    pub fn open() -> Result<Self, String> {
        let sdl = sdl2::init()?;
        Display::new(&sdl)
    }

    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw and read input
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                "chip8",
                (DISPLAY_WIDTH * SCALE) as u32,
                (DISPLAY_HEIGHT * SCALE) as u32,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let events = sdl.event_pump()?;

        Ok(Display {
            canvas,
            events,
            closed: false,
        })
    }

    /// Formats a Chip-8 FrameBuffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 texture is a 1D array of ints that represent concatenated rows of RGB pixels.
    ///
    /// This creates a black and white rendering by:
    /// - Flattening the frame buffer into a 1D array by concatenating its rows
    /// - Triplicating each pixel to represent its RGB values
    /// - Mapping lit pixels to 255 intensity and unlit ones to 0
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    fn frame_to_sdl_texture(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .rows()
            .flat_map(|row| row.to_vec())
            .flat_map(|on| std::iter::repeat(u8::from(on) * 255).take(3))
            .collect()
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        let pixels = Display::frame_to_sdl_texture(frame);
        let row_len = DISPLAY_WIDTH * 3;
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            for (y, row) in pixels.chunks(row_len).enumerate() {
                let offset = y * pitch;
                buffer[offset..offset + row_len].copy_from_slice(row);
            }
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

impl Frontend for Display {
    fn present(&mut self, frame: &FrameBuffer) {
        if let Err(e) = self.render(frame) {
            error!("failed to render frame: {}", e);
        }
    }

    fn poll(&mut self, keypad: &mut Keypad) {
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => self.closed = true,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(key) = keymap(key) {
                        keypad.press(key);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(key) = keymap(key) {
                        keypad.release(key);
                    }
                }
                _ => continue,
            }
        }
    }

    fn should_close(&mut self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_sdl_texture() {
        let mut frame = FrameBuffer::new();
        frame.set(1, 0, true);
        frame.set(0, 1, true);
        let frame = Display::frame_to_sdl_texture(&frame);

        let mut expected: Vec<u8> = vec![0; 6144];
        expected[0..6].copy_from_slice(&[0, 0, 0, 255, 255, 255]);
        expected[192..198].copy_from_slice(&[255, 255, 255, 0, 0, 0]);

        assert_eq!(frame, expected);
    }
}
