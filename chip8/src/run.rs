use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};

use chip8_core::{Chip8, Frontend, Halt};

use crate::error::Error;
use crate::shell::Shell;
use crate::Args;

pub fn run(args: Args) -> Result<(), Error> {
    if args.rom.is_none() && !args.debug {
        return Err(Error::Usage);
    }

    let mut chip8 = Chip8::new(args.config());

    // Load ROM
    if let Some(path) = &args.rom {
        let rom = read_rom(path)?;
        let loaded = chip8.load_rom(&rom);
        info!("loaded {} bytes from {}", loaded, path.display());
    }

    if !args.headless {
        if cfg!(feature = "window") {
            chip8.attach(open_window()?);
        } else {
            warn!("built without the `window` feature, running headless");
        }
    }

    if !args.debug {
        match chip8.exec_all() {
            Halt::Closed => {
                info!("window closed");
                return Ok(());
            }
            halt => warn!("{}, entering the debug shell", halt),
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(&mut chip8, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}

/// Reads a whole rom image into memory.
pub fn read_rom(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|source| Error::Rom {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(feature = "window")]
pub fn open_window() -> Result<Box<dyn Frontend>, Error> {
    let display = chip8_display::Display::open().map_err(Error::Window)?;
    Ok(Box::new(display))
}

#[cfg(not(feature = "window"))]
pub fn open_window() -> Result<Box<dyn Frontend>, Error> {
    Err(Error::Window(
        "built without the `window` feature".to_string(),
    ))
}
