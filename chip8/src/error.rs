use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to read rom {}: {source}", .path.display())]
    Rom {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("window: {0}")]
    Window(String),

    #[error("expected a rom or --debug")]
    Usage,

    #[error("terminal: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Usage => 2,
            _ => 1,
        }
    }
}
