use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, Parser};
use log::{error, LevelFilter};

use chip8_core::{Config, KeyWait, Quirks};

mod error;
mod print;
mod run;
mod shell;

#[derive(Parser, Debug)]
#[command(version, about = "Chip-8 interpreter with a debug shell", long_about = None)]
pub struct Args {
    /// Rom image to load at 0x200
    #[arg(value_name = "ROM")]
    pub rom: Option<PathBuf>,

    /// Start in the debug shell instead of running
    #[arg(long)]
    pub debug: bool,

    /// Don't open a window
    #[arg(long)]
    pub headless: bool,

    /// Resume `LD Vx, K` on key press rather than waiting for its release
    #[arg(long)]
    pub press_only: bool,

    /// Leave I untouched after `LD [I], Vx` and `LD Vx, [I]`
    #[arg(long)]
    pub no_index_increment: bool,

    /// Seed for `RND`, random if absent
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// More logging; repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn config(&self) -> Config {
        Config {
            key_wait: if self.press_only {
                KeyWait::Press
            } else {
                KeyWait::PressAndRelease
            },
            quirks: Quirks {
                increment_index: !self.no_index_increment,
            },
            seed: self.seed,
        }
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    match run::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            if let error::Error::Usage = e {
                let _ = Args::command().print_help();
            }
            ExitCode::from(e.exit_code())
        }
    }
}
