use std::{fs, panic, path::Path};

use anyhow::Result;
use backtrace::Backtrace;
use chrono::prelude::*;
use log::*;
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};

mod component;
mod hooks;
mod host_data;
mod init_functions;
mod init_state;
mod loader;
mod toolhelp;

pub use component::*;
pub use hooks::*;
pub use host_data::*;
pub use init_functions::*;
pub use init_state::*;
pub use loader::*;
pub use toolhelp::*;

/// Opaque handle to a loaded module (the mapped game binary).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ModuleHandle(pub usize);

/// Handle panics by both logging and popping up a message box, which is the
/// most reliable way to make something visible to the end user.
pub fn handle_panics() {
    panic::set_hook(Box::new(|panic_info| {
        let mut message = String::new();
        if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            message.push_str(&format!("Rust panic: {s}"));
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            message.push_str(&format!("Rust panic: {s}"));
        } else {
            message.push_str(&format!("Rust panic: {:?}", panic_info.payload()));
        }

        message.push_str(&format!("\n{:?}", Backtrace::new()));

        error!("{}", message);
        message_box(message);
    }));
}

/// Displays a message box with the given message.
#[cfg(windows)]
pub fn message_box(message: impl Into<String>) {
    use windows::Win32::UI::WindowsAndMessaging::{MB_OK, MessageBoxW};
    use windows::core::{HSTRING, w};

    unsafe {
        MessageBoxW(
            None,
            &HSTRING::from(message.into()),
            w!("CitizenFX Launcher"),
            MB_OK,
        );
    }
}

/// On non-Windows hosts there is no dialog to pop; the log entry has to do.
#[cfg(not(windows))]
pub fn message_box(message: impl Into<String>) {
    warn!("{}", message.into());
}

/// Starts the logger which logs to both stdout and a file which users can
/// send to the devs for debugging.
pub fn start_logger() {
    // If the log directory can't be created we still want the terminal
    // logger, so the write logger is attached on a best-effort basis.
    let _ = start_logger_for_dir("logs");
    info!("Logger initialized.");
}

/// Starts a logger for the given directory.
fn start_logger_for_dir(dir: impl AsRef<Path>) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Ok(logger) = create_write_logger(dir) {
        loggers.push(logger);
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

/// Creates a write logger that writes to files in [dir].
fn create_write_logger(dir: impl AsRef<Path>) -> Result<Box<WriteLogger<fs::File>>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let filename = dir.join(Local::now().format("launcher-%Y-%m-%d.log").to_string());
    Ok(WriteLogger::new(
        LevelFilter::Info,
        simplelog::Config::default(),
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(filename)?,
    ))
}
