//! Launcher lifecycle shim loaded into the game process.
//!
//! The host calls the four phases synchronously around the moment the game
//! binary begins executing: pre-load, pre-initialize, (binary load),
//! post-load, pre-resume. Each phase returns a continuation flag; a false
//! flag tells the host to unwind its startup and terminate.

mod entry_point;
mod ffi;
mod launcher;
#[cfg(all(windows, feature = "gta-ny"))]
mod legacy_hooks;
mod os_advisory;

pub use entry_point::EntryPointSlot;
pub use ffi::{GetLauncherInterface, LauncherInterface};
pub use launcher::{Launcher, SandboxHandle, TOOL_MODE_VAR};
