//! The exported C surface the host calls through.

use std::ffi::c_void;
use std::sync::LazyLock;

use log::*;
use shared::{ComponentLoader, ModuleHandle};

use crate::entry_point::EntryPointSlot;
use crate::launcher::{Launcher, SandboxHandle};

/// The process singleton behind the exported interface. First touch also
/// installs the panic hook and logger, since the host loads this DLL before
/// anything else of ours runs.
static LAUNCHER: LazyLock<Launcher> = LazyLock::new(|| {
    shared::handle_panics();
    shared::start_logger();

    let launcher = Launcher::new(ComponentLoader::global());

    #[cfg(all(windows, feature = "gta-ny"))]
    let launcher = launcher.with_hooks(std::sync::Arc::new(crate::legacy_hooks::LegacyHooksDll));

    launcher
});

/// C-visible table of the four lifecycle phases, in host call order.
#[repr(C)]
pub struct LauncherInterface {
    pub pre_load_game: extern "C" fn(sandbox: *mut c_void) -> bool,
    pub pre_initialize_game: extern "C" fn() -> bool,
    pub post_load_game: extern "C" fn(module: *mut c_void, entry_point: *mut usize) -> bool,
    pub pre_resume_game: extern "C" fn() -> bool,
}

extern "C" fn pre_load_game(sandbox: *mut c_void) -> bool {
    run_phase("PreLoadGame", || {
        LAUNCHER.pre_load_game(SandboxHandle(sandbox))
    })
}

extern "C" fn pre_initialize_game() -> bool {
    run_phase("PreInitializeGame", || LAUNCHER.pre_initialize_game())
}

extern "C" fn post_load_game(module: *mut c_void, entry_point: *mut usize) -> bool {
    run_phase("PostLoadGame", || {
        if entry_point.is_null() {
            anyhow::bail!("host passed a null entry-point slot");
        }

        // SAFETY: non-null checked above; the host owns the slot for the
        // duration of the call.
        let mut slot = EntryPointSlot(unsafe { *entry_point });
        let result = LAUNCHER.post_load_game(ModuleHandle(module as usize), &mut slot);
        unsafe { *entry_point = slot.0 };

        result
    })
}

extern "C" fn pre_resume_game() -> bool {
    run_phase("PreResumeGame", || LAUNCHER.pre_resume_game())
}

/// Maps a phase result onto the host's bare continuation flag. Fatal errors
/// become a vetoed startup after logging; the host unwinds and exits.
fn run_phase(name: &str, phase: impl FnOnce() -> anyhow::Result<bool>) -> bool {
    match phase() {
        Ok(continue_running) => {
            debug!("{name} -> {continue_running}");
            continue_running
        }
        Err(err) => {
            error!("{name} failed: {err:#}");
            false
        }
    }
}

static LAUNCHER_INTERFACE: LauncherInterface = LauncherInterface {
    pre_load_game,
    pre_initialize_game,
    post_load_game,
    pre_resume_game,
};

/// The single accessor the host resolves from this DLL.
#[unsafe(no_mangle)]
pub extern "C" fn GetLauncherInterface() -> *const LauncherInterface {
    &LAUNCHER_INTERFACE
}
