//! Bridge to the legacy hooks DLL, which only ships for the legacy target
//! family. Hook installation itself is the DLL's business; the launcher only
//! exchanges continuation flags and the hook-table handle with it.

use std::ffi::c_void;
use std::ptr;

use shared::{GameHooks, HooksHandle, ModuleHandle};

unsafe extern "C" {
    fn HooksDLL_PreGameLoad(continue_running: *mut bool, hooks_dll: *mut *mut c_void);
    fn HooksDLL_PostGameLoad(module: *mut c_void, continue_running: *mut bool);
}

pub(crate) struct LegacyHooksDll;

impl GameHooks for LegacyHooksDll {
    fn pre_game_load(&self) -> (bool, Option<HooksHandle>) {
        let mut continue_running = true;
        let mut table = ptr::null_mut();

        // SAFETY: the hooks DLL is linked into every legacy-family build and
        // both out-parameters point at valid storage.
        unsafe { HooksDLL_PreGameLoad(&mut continue_running, &mut table) };

        let handle = (!table.is_null()).then(|| HooksHandle(table as usize));
        (continue_running, handle)
    }

    fn post_game_load(&self, module: ModuleHandle) -> bool {
        let mut continue_running = true;

        // SAFETY: as above; the module handle is the one the host just
        // finished loading.
        unsafe { HooksDLL_PostGameLoad(module.0 as *mut c_void, &mut continue_running) };

        continue_running
    }
}
