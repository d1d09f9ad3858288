use std::sync::OnceLock;

use crate::ModuleHandle;

/// Opaque, pointer-sized handle to the hook table exposed by the legacy
/// hooks DLL. The launcher only stores and republishes it; game-specific
/// code elsewhere calls through it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct HooksHandle(pub usize);

/// The legacy hooks DLL, bridged before and after the game binary is mapped.
/// Only the legacy target family ships an implementation; everything about
/// the hook installation itself is the DLL's business.
pub trait GameHooks: Send + Sync {
    /// Called before any component is initialized. Returns the continuation
    /// flag and, when available, the hook-table handle to publish
    /// process-wide. A false flag aborts host startup.
    fn pre_game_load(&self) -> (bool, Option<HooksHandle>);

    /// Called after the game binary is fully loaded. A false flag aborts
    /// host startup.
    fn post_game_load(&self, module: ModuleHandle) -> bool;
}

static HOOKS_DLL: OnceLock<HooksHandle> = OnceLock::new();

/// Publishes the hooks-table handle process-wide. Only the first publication
/// sticks; the handle is written once per process.
pub fn set_hooks_dll(handle: HooksHandle) {
    let _ = HOOKS_DLL.set(handle);
}

/// The process-wide hooks-table handle, if a legacy hooks DLL provided one.
pub fn hooks_dll() -> Option<HooksHandle> {
    HOOKS_DLL.get().copied()
}
