use std::ffi::c_void;
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{Context, Result};
use log::*;
use shared::{
    ComponentLoader, DisableToolhelpScope, GameHooks, HostSharedData, INIT_STATE_NAME,
    InitFunctionRegistry, InitState, LifeCycleComponent, ModuleHandle, ToolhelpController,
    set_hooks_dll,
};

use crate::entry_point::{self, EntryPointSlot};
use crate::os_advisory;

/// Environment variable whose presence suppresses all component dispatch,
/// for non-interactive invocations of the game executable.
pub const TOOL_MODE_VAR: &str = "CitizenFX_ToolMode";

/// Opaque sandbox handle the host passes in at pre-load. The launcher does
/// not interpret it.
#[derive(Clone, Copy)]
pub struct SandboxHandle(pub *mut c_void);

/// The lifecycle shim the host calls into around the moment the game binary
/// begins executing. The host drives the phases synchronously and in order:
/// pre-load, pre-initialize, (binary load), post-load, pre-resume.
///
/// Phases return `Ok(true)` when the host may keep starting up, `Ok(false)`
/// when startup should be aborted (continuation veto), and `Err` for fatal
/// failures such as the shared process-identity state being unreachable.
pub struct Launcher {
    loader: Arc<Mutex<ComponentLoader>>,
    init_functions: Arc<InitFunctionRegistry>,
    hooks: Option<Arc<dyn GameHooks>>,
    toolhelp: Option<Arc<dyn ToolhelpController>>,
    init_state: OnceLock<HostSharedData<InitState>>,
    init_state_name: String,
    tool_mode: bool,
}

impl Launcher {
    pub fn new(loader: Arc<Mutex<ComponentLoader>>) -> Self {
        Self {
            loader,
            init_functions: InitFunctionRegistry::global(),
            hooks: None,
            toolhelp: None,
            init_state: OnceLock::new(),
            init_state_name: INIT_STATE_NAME.to_owned(),
            tool_mode: std::env::var_os(TOOL_MODE_VAR).is_some(),
        }
    }

    /// Wires in the legacy hooks DLL bridge.
    pub fn with_hooks(mut self, hooks: Arc<dyn GameHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Wires in the toolhelp suspension controller.
    pub fn with_toolhelp(mut self, toolhelp: Arc<dyn ToolhelpController>) -> Self {
        self.toolhelp = Some(toolhelp);
        self
    }

    /// Replaces the init-function registry (process-global by default).
    pub fn with_init_functions(mut self, registry: Arc<InitFunctionRegistry>) -> Self {
        self.init_functions = registry;
        self
    }

    /// Overrides tool mode, which otherwise follows [TOOL_MODE_VAR].
    pub fn with_tool_mode(mut self, tool_mode: bool) -> Self {
        self.tool_mode = tool_mode;
        self
    }

    /// Overrides the name the process-identity record is shared under.
    pub fn with_init_state_name(mut self, name: impl Into<String>) -> Self {
        self.init_state_name = name.into();
        self
    }

    /// The shared process-identity record, attached on first use. Attach
    /// failure is fatal: there is nowhere else to get the topology from.
    fn init_state(&self) -> Result<&HostSharedData<InitState>> {
        match self.init_state.get() {
            Some(state) => Ok(state),
            None => {
                let state = HostSharedData::attach(&self.init_state_name).with_context(|| {
                    format!("failed to attach shared state '{}'", self.init_state_name)
                })?;
                Ok(self.init_state.get_or_init(|| state))
            }
        }
    }

    /// Pre-load: bootstrap gate, legacy pre-game-load hook, and full
    /// component initialization.
    pub fn pre_load_game(&self, _sandbox: SandboxHandle) -> Result<bool> {
        // If we don't have adhesive, this process also acts as the game
        // process; correct the shared pid so other processes find us. Safe to
        // repeat: assigning the same value again changes nothing. The record
        // is written back only when the correction applies, so non-master
        // processes and adhesive topologies never touch it.
        let knows_adhesive = self.loader.lock().unwrap().knows_component("adhesive");
        let init_state = self.init_state()?;
        if !knows_adhesive && init_state.read(InitState::is_master_process)? {
            init_state.update(|state| state.game_pid = state.initial_game_pid)?;
        }

        // The hooks DLL only exists for the legacy target family. Its
        // continuation flag gates everything after it in this call.
        if let Some(hooks) = &self.hooks {
            let (continue_running, handle) = hooks.pre_game_load();

            if let Some(handle) = handle {
                set_hooks_dll(handle);
            }

            if !continue_running {
                debug!("legacy hooks vetoed startup at pre-load");
                return Ok(false);
            }
        }

        self.initialize_components()?;

        // And start running the game.
        Ok(true)
    }

    /// Pre-initialize: OS advisory for the master process, component loader
    /// initialization, and the pre-init broadcast.
    pub fn pre_initialize_game(&self) -> Result<bool> {
        if !os_advisory::is_supported_os() && self.init_state()?.read(InitState::is_master_process)?
        {
            os_advisory::warn_os_version();
        }

        // Make the component loader initialize.
        self.loader.lock().unwrap().initialize();

        self.run_life_cycle_callback(|component| component.pre_init_game());

        Ok(true)
    }

    /// Post-load: game-load notification, legacy post-game-load hook, static
    /// initializers, and the build-family entry-point strategy.
    pub fn post_load_game(
        &self,
        module: ModuleHandle,
        entry_point: &mut EntryPointSlot,
    ) -> Result<bool> {
        {
            let _scope = DisableToolhelpScope::new(self.toolhelp.clone());
            self.loader.lock().unwrap().do_game_load(module);
        }

        if let Some(hooks) = &self.hooks
            && !hooks.post_game_load(module)
        {
            debug!("legacy hooks vetoed startup at post-load");
            return Ok(false);
        }

        self.init_functions.run_all();

        entry_point::redirect(entry_point);

        Ok(true)
    }

    /// Pre-resume: the pre-resume broadcast. Nothing here can veto startup.
    pub fn pre_resume_game(&self) -> Result<bool> {
        self.run_life_cycle_callback(|component| component.pre_resume_game());

        Ok(true)
    }

    /// Full-initialize dispatch: every instance of every component, in
    /// component-then-instance insertion order. Instance failures are not
    /// caught here; the first error propagates out of the phase.
    fn initialize_components(&self) -> Result<()> {
        if self.tool_mode {
            return Ok(());
        }

        let _scope = DisableToolhelpScope::new(self.toolhelp.clone());
        let loader = self.loader.lock().unwrap();

        // The visitor can't break out of the traversal, so the first failure
        // is carried out of it instead; nothing else is initialized once one
        // instance has failed.
        let mut result = Ok(());
        loader.for_all_components(|data| {
            if result.is_err() {
                return;
            }

            for instance in data.instances() {
                if let Err(err) = instance.initialize() {
                    result = Err(err);
                    return;
                }
            }
        });

        result
    }

    /// Single-capability broadcast: the lifecycle notification is a singleton
    /// per component category, so only the first instance of each component
    /// is considered. Components without instances or without the lifecycle
    /// capability are skipped.
    fn run_life_cycle_callback(&self, callback: impl Fn(&dyn LifeCycleComponent)) {
        if self.tool_mode {
            return;
        }

        let _scope = DisableToolhelpScope::new(self.toolhelp.clone());
        let loader = self.loader.lock().unwrap();

        loader.for_all_components(|data| {
            let Some(instance) = data.instances().first() else {
                return;
            };

            if let Some(life_cycle) = instance.life_cycle() {
                callback(life_cycle);
            }
        });
    }
}
