use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

use log::*;

type InitFunction = Box<dyn Fn() + Send + Sync>;

/// Registry of static initializer callbacks, run once in registration order
/// during the post-load phase.
pub struct InitFunctionRegistry {
    functions: Mutex<Vec<InitFunction>>,
    ran: AtomicBool,
}

impl InitFunctionRegistry {
    pub fn new() -> Self {
        Self {
            functions: Mutex::new(Vec::new()),
            ran: AtomicBool::new(false),
        }
    }

    /// The process-wide registry. Component crates register their init
    /// functions here before the host loads the game binary.
    pub fn global() -> Arc<InitFunctionRegistry> {
        static GLOBAL: LazyLock<Arc<InitFunctionRegistry>> =
            LazyLock::new(|| Arc::new(InitFunctionRegistry::new()));
        GLOBAL.clone()
    }

    /// Appends a callback. Registration after [run_all](Self::run_all) has
    /// fired is accepted but the callback will not run.
    pub fn register(&self, function: impl Fn() + Send + Sync + 'static) {
        self.functions.lock().unwrap().push(Box::new(function));
    }

    /// Runs every registered callback in registration order, synchronously.
    /// Only the first call has any effect.
    pub fn run_all(&self) {
        if self.ran.swap(true, Ordering::SeqCst) {
            return;
        }

        let functions = std::mem::take(&mut *self.functions.lock().unwrap());
        debug!("running {} init functions", functions.len());

        for function in &functions {
            function();
        }
    }
}

impl Default for InitFunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
