use std::sync::Arc;

/// Suspends and resumes OS-level process/thread enumeration. The real
/// implementation lives in the hooking subsystem; third-party software that
/// scans the process table mid-initialization would otherwise observe the
/// process in a half-initialized state.
pub trait ToolhelpController: Send + Sync {
    fn suspend(&self);
    fn resume(&self);
}

/// Scoped suspension of toolhelp enumeration. Suspends on construction and
/// resumes when dropped, so the suspension is lifted on normal return, early
/// return, and unwinding alike.
pub struct DisableToolhelpScope {
    controller: Option<Arc<dyn ToolhelpController>>,
}

impl DisableToolhelpScope {
    /// Enters the scope. A `None` controller makes the scope a no-op, which
    /// is the case until the hooking subsystem is wired in.
    pub fn new(controller: Option<Arc<dyn ToolhelpController>>) -> Self {
        if let Some(controller) = &controller {
            controller.suspend();
        }

        Self { controller }
    }
}

impl Drop for DisableToolhelpScope {
    fn drop(&mut self) {
        if let Some(controller) = &self.controller {
            controller.resume();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI32, Ordering};

    use super::*;

    #[derive(Default)]
    struct Counting {
        active: AtomicI32,
        peak: AtomicI32,
    }

    impl ToolhelpController for Counting {
        fn suspend(&self) {
            let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(active, Ordering::SeqCst);
        }

        fn resume(&self) {
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn suspension_is_lifted_on_normal_return() {
        let controller = Arc::new(Counting::default());
        {
            let _scope = DisableToolhelpScope::new(Some(controller.clone()));
            assert_eq!(controller.active.load(Ordering::SeqCst), 1);
        }
        assert_eq!(controller.active.load(Ordering::SeqCst), 0);
        assert_eq!(controller.peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn suspension_is_lifted_on_unwind() {
        let controller = Arc::new(Counting::default());
        let inner = controller.clone();

        let result = std::panic::catch_unwind(move || {
            let _scope = DisableToolhelpScope::new(Some(inner));
            panic!("component failure");
        });

        assert!(result.is_err());
        assert_eq!(controller.active.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_controller_is_a_no_op() {
        let _scope = DisableToolhelpScope::new(None);
    }
}
