/// The name the process-identity record is shared under.
pub const INIT_STATE_NAME: &str = "CfxInitState";

/// Cross-process record describing the process topology of the current
/// session. Shared under [INIT_STATE_NAME] via
/// [HostSharedData](crate::HostSharedData); other cooperating processes read
/// and write the same record, so the layout is fixed.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct InitState {
    /// Pid of the master process, set when the record is first created.
    initial_pid: u32,

    /// Pid the game process was originally expected to run as.
    pub initial_game_pid: u32,

    /// Pid of the process currently acting as the game process.
    pub game_pid: u32,
}

impl InitState {
    /// Whether the calling process is the master process of this session.
    pub fn is_master_process(&self) -> bool {
        self.initial_pid == std::process::id()
    }

    /// Reassigns session mastership to the given pid. Used by the process
    /// that creates the record, and by tests to model either topology.
    pub fn set_initial_pid(&mut self, pid: u32) {
        self.initial_pid = pid;
    }
}

impl Default for InitState {
    /// The creating process becomes the master process.
    fn default() -> Self {
        Self {
            initial_pid: std::process::id(),
            initial_game_pid: 0,
            game_pid: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creator_is_master_by_default() {
        assert!(InitState::default().is_master_process());
    }

    #[test]
    fn foreign_pid_is_not_master() {
        let mut state = InitState::default();
        state.set_initial_pid(std::process::id().wrapping_add(1));
        assert!(!state.is_master_process());
    }
}
