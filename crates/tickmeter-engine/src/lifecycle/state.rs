/// Whether the counter is bound to a clock and measuring.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum LifecycleState {
    #[default]
    Stopped,
    Running,
}

impl LifecycleState {
    #[inline]
    pub fn is_running(self) -> bool {
        self == LifecycleState::Running
    }
}
