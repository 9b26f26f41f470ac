mod queue;
mod scheduler;

pub use queue::Queue;
pub use scheduler::Scheduler;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedPolicy {
    /// One queue per priority with slot-based aging.
    MultiLevel,
    /// The legacy ready/run queue pair.
    SingleLevel,
}

impl Default for SchedPolicy {
    fn default() -> Self {
        crate::config::SCHED_POLICY
    }
}
