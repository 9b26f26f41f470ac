use std::thread;
use std::time::Duration;

use common::config::{DISPATCH_DELAY_US, MAX_PRIO};
use common::types::Prio;
use log::{debug, trace};
use spin::Mutex;

use super::queue::Queue;
use super::SchedPolicy;
use crate::process::ProcHandle;

#[inline]
fn slot_budget(prio: Prio) -> usize {
    MAX_PRIO - prio
}

struct PrioLevel<T> {
    queue: Queue<T>,
    current_slot: usize,
}

impl<T> PrioLevel<T> {
    fn new(prio: Prio) -> Self {
        PrioLevel {
            queue: Queue::new(),
            current_slot: slot_budget(prio),
        }
    }

    /// Dequeues and charges one slot; an exhausted level is refilled when revisited.
    fn take(&mut self, prio: Prio) -> Option<T> {
        let item = self.queue.dequeue()?;
        if self.current_slot == 0 {
            self.current_slot = slot_budget(prio);
        }
        self.current_slot -= 1;
        Some(item)
    }
}

struct ReadyQueues<T> {
    mlq: Vec<PrioLevel<T>>,
    ready_queue: Queue<T>,
    run_queue: Queue<T>,
}

impl<T> ReadyQueues<T> {
    fn new() -> Self {
        ReadyQueues {
            mlq: (0..MAX_PRIO).map(PrioLevel::new).collect(),
            ready_queue: Queue::new(),
            run_queue: Queue::new(),
        }
    }

    fn is_empty(&self, policy: SchedPolicy) -> bool {
        match policy {
            SchedPolicy::MultiLevel => self.mlq.iter().all(|level| level.queue.empty()),
            SchedPolicy::SingleLevel => self.ready_queue.empty() && self.run_queue.empty(),
        }
    }

    fn enqueue_mlq(&mut self, prio: Prio, item: T) {
        self.mlq[prio].queue.enqueue(item);
    }

    /// Every call starts at level 0. While level 0 has budget it is tried first;
    /// once exhausted its budget is refilled and the scan starts at level 1,
    /// falling back to level 0 only when nothing else is ready.
    fn get_mlq(&mut self) -> Option<(Prio, T)> {
        let first = if self.mlq[0].current_slot > 0 {
            0
        } else {
            self.mlq[0].current_slot = slot_budget(0);
            1
        };
        let mlq = &mut self.mlq;
        (first..MAX_PRIO)
            .chain(0..first)
            .find_map(|prio| mlq[prio].take(prio).map(|item| (prio, item)))
    }

    fn get_single(&mut self) -> Option<T> {
        if self.ready_queue.empty() {
            while let Some(item) = self.run_queue.dequeue() {
                self.ready_queue.enqueue(item);
            }
        }
        self.ready_queue.dequeue()
    }
}

/// Ready-queue set plus the selection policy over it. One lock guards every queue.
pub struct Scheduler {
    policy: SchedPolicy,
    queues: Mutex<ReadyQueues<ProcHandle>>,
}

impl Scheduler {
    pub fn new(policy: SchedPolicy) -> Self {
        debug!("init scheduler: {:?}, {} priority levels", policy, MAX_PRIO);
        Scheduler {
            policy,
            queues: Mutex::new(ReadyQueues::new()),
        }
    }

    pub fn policy(&self) -> SchedPolicy {
        self.policy
    }

    pub fn queue_empty(&self) -> bool {
        self.queues.lock().is_empty(self.policy)
    }

    pub fn get_proc(&self) -> Option<ProcHandle> {
        thread::sleep(Duration::from_micros(DISPATCH_DELAY_US));
        let mut queues = self.queues.lock();
        match self.policy {
            SchedPolicy::MultiLevel => {
                let (prio, proc) = queues.get_mlq()?;
                trace!("get_proc: pid {} from prio {}", proc.pid(), prio);
                Some(proc)
            }
            SchedPolicy::SingleLevel => queues.get_single(),
        }
    }

    pub fn put_proc(&self, proc: ProcHandle) {
        let mut queues = self.queues.lock();
        match self.policy {
            SchedPolicy::MultiLevel => queues.enqueue_mlq(proc.prio(), proc),
            SchedPolicy::SingleLevel => queues.run_queue.enqueue(proc),
        }
    }

    pub fn add_proc(&self, proc: ProcHandle) {
        let mut queues = self.queues.lock();
        match self.policy {
            SchedPolicy::MultiLevel => queues.enqueue_mlq(proc.prio(), proc),
            SchedPolicy::SingleLevel => queues.ready_queue.enqueue(proc),
        }
    }

    /// Remaining slot budget of level `prio`, `None` past the last level.
    pub fn current_slot(&self, prio: Prio) -> Option<usize> {
        self.queues.lock().mlq.get(prio).map(|level| level.current_slot)
    }

    pub fn queued(&self, prio: Prio) -> Option<usize> {
        self.queues.lock().mlq.get(prio).map(|level| level.queue.size())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedPolicy::default())
    }
}
