use core::fmt;
use std::sync::Arc;

use common::config::MAX_PRIO;
use common::types::{Pid, Prio};

use crate::mm::{MemoryManager, PhysicalMemory};
use crate::tlb::TlbCache;

pub type ProcHandle = Arc<Pcb>;

/// Kernel record of one simulated process. The memory context and ram are
/// owned by whoever loaded the process; the tlb is private to it.
pub struct Pcb {
    pid: Pid,
    prio: Prio,
    tlb: Option<TlbCache>,
    mm: Arc<dyn MemoryManager>,
    mram: Arc<dyn PhysicalMemory>,
}

impl Pcb {
    pub fn new(pid: Pid, prio: Prio, tlb: Option<TlbCache>, mm: Arc<dyn MemoryManager>,
               mram: Arc<dyn PhysicalMemory>) -> Self {
        assert!(prio < MAX_PRIO, "priority {} out of range", prio);
        Pcb { pid, prio, tlb, mm, mram }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn prio(&self) -> Prio {
        self.prio
    }

    pub fn tlb(&self) -> Option<&TlbCache> {
        self.tlb.as_ref()
    }

    pub fn mm(&self) -> &dyn MemoryManager {
        self.mm.as_ref()
    }

    pub fn mram(&self) -> &dyn PhysicalMemory {
        self.mram.as_ref()
    }
}

impl fmt::Debug for Pcb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pcb")
            .field("pid", &self.pid)
            .field("prio", &self.prio)
            .field("has_tlb", &self.tlb.is_some())
            .finish()
    }
}
