use crate::scheduler::SchedPolicy;
use crate::tlb::TlbMode;

pub const SCHED_POLICY: SchedPolicy = if cfg!(feature = "mlq_sched") {
    SchedPolicy::MultiLevel
} else {
    SchedPolicy::SingleLevel
};

pub const TLB_MODE: TlbMode = if cfg!(feature = "tlb_direct_map") {
    TlbMode::DirectMapped
} else {
    TlbMode::FullyAssociative
};

pub const DIAG_DUMP: bool = cfg!(feature = "diag_dump");
