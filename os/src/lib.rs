pub mod config;
pub mod error;
pub mod logging;
pub mod mm;
pub mod process;
pub mod scheduler;
pub mod tlb;

pub use error::{Error, Result};
pub use process::{Pcb, ProcHandle};
pub use scheduler::{SchedPolicy, Scheduler};
pub use tlb::{tlb_alloc, tlb_free, tlb_read, tlb_write, TlbCache, TlbMode, TlbStats};
