// schedule
pub const MAX_PRIO: usize = 140;
pub const MAX_QUEUE_SIZE: usize = 10;
pub const DISPATCH_DELAY_US: u64 = 5;

// tlb
pub const TLB_MAX_ENTRIES: usize = 8;
pub const TLB_ENTRY_SIZE: usize = 8;
pub const TLB_FRAME_WORD_OFFSET: usize = 4;

pub const TLB_TAG_VALID_BIT: usize = 31;
pub const TLB_TAG_USED_BIT: usize = 30;
pub const TLB_TAG_PID_LOBIT: usize = 14;
pub const TLB_TAG_PGN_HIBIT: usize = 13;
pub const TLB_TAG_PGN_LOBIT: usize = 0;
/// Fully-associative tags give bit 30 to the used flag.
pub const TLB_FA_TAG_PID_HIBIT: usize = 29;
pub const TLB_DM_TAG_PID_HIBIT: usize = 30;

// paging
pub const PAGING_CPU_BUS_WIDTH: usize = 22;
pub const PAGING_PAGE_BITS: usize = 8;
pub const PAGING_PAGESZ: usize = 1 << PAGING_PAGE_BITS;
pub const PAGING_ADDR_OFFST_LOBIT: usize = 0;
pub const PAGING_ADDR_OFFST_HIBIT: usize = PAGING_PAGE_BITS - 1;
pub const PAGING_ADDR_PGN_LOBIT: usize = PAGING_PAGE_BITS;
pub const PAGING_ADDR_PGN_HIBIT: usize = PAGING_CPU_BUS_WIDTH - 1;
pub const PAGING_ADDR_FPN_LOBIT: usize = PAGING_PAGE_BITS;

pub const PAGING_PTE_FPN_LOBIT: usize = 0;
pub const PAGING_PTE_FPN_HIBIT: usize = 12;

pub const DEFAULT_VMAID: usize = 0;
