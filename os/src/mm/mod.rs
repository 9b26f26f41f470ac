mod page_table;
mod region;

pub use page_table::{PTEFlags, PageTableEntry};
pub use region::Region;

use common::types::{Addr, PageNum, RegionId, VmaId};

use crate::error::Result;

/// Per-process memory-management context. Page-table walking, frame
/// allocation and the region table live behind this interface; the tlb layer
/// only calls into it.
pub trait MemoryManager: Send + Sync {
    fn alloc(&self, vmaid: VmaId, rgid: RegionId, size: usize) -> Result<Addr>;

    fn free(&self, vmaid: VmaId, rgid: RegionId) -> Result<()>;

    fn read(&self, vmaid: VmaId, rgid: RegionId, offset: usize) -> Result<u8>;

    fn write(&self, vmaid: VmaId, rgid: RegionId, offset: usize, data: u8) -> Result<()>;

    fn lookup_region(&self, rgid: RegionId) -> Option<Region>;

    fn is_freed(&self, vmaid: VmaId, region: &Region) -> bool;

    fn pte(&self, pgn: PageNum) -> PageTableEntry;

    fn dump_page_table(&self) -> String;
}

/// Byte-addressed device: process ram, or the tlb backing buffer.
pub trait PhysicalMemory: Send + Sync {
    fn read(&self, addr: Addr) -> Result<u8>;

    fn write(&self, addr: Addr, data: u8) -> Result<()>;

    fn dump(&self) -> String;
}
