#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::config::{PAGING_ADDR_FPN_LOBIT, PAGING_PAGESZ};
use common::types::{Addr, FrameNum, PageNum, Pid, Prio, RegionId, VmaId};
use common::utils::{paging_offset, paging_pgn};
use os::mm::{MemoryManager, PTEFlags, PageTableEntry, PhysicalMemory, Region};
use os::{Error, Pcb, ProcHandle, Result, TlbCache, TlbMode};
use spin::Mutex;

pub const RAM_SIZE: usize = 1 << 16;

pub struct FakeRam {
    bytes: Mutex<Vec<u8>>,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl FakeRam {
    pub fn new() -> Self {
        FakeRam {
            bytes: Mutex::new(vec![0; RAM_SIZE]),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn peek(&self, addr: Addr) -> u8 {
        self.bytes.lock()[addr]
    }
}

impl PhysicalMemory for FakeRam {
    fn read(&self, addr: Addr) -> Result<u8> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.bytes.lock().get(addr).copied().ok_or(Error::AddressOutOfRange(addr))
    }

    fn write(&self, addr: Addr, data: u8) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut bytes = self.bytes.lock();
        let byte = bytes.get_mut(addr).ok_or(Error::AddressOutOfRange(addr))?;
        *byte = data;
        Ok(())
    }

    fn dump(&self) -> String {
        String::from("ram")
    }
}

#[derive(Default)]
struct MmState {
    regions: HashMap<RegionId, Region>,
    freed: Vec<Region>,
    page_table: HashMap<PageNum, PageTableEntry>,
    next_addr: Addr,
    next_frame: FrameNum,
}

/// Region table, freed list and a flat page table over a `FakeRam`.
pub struct FakeMm {
    ram: Arc<FakeRam>,
    state: Mutex<MmState>,
    pub slow_reads: AtomicUsize,
    pub slow_writes: AtomicUsize,
    pub dumps: AtomicUsize,
}

impl FakeMm {
    pub fn new(ram: Arc<FakeRam>) -> Self {
        FakeMm {
            ram,
            state: Mutex::new(MmState {
                next_frame: 3,
                ..MmState::default()
            }),
            slow_reads: AtomicUsize::new(0),
            slow_writes: AtomicUsize::new(0),
            dumps: AtomicUsize::new(0),
        }
    }

    fn translate(&self, rgid: RegionId, offset: usize) -> Result<Addr> {
        let state = self.state.lock();
        let region = state.regions.get(&rgid).ok_or(Error::Memory(-1))?;
        let addr = region.start + offset;
        let pte = state.page_table.get(&paging_pgn(addr)).ok_or(Error::Memory(-3000))?;
        Ok(((pte.fpn() as usize) << PAGING_ADDR_FPN_LOBIT) + paging_offset(addr))
    }

    pub fn phys_addr(&self, rgid: RegionId, offset: usize) -> Addr {
        self.translate(rgid, offset).unwrap()
    }
}

impl MemoryManager for FakeMm {
    fn alloc(&self, _vmaid: VmaId, rgid: RegionId, size: usize) -> Result<Addr> {
        let mut state = self.state.lock();
        let region = Region::new(state.next_addr, state.next_addr + size);
        state.next_addr = (region.end + PAGING_PAGESZ - 1) / PAGING_PAGESZ * PAGING_PAGESZ;
        if let Some(pages) = region.pages() {
            for pgn in pages {
                let frame = state.next_frame;
                state.next_frame += 1;
                state.page_table.insert(pgn, PageTableEntry::new(frame, PTEFlags::PRESENT));
            }
        }
        state.regions.insert(rgid, region);
        Ok(region.start)
    }

    fn free(&self, _vmaid: VmaId, rgid: RegionId) -> Result<()> {
        let mut state = self.state.lock();
        let region = *state.regions.get(&rgid).ok_or(Error::Memory(-1))?;
        state.freed.push(region);
        Ok(())
    }

    fn read(&self, _vmaid: VmaId, rgid: RegionId, offset: usize) -> Result<u8> {
        self.slow_reads.fetch_add(1, Ordering::SeqCst);
        let phys = self.translate(rgid, offset)?;
        self.ram.read(phys)
    }

    fn write(&self, _vmaid: VmaId, rgid: RegionId, offset: usize, data: u8) -> Result<()> {
        self.slow_writes.fetch_add(1, Ordering::SeqCst);
        let phys = self.translate(rgid, offset)?;
        self.ram.write(phys, data)
    }

    fn lookup_region(&self, rgid: RegionId) -> Option<Region> {
        self.state.lock().regions.get(&rgid).copied()
    }

    fn is_freed(&self, _vmaid: VmaId, region: &Region) -> bool {
        self.state.lock().freed.contains(region)
    }

    fn pte(&self, pgn: PageNum) -> PageTableEntry {
        self.state.lock().page_table.get(&pgn).copied().unwrap_or_default()
    }

    fn dump_page_table(&self) -> String {
        self.dumps.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        let mut pgns: Vec<_> = state.page_table.keys().copied().collect();
        pgns.sort_unstable();
        let mut out = String::new();
        for pgn in pgns {
            let _ = writeln!(out, "{:08} -> {:08x}", pgn, state.page_table[&pgn].bits);
        }
        out
    }
}

pub struct Fixture {
    pub proc: ProcHandle,
    pub mm: Arc<FakeMm>,
    pub ram: Arc<FakeRam>,
}

pub fn fixture(pid: Pid, prio: Prio, tlb: Option<TlbCache>) -> Fixture {
    let ram = Arc::new(FakeRam::new());
    let mm = Arc::new(FakeMm::new(ram.clone()));
    let proc = Arc::new(Pcb::new(pid, prio, tlb, mm.clone(), ram.clone()));
    Fixture { proc, mm, ram }
}

pub fn fixture_with_tlb(pid: Pid, mode: TlbMode) -> Fixture {
    fixture(pid, 0, Some(TlbCache::new(32, mode).unwrap()))
}

/// A schedulable process with no memory traffic.
pub fn process(pid: Pid, prio: Prio) -> ProcHandle {
    fixture(pid, prio, None).proc
}
