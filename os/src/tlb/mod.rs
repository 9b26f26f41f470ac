mod cache;
mod tag;

pub use cache::{TlbCache, TlbEntry, TlbStats};
pub use tag::{TlbMode, TlbTag};

use common::config::{DEFAULT_VMAID, PAGING_ADDR_FPN_LOBIT};
use common::types::{Addr, FrameNum, RegionId};
use common::utils::{paging_offset, paging_pgn};
use log::{debug, error, warn};

use crate::config::DIAG_DUMP;
use crate::error::{Error, Result};
use crate::mm::Region;
use crate::process::Pcb;

fn dump_state(proc: &Pcb, with_ram: bool) {
    if !DIAG_DUMP {
        return;
    }
    if let Some(tlb) = proc.tlb() {
        debug!("{}", tlb.dump());
    }
    debug!("{}", proc.mm().dump_page_table());
    if with_ram {
        debug!("{}", proc.mram().dump());
    }
}

fn lookup_live_region(proc: &Pcb, rgid: RegionId, op: &str) -> Result<Region> {
    let region = match proc.mm().lookup_region(rgid) {
        Some(region) => region,
        None => {
            error!("Invalid memory region ID");
            return Err(Error::InvalidRegionHandle(rgid));
        }
    };
    if proc.mm().is_freed(DEFAULT_VMAID, &region) {
        error!("{} to freed region list", op);
        return Err(Error::FreedRegionAccess(rgid));
    }
    Ok(region)
}

#[inline]
fn frame_addr(frame: FrameNum, addr: Addr) -> Addr {
    ((frame as usize) << PAGING_ADDR_FPN_LOBIT) + paging_offset(addr)
}

/// Caches the translation the slow path just resolved.
fn refill(proc: &Pcb, addr: Addr) {
    let Some(tlb) = proc.tlb() else {
        return;
    };
    let pgn = paging_pgn(addr);
    let pte = proc.mm().pte(pgn);
    if !pte.is_present() {
        warn!("tlb refill: page {} of pid {} is not present", pgn, proc.pid());
        return;
    }
    tlb.write(proc.pid(), pgn, pte.fpn());
}

/// Allocates region `rgid` of `size` bytes in the default vma.
pub fn tlb_alloc(proc: &Pcb, size: usize, rgid: RegionId) -> Result<Addr> {
    let ret = proc.mm().alloc(DEFAULT_VMAID, rgid, size);
    dump_state(proc, false);
    ret
}

/// Frees region `rgid` and drops the cached translations of its pages.
pub fn tlb_free(proc: &Pcb, rgid: RegionId) -> Result<()> {
    let region = proc.mm().lookup_region(rgid);
    let ret = proc.mm().free(DEFAULT_VMAID, rgid);
    if ret.is_ok() {
        if let (Some(tlb), Some(pages)) = (proc.tlb(), region.and_then(|r| r.pages())) {
            for pgn in pages {
                tlb.invalidate(proc.pid(), pgn);
            }
        }
    }
    dump_state(proc, false);
    ret
}

/// Reads the byte at `offset` into region `source`.
pub fn tlb_read(proc: &Pcb, source: RegionId, offset: usize) -> Result<u8> {
    let region = lookup_live_region(proc, source, "Read")?;
    let tlb = proc.tlb().ok_or(Error::CacheDeviceUnavailable)?;
    let addr = region.start + offset;
    let pgn = paging_pgn(addr);

    match tlb.read(proc.pid(), pgn) {
        Some(frame) => {
            debug!("TLB hit at read region={} offset={}", source, offset);
            dump_state(proc, true);
            proc.mram().read(frame_addr(frame, addr))
        }
        None => {
            debug!("TLB miss at read region={} offset={}", source, offset);
            dump_state(proc, true);
            let data = proc.mm().read(DEFAULT_VMAID, source, offset)?;
            refill(proc, addr);
            dump_state(proc, false);
            Ok(data)
        }
    }
}

/// Writes `data` at `offset` into region `destination`.
pub fn tlb_write(proc: &Pcb, data: u8, destination: RegionId, offset: usize) -> Result<()> {
    let region = lookup_live_region(proc, destination, "Write")?;
    let tlb = proc.tlb().ok_or(Error::CacheDeviceUnavailable)?;
    let addr = region.start + offset;
    let pgn = paging_pgn(addr);

    match tlb.read(proc.pid(), pgn) {
        Some(frame) => {
            debug!("TLB hit at write region={} offset={} value={}", destination, offset, data);
            dump_state(proc, true);
            proc.mram().write(frame_addr(frame, addr), data)
        }
        None => {
            debug!("TLB miss at write region={} offset={} value={}", destination, offset, data);
            dump_state(proc, true);
            proc.mm().write(DEFAULT_VMAID, destination, offset, data)?;
            refill(proc, addr);
            dump_state(proc, false);
            Ok(())
        }
    }
}
