use core::fmt;
use core::fmt::Write;

use common::config::{TLB_ENTRY_SIZE, TLB_FRAME_WORD_OFFSET, TLB_MAX_ENTRIES};
use common::types::{Addr, FrameNum, PageNum, Pid};
use log::{debug, trace};
use spin::Mutex;

use super::tag::{TlbMode, TlbTag};
use crate::error::{Error, Result};
use crate::mm::PhysicalMemory;

/// Decoded copy of one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TlbEntry {
    pub valid: bool,
    pub used: bool,
    pub pid: Pid,
    pub pgn: PageNum,
    pub frame: FrameNum,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TlbStats {
    pub hits: u64,
    pub misses: u64,
}

impl TlbStats {
    /// Whole percent, 0 before the first access.
    pub fn hit_ratio(&self) -> u64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0;
        }
        self.hits * 100 / total
    }
}

impl fmt::Display for TlbStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===================TLB-Performance===================")?;
        writeln!(f, "TLB hit: {} times", self.hits)?;
        writeln!(f, "TLB miss: {} times", self.misses)?;
        write!(f, "TLB hit ratio: {}%", self.hit_ratio())
    }
}

/// Backing buffer of the device. Slot `i` occupies bytes `8i..8i+8`: the tag
/// word followed by the frame word, both little endian.
struct TlbStorage {
    bytes: Vec<u8>,
    hits: u64,
    misses: u64,
}

impl TlbStorage {
    fn load_word(&self, off: usize) -> u32 {
        let b = &self.bytes[off..off + 4];
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    fn store_word(&mut self, off: usize, word: u32) {
        self.bytes[off..off + 4].copy_from_slice(&word.to_le_bytes());
    }

    fn get_tag(&self, mode: TlbMode, i: usize) -> TlbTag {
        TlbTag::from_word(mode, self.load_word(i * TLB_ENTRY_SIZE))
    }

    fn set_tag(&mut self, i: usize, tag: TlbTag) {
        self.store_word(i * TLB_ENTRY_SIZE, tag.word());
    }

    fn get_frame(&self, i: usize) -> FrameNum {
        self.load_word(i * TLB_ENTRY_SIZE + TLB_FRAME_WORD_OFFSET)
    }

    fn set_frame(&mut self, i: usize, frame: FrameNum) {
        self.store_word(i * TLB_ENTRY_SIZE + TLB_FRAME_WORD_OFFSET, frame);
    }

    /// Tag and frame word both zero.
    fn is_blank(&self, mode: TlbMode, i: usize) -> bool {
        self.get_tag(mode, i).is_empty() && self.get_frame(i) == 0
    }

    fn entry(&self, mode: TlbMode, i: usize) -> TlbEntry {
        let tag = self.get_tag(mode, i);
        TlbEntry {
            valid: tag.is_valid(),
            used: tag.is_used(),
            pid: tag.get_pid(),
            pgn: tag.get_pgn(),
            frame: self.get_frame(i),
        }
    }

    fn fill(&mut self, mode: TlbMode, i: usize, pid: Pid, pgn: PageNum, frame: FrameNum) {
        self.set_tag(i, TlbTag::new(mode, pid, pgn));
        self.set_frame(i, frame);
    }
}

/// Per-process translation cache.
pub struct TlbCache {
    mode: TlbMode,
    num_entries: usize,
    storage: Mutex<TlbStorage>,
}

impl TlbCache {
    /// Builds a device over a zeroed `max_size` byte buffer holding
    /// `min(8, max_size / 8)` slots.
    pub fn new(max_size: usize, mode: TlbMode) -> Result<Self> {
        let num_entries = TLB_MAX_ENTRIES.min(max_size / TLB_ENTRY_SIZE);
        if num_entries == 0 {
            return Err(Error::AllocationFailure(max_size));
        }
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(max_size).map_err(|_| Error::AllocationFailure(max_size))?;
        bytes.resize(max_size, 0);
        debug!("init tlb: {:?}, {} bytes, {} entries", mode, max_size, num_entries);
        Ok(TlbCache {
            mode,
            num_entries,
            storage: Mutex::new(TlbStorage { bytes, hits: 0, misses: 0 }),
        })
    }

    pub fn mode(&self) -> TlbMode {
        self.mode
    }

    pub fn num_entries(&self) -> usize {
        self.num_entries
    }

    pub fn max_size(&self) -> usize {
        self.storage.lock().bytes.len()
    }

    fn direct_index(&self, pgn: PageNum) -> usize {
        pgn % self.num_entries
    }

    /// Looks up the frame cached for `pid`/`pgn`, counting the hit or miss.
    pub fn read(&self, pid: Pid, pgn: PageNum) -> Option<FrameNum> {
        let mut storage = self.storage.lock();
        let found = match self.mode {
            TlbMode::FullyAssociative => (0..self.num_entries).find_map(|i| {
                let mut tag = storage.get_tag(self.mode, i);
                if !tag.is_valid() || !tag.matches(pid, pgn) {
                    return None;
                }
                tag.set_used(true);
                storage.set_tag(i, tag);
                Some(storage.get_frame(i))
            }),
            TlbMode::DirectMapped => {
                let i = self.direct_index(pgn);
                let tag = storage.get_tag(self.mode, i);
                if tag.is_valid() && tag.matches(pid, pgn) {
                    Some(storage.get_frame(i))
                } else {
                    None
                }
            }
        };
        match found {
            Some(_) => storage.hits += 1,
            None => storage.misses += 1,
        }
        found
    }

    /// Caches `pid`/`pgn -> frame`, evicting a slot when the cache is full.
    pub fn write(&self, pid: Pid, pgn: PageNum, frame: FrameNum) {
        let mut storage = self.storage.lock();
        let i = match self.mode {
            TlbMode::FullyAssociative => self.associative_slot(&mut storage, pid, pgn),
            TlbMode::DirectMapped => self.direct_index(pgn),
        };
        trace!("tlb write: pid {} pgn {} -> frame {} at slot {}", pid, pgn, frame, i);
        storage.fill(self.mode, i, pid, pgn, frame);
    }

    /// Slot for a fully-associative fill: the live entry for the same page,
    /// else the first invalid slot, else the first slot whose used bit is
    /// clear. When every slot is used the smallest tag word loses and the
    /// remaining slots start a new aging round with their used bit cleared.
    fn associative_slot(&self, storage: &mut TlbStorage, pid: Pid, pgn: PageNum) -> usize {
        let tags: Vec<TlbTag> = (0..self.num_entries).map(|i| storage.get_tag(self.mode, i)).collect();
        if let Some(i) = tags.iter().position(|tag| tag.is_valid() && tag.matches(pid, pgn)) {
            return i;
        }
        if let Some(i) = tags.iter().position(|tag| !tag.is_valid()) {
            return i;
        }

        let mut lru_index = 0;
        let mut lru_word = u32::MAX;
        for (i, tag) in tags.iter().enumerate() {
            if !tag.is_used() {
                return i;
            }
            if tag.word() < lru_word {
                lru_index = i;
                lru_word = tag.word();
            }
        }

        debug!("tlb: every slot used, evicting slot {} and aging the rest", lru_index);
        for (i, mut tag) in tags.into_iter().enumerate() {
            if i != lru_index {
                tag.set_used(false);
                storage.set_tag(i, tag);
            }
        }
        lru_index
    }

    /// Clears the valid bit of the entry for `pid`/`pgn`. Returns whether one was found.
    pub fn invalidate(&self, pid: Pid, pgn: PageNum) -> bool {
        let mut storage = self.storage.lock();
        match self.find_slot(&storage, pid, pgn) {
            Some(i) => {
                let mut tag = storage.get_tag(self.mode, i);
                tag.set_valid(false);
                storage.set_tag(i, tag);
                true
            }
            None => false,
        }
    }

    /// Wipes the entry for `pid`/`pgn`: tag fields and frame go to zero.
    pub fn flush(&self, pid: Pid, pgn: PageNum) -> bool {
        let mut storage = self.storage.lock();
        match self.find_slot(&storage, pid, pgn) {
            Some(i) => {
                storage.set_tag(i, TlbTag::from_word(self.mode, 0));
                storage.set_frame(i, 0);
                true
            }
            None => false,
        }
    }

    /// Wipes every valid entry owned by `pid`. Returns how many were cleared.
    pub fn flush_pid(&self, pid: Pid) -> usize {
        let mut storage = self.storage.lock();
        let mut flushed = 0;
        for i in 0..self.num_entries {
            let tag = storage.get_tag(self.mode, i);
            if tag.is_valid() && tag.holds_pid(pid) {
                storage.set_tag(i, TlbTag::from_word(self.mode, 0));
                storage.set_frame(i, 0);
                flushed += 1;
            }
        }
        flushed
    }

    /// Slot holding `pid`/`pgn`, valid or not. Blank slots never match.
    fn find_slot(&self, storage: &TlbStorage, pid: Pid, pgn: PageNum) -> Option<usize> {
        let holds = |i: usize| {
            !storage.is_blank(self.mode, i) && storage.get_tag(self.mode, i).matches(pid, pgn)
        };
        match self.mode {
            TlbMode::FullyAssociative => (0..self.num_entries).find(|&i| holds(i)),
            TlbMode::DirectMapped => Some(self.direct_index(pgn)).filter(|&i| holds(i)),
        }
    }

    pub fn entry(&self, i: usize) -> Option<TlbEntry> {
        if i >= self.num_entries {
            return None;
        }
        Some(self.storage.lock().entry(self.mode, i))
    }

    pub fn stats(&self) -> TlbStats {
        let storage = self.storage.lock();
        TlbStats {
            hits: storage.hits,
            misses: storage.misses,
        }
    }

    /// One line per slot, framed by START_TLB_dump / END_TLB_dump.
    pub fn dump(&self) -> String {
        let storage = self.storage.lock();
        let mut out = String::from("START_TLB_dump\n");
        for entry in (0..self.num_entries).map(|i| storage.entry(self.mode, i)) {
            let _ = match self.mode {
                TlbMode::FullyAssociative => writeln!(out, "{} {} {:08} {:08} {:08}",
                    entry.valid as u8, entry.used as u8, entry.pid, entry.pgn, entry.frame),
                TlbMode::DirectMapped => writeln!(out, "{} {:08} {:08} {:08}",
                    entry.valid as u8, entry.pid, entry.pgn, entry.frame),
            };
        }
        out.push_str("END_TLB_dump");
        out
    }
}

/// Raw, uninterpreted access to the backing buffer.
impl PhysicalMemory for TlbCache {
    fn read(&self, addr: Addr) -> Result<u8> {
        let storage = self.storage.lock();
        storage.bytes.get(addr).copied().ok_or(Error::AddressOutOfRange(addr))
    }

    fn write(&self, addr: Addr, data: u8) -> Result<()> {
        let mut storage = self.storage.lock();
        let byte = storage.bytes.get_mut(addr).ok_or(Error::AddressOutOfRange(addr))?;
        *byte = data;
        Ok(())
    }

    fn dump(&self) -> String {
        TlbCache::dump(self)
    }
}
