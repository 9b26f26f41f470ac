use bitflags::*;
use common::config::{PAGING_PTE_FPN_HIBIT, PAGING_PTE_FPN_LOBIT};
use common::types::FrameNum;
use common::utils::{genmask, get_val, set_val};

bitflags! {
    pub struct PTEFlags: u32 {
        const PRESENT = 1 << 31;
        const SWAPPED = 1 << 30;
        const RESERVED = 1 << 29;
        const DIRTY = 1 << 28;
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct PageTableEntry {
    pub bits: u32,
}

impl PageTableEntry {
    pub fn new(fpn: FrameNum, flags: PTEFlags) -> Self {
        let bits = set_val(0, fpn as usize, Self::fpn_mask(), PAGING_PTE_FPN_LOBIT) as u32;
        PageTableEntry {
            bits: bits | flags.bits(),
        }
    }

    pub fn empty() -> Self {
        PageTableEntry { bits: 0 }
    }

    pub fn from_bits(bits: u32) -> Self {
        PageTableEntry { bits }
    }

    fn fpn_mask() -> usize {
        genmask(PAGING_PTE_FPN_HIBIT, PAGING_PTE_FPN_LOBIT)
    }

    pub fn fpn(&self) -> FrameNum {
        get_val(self.bits as usize, Self::fpn_mask(), PAGING_PTE_FPN_LOBIT) as FrameNum
    }

    pub fn flags(&self) -> PTEFlags {
        PTEFlags::from_bits_truncate(self.bits)
    }

    pub fn is_present(&self) -> bool {
        self.flags().contains(PTEFlags::PRESENT)
    }

    pub fn is_swapped(&self) -> bool {
        self.flags().contains(PTEFlags::SWAPPED)
    }

    pub fn is_dirty(&self) -> bool {
        self.flags().contains(PTEFlags::DIRTY)
    }
}
