use crate::config::{PAGING_ADDR_OFFST_HIBIT, PAGING_ADDR_OFFST_LOBIT, PAGING_ADDR_PGN_HIBIT, PAGING_ADDR_PGN_LOBIT};

#[inline]
pub fn mask(n: usize) -> usize {
    bit(n) - 1
}

#[inline]
pub fn bit(n: usize) -> usize {
    1 << n
}

/// Bits `hi..=lo` set, as in a hardware register description.
#[inline]
pub fn genmask(hi: usize, lo: usize) -> usize {
    assert!(hi >= lo);
    mask(hi + 1) & !mask(lo)
}

#[inline]
pub fn get_val(word: usize, field_mask: usize, lobit: usize) -> usize {
    (word & field_mask) >> lobit
}

#[inline]
pub fn set_val(word: usize, val: usize, field_mask: usize, lobit: usize) -> usize {
    (word & !field_mask) | ((val << lobit) & field_mask)
}

#[inline]
pub fn paging_pgn(addr: usize) -> usize {
    get_val(addr, genmask(PAGING_ADDR_PGN_HIBIT, PAGING_ADDR_PGN_LOBIT), PAGING_ADDR_PGN_LOBIT)
}

#[inline]
pub fn paging_offset(addr: usize) -> usize {
    get_val(addr, genmask(PAGING_ADDR_OFFST_HIBIT, PAGING_ADDR_OFFST_LOBIT), PAGING_ADDR_OFFST_LOBIT)
}
