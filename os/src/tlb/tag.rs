use common::config::{
    TLB_DM_TAG_PID_HIBIT, TLB_FA_TAG_PID_HIBIT, TLB_TAG_PGN_HIBIT, TLB_TAG_PGN_LOBIT, TLB_TAG_PID_LOBIT,
    TLB_TAG_USED_BIT, TLB_TAG_VALID_BIT,
};
use common::types::{PageNum, Pid};
use common::utils::{bit, genmask, get_val, set_val};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TlbMode {
    FullyAssociative,
    DirectMapped,
}

impl TlbMode {
    fn pid_hibit(&self) -> usize {
        match self {
            TlbMode::FullyAssociative => TLB_FA_TAG_PID_HIBIT,
            TlbMode::DirectMapped => TLB_DM_TAG_PID_HIBIT,
        }
    }

    pub fn has_used_bit(&self) -> bool {
        *self == TlbMode::FullyAssociative
    }
}

impl Default for TlbMode {
    fn default() -> Self {
        crate::config::TLB_MODE
    }
}

/// Tag word of one tlb slot.
///
/// Fully-associative: bit 31 valid, bit 30 used, bits 29..14 pid, bits 13..0 page number.
/// Direct-mapped: bit 31 valid, bits 30..14 pid, bits 13..0 page number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TlbTag {
    word: u32,
    mode: TlbMode,
}

impl TlbTag {
    pub fn from_word(mode: TlbMode, word: u32) -> Self {
        TlbTag { word, mode }
    }

    /// A valid tag for `pid`/`pgn`, marked used where the layout has a used bit.
    pub fn new(mode: TlbMode, pid: Pid, pgn: PageNum) -> Self {
        let mut tag = TlbTag { word: 0, mode };
        tag.set_valid(true);
        tag.set_used(true);
        tag.set_pid(pid);
        tag.set_pgn(pgn);
        tag
    }

    pub fn word(&self) -> u32 {
        self.word
    }

    /// Never filled, or flushed.
    pub fn is_empty(&self) -> bool {
        self.word == 0
    }

    fn pid_mask(&self) -> usize {
        genmask(self.mode.pid_hibit(), TLB_TAG_PID_LOBIT)
    }

    fn pgn_mask() -> usize {
        genmask(TLB_TAG_PGN_HIBIT, TLB_TAG_PGN_LOBIT)
    }

    fn get_flag(&self, n: usize) -> bool {
        self.word as usize & bit(n) != 0
    }

    fn set_flag(&mut self, n: usize, on: bool) {
        if on {
            self.word |= bit(n) as u32;
        } else {
            self.word &= !(bit(n) as u32);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.get_flag(TLB_TAG_VALID_BIT)
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.set_flag(TLB_TAG_VALID_BIT, valid);
    }

    /// Always false for direct-mapped tags.
    pub fn is_used(&self) -> bool {
        self.mode.has_used_bit() && self.get_flag(TLB_TAG_USED_BIT)
    }

    pub fn set_used(&mut self, used: bool) {
        if self.mode.has_used_bit() {
            self.set_flag(TLB_TAG_USED_BIT, used);
        }
    }

    /// `pid` cut down to the width of this layout's pid field, as `set_pid` stores it.
    pub fn pid_field(&self, pid: Pid) -> Pid {
        (pid as usize & (self.pid_mask() >> TLB_TAG_PID_LOBIT)) as Pid
    }

    fn pgn_field(pgn: PageNum) -> PageNum {
        pgn & (Self::pgn_mask() >> TLB_TAG_PGN_LOBIT)
    }

    pub fn get_pid(&self) -> Pid {
        get_val(self.word as usize, self.pid_mask(), TLB_TAG_PID_LOBIT) as Pid
    }

    pub fn set_pid(&mut self, pid: Pid) {
        self.word = set_val(self.word as usize, pid as usize, self.pid_mask(), TLB_TAG_PID_LOBIT) as u32;
    }

    pub fn get_pgn(&self) -> PageNum {
        get_val(self.word as usize, Self::pgn_mask(), TLB_TAG_PGN_LOBIT)
    }

    pub fn set_pgn(&mut self, pgn: PageNum) {
        self.word = set_val(self.word as usize, pgn, Self::pgn_mask(), TLB_TAG_PGN_LOBIT) as u32;
    }

    pub fn holds_pid(&self, pid: Pid) -> bool {
        self.get_pid() == self.pid_field(pid)
    }

    /// Identity match only; validity is checked separately. Both keys are
    /// compared at field width.
    pub fn matches(&self, pid: Pid, pgn: PageNum) -> bool {
        self.holds_pid(pid) && self.get_pgn() == Self::pgn_field(pgn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_associative_layout() {
        let tag = TlbTag::new(TlbMode::FullyAssociative, 3, 5);
        assert_eq!(tag.word(), 0xc000_0000 | (3 << 14) | 5);
        assert!(tag.is_valid());
        assert!(tag.is_used());
        assert_eq!(tag.get_pid(), 3);
        assert_eq!(tag.get_pgn(), 5);
    }

    #[test]
    fn direct_mapped_layout_has_no_used_bit() {
        let mut tag = TlbTag::new(TlbMode::DirectMapped, 3, 5);
        assert_eq!(tag.word(), 0x8000_0000 | (3 << 14) | 5);
        tag.set_used(true);
        assert!(!tag.is_used());
        // bit 30 belongs to the pid here
        tag.set_pid(0x1_0000);
        assert_eq!(tag.word() & 0x4000_0000, 0x4000_0000);
        assert_eq!(tag.get_pid(), 0x1_0000);
        assert!(!tag.is_used());
    }

    #[test]
    fn fields_are_clamped_to_their_bits() {
        let mut tag = TlbTag::new(TlbMode::FullyAssociative, 0, 0);
        tag.set_pgn(0x4001);
        assert_eq!(tag.get_pgn(), 1);
        tag.set_pid(0x1_0002);
        assert_eq!(tag.get_pid(), 2);
        assert!(tag.is_valid());
        assert!(tag.is_used());
    }

    #[test]
    fn flags_toggle_independently() {
        let mut tag = TlbTag::new(TlbMode::FullyAssociative, 7, 9);
        tag.set_valid(false);
        assert!(!tag.is_valid());
        assert!(tag.is_used());
        tag.set_used(false);
        assert!(tag.matches(7, 9));
        assert_eq!(tag.word(), (7 << 14) | 9);
    }

    #[test]
    fn wide_keys_match_what_was_stored() {
        let tag = TlbTag::new(TlbMode::FullyAssociative, 70000, 1);
        assert_eq!(tag.get_pid(), 4464);
        assert!(tag.matches(70000, 1));
        assert!(tag.holds_pid(70000));

        let top = TlbTag::new(TlbMode::FullyAssociative, 0xffff, 0x3fff);
        assert_eq!(top.get_pid(), 0xffff);
        assert!(top.matches(0xffff, 0x3fff));
        assert!(!top.matches(0xfffe, 0x3fff));
        assert!(TlbTag::new(TlbMode::FullyAssociative, 0x1_0000, 0x4000).matches(0, 0));

        let dm = TlbTag::new(TlbMode::DirectMapped, 0x1_ffff, 2);
        assert_eq!(dm.get_pid(), 0x1_ffff);
        assert!(dm.matches(0x1_ffff, 2));
        assert_eq!(dm.pid_field(0x2_0001), 1);
    }
}
