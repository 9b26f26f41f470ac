use core::ops::RangeInclusive;

use common::types::{Addr, PageNum};
use common::utils::paging_pgn;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: Addr,
    pub end: Addr,
}

impl Region {
    pub fn new(start: Addr, end: Addr) -> Self {
        Region { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pages touched by `[start, end)`.
    pub fn pages(&self) -> Option<RangeInclusive<PageNum>> {
        if self.is_empty() {
            return None;
        }
        Some(paging_pgn(self.start)..=paging_pgn(self.end - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_span_partial_pages() {
        assert_eq!(Region::new(0, 300).pages(), Some(0..=1));
        assert_eq!(Region::new(0x100, 0x200).pages(), Some(1..=1));
        assert_eq!(Region::new(0x80, 0x80).pages(), None);
    }
}
