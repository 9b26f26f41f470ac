use common::types::{Addr, RegionId};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid memory region id {0}")]
    InvalidRegionHandle(RegionId),
    #[error("access to freed memory region {0}")]
    FreedRegionAccess(RegionId),
    #[error("tlb cache device is not configured")]
    CacheDeviceUnavailable,
    #[error("cannot allocate a {0} byte tlb backing store")]
    AllocationFailure(usize),
    /// Spin locks initialise infallibly; backends that report a failed lock setup map onto this.
    #[error("tlb lock initialisation failed")]
    LockInitFailure,
    #[error("address {0:#x} is outside the device")]
    AddressOutOfRange(Addr),
    #[error("memory manager returned status {0}")]
    Memory(i32),
}

impl Error {
    /// Status code in the kernel's negative-integer convention.
    pub fn code(&self) -> i32 {
        match *self {
            Error::Memory(code) if code < 0 => code,
            _ => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_negative() {
        assert_eq!(Error::InvalidRegionHandle(3).code(), -1);
        assert_eq!(Error::FreedRegionAccess(3).code(), -1);
        assert_eq!(Error::Memory(-3000).code(), -3000);
        assert_eq!(Error::Memory(2).code(), -1);
    }

    #[test]
    fn messages_name_the_region() {
        assert_eq!(Error::InvalidRegionHandle(7).to_string(), "invalid memory region id 7");
        assert_eq!(Error::AddressOutOfRange(0x40).to_string(), "address 0x40 is outside the device");
    }
}
