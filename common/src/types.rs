pub type Pid = u32;
pub type Prio = usize;

pub type Addr = usize;
pub type PageNum = usize;
pub type FrameNum = u32;

pub type RegionId = usize;
pub type VmaId = usize;
