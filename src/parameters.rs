use std::fmt;

use crate::v4l2::videodev::V4L2_CAP_TIMEPERFRAME;

bitflags::bitflags! {
    /// Streaming parameter capabilities reported in `v4l2_captureparm.capability`
    #[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
    pub struct Capabilities: u32 {
        /// The driver honours the requested frame interval
        const TIME_PER_FRAME    = V4L2_CAP_TIMEPERFRAME;
    }
}

impl From<u32> for Capabilities {
    fn from(caps: u32) -> Self {
        Self::from_bits_retain(caps)
    }
}

impl From<Capabilities> for u32 {
    fn from(capabilities: Capabilities) -> Self {
        capabilities.bits()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
