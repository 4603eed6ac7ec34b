use bitflags::bitflags;
use std::fmt;

use crate::Timestamp;

bitflags! {
    /// Buffer flags as reported by the driver on dequeue
    #[allow(clippy::unreadable_literal)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// Buffer is ready, but the data contained within is corrupted
        const ERROR = 0x00000040;
    }
}

impl From<u32> for Flags {
    fn from(flags: u32) -> Flags {
        Flags::from_bits_retain(flags)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Buffer metadata, mostly used not to convolute the main buffer structs
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Slot index within the buffer ring
    pub index: u32,
    /// Sequence number, counting the frames
    pub sequence: u32,
    /// Time of capture (set by the driver)
    pub timestamp: Timestamp,
    /// Buffer flags
    pub flags: Flags,
    /// Size of the kernel buffer in bytes
    pub length: u32,
    /// Number of bytes the driver filled in
    pub bytesused: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_from_raw() {
        // unknown bits are kept
        let flags = Flags::from(0x0000_2045);
        assert!(flags.contains(Flags::ERROR));
        assert_eq!(flags.bits(), 0x0000_2045);

        assert!(!Flags::from(0x0000_0005).contains(Flags::ERROR));
    }
}
