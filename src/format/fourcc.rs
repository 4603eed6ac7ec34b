use std::{fmt, str};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
/// Four character code representing a pixelformat
pub struct FourCC {
    pub repr: [u8; 4],
}

impl FourCC {
    /// Packed 4:2:2, Cb Y0 Cr Y1
    pub const UYVY: FourCC = FourCC::new(b"UYVY");
    /// Packed 4:2:2, Y0 Cb Y1 Cr (Windows naming)
    pub const YUY2: FourCC = FourCC::new(b"YUY2");
    /// Packed 4:2:2, Y0 Cb Y1 Cr (video4linux naming)
    pub const YUYV: FourCC = FourCC::new(b"YUYV");
    /// 4:2:0, Y plane followed by interleaved CbCr plane
    pub const NV12: FourCC = FourCC::new(b"NV12");

    /// Returns a pixelformat as four character code
    ///
    /// # Arguments
    ///
    /// * `repr` - Four characters as raw bytes
    ///
    /// # Example
    ///
    /// ```
    /// use omt_capture::FourCC;
    /// let fourcc = FourCC::new(b"UYVY");
    /// ```
    pub const fn new(repr: &[u8; 4]) -> FourCC {
        FourCC { repr: *repr }
    }

    /// Returns the string representation of a four character code
    pub fn str(&self) -> Result<&str, str::Utf8Error> {
        str::from_utf8(&self.repr)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.str() {
            Ok(string) => write!(f, "{}", string),
            Err(_) => write!(f, "{:#010x}", u32::from(*self)),
        }
    }
}

impl From<u32> for FourCC {
    fn from(code: u32) -> Self {
        FourCC::new(&code.to_le_bytes())
    }
}

impl From<FourCC> for u32 {
    fn from(fourcc: FourCC) -> Self {
        Self::from_le_bytes(fourcc.repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_codes() {
        assert_eq!(u32::from(FourCC::YUYV), 0x5659_5559);
        assert_eq!(u32::from(FourCC::YUY2), 0x3259_5559);
        assert_eq!(u32::from(FourCC::NV12), 0x3231_564e);
        assert_eq!(u32::from(FourCC::UYVY), 0x5956_5955);
        assert_eq!(FourCC::from(0x3231_564e), FourCC::NV12);
    }

    #[test]
    fn display() {
        assert_eq!(FourCC::UYVY.to_string(), "UYVY");
        assert_eq!(FourCC::from(0xffff_ffff).to_string(), "0xffffffff");
    }
}
