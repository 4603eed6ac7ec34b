use std::fmt;

use crate::fraction::Fraction;

pub mod fourcc;
pub use fourcc::FourCC;

pub mod negotiate;
pub use negotiate::negotiate;

pub mod pixel;
pub use pixel::PixelFormat;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Capture format (single-planar)
///
/// Built from configuration, then replaced by whatever the driver granted during
/// [`negotiate`]. It does not change afterwards.
pub struct CaptureFormat {
    /// pixelformat code
    pub fourcc: FourCC,
    /// width in pixels
    pub width: u32,
    /// height in pixels
    pub height: u32,
    /// bytes per line
    pub stride: u32,
    /// frames per second
    pub frame_rate: Fraction,
}

impl CaptureFormat {
    /// Returns a capture format with the stride derived from the pixel format
    ///
    /// # Example
    ///
    /// ```
    /// use omt_capture::{CaptureFormat, Fraction, PixelFormat};
    /// let fmt = CaptureFormat::new(PixelFormat::Uyvy, 1920, 1080, Fraction::new(60000, 1000));
    /// assert_eq!(fmt.stride, 3840);
    /// assert_eq!(fmt.size(), 3840 * 1080);
    /// ```
    pub const fn new(pixel: PixelFormat, width: u32, height: u32, frame_rate: Fraction) -> Self {
        CaptureFormat {
            fourcc: pixel.fourcc(),
            width,
            height,
            stride: pixel.stride(width),
            frame_rate,
        }
    }

    /// Maximum number of bytes required to store an image, saturating at `u32::MAX`
    pub const fn size(&self) -> u32 {
        self.stride.saturating_mul(self.height)
    }

    /// Pixel format this fourcc corresponds to, if known
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        PixelFormat::from_fourcc(self.fourcc)
    }
}

impl fmt::Display for CaptureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{} stride {} @ {} fps",
            self.fourcc, self.width, self.height, self.stride, self.frame_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_size() {
        let fmt = CaptureFormat::new(PixelFormat::Uyvy, 1920, 1080, Fraction::new(60, 1));
        assert_eq!(fmt.stride, 3840);
        assert_eq!(fmt.size(), 4_147_200);

        let fmt = CaptureFormat::new(PixelFormat::Nv12, 1280, 720, Fraction::new(30, 1));
        assert_eq!(fmt.stride, 1280);
        assert_eq!(fmt.size(), 1280 * 720);
    }

    #[test]
    fn size_saturates() {
        let fmt = CaptureFormat::new(PixelFormat::Uyvy, 65536, 65536, Fraction::new(30, 1));
        assert_eq!(fmt.stride, 131_072);
        assert_eq!(fmt.size(), u32::MAX);
    }

    #[test]
    fn display() {
        let fmt = CaptureFormat::new(PixelFormat::Yuy2, 640, 480, Fraction::new(30000, 1001));
        assert_eq!(fmt.to_string(), "YUY2 640x480 stride 1280 @ 30000/1001 fps");
    }
}
