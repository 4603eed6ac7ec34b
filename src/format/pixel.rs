use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::format::FourCC;

/// Pixel formats the capture pipeline knows how to forward
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Packed 4:2:2, 16 bits per pixel
    #[serde(rename = "UYVY")]
    Uyvy,
    /// Packed 4:2:2, 16 bits per pixel, luma first
    #[serde(rename = "YUY2")]
    Yuy2,
    /// 4:2:0 with a full resolution luma plane and a half resolution chroma plane
    #[serde(rename = "NV12")]
    Nv12,
}

impl PixelFormat {
    /// Canonical four character code
    pub const fn fourcc(self) -> FourCC {
        match self {
            PixelFormat::Uyvy => FourCC::UYVY,
            PixelFormat::Yuy2 => FourCC::YUY2,
            PixelFormat::Nv12 => FourCC::NV12,
        }
    }

    /// Bytes per row of the first plane, saturating at `u32::MAX`
    ///
    /// # Example
    ///
    /// ```
    /// use omt_capture::PixelFormat;
    /// assert_eq!(PixelFormat::Uyvy.stride(1920), 3840);
    /// assert_eq!(PixelFormat::Nv12.stride(1920), 1920);
    /// ```
    pub const fn stride(self, width: u32) -> u32 {
        match self.checked_stride(width) {
            Some(stride) => stride,
            None => u32::MAX,
        }
    }

    /// Bytes per row of the first plane, `None` if it does not fit into `u32`
    pub const fn checked_stride(self, width: u32) -> Option<u32> {
        match self {
            PixelFormat::Uyvy | PixelFormat::Yuy2 => width.checked_mul(2),
            PixelFormat::Nv12 => Some(width),
        }
    }

    /// Bytes of a `width` x `height` image, `None` if it does not fit into `u32`
    pub const fn checked_size(self, width: u32, height: u32) -> Option<u32> {
        match self.checked_stride(width) {
            Some(stride) => stride.checked_mul(height),
            None => None,
        }
    }

    /// Looks up the pixel format for a code reported by a driver
    ///
    /// video4linux calls the YUY2 memory layout `YUYV`, both map to [`PixelFormat::Yuy2`].
    pub fn from_fourcc(fourcc: FourCC) -> Option<Self> {
        match fourcc {
            FourCC::UYVY => Some(PixelFormat::Uyvy),
            FourCC::YUY2 | FourCC::YUYV => Some(PixelFormat::Yuy2),
            FourCC::NV12 => Some(PixelFormat::Nv12),
            _ => None,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fourcc())
    }
}

/// Configuration name did not match any supported format
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pixel format {0:?} is not supported")]
pub struct UnsupportedFormat(pub String);

impl FromStr for PixelFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UYVY" => Ok(PixelFormat::Uyvy),
            "YUY2" => Ok(PixelFormat::Yuy2),
            "NV12" => Ok(PixelFormat::Nv12),
            other => Err(UnsupportedFormat(other.to_string())),
        }
    }
}
