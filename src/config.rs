use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::format::{CaptureFormat, PixelFormat};
use crate::fraction::Fraction;
use crate::io::mmap::DEFAULT_BUFFER_COUNT;

/// Operator supplied capture settings
///
/// Read from a TOML file:
///
/// ```toml
/// name = "Studio Camera 1"
/// device_path = "/dev/video0"
/// width = 1920
/// height = 1080
/// frame_rate_n = 60000
/// frame_rate_d = 1000
/// codec = "UYVY"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Source name announced to the sink
    pub name: String,
    /// Video device node
    pub device_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Frame rate numerator (frames)
    pub frame_rate_n: u32,
    /// Frame rate denominator (seconds)
    pub frame_rate_d: u32,
    /// One of `UYVY`, `YUY2` or `NV12`
    pub codec: PixelFormat,
    /// Size of the kernel buffer ring
    #[serde(default = "default_buffers")]
    pub buffers: u32,
    /// Where raw frames are written, `-` for stdout; frames are discarded if unset
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_buffers() -> u32 {
    DEFAULT_BUFFER_COUNT
}

impl Settings {
    /// Reads and validates a settings file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("unable to read {}: {}", path.display(), e)))?;

        Self::from_toml(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), config_reason(e))))
    }

    /// Parses and validates settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| Error::Config(e.message().to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "frame size {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.codec.checked_size(self.width, self.height).is_none() {
            return Err(Error::Config(format!(
                "frame size {}x{} is too large for {}",
                self.width, self.height, self.codec
            )));
        }
        if !self.frame_rate().is_valid() {
            return Err(Error::Config(format!(
                "frame rate {} is not valid",
                self.frame_rate()
            )));
        }
        if self.buffers == 0 {
            return Err(Error::Config("at least one buffer is required".to_string()));
        }
        Ok(())
    }

    pub fn frame_rate(&self) -> Fraction {
        Fraction::new(self.frame_rate_n, self.frame_rate_d)
    }

    /// The format to request from the device
    pub fn capture_format(&self) -> CaptureFormat {
        CaptureFormat::new(self.codec, self.width, self.height, self.frame_rate())
    }
}

fn config_reason(e: Error) -> String {
    match e {
        Error::Config(reason) => reason,
        other => other.to_string(),
    }
}
