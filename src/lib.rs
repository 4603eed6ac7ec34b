//! Capture raw video frames from a video4linux (v4l2) device and forward them to a media sink.
//!
//! Frames are captured through memory mapped kernel buffers. Each frame handed out is a view
//! into such a buffer; it goes back to the driver as soon as the next frame is requested.
//!
//! ```no_run
//! use omt_capture::config::Settings;
//! use omt_capture::forward;
//! use omt_capture::shutdown::Shutdown;
//! use omt_capture::sink::Discard;
//!
//! let settings = Settings::load("config.toml").unwrap();
//! let shutdown = Shutdown::new();
//! let stats = forward::run(&settings, &mut Discard, &shutdown).unwrap();
//! println!("{} frames", stats.frames);
//! ```

pub mod v4l2;

pub mod buffer;
pub mod config;
pub mod device;
pub mod error;
pub mod format;
pub mod forward;
pub mod io;
pub mod memory;
pub mod parameters;
pub mod shutdown;
pub mod sink;

mod fraction;
pub use fraction::Fraction;

mod timestamp;
pub use timestamp::{Timestamp, TICKS_PER_SECOND};

pub use error::{Error, Result};
pub use format::{CaptureFormat, FourCC, PixelFormat};
