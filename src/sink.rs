//! Where captured frames go
//!
//! The media transport is not part of this crate. A [`Sink`] receives every frame as a fully
//! described [`MediaFrame`] and reports how many bytes it sent.

use std::fmt;
use std::io::{self, Write};

use crate::format::{CaptureFormat, FourCC};
use crate::fraction::Fraction;
use crate::io::mmap::Frame;

/// Color space announced for forwarded frames
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    #[default]
    Bt709,
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpace::Bt709 => write!(f, "BT.709"),
        }
    }
}

/// A video frame as handed to the transport
#[derive(Debug, Copy, Clone)]
pub struct MediaFrame<'a> {
    pub codec: FourCC,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub frame_rate: Fraction,
    pub color_space: ColorSpace,
    pub aspect_ratio: f32,
    /// 100 ns ticks
    pub timestamp: i64,
    pub data: &'a [u8],
}

impl<'a> MediaFrame<'a> {
    /// Describes `frame` using the negotiated session format
    ///
    /// Drivers report the YUY2 layout as `YUYV`; the transport knows it as `YUY2`.
    pub fn new(format: &CaptureFormat, frame: &Frame<'a>) -> Self {
        let codec = match format.fourcc {
            FourCC::YUYV => FourCC::YUY2,
            other => other,
        };
        let aspect_ratio = if format.height == 0 {
            0.0
        } else {
            format.width as f32 / format.height as f32
        };

        MediaFrame {
            codec,
            width: format.width,
            height: format.height,
            stride: format.stride,
            frame_rate: format.frame_rate,
            color_space: ColorSpace::Bt709,
            aspect_ratio,
            timestamp: frame.timestamp(),
            data: frame.data(),
        }
    }
}

/// Receiver of captured frames
pub trait Sink {
    /// Sends one frame, returns the number of bytes transmitted
    fn send(&mut self, frame: &MediaFrame<'_>) -> io::Result<usize>;
}

/// Writes raw frame payloads back to back into any writer
pub struct WriteSink<W: Write> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        WriteSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriteSink<W> {
    fn send(&mut self, frame: &MediaFrame<'_>) -> io::Result<usize> {
        self.writer.write_all(frame.data)?;
        self.writer.flush()?;
        Ok(frame.data.len())
    }
}

/// Drops every frame, counting it as sent
#[derive(Debug, Default, Copy, Clone)]
pub struct Discard;

impl Sink for Discard {
    fn send(&mut self, frame: &MediaFrame<'_>) -> io::Result<usize> {
        Ok(frame.data.len())
    }
}
