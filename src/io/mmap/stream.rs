use std::os::raw::c_void;

use tracing::{debug, info, trace, warn};

use crate::buffer::Flags;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::io::mmap::arena::{Arena, Lease, Ownership, DEFAULT_BUFFER_COUNT};
use crate::io::mmap::frame::Frame;
use crate::v4l2;
use crate::v4l2::videodev::V4L2_BUF_TYPE_VIDEO_CAPTURE;

/// Where the frame reader stands
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    /// Not streaming, no frames are produced
    Idle,
    /// Streaming, no buffer handed out
    Ready,
    /// Streaming, exactly one buffer handed out
    Holding,
}

/// Stream of mapped buffers
///
/// Owns the [`Arena`]. Streaming is switched off when the stream is dropped, before the arena
/// unmaps its buffers.
pub struct Stream<'a, D: Device + ?Sized> {
    dev: &'a D,
    arena: Arena<'a, D>,
    active: bool,
    held: Option<Lease>,
}

impl<'a, D: Device + ?Sized> Stream<'a, D> {
    /// Returns a stream for frame capturing with the default ring size
    ///
    /// # Arguments
    ///
    /// * `dev` - Device with a negotiated capture format
    pub fn new(dev: &'a D) -> Result<Self> {
        Self::with_buffers(dev, DEFAULT_BUFFER_COUNT)
    }

    /// Returns a stream for frame capturing
    ///
    /// All buffers are mapped and queued to the driver before this returns.
    ///
    /// # Arguments
    ///
    /// * `dev` - Device with a negotiated capture format
    /// * `count` - Desired number of buffers
    pub fn with_buffers(dev: &'a D, count: u32) -> Result<Self> {
        let mut arena = Arena::new(dev);
        let granted = arena.allocate(count)?;
        debug!(buffers = granted, "buffer ring ready");

        Ok(Stream {
            dev,
            arena,
            active: false,
            held: None,
        })
    }

    /// The buffer ring backing this stream
    pub fn arena(&self) -> &Arena<'a, D> {
        &self.arena
    }

    /// Whether the device is currently streaming
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> State {
        match (self.active, self.held) {
            (false, _) => State::Idle,
            (true, None) => State::Ready,
            (true, Some(_)) => State::Holding,
        }
    }

    /// Starts streaming
    ///
    /// Does nothing if the stream is already active. Slots left idle by an earlier
    /// [`stop`](Stream::stop) are queued again first.
    pub fn start(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }

        for index in 0..self.arena.len() as u32 {
            if self.arena.ownership(index) == Some(Ownership::Idle) {
                self.arena.queue(index).map_err(|source| Error::Stream {
                    action: "start",
                    source,
                })?;
            }
        }

        let mut typ = V4L2_BUF_TYPE_VIDEO_CAPTURE;
        unsafe {
            self.dev.ioctl(
                v4l2::vidioc::VIDIOC_STREAMON,
                &mut typ as *mut _ as *mut c_void,
            )
        }
        .map_err(|source| Error::Stream {
            action: "start",
            source,
        })?;

        self.active = true;
        info!(buffers = self.arena.len(), "stream started");
        Ok(())
    }

    /// Stops streaming
    ///
    /// Does nothing if the stream is not active. The stream counts as stopped afterwards even
    /// if the driver rejected the request; the error is still returned. In that case the buffer
    /// handed out last stays claimed and is queued again by the first [`next`](Stream::next)
    /// after a restart.
    pub fn stop(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        let mut typ = V4L2_BUF_TYPE_VIDEO_CAPTURE;
        let res = unsafe {
            self.dev.ioctl(
                v4l2::vidioc::VIDIOC_STREAMOFF,
                &mut typ as *mut _ as *mut c_void,
            )
        };

        self.active = false;
        if let Err(source) = res {
            // the old lease must not resolve to memory anymore
            if let Some(lease) = self.held.take() {
                self.held = Some(self.arena.revoke(lease));
            }
            return Err(Error::Stream {
                action: "stop",
                source,
            });
        }

        // stream-off hands every buffer back to us, queued or not
        self.held = None;
        self.arena.reclaim();
        info!("stream stopped");
        Ok(())
    }

    /// Fetches the next frame
    ///
    /// The buffer handed out by the previous call is queued back to the driver first, then
    /// this blocks until the driver completes another one. Returns `None` when not streaming
    /// or when the driver did not deliver a frame this time; callers simply try again.
    pub fn next(&mut self) -> Option<Frame<'_>> {
        if !self.active {
            return None;
        }

        if let Some(lease) = self.held.take() {
            if let Err(e) = self.arena.queue(lease.index()) {
                debug!(index = lease.index(), error = %e, "failed to requeue buffer");
                // retried on the next call, the old lease is dead either way
                self.held = Some(self.arena.revoke(lease));
                return None;
            }
        }

        let (lease, meta) = match self.arena.dequeue() {
            Ok(dequeued) => dequeued,
            Err(e) => {
                trace!(error = %e, "no frame");
                return None;
            }
        };
        self.held = Some(lease);

        if meta.flags.contains(Flags::ERROR) {
            warn!(
                index = meta.index,
                sequence = meta.sequence,
                flags = %meta.flags,
                "driver flagged frame data as corrupted"
            );
        }

        let view = self.arena.view(&lease, meta.length)?;
        Some(Frame::new(view, lease, meta))
    }
}

impl<'a, D: Device + ?Sized> Drop for Stream<'a, D> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "failed to stop stream");
        }
    }
}
