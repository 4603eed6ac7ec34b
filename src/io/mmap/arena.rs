use std::{io, mem};

use tracing::{debug, trace, warn};

use crate::buffer::{Flags, Metadata};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::memory::Mmap;
use crate::v4l2;
use crate::v4l2::videodev::*;
use crate::Timestamp;

/// Number of buffers in the ring unless configured otherwise
pub const DEFAULT_BUFFER_COUNT: u32 = 5;

/// Who may touch a slot's memory right now
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// Queued, the driver may write into it at any time
    Kernel,
    /// Dequeued and handed out, the driver must not touch it
    Caller,
    /// Held by neither side: not yet queued, or returned by stream-off
    Idle,
}

/// A caller's claim on a dequeued slot
///
/// The claim is only honoured while the slot's epoch matches. Every ownership change advances
/// the epoch, so a lease kept past a requeue no longer resolves to any memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Lease {
    index: u32,
    epoch: u64,
}

impl Lease {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Debug)]
struct Slot {
    offset: u32,
    length: u32,
    region: Option<Mmap>,
    owner: Ownership,
    epoch: u64,
}

impl Slot {
    fn hand_over(&mut self, owner: Ownership) {
        self.owner = owner;
        self.epoch += 1;
    }
}

/// Manage mapped buffers
///
/// The arena borrows the device, so it can never outlive the descriptor its mappings belong
/// to. All buffers are unmapped in the Drop impl.
pub struct Arena<'a, D: Device + ?Sized> {
    dev: &'a D,
    bufs: Vec<Slot>,
}

impl<'a, D: Device + ?Sized> Arena<'a, D> {
    /// Returns a new buffer manager instance
    ///
    /// You usually do not need to use this directly.
    /// A [`crate::io::mmap::Stream`] creates its own arena.
    pub fn new(dev: &'a D) -> Self {
        Arena {
            dev,
            bufs: Vec::new(),
        }
    }

    /// Requests, maps and queues a ring of buffers
    ///
    /// Returns the number of buffers granted by the driver. Every granted slot is mapped and
    /// queued before this returns, so they all start out in [`Ownership::Kernel`]. Buffers
    /// mapped before a failure are unmapped when the arena is dropped.
    ///
    /// # Arguments
    ///
    /// * `count` - Desired number of buffers
    pub fn allocate(&mut self, count: u32) -> Result<u32> {
        if !self.bufs.is_empty() {
            return Err(Error::buffer_setup(
                "request",
                None,
                io::Error::new(io::ErrorKind::AlreadyExists, "buffers already allocated"),
            ));
        }

        let mut v4l2_reqbufs = v4l2_requestbuffers {
            count,
            type_: V4L2_BUF_TYPE_VIDEO_CAPTURE,
            memory: V4L2_MEMORY_MMAP,
            ..Default::default()
        };
        unsafe {
            self.dev.ioctl(
                v4l2::vidioc::VIDIOC_REQBUFS,
                &mut v4l2_reqbufs as *mut _ as *mut std::os::raw::c_void,
            )
        }
        .map_err(|e| Error::buffer_setup("request", None, e))?;

        let granted = v4l2_reqbufs.count;
        if granted == 0 {
            return Err(Error::buffer_setup(
                "request",
                None,
                io::Error::new(io::ErrorKind::Other, "device granted no buffers"),
            ));
        }
        if granted != count {
            debug!(requested = count, granted, "device adjusted buffer count");
        }

        for index in 0..granted {
            let mut v4l2_buf = buffer_desc(index);
            unsafe {
                self.dev.ioctl(
                    v4l2::vidioc::VIDIOC_QUERYBUF,
                    &mut v4l2_buf as *mut _ as *mut std::os::raw::c_void,
                )
            }
            .map_err(|e| Error::buffer_setup("query", Some(index), e))?;

            let length = v4l2_buf.length;
            if length == 0 {
                return Err(Error::buffer_setup(
                    "query",
                    Some(index),
                    io::Error::new(io::ErrorKind::InvalidData, "buffer has zero length"),
                ));
            }

            let offset = unsafe { v4l2_buf.m.offset };
            let region = unsafe {
                let ptr = self
                    .dev
                    .mmap(length as usize, offset as libc::off_t)
                    .map_err(|e| Error::buffer_setup("map", Some(index), e))?;
                Mmap::from_raw(ptr, length as usize)
            }
            .ok_or_else(|| {
                Error::buffer_setup(
                    "map",
                    Some(index),
                    io::Error::new(io::ErrorKind::Other, "device returned a null mapping"),
                )
            })?;

            self.bufs.push(Slot {
                offset,
                length,
                region: Some(region),
                owner: Ownership::Idle,
                epoch: 0,
            });

            self.queue(index)
                .map_err(|e| Error::buffer_setup("queue", Some(index), e))?;

            debug!(index, offset, length, "mapped buffer");
        }

        Ok(granted)
    }

    /// Unmaps every region
    ///
    /// Regions which are already unmapped are skipped, so calling this more than once is fine.
    /// Unmap failures are logged and otherwise ignored.
    pub fn release(&mut self) {
        for (index, slot) in self.bufs.iter_mut().enumerate() {
            if let Some(region) = slot.region.take() {
                let (ptr, len) = region.into_raw();
                if let Err(e) = unsafe { self.dev.munmap(ptr, len) } {
                    warn!(index, error = %e, "failed to unmap buffer");
                }
            }
            if slot.owner != Ownership::Idle {
                slot.hand_over(Ownership::Idle);
            }
        }
    }

    /// Number of slots in the ring
    pub fn len(&self) -> usize {
        self.bufs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bufs.is_empty()
    }

    /// Number of slots which are still mapped
    pub fn mapped(&self) -> usize {
        self.bufs.iter().filter(|slot| slot.region.is_some()).count()
    }

    /// Current owner of a slot
    pub fn ownership(&self, index: u32) -> Option<Ownership> {
        self.bufs.get(index as usize).map(|slot| slot.owner)
    }

    /// Kernel offset and length of a slot as reported on query
    pub fn layout(&self, index: u32) -> Option<(u32, u32)> {
        self.bufs
            .get(index as usize)
            .map(|slot| (slot.offset, slot.length))
    }

    /// Number of slots currently handed out to the caller
    pub fn borrowed(&self) -> usize {
        self.bufs
            .iter()
            .filter(|slot| slot.owner == Ownership::Caller)
            .count()
    }

    /// Hands a slot to the driver
    pub fn queue(&mut self, index: u32) -> io::Result<()> {
        let slot = self
            .bufs
            .get(index as usize)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no such buffer"))?;
        if slot.region.is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer is not mapped",
            ));
        }
        if slot.owner == Ownership::Kernel {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer is already queued",
            ));
        }

        let mut v4l2_buf = buffer_desc(index);
        unsafe {
            self.dev.ioctl(
                v4l2::vidioc::VIDIOC_QBUF,
                &mut v4l2_buf as *mut _ as *mut std::os::raw::c_void,
            )?;
        }

        self.bufs[index as usize].hand_over(Ownership::Kernel);
        trace!(index, "queued buffer");
        Ok(())
    }

    /// Takes the next completed slot from the driver
    ///
    /// Blocks until the driver has a filled buffer, unless the device was opened non-blocking.
    pub fn dequeue(&mut self) -> io::Result<(Lease, Metadata)> {
        let mut v4l2_buf = buffer_desc(0);
        unsafe {
            self.dev.ioctl(
                v4l2::vidioc::VIDIOC_DQBUF,
                &mut v4l2_buf as *mut _ as *mut std::os::raw::c_void,
            )?;
        }

        let index = v4l2_buf.index;
        let slots = self.bufs.len();
        let slot = match self.bufs.get_mut(index as usize) {
            Some(slot) if slot.owner == Ownership::Kernel => slot,
            Some(slot) => {
                warn!(
                    index,
                    owner = ?slot.owner,
                    "driver returned a buffer which was not queued"
                );
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("driver returned buffer {} which was not queued", index),
                ));
            }
            None => {
                warn!(index, slots, "driver returned an unknown buffer, it is lost");
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("driver returned unknown buffer {}", index),
                ));
            }
        };

        slot.hand_over(Ownership::Caller);
        let lease = Lease {
            index,
            epoch: slot.epoch,
        };
        let meta = Metadata {
            index,
            sequence: v4l2_buf.sequence,
            timestamp: Timestamp::from(v4l2_buf.timestamp),
            flags: Flags::from(v4l2_buf.flags),
            length: v4l2_buf.length,
            bytesused: v4l2_buf.bytesused,
        };
        trace!(index, sequence = meta.sequence, "dequeued buffer");

        Ok((lease, meta))
    }

    /// Invalidates a lease without returning the slot to the driver
    ///
    /// The slot stays with the caller side; the returned lease is the only one still valid.
    pub fn revoke(&mut self, lease: Lease) -> Lease {
        match self.bufs.get_mut(lease.index as usize) {
            Some(slot) if slot.owner == Ownership::Caller => {
                slot.epoch += 1;
                Lease {
                    index: lease.index,
                    epoch: slot.epoch,
                }
            }
            _ => lease,
        }
    }

    /// Marks every mapped slot as idle, used once the driver dropped its queues on stream-off
    pub fn reclaim(&mut self) {
        for slot in &mut self.bufs {
            if slot.owner != Ownership::Idle {
                slot.hand_over(Ownership::Idle);
            }
        }
    }

    /// Memory of a leased slot
    ///
    /// Returns `None` once the lease went stale. The view covers the buffer length the driver
    /// reported, clamped to the mapped region.
    pub fn view(&self, lease: &Lease, length: u32) -> Option<&[u8]> {
        let slot = self.bufs.get(lease.index as usize)?;
        if slot.owner != Ownership::Caller || slot.epoch != lease.epoch {
            return None;
        }

        let data = slot.region.as_ref()?.as_slice();
        Some(&data[..data.len().min(length as usize)])
    }
}

impl<'a, D: Device + ?Sized> Drop for Arena<'a, D> {
    fn drop(&mut self) {
        self.release();
    }
}

fn buffer_desc(index: u32) -> v4l2_buffer {
    v4l2_buffer {
        index,
        type_: V4L2_BUF_TYPE_VIDEO_CAPTURE,
        memory: V4L2_MEMORY_MMAP,
        ..unsafe { mem::zeroed() }
    }
}
