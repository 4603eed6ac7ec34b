use crate::buffer::Metadata;
use crate::io::mmap::arena::Lease;
use crate::Timestamp;

/// A captured frame
///
/// The data is a view into a memory mapped kernel buffer. The frame borrows the stream it came
/// from, so it has to be dropped before the next frame can be requested; at that point the
/// buffer goes back to the driver. Copy the data if it needs to live longer.
#[derive(Debug)]
pub struct Frame<'a> {
    view: &'a [u8],
    lease: Lease,
    meta: Metadata,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(view: &'a [u8], lease: Lease, meta: Metadata) -> Self {
        Frame { view, lease, meta }
    }

    /// Slice of read-only data
    pub fn data(&self) -> &'a [u8] {
        self.view
    }

    /// Number of bytes in the frame, the kernel buffer length
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Capture time in 100 ns ticks of the driver clock
    pub fn timestamp(&self) -> i64 {
        self.meta.timestamp.ticks()
    }

    /// Capture time as reported by the driver
    pub fn time(&self) -> Timestamp {
        self.meta.timestamp
    }

    /// Metadata such as sequence number, flags and byte counts
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// The claim on the ring slot backing this frame
    pub fn lease(&self) -> Lease {
        self.lease
    }
}
