use std::os::raw::c_void;
use std::ptr::NonNull;
use std::slice;

/// Memory-mapped region
///
/// The backing memory is owned by the driver and mapped into the process. A region does not
/// unmap itself: the arena which created it holds the device needed for that and decides when
/// it is safe to do so.
#[derive(Debug)]
pub struct Mmap {
    ptr: NonNull<u8>,
    len: usize,
}

impl Mmap {
    /// Wraps a mapping returned by [`crate::device::Device::mmap`]
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `len` bytes until [`Mmap::into_raw`] is called and the
    /// mapping is removed.
    pub unsafe fn from_raw(ptr: *mut c_void, len: usize) -> Option<Self> {
        NonNull::new(ptr as *mut u8).map(|ptr| Mmap { ptr, len })
    }

    /// Gives back the start address and length for unmapping
    pub fn into_raw(self) -> (*mut c_void, usize) {
        (self.ptr.as_ptr() as *mut c_void, self.len)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read-only view of the mapped bytes
    pub fn as_slice(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_and_releases() {
        let mut backing = vec![7u8; 16];
        let region = unsafe { Mmap::from_raw(backing.as_mut_ptr() as *mut c_void, 16) }.unwrap();
        assert_eq!(region.len(), 16);
        assert!(region.as_slice().iter().all(|&b| b == 7));

        let (ptr, len) = region.into_raw();
        assert_eq!(ptr as *mut u8, backing.as_mut_ptr());
        assert_eq!(len, 16);
    }

    #[test]
    fn rejects_null() {
        assert!(unsafe { Mmap::from_raw(std::ptr::null_mut(), 16) }.is_none());
    }
}
