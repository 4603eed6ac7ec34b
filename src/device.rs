use std::os::raw::{c_int, c_void};
use std::path::{Path, PathBuf};
use std::{io, ptr};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::v4l2;
use crate::v4l2::vidioc;

/// Kernel entry points of a video device
///
/// The capture engine talks to the driver exclusively through this trait, so everything
/// above it is agnostic of whether a real device node or a stand-in sits underneath.
pub trait Device {
    /// Issues a control request
    ///
    /// # Safety
    ///
    /// `argp` must point to a valid, writable instance of the type encoded in `request`.
    unsafe fn ioctl(&self, request: vidioc::_IOC_TYPE, argp: *mut c_void) -> io::Result<()>;

    /// Maps `length` bytes of device memory at `offset` for shared read/write access
    ///
    /// # Safety
    ///
    /// `offset` and `length` must describe a buffer the driver handed out.
    unsafe fn mmap(&self, length: usize, offset: libc::off_t) -> io::Result<*mut c_void>;

    /// Removes a mapping established by [`Device::mmap`]
    ///
    /// # Safety
    ///
    /// No references into the mapped region may outlive this call.
    unsafe fn munmap(&self, start: *mut c_void, length: usize) -> io::Result<()>;
}

/// Device handle for low-level access
///
/// Owns the file descriptor of an opened device node. The descriptor is closed on drop.
#[derive(Debug)]
pub struct Handle {
    fd: c_int,
    path: PathBuf,
}

impl Handle {
    /// Opens a device node for read/write access
    ///
    /// # Arguments
    ///
    /// * `path` - Path (e.g. "/dev/video0")
    ///
    /// # Example
    ///
    /// ```
    /// use omt_capture::device::Handle;
    /// let dev = Handle::open("/dev/video0");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let fd = v4l2::open(path, libc::O_RDWR).map_err(|source| Error::DeviceOpen {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), fd, "opened device");
        Ok(Handle {
            fd,
            path: path.to_path_buf(),
        })
    }

    /// Returns the raw file descriptor
    pub fn fd(&self) -> c_int {
        self.fd
    }

    /// Returns the path the device was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if let Err(e) = v4l2::close(self.fd) {
            warn!(path = %self.path.display(), error = %e, "failed to close device");
        }
    }
}

impl Device for Handle {
    unsafe fn ioctl(&self, request: vidioc::_IOC_TYPE, argp: *mut c_void) -> io::Result<()> {
        v4l2::ioctl(self.fd, request, argp)
    }

    unsafe fn mmap(&self, length: usize, offset: libc::off_t) -> io::Result<*mut c_void> {
        v4l2::mmap(
            ptr::null_mut(),
            length,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_SHARED,
            self.fd,
            offset,
        )
    }

    unsafe fn munmap(&self, start: *mut c_void, length: usize) -> io::Result<()> {
        v4l2::munmap(start, length)
    }
}
