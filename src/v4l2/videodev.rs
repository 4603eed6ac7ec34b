//! Mirrors of the `linux/videodev2.h` structures used by the capture engine.
//!
//! Field order, widths and padding follow the kernel UAPI header exactly. The unions carry the
//! kernel's `raw_data` members so the overall struct sizes (and thus the ioctl request codes
//! derived from them) match what the driver expects.
#![allow(non_camel_case_types)]

use std::os::raw::{c_ulong, c_void};

pub const V4L2_BUF_TYPE_VIDEO_CAPTURE: u32 = 1;
pub const V4L2_MEMORY_MMAP: u32 = 1;
pub const V4L2_FIELD_NONE: u32 = 1;
pub const V4L2_CAP_TIMEPERFRAME: u32 = 0x1000;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct v4l2_pix_format {
    pub width: u32,
    pub height: u32,
    pub pixelformat: u32,
    pub field: u32,
    pub bytesperline: u32,
    pub sizeimage: u32,
    pub colorspace: u32,
    pub priv_: u32,
    pub flags: u32,
    // union { ycbcr_enc, hsv_enc }
    pub ycbcr_enc: u32,
    pub quantization: u32,
    pub xfer_func: u32,
}

/// `v4l2_format.fmt`
///
/// The kernel union contains `struct v4l2_window`, which holds pointers, so the union is pointer
/// aligned. The zero-sized `_align` member reproduces that without taking up space.
#[repr(C)]
#[derive(Copy, Clone)]
pub union v4l2_format__fmt {
    pub pix: v4l2_pix_format,
    pub raw_data: [u8; 200],
    _align: [*mut c_void; 0],
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct v4l2_format {
    pub type_: u32,
    pub fmt: v4l2_format__fmt,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct v4l2_fract {
    pub numerator: u32,
    pub denominator: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct v4l2_captureparm {
    pub capability: u32,
    pub capturemode: u32,
    pub timeperframe: v4l2_fract,
    pub extendedmode: u32,
    pub readbuffers: u32,
    pub reserved: [u32; 4],
}

/// `v4l2_streamparm.parm`
#[repr(C)]
#[derive(Copy, Clone)]
pub union v4l2_streamparm__parm {
    pub capture: v4l2_captureparm,
    pub raw_data: [u8; 200],
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct v4l2_streamparm {
    pub type_: u32,
    pub parm: v4l2_streamparm__parm,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct v4l2_requestbuffers {
    pub count: u32,
    pub type_: u32,
    pub memory: u32,
    pub capabilities: u32,
    pub flags: u8,
    pub reserved: [u8; 3],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct v4l2_timecode {
    pub type_: u32,
    pub flags: u32,
    pub frames: u8,
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub userbits: [u8; 4],
}

/// `v4l2_buffer.m`
#[repr(C)]
#[derive(Copy, Clone)]
pub union v4l2_buffer__m {
    pub offset: u32,
    pub userptr: c_ulong,
    pub planes: *mut c_void,
    pub fd: i32,
}

/// `v4l2_buffer` anonymous union after `reserved2`
#[repr(C)]
#[derive(Copy, Clone)]
pub union v4l2_buffer__request {
    pub request_fd: i32,
    pub reserved: u32,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct v4l2_buffer {
    pub index: u32,
    pub type_: u32,
    pub bytesused: u32,
    pub flags: u32,
    pub field: u32,
    pub timestamp: libc::timeval,
    pub timecode: v4l2_timecode,
    pub sequence: u32,
    pub memory: u32,
    pub m: v4l2_buffer__m,
    pub length: u32,
    pub reserved2: u32,
    pub request: v4l2_buffer__request,
}
