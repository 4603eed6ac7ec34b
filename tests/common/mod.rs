//! In-memory stand-in for a capture driver.
#![allow(dead_code)]

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::os::raw::c_void;

use omt_capture::device::Device;
use omt_capture::v4l2::vidioc::{self, *};
use omt_capture::v4l2::videodev::*;

pub const BUFFER_LEN: u32 = 4096;
pub const OFFSET_STEP: u32 = 0x1000;

/// A frame the driver completes on the next dequeue
#[derive(Debug, Copy, Clone)]
pub struct Completion {
    pub index: u32,
    pub sec: i64,
    pub usec: i64,
    pub flags: u32,
}

impl Completion {
    pub fn new(index: u32, sec: i64, usec: i64) -> Self {
        Completion {
            index,
            sec,
            usec,
            flags: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct State {
    /// Buffers granted on request, `None` grants what was asked for
    pub grant: Option<u32>,
    pub granted: u32,
    pub buffer_len: u32,
    /// Slot whose query reports a zero length
    pub zero_length: Option<u32>,

    /// Substituted on S_FMT
    pub force_fourcc: Option<u32>,
    pub force_size: Option<(u32, u32)>,
    /// Substituted on S_PARM, time per frame
    pub force_interval: Option<(u32, u32)>,
    /// Capability field reported by S_PARM
    pub capability: u32,
    pub requested_format: Option<v4l2_pix_format>,
    pub requested_interval: Option<(u32, u32)>,

    pub streaming: bool,
    /// Slots currently queued, in queue order
    pub kernel_queue: VecDeque<u32>,
    /// Every successful QBUF, in order
    pub qbuf_log: Vec<u32>,
    /// Scripted completions, served before falling back to queue order
    pub script: VecDeque<Completion>,
    pub sequence: u32,

    pub fail_s_fmt: bool,
    pub fail_s_parm: bool,
    /// Slot whose mapping fails
    pub fail_mmap: Option<u32>,
    pub fail_qbuf: u32,
    pub fail_dqbuf: u32,
    /// Index reported by the next dequeue regardless of the queue
    pub stray_index: Option<u32>,
    pub fail_streamon: bool,
    pub fail_streamoff: bool,

    /// Mapped regions by address, with their length
    pub mappings: HashMap<usize, usize>,
    /// Unmap count by address
    pub unmaps: HashMap<usize, u32>,
    /// Requests in the order they arrived
    pub calls: Vec<&'static str>,
}

pub struct FakeDevice {
    state: RefCell<State>,
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDevice {
    pub fn new() -> Self {
        FakeDevice {
            state: RefCell::new(State {
                buffer_len: BUFFER_LEN,
                capability: V4L2_CAP_TIMEPERFRAME,
                ..Default::default()
            }),
        }
    }

    pub fn state(&self) -> Ref<'_, State> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, State> {
        self.state.borrow_mut()
    }

    pub fn script(&self, completions: &[Completion]) {
        self.state.borrow_mut().script.extend(completions.iter().copied());
    }

    pub fn count(&self, request: &str) -> usize {
        self.state().calls.iter().filter(|c| **c == request).count()
    }
}

fn errno(code: i32) -> io::Error {
    io::Error::from_raw_os_error(code)
}

impl Device for FakeDevice {
    unsafe fn ioctl(&self, request: vidioc::_IOC_TYPE, argp: *mut c_void) -> io::Result<()> {
        let mut st = self.state.borrow_mut();
        st.calls.push(vidioc::name(request));

        match request {
            VIDIOC_S_FMT => {
                if st.fail_s_fmt {
                    return Err(errno(libc::EINVAL));
                }
                let fmt = &mut *(argp as *mut v4l2_format);
                let mut pix = fmt.fmt.pix;
                st.requested_format = Some(pix);

                if let Some(fourcc) = st.force_fourcc {
                    pix.pixelformat = fourcc;
                }
                if let Some((width, height)) = st.force_size {
                    pix.width = width;
                    pix.height = height;
                    pix.bytesperline = width * 2;
                }
                pix.sizeimage = pix.bytesperline.saturating_mul(pix.height);
                fmt.fmt.pix = pix;
                Ok(())
            }
            VIDIOC_S_PARM => {
                if st.fail_s_parm {
                    return Err(errno(libc::EINVAL));
                }
                let parm = &mut *(argp as *mut v4l2_streamparm);
                let mut capture = parm.parm.capture;
                st.requested_interval = Some((
                    capture.timeperframe.numerator,
                    capture.timeperframe.denominator,
                ));

                if let Some((numerator, denominator)) = st.force_interval {
                    capture.timeperframe = v4l2_fract {
                        numerator,
                        denominator,
                    };
                }
                capture.capability = st.capability;
                parm.parm.capture = capture;
                Ok(())
            }
            VIDIOC_REQBUFS => {
                let req = &mut *(argp as *mut v4l2_requestbuffers);
                if req.memory != V4L2_MEMORY_MMAP || req.type_ != V4L2_BUF_TYPE_VIDEO_CAPTURE {
                    return Err(errno(libc::EINVAL));
                }
                req.count = st.grant.unwrap_or(req.count);
                st.granted = req.count;
                Ok(())
            }
            VIDIOC_QUERYBUF => {
                let buf = &mut *(argp as *mut v4l2_buffer);
                if buf.index >= st.granted {
                    return Err(errno(libc::EINVAL));
                }
                buf.m.offset = buf.index * OFFSET_STEP;
                buf.length = if st.zero_length == Some(buf.index) {
                    0
                } else {
                    st.buffer_len
                };
                Ok(())
            }
            VIDIOC_QBUF => {
                let buf = &*(argp as *mut v4l2_buffer);
                if st.fail_qbuf > 0 {
                    st.fail_qbuf -= 1;
                    return Err(errno(libc::EIO));
                }
                if buf.index >= st.granted || st.kernel_queue.contains(&buf.index) {
                    return Err(errno(libc::EINVAL));
                }
                st.kernel_queue.push_back(buf.index);
                st.qbuf_log.push(buf.index);
                Ok(())
            }
            VIDIOC_DQBUF => {
                let buf = &mut *(argp as *mut v4l2_buffer);
                if !st.streaming {
                    return Err(errno(libc::EINVAL));
                }
                if st.fail_dqbuf > 0 {
                    st.fail_dqbuf -= 1;
                    return Err(errno(libc::EIO));
                }

                let sequence = st.sequence;
                if let Some(index) = st.stray_index.take() {
                    st.sequence += 1;
                    buf.index = index;
                    buf.sequence = sequence;
                    buf.length = st.buffer_len;
                    return Ok(());
                }
                let done = match st.script.pop_front() {
                    Some(done) => done,
                    None => match st.kernel_queue.front() {
                        Some(&index) => Completion::new(index, i64::from(sequence), 0),
                        None => return Err(errno(libc::EAGAIN)),
                    },
                };
                let pos = st
                    .kernel_queue
                    .iter()
                    .position(|&i| i == done.index)
                    .ok_or_else(|| errno(libc::EIO))?;
                st.kernel_queue.remove(pos);
                st.sequence += 1;

                buf.index = done.index;
                buf.sequence = sequence;
                buf.flags = done.flags;
                buf.timestamp = libc::timeval {
                    tv_sec: done.sec as libc::time_t,
                    tv_usec: done.usec as libc::suseconds_t,
                };
                buf.length = st.buffer_len;
                buf.bytesused = st.buffer_len;
                Ok(())
            }
            VIDIOC_STREAMON => {
                if st.fail_streamon {
                    return Err(errno(libc::EIO));
                }
                st.streaming = true;
                Ok(())
            }
            VIDIOC_STREAMOFF => {
                if st.fail_streamoff {
                    return Err(errno(libc::EIO));
                }
                st.streaming = false;
                st.kernel_queue.clear();
                Ok(())
            }
            _ => Err(errno(libc::ENOTTY)),
        }
    }

    unsafe fn mmap(&self, length: usize, offset: libc::off_t) -> io::Result<*mut c_void> {
        let index = (offset as u32 / OFFSET_STEP) as u8;
        if self.state.borrow().fail_mmap == Some(u32::from(index)) {
            return Err(errno(libc::ENOMEM));
        }
        let region = vec![index; length].into_boxed_slice();
        let ptr = Box::into_raw(region) as *mut u8 as *mut c_void;
        self.state.borrow_mut().mappings.insert(ptr as usize, length);
        Ok(ptr)
    }

    unsafe fn munmap(&self, start: *mut c_void, length: usize) -> io::Result<()> {
        let mut st = self.state.borrow_mut();
        let count = {
            let count = st.unmaps.entry(start as usize).or_insert(0);
            *count += 1;
            *count
        };
        if count == 1 && st.mappings.get(&(start as usize)) == Some(&length) {
            drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                start as *mut u8,
                length,
            )));
        }
        Ok(())
    }
}
