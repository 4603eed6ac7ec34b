use std::{io, mem};

use tracing::{info, warn};

use crate::device::Device;
use crate::error::{Error, Result};
use crate::format::{CaptureFormat, FourCC};
use crate::fraction::Fraction;
use crate::parameters::Capabilities;
use crate::v4l2;
use crate::v4l2::videodev::*;

/// Programs `requested` into the device and returns what the device actually accepted
///
/// The driver is free to adjust width, height, stride and pixelformat as well as the frame
/// interval. The returned format reflects those adjustments and is the one to use for the rest
/// of the session.
///
/// The frame rate is handed to the driver as time per frame, i.e. numerator and denominator
/// swap places on the way in and again on the way out.
pub fn negotiate<D: Device + ?Sized>(dev: &D, requested: &CaptureFormat) -> Result<CaptureFormat> {
    let pix = set_format(dev, requested).map_err(|source| Error::FormatNegotiation {
        what: "format",
        source,
    })?;

    let (interval, caps) = set_interval(dev, requested.frame_rate.inverse()).map_err(|source| {
        Error::FormatNegotiation {
            what: "frame rate",
            source,
        }
    })?;

    if !caps.contains(Capabilities::TIME_PER_FRAME) {
        warn!(%caps, "device does not support setting the frame interval");
    }

    let granted = CaptureFormat {
        fourcc: FourCC::from(pix.pixelformat),
        width: pix.width,
        height: pix.height,
        stride: pix.bytesperline,
        frame_rate: interval.inverse(),
    };

    if granted != *requested {
        warn!(requested = %requested, granted = %granted, "device adjusted capture format");
    }
    info!(format = %granted, "capture format negotiated");

    Ok(granted)
}

fn set_format<D: Device + ?Sized>(dev: &D, format: &CaptureFormat) -> io::Result<v4l2_pix_format> {
    let mut v4l2_fmt = v4l2_format {
        type_: V4L2_BUF_TYPE_VIDEO_CAPTURE,
        ..unsafe { mem::zeroed() }
    };
    v4l2_fmt.fmt.pix = v4l2_pix_format {
        width: format.width,
        height: format.height,
        pixelformat: format.fourcc.into(),
        field: V4L2_FIELD_NONE,
        bytesperline: format.stride,
        sizeimage: format.size(),
        ..Default::default()
    };

    unsafe {
        dev.ioctl(
            v4l2::vidioc::VIDIOC_S_FMT,
            &mut v4l2_fmt as *mut _ as *mut std::os::raw::c_void,
        )?;

        Ok(v4l2_fmt.fmt.pix)
    }
}

fn set_interval<D: Device + ?Sized>(
    dev: &D,
    interval: Fraction,
) -> io::Result<(Fraction, Capabilities)> {
    let mut v4l2_params = v4l2_streamparm {
        type_: V4L2_BUF_TYPE_VIDEO_CAPTURE,
        ..unsafe { mem::zeroed() }
    };
    v4l2_params.parm.capture = v4l2_captureparm {
        capability: Capabilities::TIME_PER_FRAME.into(),
        timeperframe: interval.into(),
        ..Default::default()
    };

    unsafe {
        dev.ioctl(
            v4l2::vidioc::VIDIOC_S_PARM,
            &mut v4l2_params as *mut _ as *mut std::os::raw::c_void,
        )?;

        let capture = v4l2_params.parm.capture;
        Ok((
            Fraction::from(capture.timeperframe),
            Capabilities::from(capture.capability),
        ))
    }
}
