mod common;

use common::FakeDevice;

use omt_capture::format::negotiate;
use omt_capture::v4l2::videodev::V4L2_FIELD_NONE;
use omt_capture::{CaptureFormat, Error, FourCC, Fraction, PixelFormat};

#[test]
fn granted_as_requested() {
    let dev = FakeDevice::new();
    let requested =
        CaptureFormat::new(PixelFormat::Uyvy, 1920, 1080, Fraction::new(60000, 1000));

    let granted = negotiate(&dev, &requested).unwrap();
    assert_eq!(granted, requested);

    let st = dev.state();
    let pix = st.requested_format.unwrap();
    assert_eq!(FourCC::from(pix.pixelformat), FourCC::UYVY);
    assert_eq!((pix.width, pix.height), (1920, 1080));
    assert_eq!(pix.bytesperline, 3840);
    assert_eq!(pix.field, V4L2_FIELD_NONE);
    // frame rate goes out as time per frame
    assert_eq!(st.requested_interval, Some((1000, 60000)));
    assert_eq!(granted.frame_rate, Fraction::new(60000, 1000));
}

#[test]
fn driver_substitutes_format() {
    let dev = FakeDevice::new();
    {
        let mut st = dev.state_mut();
        st.force_fourcc = Some(FourCC::YUYV.into());
        st.force_size = Some((1280, 720));
        st.force_interval = Some((1001, 30000));
    }
    let requested =
        CaptureFormat::new(PixelFormat::Yuy2, 1920, 1080, Fraction::new(60, 1));

    let granted = negotiate(&dev, &requested).unwrap();
    assert_eq!(granted.fourcc, FourCC::YUYV);
    assert_eq!(granted.pixel_format(), Some(PixelFormat::Yuy2));
    assert_eq!((granted.width, granted.height), (1280, 720));
    assert_eq!(granted.stride, 2560);
    assert_eq!(granted.frame_rate, Fraction::new(30000, 1001));
}

#[test]
fn without_frame_interval_support() {
    let dev = FakeDevice::new();
    dev.state_mut().capability = 0;
    let requested = CaptureFormat::new(PixelFormat::Nv12, 640, 480, Fraction::new(25, 1));

    let granted = negotiate(&dev, &requested).unwrap();
    assert_eq!(granted.stride, 640);
    assert_eq!(granted.frame_rate, Fraction::new(25, 1));
}

#[test]
fn format_rejected() {
    let dev = FakeDevice::new();
    dev.state_mut().fail_s_fmt = true;
    let requested = CaptureFormat::new(PixelFormat::Uyvy, 1920, 1080, Fraction::new(60, 1));

    match negotiate(&dev, &requested) {
        Err(Error::FormatNegotiation { what, source }) => {
            assert_eq!(what, "format");
            assert_eq!(source.raw_os_error(), Some(libc::EINVAL));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    // the frame interval is not touched once the format failed
    assert_eq!(dev.count("VIDIOC_S_PARM"), 0);
}

#[test]
fn frame_rate_rejected() {
    let dev = FakeDevice::new();
    dev.state_mut().fail_s_parm = true;
    let requested = CaptureFormat::new(PixelFormat::Nv12, 1280, 720, Fraction::new(30, 1));

    let err = negotiate(&dev, &requested).unwrap_err();
    assert!(matches!(err, Error::FormatNegotiation { what: "frame rate", .. }));
    assert!(err.to_string().starts_with("unable to set video device frame rate"));
}
