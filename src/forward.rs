//! The capture session: negotiate, stream, forward, tear down

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::device::{Device, Handle};
use crate::error::Result;
use crate::format::{negotiate, CaptureFormat};
use crate::io::mmap::Stream;
use crate::shutdown::Shutdown;
use crate::sink::{MediaFrame, Sink};

/// Progress is logged every this many frames, covering only the frames since the last report
pub const REPORT_INTERVAL: u64 = 60;

/// Counters of a forwarding run
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Stats {
    /// Frames accepted by the sink
    pub frames: u64,
    /// Bytes the sink reported as sent
    pub bytes: u64,
    /// Frames the sink failed to send
    pub dropped: u64,
}

/// Frame and byte counts since the last progress report
#[derive(Debug, Default)]
struct Progress {
    frames: u64,
    bytes: u64,
}

impl Progress {
    /// Counts one sent frame, returns the window totals once it is full and starts a new one
    fn record(&mut self, bytes: u64) -> Option<(u64, u64)> {
        self.frames += 1;
        self.bytes += bytes;
        if self.frames < REPORT_INTERVAL {
            return None;
        }
        let window = (self.frames, self.bytes);
        *self = Progress::default();
        Some(window)
    }
}

/// Pumps frames from `stream` into `sink` until `shutdown` is cancelled
///
/// The token is checked once per iteration. Sink failures are logged and the loop carries on
/// with the next frame.
pub fn forward<D, S>(
    stream: &mut Stream<'_, D>,
    format: &CaptureFormat,
    sink: &mut S,
    shutdown: &Shutdown,
) -> Stats
where
    D: Device + ?Sized,
    S: Sink + ?Sized,
{
    let mut stats = Stats::default();
    let mut progress = Progress::default();

    while !shutdown.is_cancelled() {
        let frame = match stream.next() {
            Some(frame) => frame,
            None => continue,
        };

        let media = MediaFrame::new(format, &frame);
        match sink.send(&media) {
            Ok(sent) => {
                stats.frames += 1;
                stats.bytes += sent as u64;
                if let Some((frames, bytes)) = progress.record(sent as u64) {
                    info!("sent {} frames, {} bytes", frames, bytes);
                }
            }
            Err(e) => {
                stats.dropped += 1;
                warn!(sequence = frame.meta().sequence, error = %e, "failed to send frame");
            }
        }
    }

    debug!(?stats, "forwarding finished");
    stats
}

/// Runs a full capture session on an already opened device
///
/// Negotiates the configured format, maps the buffer ring, streams until `shutdown` is
/// cancelled and stops the device again. Buffers are unmapped before this returns.
pub fn capture<D, S>(
    dev: &D,
    settings: &Settings,
    sink: &mut S,
    shutdown: &Shutdown,
) -> Result<Stats>
where
    D: Device + ?Sized,
    S: Sink + ?Sized,
{
    let format = negotiate(dev, &settings.capture_format())?;

    let mut stream = Stream::with_buffers(dev, settings.buffers)?;
    stream.start()?;
    info!(source = %settings.name, format = %format, "capturing");

    let stats = forward(&mut stream, &format, sink, shutdown);

    if let Err(e) = stream.stop() {
        warn!(error = %e, "failed to stop stream");
    }
    Ok(stats)
}

/// Opens the configured device and runs [`capture`] on it
///
/// The device is closed after the stream is torn down.
pub fn run<S: Sink + ?Sized>(
    settings: &Settings,
    sink: &mut S,
    shutdown: &Shutdown,
) -> Result<Stats> {
    let dev = Handle::open(&settings.device_path)?;
    let stats = capture(&dev, settings, sink, shutdown)?;
    info!(
        frames = stats.frames,
        bytes = stats.bytes,
        dropped = stats.dropped,
        "capture finished"
    );
    Ok(stats)
}
