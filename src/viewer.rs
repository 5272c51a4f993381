use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{Duration, Instant},
};

use tracing::{info, trace, warn};

use crate::{
    capture::{CaptureDevice, DeckLinkCapture},
    config::{DisplayConfig, ViewerConfig},
    convert::frame_to_rgb,
    display::{DisplaySurface, FrameBuffer, Window},
    error::{DisplayError, ErrorStack, FrameError, ViewerError},
    frame::VideoFrame,
    lifecycle::CaptureSession,
};

/// Why the display loop ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Window closed or quit key pressed.
    WindowClosed,
    /// SIGINT or SIGTERM received.
    Interrupted,
}

/// Fixed-rate tick, sleeps until the next deadline.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next_deadline: Instant,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_deadline: Instant::now() + interval,
        }
    }

    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next_deadline > now {
            thread::sleep(self.next_deadline - now);
            self.next_deadline += self.interval;
        } else {
            // Fell behind, do not try to catch up with a burst of ticks.
            self.next_deadline = now + self.interval;
        }
    }
}

/// Warns about a skipped frame once per distinct reason. Repeats are logged at
/// `trace` until a frame is drawn or the reason changes, so a source stuck in
/// another mode does not flood the log every tick.
#[derive(Debug, Default)]
pub(crate) struct SkipLog {
    last_reason: Option<String>,
}

impl SkipLog {
    /// Returns `true` when the skip was reported at `warn`.
    pub(crate) fn skipped(&mut self, err: &FrameError) -> bool {
        let reason = ErrorStack::new(err).into_string();
        if self.last_reason.as_deref() == Some(reason.as_str()) {
            trace!("Skipping frame: {reason}");
            return false;
        }
        warn!("Skipping frame: {reason}");
        self.last_reason = Some(reason);
        true
    }

    pub(crate) fn drawn(&mut self) {
        self.last_reason = None;
    }
}

/// Checks the quit flag and the window. Returns the reason to stop, if any.
pub(crate) fn quit_requested<S: DisplaySurface>(
    quit: &AtomicBool,
    surface: &S,
) -> Option<ExitReason> {
    if quit.load(Ordering::Relaxed) {
        info!("Received exit signal.");
        return Some(ExitReason::Interrupted);
    }
    if surface.should_close() {
        info!("Window closed.");
        return Some(ExitReason::WindowClosed);
    }
    None
}

/// Opens the first DeckLink device and displays its frames until quit.
pub fn run_pull_viewer(config: &ViewerConfig, quit: &AtomicBool) -> Result<ExitReason, ViewerError> {
    let device = DeckLinkCapture::open()?;
    run_capture(device, config, Window::open, quit)
}

/// Starts `device`, opens a surface and runs the pull loop. The capture
/// session is torn down on every return path.
pub fn run_capture<D, S, F>(
    device: D,
    config: &ViewerConfig,
    open_surface: F,
    quit: &AtomicBool,
) -> Result<ExitReason, ViewerError>
where
    D: CaptureDevice,
    S: DisplaySurface,
    F: FnOnce(&DisplayConfig) -> Result<S, DisplayError>,
{
    let mut session = CaptureSession::start(device, &config.capture)?;
    let mut surface = open_surface(&config.display)?;
    let mut ticker = Ticker::new(config.display.tick_interval());

    let result = run_pull_loop(&mut session, &mut surface, quit, &mut ticker);
    session.stop();
    result
}

pub fn run_pull_loop<D, S>(
    session: &mut CaptureSession<D>,
    surface: &mut S,
    quit: &AtomicBool,
    ticker: &mut Ticker,
) -> Result<ExitReason, ViewerError>
where
    D: CaptureDevice,
    S: DisplaySurface,
{
    let mut frame_buffer = FrameBuffer::new(surface.resolution());
    let mut skip_log = SkipLog::default();
    loop {
        if let Some(reason) = quit_requested(quit, surface) {
            return Ok(reason);
        }

        let drawn = match session.poll_frame() {
            Ok(Some(frame)) => match draw_frame(frame, &mut frame_buffer) {
                Ok(()) => {
                    skip_log.drawn();
                    true
                }
                Err(err) => {
                    skip_log.skipped(&err);
                    false
                }
            },
            Ok(None) => false,
            Err(err) => {
                warn!(
                    "Failed to acquire frame: {}",
                    ErrorStack::new(&err).into_string()
                );
                false
            }
        };

        if drawn {
            surface.present(&frame_buffer)?;
        } else {
            surface.pump_events();
        }
        ticker.wait();
    }
}

fn draw_frame(frame: &dyn VideoFrame, frame_buffer: &mut FrameBuffer) -> Result<(), FrameError> {
    let resolution = frame.resolution();
    if resolution != frame_buffer.resolution() {
        return Err(FrameError::UnexpectedResolution {
            actual: resolution,
            expected: frame_buffer.resolution(),
        });
    }
    let image = frame_to_rgb(frame)?;
    trace!(%resolution, "Drawing frame");
    frame_buffer.draw_rgb(&image)
}
