use std::sync::atomic::{AtomicBool, Ordering};

use decklink::{
    DeckLink, DeckLinkApi, DetectedVideoInputFormatFlags, DisplayModeType, InputCallback,
    InputCallbackResult, VideoInputFlags, VideoInputFormatChangedEvents, VideoInputFrame,
};
use tracing::{Span, debug, info, info_span, trace, warn};

use crate::{
    config::CaptureConfig,
    error::{CaptureError, ErrorStack},
    frame::{PixelFormat, VideoFrame},
    mailbox::FrameMailbox,
};

/// Capture source driven by explicit polling.
pub trait CaptureDevice {
    fn enable_video_input(&mut self, config: &CaptureConfig) -> Result<(), CaptureError>;
    fn disable_video_input(&mut self) -> Result<(), CaptureError>;
    fn start_streams(&mut self) -> Result<(), CaptureError>;
    fn stop_streams(&mut self) -> Result<(), CaptureError>;

    /// Returns the next available frame, or `None` if nothing arrived since
    /// the previous call. Never blocks.
    fn poll_frame(&mut self) -> Result<Option<&dyn VideoFrame>, CaptureError>;
}

/// First DeckLink device found on the system.
pub struct DeckLinkCapture {
    current: Option<DeckLinkFrame>,
    mailbox: FrameMailbox<VideoInputFrame>,
    input: decklink::Input,
    _device: DeckLink,
}

impl DeckLinkCapture {
    /// Loads the SDK, picks the first device and registers the frame
    /// callback. Streams are not started.
    pub fn open() -> Result<Self, CaptureError> {
        let api = DeckLinkApi::load().map_err(CaptureError::LibraryUnavailable)?;
        let device = api
            .decklinks()
            .map_err(CaptureError::EnumerationFailed)?
            .into_iter()
            .next()
            .ok_or(CaptureError::NoDevices)?;

        match device.display_name() {
            Ok(name) => info!("Opening DeckLink device: {name}"),
            Err(err) => warn!(
                "Failed to read device name: {}",
                ErrorStack::new(&err).into_string()
            ),
        }
        if let Ok(model) = device.model_name() {
            debug!(%model, "DeckLink model");
        }

        let input = device.input().map_err(CaptureError::InputUnavailable)?;
        let mailbox = FrameMailbox::new();
        let span = info_span!("decklink capture");
        input
            .set_callback(Box::new(MailboxCallbackAdapter::new(mailbox.clone(), span)))
            .map_err(CaptureError::InputUnavailable)?;

        Ok(Self {
            current: None,
            mailbox,
            input,
            _device: device,
        })
    }
}

impl CaptureDevice for DeckLinkCapture {
    fn enable_video_input(&mut self, config: &CaptureConfig) -> Result<(), CaptureError> {
        self.input
            .enable_video(
                config.display_mode,
                config.pixel_format.into(),
                VideoInputFlags {
                    enable_format_detection: config.enable_format_detection,
                    ..Default::default()
                },
            )
            .map_err(CaptureError::EnableInput)
    }

    fn disable_video_input(&mut self) -> Result<(), CaptureError> {
        self.input
            .disable_video()
            .map_err(CaptureError::DisableInput)
    }

    fn start_streams(&mut self) -> Result<(), CaptureError> {
        self.input
            .start_streams()
            .map_err(CaptureError::StartStreams)
    }

    fn stop_streams(&mut self) -> Result<(), CaptureError> {
        let result = self.input.stop_streams().map_err(CaptureError::StopStreams);
        // Hand buffers back to the driver before the input is disabled.
        self.current = None;
        self.mailbox.clear();
        result
    }

    fn poll_frame(&mut self) -> Result<Option<&dyn VideoFrame>, CaptureError> {
        self.current = self.mailbox.take().map(DeckLinkFrame);
        Ok(self.current.as_ref().map(|frame| frame as &dyn VideoFrame))
    }
}

struct DeckLinkFrame(VideoInputFrame);

impl VideoFrame for DeckLinkFrame {
    fn width(&self) -> usize {
        self.0.width()
    }

    fn height(&self) -> usize {
        self.0.height()
    }

    fn bytes_per_row(&self) -> usize {
        self.0.bytes_per_row()
    }

    fn pixel_format(&self) -> PixelFormat {
        self.0.pixel_format().into()
    }

    fn bytes(&self) -> Result<&[u8], CaptureError> {
        self.0.bytes().map_err(CaptureError::FrameData)
    }
}

/// Runs on the SDK capture thread, only touches the mailbox.
struct MailboxCallbackAdapter {
    mailbox: FrameMailbox<VideoInputFrame>,
    span: Span,
    has_signal: AtomicBool,
}

impl MailboxCallbackAdapter {
    fn new(mailbox: FrameMailbox<VideoInputFrame>, span: Span) -> Self {
        Self {
            mailbox,
            span,
            has_signal: AtomicBool::new(true),
        }
    }
}

impl InputCallback for MailboxCallbackAdapter {
    fn video_input_frame_arrived(
        &self,
        video_frame: Option<VideoInputFrame>,
    ) -> InputCallbackResult {
        let _span = self.span.enter();

        let Some(video_frame) = video_frame else {
            return InputCallbackResult::Ok;
        };

        if video_frame.flags().has_no_input_source {
            if self.has_signal.swap(false, Ordering::Relaxed) {
                info!("No input signal");
            }
            return InputCallbackResult::Ok;
        }
        if !self.has_signal.swap(true, Ordering::Relaxed) {
            info!("Input signal detected");
        }

        trace!(?video_frame, "Received frame from DeckLink");
        if self.mailbox.put(video_frame) {
            trace!("Dropped frame that was never displayed");
        }
        InputCallbackResult::Ok
    }

    fn video_input_format_changed(
        &self,
        events: VideoInputFormatChangedEvents,
        display_mode: DisplayModeType,
        flags: DetectedVideoInputFormatFlags,
    ) -> InputCallbackResult {
        let _span = self.span.enter();
        info!(
            ?events,
            ?display_mode,
            ?flags,
            "Input format changed, keeping configured video mode"
        );
        InputCallbackResult::Ok
    }
}
