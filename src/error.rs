use decklink::DeckLinkError;

use crate::frame::{PixelFormat, Resolution};

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid logger format \"{0}\", expected one of: pretty, json, compact.")]
    InvalidLoggerFormat(String),

    #[error("Failed to initialize logger.")]
    LoggerInit(#[source] std::io::Error),

    #[error("Failed to register signal handlers.")]
    SignalHandler(#[source] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Capture library is not available.")]
    LibraryUnavailable(#[source] DeckLinkError),

    #[error("No DeckLink devices found.")]
    NoDevices,

    #[error("No DeckLink devices found, device enumeration failed.")]
    EnumerationFailed(#[source] DeckLinkError),

    #[error("DeckLink device has no video input.")]
    InputUnavailable(#[source] DeckLinkError),

    #[error("Failed to enable video input.")]
    EnableInput(#[source] DeckLinkError),

    #[error("Failed to start video stream.")]
    StartStreams(#[source] DeckLinkError),

    #[error("Failed to stop video stream.")]
    StopStreams(#[source] DeckLinkError),

    #[error("Failed to disable video input.")]
    DisableInput(#[source] DeckLinkError),

    #[error("Failed to read frame data.")]
    FrameData(#[source] DeckLinkError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Unsupported pixel format {0:?}, expected 8-bit UYVY 4:2:2.")]
    UnsupportedPixelFormat(PixelFormat),

    #[error("Frame has no pixels ({0}).")]
    EmptyFrame(Resolution),

    #[error("Frame width {0} is odd, 4:2:2 frames need an even width.")]
    OddWidth(usize),

    #[error("Row stride of {bytes_per_row} bytes is smaller than the {required} bytes of a row.")]
    StrideTooSmall { bytes_per_row: usize, required: usize },

    #[error("Frame buffer has {actual} bytes, at least {required} are required.")]
    BufferTooSmall { actual: usize, required: usize },
}

/// Reasons for skipping a single frame. Never fatal.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Frame resolution {actual} does not match display resolution {expected}.")]
    UnexpectedResolution {
        actual: Resolution,
        expected: Resolution,
    },

    #[error("Received sample without {0}.")]
    IncompleteSample(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Failed to create window.")]
    CreateWindow(#[source] minifb::Error),

    #[error("Failed to update window.")]
    UpdateWindow(#[source] minifb::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Error: {message}\nDebug: {debug}")]
    Stream { message: String, debug: String },

    #[error("End of stream")]
    EndOfStream,

    #[error("Pipeline event channel was closed.")]
    EventChannelClosed,

    /// Pipeline could not be set up.
    #[error(transparent)]
    Setup(Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Iterates over an error and all of its sources.
pub struct ErrorStack<'a>(Option<&'a (dyn std::error::Error + 'static)>);

impl<'a> ErrorStack<'a> {
    pub fn new(value: &'a (dyn std::error::Error + 'static)) -> Self {
        ErrorStack(Some(value))
    }

    pub fn into_string(self) -> String {
        let stack: Vec<String> = self.map(ToString::to_string).collect();
        stack.join("\n")
    }
}

impl<'a> Iterator for ErrorStack<'a> {
    type Item = &'a (dyn std::error::Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.0.take()?;
        self.0 = current.source();
        Some(current)
    }
}
