use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use bytes::Bytes;
use decklink::DeckLinkError;

use crate::{
    capture::CaptureDevice,
    config::{CaptureConfig, ViewerConfig},
    display::{DisplaySurface, FrameBuffer},
    error::{CaptureError, DisplayError},
    frame::{PixelFormat, RawFrame, Resolution, VideoFrame},
};

pub(super) const TEST_RESOLUTION: Resolution = Resolution {
    width: 4,
    height: 2,
};

pub(super) const WHITE: u32 = 0x00ff_ffff;

/// Small frames and a fast tick.
pub(super) fn test_config() -> ViewerConfig {
    let mut config = ViewerConfig::default();
    config.capture.resolution = TEST_RESOLUTION;
    config.display.resolution = TEST_RESOLUTION;
    config.display.refresh_rate = 1000;
    config
}

pub(super) fn uyvy_frame(resolution: Resolution, y: u8) -> RawFrame {
    let bytes_per_row = resolution.width * 2;
    let data: Vec<u8> = [128, y]
        .into_iter()
        .cycle()
        .take(bytes_per_row * resolution.height)
        .collect();
    RawFrame {
        resolution,
        bytes_per_row,
        pixel_format: PixelFormat::Uyvy422,
        data: Bytes::from(data),
    }
}

pub(super) fn frame_error() -> CaptureError {
    CaptureError::FrameData(DeckLinkError::NullPointer("IDeckLinkVideoInputFrame::GetBytes"))
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct DeviceCalls {
    pub enable: usize,
    pub start: usize,
    pub stop: usize,
    pub disable: usize,
    pub polls: usize,
}

/// Scripted capture device. Each poll takes the next scripted result, an
/// empty script means no frame.
pub(super) struct FakeDevice {
    calls: Arc<Mutex<DeviceCalls>>,
    script: VecDeque<Result<Option<RawFrame>, CaptureError>>,
    current: Option<RawFrame>,
    fail_enable: bool,
    fail_start: bool,
}

impl FakeDevice {
    pub fn new() -> (Self, Arc<Mutex<DeviceCalls>>) {
        let calls = Arc::new(Mutex::new(DeviceCalls::default()));
        let device = Self {
            calls: calls.clone(),
            script: VecDeque::new(),
            current: None,
            fail_enable: false,
            fail_start: false,
        };
        (device, calls)
    }

    pub fn with_script(
        mut self,
        script: impl IntoIterator<Item = Result<Option<RawFrame>, CaptureError>>,
    ) -> Self {
        self.script = script.into_iter().collect();
        self
    }

    pub fn failing_enable(mut self) -> Self {
        self.fail_enable = true;
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, DeviceCalls> {
        self.calls.lock().unwrap()
    }
}

impl CaptureDevice for FakeDevice {
    fn enable_video_input(&mut self, _config: &CaptureConfig) -> Result<(), CaptureError> {
        self.calls().enable += 1;
        match self.fail_enable {
            true => Err(CaptureError::EnableInput(DeckLinkError::CallFailed {
                call: "IDeckLinkInput::EnableVideoInput",
                result: -1,
            })),
            false => Ok(()),
        }
    }

    fn disable_video_input(&mut self) -> Result<(), CaptureError> {
        self.calls().disable += 1;
        Ok(())
    }

    fn start_streams(&mut self) -> Result<(), CaptureError> {
        self.calls().start += 1;
        match self.fail_start {
            true => Err(CaptureError::StartStreams(DeckLinkError::CallFailed {
                call: "IDeckLinkInput::StartStreams",
                result: -1,
            })),
            false => Ok(()),
        }
    }

    fn stop_streams(&mut self) -> Result<(), CaptureError> {
        self.calls().stop += 1;
        self.current = None;
        Ok(())
    }

    fn poll_frame(&mut self) -> Result<Option<&dyn VideoFrame>, CaptureError> {
        self.calls().polls += 1;
        self.current = self.script.pop_front().transpose()?.flatten();
        Ok(self.current.as_ref().map(|frame| frame as &dyn VideoFrame))
    }
}

#[derive(Debug, Default)]
pub(super) struct SurfaceLog {
    pub presented: Vec<Vec<u32>>,
    pub pumps: usize,
    pub close_checks: usize,
}

/// Surface that reports close after `close_after` checks.
pub(super) struct FakeSurface {
    resolution: Resolution,
    close_after: usize,
    log: Arc<Mutex<SurfaceLog>>,
}

impl FakeSurface {
    pub fn new(resolution: Resolution, close_after: usize) -> (Self, Arc<Mutex<SurfaceLog>>) {
        let log = Arc::new(Mutex::new(SurfaceLog::default()));
        let surface = Self {
            resolution,
            close_after,
            log: log.clone(),
        };
        (surface, log)
    }
}

impl DisplaySurface for FakeSurface {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn should_close(&self) -> bool {
        let mut log = self.log.lock().unwrap();
        log.close_checks += 1;
        log.close_checks > self.close_after
    }

    fn present(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        self.log
            .lock()
            .unwrap()
            .presented
            .push(frame.pixels().to_vec());
        Ok(())
    }

    fn pump_events(&mut self) {
        self.log.lock().unwrap().pumps += 1;
    }
}
