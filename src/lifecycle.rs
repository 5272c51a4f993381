use tracing::{error, info};

use crate::{
    capture::CaptureDevice,
    config::CaptureConfig,
    error::{CaptureError, ErrorStack},
    frame::VideoFrame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Uninitialized,
    Running,
    Stopped,
}

/// Forward-only `Uninitialized -> Running -> Stopped` state machine.
#[derive(Debug)]
pub struct Lifecycle {
    state: ViewerState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: ViewerState::Uninitialized,
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ViewerState::Running
    }

    /// Returns `false` if the lifecycle was already started or stopped.
    pub fn start(&mut self) -> bool {
        match self.state {
            ViewerState::Uninitialized => {
                self.state = ViewerState::Running;
                true
            }
            ViewerState::Running | ViewerState::Stopped => false,
        }
    }

    /// Returns `true` only for the first call.
    pub fn stop(&mut self) -> bool {
        match self.state {
            ViewerState::Stopped => false,
            ViewerState::Uninitialized | ViewerState::Running => {
                self.state = ViewerState::Stopped;
                true
            }
        }
    }
}

/// Owns a started capture device. Streams are stopped and the input is
/// disabled exactly once, either by [`CaptureSession::stop`] or on drop.
pub struct CaptureSession<D: CaptureDevice> {
    device: D,
    lifecycle: Lifecycle,
    input_enabled: bool,
}

impl<D: CaptureDevice> CaptureSession<D> {
    pub fn start(device: D, config: &CaptureConfig) -> Result<Self, CaptureError> {
        let mut session = Self {
            device,
            lifecycle: Lifecycle::new(),
            input_enabled: false,
        };

        session.device.enable_video_input(config)?;
        session.input_enabled = true;
        // On failure the session is dropped here and the input gets disabled.
        session.device.start_streams()?;

        session.lifecycle.start();
        info!(
            resolution = %config.resolution,
            mode = ?config.display_mode,
            "Capture started"
        );
        Ok(session)
    }

    pub fn state(&self) -> ViewerState {
        self.lifecycle.state()
    }

    /// Returns `None` once the session is stopped.
    pub fn poll_frame(&mut self) -> Result<Option<&dyn VideoFrame>, CaptureError> {
        if !self.lifecycle.is_running() {
            return Ok(None);
        }
        self.device.poll_frame()
    }

    pub fn stop(&mut self) {
        if !self.lifecycle.stop() {
            return;
        }
        if !self.input_enabled {
            return;
        }
        if let Err(err) = self.device.stop_streams() {
            error!(
                "Failed to stop streams: {}",
                ErrorStack::new(&err).into_string()
            );
        }
        if let Err(err) = self.device.disable_video_input() {
            error!(
                "Failed to disable video input: {}",
                ErrorStack::new(&err).into_string()
            );
        }
        info!("Capture stopped");
    }
}

impl<D: CaptureDevice> Drop for CaptureSession<D> {
    fn drop(&mut self) {
        self.stop();
    }
}
