use std::{sync::atomic::AtomicBool, time::Duration};

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::{
    display::{DisplaySurface, FrameBuffer},
    error::{FrameError, PipelineError, ViewerError},
    mailbox::FrameMailbox,
    viewer::{ExitReason, SkipLog, quit_requested},
};

/// Terminal notifications posted by a running pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Error { message: String, debug: String },
    EndOfStream,
}

impl From<PipelineEvent> for PipelineError {
    fn from(event: PipelineEvent) -> Self {
        match event {
            PipelineEvent::Error { message, debug } => PipelineError::Stream { message, debug },
            PipelineEvent::EndOfStream => PipelineError::EndOfStream,
        }
    }
}

/// Displays the latest item delivered to `mailbox` until quit or until the
/// first pipeline event arrives. Waiting for events paces the loop.
pub fn run_push_loop<T, S, F>(
    events: &Receiver<PipelineEvent>,
    mailbox: &FrameMailbox<T>,
    surface: &mut S,
    quit: &AtomicBool,
    tick: Duration,
    mut draw: F,
) -> Result<ExitReason, ViewerError>
where
    S: DisplaySurface,
    F: FnMut(&T, &mut FrameBuffer) -> Result<(), FrameError>,
{
    let mut frame_buffer = FrameBuffer::new(surface.resolution());
    let mut skip_log = SkipLog::default();
    loop {
        if let Some(reason) = quit_requested(quit, surface) {
            return Ok(reason);
        }

        let drawn = match mailbox.take() {
            Some(item) => match draw(&item, &mut frame_buffer) {
                Ok(()) => {
                    skip_log.drawn();
                    true
                }
                Err(err) => {
                    skip_log.skipped(&err);
                    false
                }
            },
            None => false,
        };

        if drawn {
            surface.present(&frame_buffer)?;
        } else {
            surface.pump_events();
        }

        match events.recv_timeout(tick) {
            Ok(event) => return Err(PipelineError::from(event).into()),
            Err(RecvTimeoutError::Timeout) => (),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(PipelineError::EventChannelClosed.into());
            }
        }
    }
}
