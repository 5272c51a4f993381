//! Push viewer built on a GStreamer capture pipeline.

use std::sync::atomic::AtomicBool;

use gstreamer as gst;
use tracing::info;

use crate::{
    config::ViewerConfig,
    display::Window,
    error::ViewerError,
    mailbox::FrameMailbox,
    push::run_push_loop,
    viewer::ExitReason,
};

mod error;
mod pipeline;
mod sample;

pub use error::GstError;
pub use pipeline::PipelineSession;
pub use sample::draw_sample;

const EVENT_CHANNEL_CAPACITY: usize = 8;

pub fn run_gst_viewer(config: &ViewerConfig, quit: &AtomicBool) -> Result<ExitReason, ViewerError> {
    gst::init().map_err(GstError::Init)?;
    info!("GStreamer {}", gst::version_string());

    let (sender, receiver) = crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY);
    let mailbox = FrameMailbox::new();
    let mut session = PipelineSession::build(&config.capture, mailbox.clone(), sender)?;
    let mut window = Window::open(&config.display)?;
    session.play()?;

    let result = run_push_loop(
        &receiver,
        &mailbox,
        &mut window,
        quit,
        config.display.tick_interval(),
        draw_sample,
    );
    session.stop();
    result
}
