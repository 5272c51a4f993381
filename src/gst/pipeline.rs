use crossbeam_channel::{Sender, TrySendError};
use gstreamer::{self as gst, prelude::*};
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use tracing::{debug, error, info, warn};

use super::GstError;
use crate::{
    config::CaptureConfig,
    lifecycle::{Lifecycle, ViewerState},
    mailbox::FrameMailbox,
    push::PipelineEvent,
};

const SOURCE_FACTORY: &str = "decklinkvideosrc";
const CONVERT_FACTORY: &str = "videoconvert";
const SCALE_FACTORY: &str = "videoscale";
const SINK_FACTORY: &str = "appsink";

/// Owns the `decklinkvideosrc ! videoconvert ! videoscale ! appsink`
/// pipeline. It is set to `Null` exactly once, by [`PipelineSession::stop`]
/// or on drop.
pub struct PipelineSession {
    pipeline: gst::Pipeline,
    bus: gst::Bus,
    lifecycle: Lifecycle,
}

impl PipelineSession {
    /// Builds the pipeline. Every new sample replaces the one in `mailbox`,
    /// error and end-of-stream messages are forwarded to `events`.
    pub fn build(
        config: &CaptureConfig,
        mailbox: FrameMailbox<gst::Sample>,
        events: Sender<PipelineEvent>,
    ) -> Result<Self, GstError> {
        let source = gst::ElementFactory::make(SOURCE_FACTORY)
            .name("sdi-source")
            .property_from_str("mode", config.pipeline_mode)
            .property_from_str("connection", config.pipeline_connection)
            .build()
            .map_err(|err| GstError::CreateElement(SOURCE_FACTORY, err))?;
        Self::with_source(source, config, mailbox, events)
    }

    /// Links `source` into the convert, scale and appsink chain.
    fn with_source(
        source: gst::Element,
        config: &CaptureConfig,
        mailbox: FrameMailbox<gst::Sample>,
        events: Sender<PipelineEvent>,
    ) -> Result<Self, GstError> {
        let convert = gst::ElementFactory::make(CONVERT_FACTORY)
            .name("converter")
            .build()
            .map_err(|err| GstError::CreateElement(CONVERT_FACTORY, err))?;
        let scale = gst::ElementFactory::make(SCALE_FACTORY)
            .name("scaler")
            .build()
            .map_err(|err| GstError::CreateElement(SCALE_FACTORY, err))?;
        let sink = gst::ElementFactory::make(SINK_FACTORY)
            .name("video-output")
            .build()
            .map_err(|err| GstError::CreateElement(SINK_FACTORY, err))?
            .dynamic_cast::<gst_app::AppSink>()
            .map_err(|_| {
                GstError::CreateElement(
                    SINK_FACTORY,
                    gstreamer::glib::bool_error!("Element is not an appsink"),
                )
            })?;

        let caps = gst_video::VideoCapsBuilder::new()
            .format(gst_video::VideoFormat::Bgrx)
            .width(config.resolution.width as i32)
            .height(config.resolution.height as i32)
            .build();
        sink.set_caps(Some(&caps));
        sink.set_max_buffers(1);
        sink.set_drop(true);
        sink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |sink| {
                    let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    mailbox.put(sample);
                    Ok(gst::FlowSuccess::Ok)
                })
                .build(),
        );

        let pipeline = gst::Pipeline::builder().name("sdi-viewer").build();
        pipeline
            .add_many([&source, &convert, &scale, sink.upcast_ref()])
            .map_err(GstError::AddElements)?;
        gst::Element::link_many([&source, &convert, &scale, sink.upcast_ref()])
            .map_err(GstError::LinkElements)?;

        let bus = pipeline.bus().ok_or(GstError::MissingBus)?;
        bus.set_sync_handler(move |_bus, msg| {
            if let Some(event) = terminal_event(msg) {
                match events.try_send(event) {
                    Ok(()) => (),
                    Err(TrySendError::Full(event)) => {
                        debug!(?event, "Pipeline event channel is full, dropping event.")
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        debug!("Pipeline event channel closed.")
                    }
                }
            }
            // Nobody pops the bus, drop everything so messages do not pile up.
            gst::BusSyncReply::Drop
        });

        debug!("Pipeline built");
        Ok(Self {
            pipeline,
            bus,
            lifecycle: Lifecycle::new(),
        })
    }

    pub fn state(&self) -> ViewerState {
        self.lifecycle.state()
    }

    pub fn play(&mut self) -> Result<(), GstError> {
        if !self.lifecycle.start() {
            return Err(GstError::NotRestartable(self.lifecycle.state()));
        }
        self.pipeline
            .set_state(gst::State::Playing)
            .map_err(|err| GstError::StateChange(gst::State::Playing, err))?;
        info!("Pipeline playing");
        Ok(())
    }

    pub fn stop(&mut self) {
        if !self.lifecycle.stop() {
            return;
        }

        if let Err(err) = self.pipeline.set_state(gst::State::Null) {
            error!("Failed to stop pipeline: {err}");
        }
        self.bus.unset_sync_handler();
        info!("Pipeline stopped");
    }
}

impl Drop for PipelineSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn terminal_event(msg: &gst::Message) -> Option<PipelineEvent> {
    match msg.view() {
        gst::MessageView::Error(err) => {
            let source = msg
                .src()
                .map(|src| src.path_string().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            warn!(%source, "Pipeline error: {}", err.error());
            Some(PipelineEvent::Error {
                message: err.error().to_string(),
                debug: err
                    .debug()
                    .map(|debug| debug.to_string())
                    .unwrap_or_else(|| "none".to_string()),
            })
        }
        gst::MessageView::Eos(_) => Some(PipelineEvent::EndOfStream),
        _ => None,
    }
}
