use gstreamer::{self as gst, glib};

use crate::{
    error::{PipelineError, ViewerError},
    lifecycle::ViewerState,
};

#[derive(Debug, thiserror::Error)]
pub enum GstError {
    #[error("Failed to initialize GStreamer.")]
    Init(#[source] glib::Error),

    #[error("Could not create {0}")]
    CreateElement(&'static str, #[source] glib::BoolError),

    #[error("Failed to add elements to the pipeline.")]
    AddElements(#[source] glib::BoolError),

    #[error("Failed to link pipeline elements.")]
    LinkElements(#[source] glib::BoolError),

    #[error("Pipeline has no bus.")]
    MissingBus,

    #[error("Pipeline cannot be started from the {0:?} state.")]
    NotRestartable(ViewerState),

    #[error("Failed to change pipeline state to {0:?}.")]
    StateChange(gst::State, #[source] gst::StateChangeError),
}

impl From<GstError> for PipelineError {
    fn from(err: GstError) -> Self {
        PipelineError::Setup(Box::new(err))
    }
}

impl From<GstError> for ViewerError {
    fn from(err: GstError) -> Self {
        ViewerError::Pipeline(err.into())
    }
}
