use gstreamer as gst;
use gstreamer_video as gst_video;

use crate::{display::FrameBuffer, error::FrameError, frame::Resolution};

/// Copies a `BGRx` appsink sample into the frame buffer.
pub fn draw_sample(sample: &gst::Sample, frame_buffer: &mut FrameBuffer) -> Result<(), FrameError> {
    let caps = sample.caps().ok_or(FrameError::IncompleteSample("caps"))?;
    let buffer = sample
        .buffer()
        .ok_or(FrameError::IncompleteSample("buffer"))?;
    let info = gst_video::VideoInfo::from_caps(caps)
        .map_err(|_| FrameError::IncompleteSample("video info"))?;

    let map = buffer
        .map_readable()
        .map_err(|_| FrameError::IncompleteSample("readable buffer"))?;
    let resolution = Resolution {
        width: info.width() as usize,
        height: info.height() as usize,
    };
    let bytes_per_row = info.stride()[0].max(0) as usize;
    frame_buffer.draw_bgrx(resolution, bytes_per_row, map.as_slice())
}
