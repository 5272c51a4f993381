use std::process::ExitCode;

use sdi_viewer::{app, gst::run_gst_viewer};

fn main() -> ExitCode {
    app::run("SDI viewer (GStreamer)", run_gst_viewer)
}
