use std::process::ExitCode;

use sdi_viewer::{app, viewer::run_pull_viewer};

fn main() -> ExitCode {
    app::run("SDI viewer", run_pull_viewer)
}
