use std::{
    process::ExitCode,
    sync::{Arc, atomic::AtomicBool},
};

use tracing::info;

use crate::{
    config::{ViewerConfig, read_config},
    error::{ErrorStack, ViewerError},
    logger::init_logger,
    signals::register_quit_signals,
    viewer::ExitReason,
};

/// Shared `main` of both viewers: config, logger and signals, then `viewer`.
pub fn run<F>(name: &str, viewer: F) -> ExitCode
where
    F: FnOnce(&ViewerConfig, &AtomicBool) -> Result<ExitReason, ViewerError>,
{
    exit_code(try_run(name, viewer))
}

/// Clean quits exit with success. Fatal errors are printed to stderr and exit
/// with failure.
pub fn exit_code(result: Result<ExitReason, ViewerError>) -> ExitCode {
    match fatal_diagnostic(&result) {
        None => ExitCode::SUCCESS,
        Some(diagnostic) => {
            eprintln!("{diagnostic}");
            ExitCode::FAILURE
        }
    }
}

/// Text printed for a fatal error, `None` for a clean quit.
pub fn fatal_diagnostic(result: &Result<ExitReason, ViewerError>) -> Option<String> {
    match result {
        Ok(reason) => {
            info!(?reason, "Viewer stopped.");
            None
        }
        Err(err) => Some(ErrorStack::new(err).into_string()),
    }
}

fn try_run<F>(name: &str, viewer: F) -> Result<ExitReason, ViewerError>
where
    F: FnOnce(&ViewerConfig, &AtomicBool) -> Result<ExitReason, ViewerError>,
{
    let config = read_config()?;
    init_logger(config.logger.clone())?;
    info!("Starting {name} with config:\n{config:#?}");

    let quit = Arc::new(AtomicBool::new(false));
    register_quit_signals(&quit)?;
    viewer(&config, &quit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CaptureError, PipelineError};

    fn same_code(actual: ExitCode, expected: ExitCode) -> bool {
        format!("{actual:?}") == format!("{expected:?}")
    }

    #[test]
    fn test_clean_quit_exits_with_success() {
        for reason in [ExitReason::WindowClosed, ExitReason::Interrupted] {
            assert_eq!(fatal_diagnostic(&Ok(reason)), None);
            assert!(same_code(exit_code(Ok(reason)), ExitCode::SUCCESS));
        }
    }

    #[test]
    fn test_no_devices_exits_with_failure() {
        let result = Err(ViewerError::from(CaptureError::NoDevices));
        let diagnostic = fatal_diagnostic(&result).unwrap();
        assert!(diagnostic.contains("No DeckLink devices found"), "{diagnostic}");
        assert!(same_code(exit_code(result), ExitCode::FAILURE));
    }

    #[test]
    fn test_pipeline_error_diagnostic() {
        let result = Err(ViewerError::from(PipelineError::Stream {
            message: "Internal data stream error.".to_string(),
            debug: "basesrc.c(3132)".to_string(),
        }));
        assert_eq!(
            fatal_diagnostic(&result).as_deref(),
            Some("Error: Internal data stream error.\nDebug: basesrc.c(3132)")
        );
        assert!(same_code(exit_code(result), ExitCode::FAILURE));
    }
}
