use std::sync::{Arc, atomic::AtomicBool};

use signal_hook::{consts, flag};

use crate::error::ConfigError;

/// Sets `quit` on SIGINT or SIGTERM. Repeated signals only set it again, the
/// display loop notices within one tick and tears the capture down.
pub fn register_quit_signals(quit: &Arc<AtomicBool>) -> Result<(), ConfigError> {
    for signal in [consts::SIGINT, consts::SIGTERM] {
        flag::register(signal, quit.clone()).map_err(ConfigError::SignalHandler)?;
    }
    Ok(())
}
