use std::{
    fs::{self, File},
    io,
};

use tracing_subscriber::{
    Layer, Registry,
    fmt::{self},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::{
    config::{LoggerConfig, LoggerFormat},
    error::ConfigError,
};

pub fn init_logger(opts: LoggerConfig) -> Result<(), ConfigError> {
    let stdio_filter = tracing_subscriber::EnvFilter::new(opts.stdio_level.clone());
    let stdio_layer = match opts.format {
        LoggerFormat::Pretty => fmt::Layer::default().pretty().with_writer(io::stderr).boxed(),
        LoggerFormat::Json => fmt::Layer::default().json().with_writer(io::stderr).boxed(),
        LoggerFormat::Compact => fmt::Layer::default()
            .compact()
            .with_writer(io::stderr)
            .boxed(),
    }
    .with_filter(stdio_filter);

    let file_layer = match opts.log_file {
        Some(log_file) => {
            if log_file.exists() {
                fs::remove_file(&log_file).map_err(ConfigError::LoggerInit)?;
            }
            if let Some(parent) = log_file.parent() {
                fs::create_dir_all(parent).map_err(ConfigError::LoggerInit)?;
            }
            let writer = File::create(log_file).map_err(ConfigError::LoggerInit)?;
            let filter = tracing_subscriber::EnvFilter::new(opts.file_level.clone());
            Some(
                fmt::Layer::default()
                    .json()
                    .with_writer(writer)
                    .with_filter(filter),
            )
        }
        None => None,
    };

    match file_layer {
        Some(file_layer) => Registry::default()
            .with(stdio_layer)
            .with(file_layer)
            .init(),
        None => Registry::default().with(stdio_layer).init(),
    }
    Ok(())
}
