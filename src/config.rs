use std::{env, path::PathBuf, str::FromStr, time::Duration};

use decklink::DisplayModeType;

use crate::{error::ConfigError, frame::PixelFormat, frame::Resolution};

pub const FRAME_WIDTH: usize = 1920;
pub const FRAME_HEIGHT: usize = 1080;

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub capture: CaptureConfig,
    pub display: DisplayConfig,
    pub logger: LoggerConfig,
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub resolution: Resolution,
    pub display_mode: DisplayModeType,
    pub pixel_format: PixelFormat,
    pub enable_format_detection: bool,
    /// `mode` property of `decklinkvideosrc`.
    pub pipeline_mode: &'static str,
    /// `connection` property of `decklinkvideosrc`.
    pub pipeline_connection: &'static str,
}

#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub title: &'static str,
    pub resolution: Resolution,
    pub refresh_rate: u32,
}

impl DisplayConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_rate.max(1)
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub stdio_level: String,
    pub format: LoggerFormat,
    pub log_file: Option<PathBuf>,
    pub file_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerFormat {
    Pretty,
    Json,
    Compact,
}

impl FromStr for LoggerFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(LoggerFormat::Pretty),
            "json" => Ok(LoggerFormat::Json),
            "compact" => Ok(LoggerFormat::Compact),
            other => Err(ConfigError::InvalidLoggerFormat(other.to_string())),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let resolution = Resolution {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
        };
        Self {
            capture: CaptureConfig {
                resolution,
                display_mode: DisplayModeType::ModeHD1080i5994,
                pixel_format: PixelFormat::Uyvy422,
                enable_format_detection: true,
                pipeline_mode: "1080i5994",
                pipeline_connection: "sdi",
            },
            display: DisplayConfig {
                title: "SDI Video Viewer",
                resolution,
                refresh_rate: 60,
            },
            logger: LoggerConfig {
                stdio_level: "info".to_string(),
                format: LoggerFormat::Compact,
                log_file: None,
                file_level: "debug".to_string(),
            },
        }
    }
}

pub fn read_config() -> Result<ViewerConfig, ConfigError> {
    read_config_from(|name| env::var(name).ok())
}

/// Builds the config, looking up logger overrides with `lookup`.
pub fn read_config_from<F>(lookup: F) -> Result<ViewerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ViewerConfig::default();

    if let Some(level) = lookup("SDI_VIEWER_LOGGER_LEVEL") {
        config.logger.stdio_level = level;
    }
    if let Some(format) = lookup("SDI_VIEWER_LOGGER_FORMAT") {
        config.logger.format = format.parse()?;
    }
    if let Some(path) = lookup("SDI_VIEWER_LOG_FILE").filter(|path| !path.is_empty()) {
        config.logger.log_file = Some(PathBuf::from(path));
    }
    if let Some(level) = lookup("SDI_VIEWER_LOG_FILE_LEVEL") {
        config.logger.file_level = level;
    }

    Ok(config)
}
