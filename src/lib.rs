pub mod app;
pub mod capture;
pub mod config;
pub mod convert;
pub mod display;
pub mod error;
pub mod frame;
pub mod lifecycle;
pub mod logger;
pub mod mailbox;
pub mod push;
pub mod signals;
pub mod viewer;

#[cfg(feature = "gstreamer")]
pub mod gst;
