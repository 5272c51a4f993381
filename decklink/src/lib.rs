//! Bindings to the Blackmagic DeckLink capture API.
//!
//! `libDeckLinkAPI.so` is loaded at runtime, a missing Desktop Video
//! installation is reported as [`DeckLinkError::LibraryNotFound`] instead of a
//! link failure.

mod api;
mod device;
mod enums;
mod error;
mod ffi;
mod frame;
mod input_callback;

pub use api::{DEFAULT_LIBRARY_PATHS, DeckLinkApi};
pub use device::{DeckLink, Input};
pub use enums::{
    DetectedVideoInputFormatFlags, DisplayModeType, FrameFlags, PixelFormat, VideoInputFlags,
    VideoInputFormatChangedEvents,
};
pub use error::DeckLinkError;
pub use frame::VideoInputFrame;
pub use input_callback::{InputCallback, InputCallbackResult};

#[cfg(test)]
mod tests {
    use std::path::Path;

    #[test]
    fn test_license_file_is_packaged() {
        let license = Path::new(env!("CARGO_MANIFEST_DIR")).join(env!("CARGO_PKG_LICENSE_FILE"));
        assert!(license.is_file(), "{}", license.display());
    }
}
