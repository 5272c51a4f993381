use std::fmt;

use bytes::Bytes;

use crate::error::CaptureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed 8-bit YUV 4:2:2, byte order `U Y0 V Y1`.
    Uyvy422,
    /// Any other format reported by the capture source.
    Unsupported(u32),
}

impl From<decklink::PixelFormat> for PixelFormat {
    fn from(value: decklink::PixelFormat) -> Self {
        match value {
            decklink::PixelFormat::Format8BitYUV => PixelFormat::Uyvy422,
            other => PixelFormat::Unsupported(other.into_raw()),
        }
    }
}

impl From<PixelFormat> for decklink::PixelFormat {
    fn from(value: PixelFormat) -> Self {
        match value {
            PixelFormat::Uyvy422 => decklink::PixelFormat::Format8BitYUV,
            PixelFormat::Unsupported(raw) => decklink::PixelFormat::from_raw(raw),
        }
    }
}

/// Capabilities of a single captured frame.
///
/// Frames are borrowed from the capture source and must not be kept past the
/// next acquisition, the source may recycle the underlying buffer.
pub trait VideoFrame {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn bytes_per_row(&self) -> usize;
    fn pixel_format(&self) -> PixelFormat;
    fn bytes(&self) -> Result<&[u8], CaptureError>;

    fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width(),
            height: self.height(),
        }
    }
}

/// Frame that owns its sample buffer.
#[derive(Clone)]
pub struct RawFrame {
    pub resolution: Resolution,
    pub bytes_per_row: usize,
    pub pixel_format: PixelFormat,
    pub data: Bytes,
}

impl VideoFrame for RawFrame {
    fn width(&self) -> usize {
        self.resolution.width
    }

    fn height(&self) -> usize {
        self.resolution.height
    }

    fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    fn bytes(&self) -> Result<&[u8], CaptureError> {
        Ok(&self.data)
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("resolution", &self.resolution)
            .field("bytes_per_row", &self.bytes_per_row)
            .field("pixel_format", &self.pixel_format)
            .field("len", &self.data.len())
            .finish()
    }
}
