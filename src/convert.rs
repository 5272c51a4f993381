use image::RgbImage;

use crate::{
    error::{ConversionError, FrameError},
    frame::{PixelFormat, Resolution, VideoFrame},
};

/// Bytes taken by one UYVY macro-pixel (two horizontal pixels).
const MACRO_PIXEL_SIZE: usize = 4;

/// Converts a frame borrowed from a capture source to RGB.
pub fn frame_to_rgb(frame: &dyn VideoFrame) -> Result<RgbImage, FrameError> {
    let pixel_format = frame.pixel_format();
    if pixel_format != PixelFormat::Uyvy422 {
        return Err(ConversionError::UnsupportedPixelFormat(pixel_format).into());
    }
    let data = frame.bytes()?;
    Ok(convert_uyvy422_to_rgb(
        frame.resolution(),
        frame.bytes_per_row(),
        data,
    )?)
}

/// Converts packed 8-bit UYVY 4:2:2 (`U Y0 V Y1`) to dense RGB.
///
/// Rows are read `bytes_per_row` apart, any padding past `2 * width` bytes is
/// ignored. The buffer of the last row may end right after its pixels.
pub fn convert_uyvy422_to_rgb(
    resolution: Resolution,
    bytes_per_row: usize,
    data: &[u8],
) -> Result<RgbImage, ConversionError> {
    let Resolution { width, height } = resolution;
    if width == 0 || height == 0 {
        return Err(ConversionError::EmptyFrame(resolution));
    }
    if width % 2 != 0 {
        return Err(ConversionError::OddWidth(width));
    }
    let row_size = width * 2;
    if bytes_per_row < row_size {
        return Err(ConversionError::StrideTooSmall {
            bytes_per_row,
            required: row_size,
        });
    }
    let required = bytes_per_row * (height - 1) + row_size;
    if data.len() < required {
        return Err(ConversionError::BufferTooSmall {
            actual: data.len(),
            required,
        });
    }

    let mut rgb = Vec::with_capacity(width * height * 3);
    for row in 0..height {
        let start = row * bytes_per_row;
        let line = &data[start..start + row_size];
        for macro_pixel in line.chunks_exact(MACRO_PIXEL_SIZE) {
            let u = macro_pixel[0];
            let v = macro_pixel[2];
            rgb.extend_from_slice(&yuv_to_rgb(macro_pixel[1], u, v));
            rgb.extend_from_slice(&yuv_to_rgb(macro_pixel[3], u, v));
        }
    }

    let (Ok(image_width), Ok(image_height)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(ConversionError::EmptyFrame(resolution));
    };
    RgbImage::from_raw(image_width, image_height, rgb).ok_or(ConversionError::EmptyFrame(resolution))
}

/// BT.601 full range.
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;

    let r = y + 1.402 * v;
    let g = y - 0.344_136 * u - 0.714_136 * v;
    let b = y + 1.772 * u;
    [to_u8(r), to_u8(g), to_u8(b)]
}

fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
