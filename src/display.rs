use image::RgbImage;
use minifb::{Key, WindowOptions};
use tracing::debug;

use crate::{
    config::DisplayConfig,
    error::{ConversionError, DisplayError, FrameError},
    frame::Resolution,
};

/// On-screen target with a size fixed at creation.
pub trait DisplaySurface {
    fn resolution(&self) -> Resolution;

    /// Window closed or quit key pressed.
    fn should_close(&self) -> bool;

    /// Shows `frame` and processes pending window events.
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError>;

    /// Processes pending window events, keeping the last presented image.
    fn pump_events(&mut self);
}

/// `0RGB` pixels, one `u32` per pixel, no row padding.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    resolution: Resolution,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            pixels: vec![0; resolution.width * resolution.height],
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn draw_rgb(&mut self, image: &RgbImage) -> Result<(), FrameError> {
        let actual = Resolution {
            width: image.width() as usize,
            height: image.height() as usize,
        };
        self.ensure_resolution(actual)?;

        for (pixel, rgb) in self.pixels.iter_mut().zip(image.pixels()) {
            let [r, g, b] = rgb.0;
            *pixel = pack_rgb(r, g, b);
        }
        Ok(())
    }

    /// Copies a `BGRx` image with rows `bytes_per_row` apart.
    pub fn draw_bgrx(
        &mut self,
        resolution: Resolution,
        bytes_per_row: usize,
        data: &[u8],
    ) -> Result<(), FrameError> {
        self.ensure_resolution(resolution)?;

        let row_size = resolution.width * 4;
        if bytes_per_row < row_size {
            return Err(ConversionError::StrideTooSmall {
                bytes_per_row,
                required: row_size,
            }
            .into());
        }
        let required = bytes_per_row * (resolution.height - 1) + row_size;
        if data.len() < required {
            return Err(ConversionError::BufferTooSmall {
                actual: data.len(),
                required,
            }
            .into());
        }

        let rows = self.pixels.chunks_exact_mut(resolution.width);
        for (row, pixels) in rows.enumerate() {
            let start = row * bytes_per_row;
            let line = &data[start..start + row_size];
            for (pixel, bgrx) in pixels.iter_mut().zip(line.chunks_exact(4)) {
                *pixel = pack_rgb(bgrx[2], bgrx[1], bgrx[0]);
            }
        }
        Ok(())
    }

    fn ensure_resolution(&self, actual: Resolution) -> Result<(), FrameError> {
        if actual != self.resolution || actual.width == 0 || actual.height == 0 {
            return Err(FrameError::UnexpectedResolution {
                actual,
                expected: self.resolution,
            });
        }
        Ok(())
    }
}

fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Native window backed by `minifb`.
pub struct Window {
    window: minifb::Window,
    resolution: Resolution,
}

impl Window {
    pub fn open(config: &DisplayConfig) -> Result<Self, DisplayError> {
        let resolution = config.resolution;
        let window = minifb::Window::new(
            config.title,
            resolution.width,
            resolution.height,
            WindowOptions::default(),
        )
        .map_err(DisplayError::CreateWindow)?;
        debug!(title = config.title, %resolution, "Window opened");
        Ok(Self { window, resolution })
    }
}

impl DisplaySurface for Window {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn should_close(&self) -> bool {
        !self.window.is_open() || self.window.is_key_down(Key::Escape)
    }

    fn present(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let Resolution { width, height } = frame.resolution();
        self.window
            .update_with_buffer(frame.pixels(), width, height)
            .map_err(DisplayError::UpdateWindow)
    }

    fn pump_events(&mut self) {
        self.window.update();
    }
}
