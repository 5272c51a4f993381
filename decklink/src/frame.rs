use std::{ffi::c_void, ptr, slice, sync::Arc};

use libloading::Library;

use crate::{DeckLinkError, FrameFlags, PixelFormat, error::check, ffi};

/// Reference to a captured frame. The SDK buffer is returned to the driver
/// once every clone is dropped.
pub struct VideoInputFrame {
    raw: *mut ffi::IDeckLinkVideoInputFrame,
    library: Arc<Library>,
}

unsafe impl Send for VideoInputFrame {}
unsafe impl Sync for VideoInputFrame {}

impl VideoInputFrame {
    /// Takes a new reference to a frame borrowed from an SDK callback.
    ///
    /// # Safety
    /// `raw` must be a valid, non-null `IDeckLinkVideoInputFrame` pointer.
    pub(crate) unsafe fn retain(raw: *mut ffi::IDeckLinkVideoInputFrame, library: Arc<Library>) -> Self {
        unsafe { ffi::add_ref(raw) };
        Self {
            raw,
            library,
        }
    }

    pub fn width(&self) -> usize {
        let width = unsafe { ((*(*self.raw).vtbl).GetWidth)(self.raw) };
        width.max(0) as usize
    }

    pub fn height(&self) -> usize {
        let height = unsafe { ((*(*self.raw).vtbl).GetHeight)(self.raw) };
        height.max(0) as usize
    }

    pub fn bytes_per_row(&self) -> usize {
        let row_bytes = unsafe { ((*(*self.raw).vtbl).GetRowBytes)(self.raw) };
        row_bytes.max(0) as usize
    }

    pub fn pixel_format(&self) -> PixelFormat {
        PixelFormat::from_raw(unsafe { ((*(*self.raw).vtbl).GetPixelFormat)(self.raw) })
    }

    pub fn flags(&self) -> FrameFlags {
        FrameFlags::from(unsafe { ((*(*self.raw).vtbl).GetFlags)(self.raw) })
    }

    /// Raw sample buffer, `bytes_per_row * height` bytes long.
    pub fn bytes(&self) -> Result<&[u8], DeckLinkError> {
        let mut buffer: *mut c_void = ptr::null_mut();
        let result = unsafe { ((*(*self.raw).vtbl).GetBytes)(self.raw, &mut buffer) };
        check("IDeckLinkVideoInputFrame::GetBytes", result)?;
        if buffer.is_null() {
            return Err(DeckLinkError::NullPointer("IDeckLinkVideoInputFrame::GetBytes"));
        }
        let len = self.bytes_per_row() * self.height();
        Ok(unsafe { slice::from_raw_parts(buffer as *const u8, len) })
    }
}

impl Clone for VideoInputFrame {
    fn clone(&self) -> Self {
        unsafe { Self::retain(self.raw, self.library.clone()) }
    }
}

impl Drop for VideoInputFrame {
    fn drop(&mut self) {
        unsafe { ffi::release(self.raw) };
    }
}

impl std::fmt::Debug for VideoInputFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoInputFrame")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("bytes_per_row", &self.bytes_per_row())
            .field("pixel_format", &self.pixel_format())
            .finish()
    }
}
