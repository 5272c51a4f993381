use std::{
    ffi::{CStr, c_char, c_void},
    ptr,
    sync::{Arc, Mutex},
};

use libloading::Library;
use log::{debug, warn};

use crate::{
    DeckLinkError, DisplayModeType, InputCallback, PixelFormat, VideoInputFlags,
    error::check,
    ffi,
    input_callback::CallbackObject,
};

/// A single DeckLink device returned by the iterator.
pub struct DeckLink {
    raw: *mut ffi::IDeckLinkInterface,
    library: Arc<Library>,
}

// DeckLink interfaces are reference counted and safe to call from any thread.
unsafe impl Send for DeckLink {}

impl DeckLink {
    /// # Safety
    /// `raw` must be a valid `IDeckLink` pointer with one reference owned by the caller.
    pub(crate) unsafe fn from_raw(raw: *mut ffi::IDeckLinkInterface, library: Arc<Library>) -> Self {
        Self { raw, library }
    }

    pub fn display_name(&self) -> Result<String, DeckLinkError> {
        let mut name: *const c_char = ptr::null();
        let result = unsafe { ((*(*self.raw).vtbl).GetDisplayName)(self.raw, &mut name) };
        check("IDeckLink::GetDisplayName", result)?;
        unsafe { take_sdk_string(name, "IDeckLink::GetDisplayName") }
    }

    pub fn model_name(&self) -> Result<String, DeckLinkError> {
        let mut name: *const c_char = ptr::null();
        let result = unsafe { ((*(*self.raw).vtbl).GetModelName)(self.raw, &mut name) };
        check("IDeckLink::GetModelName", result)?;
        unsafe { take_sdk_string(name, "IDeckLink::GetModelName") }
    }

    pub fn input(&self) -> Result<Input, DeckLinkError> {
        let raw = unsafe {
            ffi::query_interface::<_, ffi::IDeckLinkInput>(self.raw, ffi::IID_IDECKLINK_INPUT)
        }
        .map_err(DeckLinkError::InterfaceNotSupported)?;
        Ok(Input {
            raw,
            callback: Mutex::new(None),
            library: self.library.clone(),
        })
    }
}

impl Drop for DeckLink {
    fn drop(&mut self) {
        unsafe { ffi::release(self.raw) };
    }
}

/// Strings returned by the Linux SDK are allocated with `malloc` and owned by the caller.
unsafe fn take_sdk_string(
    value: *const c_char,
    call: &'static str,
) -> Result<String, DeckLinkError> {
    if value.is_null() {
        return Err(DeckLinkError::NullPointer(call));
    }
    let result = unsafe { CStr::from_ptr(value) }.to_string_lossy().into_owned();
    unsafe { libc::free(value as *mut c_void) };
    Ok(result)
}

struct CallbackHandle(*mut CallbackObject);

unsafe impl Send for CallbackHandle {}

/// `IDeckLinkInput` interface of a device.
pub struct Input {
    raw: *mut ffi::IDeckLinkInput,
    callback: Mutex<Option<CallbackHandle>>,
    library: Arc<Library>,
}

unsafe impl Send for Input {}
unsafe impl Sync for Input {}

impl Input {
    pub fn enable_video(
        &self,
        mode: DisplayModeType,
        pixel_format: PixelFormat,
        flags: VideoInputFlags,
    ) -> Result<(), DeckLinkError> {
        debug!("Enabling video input mode={mode:?} pixel_format={pixel_format:?} flags={flags:?}");
        let result = unsafe {
            ((*(*self.raw).vtbl).EnableVideoInput)(
                self.raw,
                mode.into_raw(),
                pixel_format.into_raw(),
                flags.into_raw(),
            )
        };
        check("IDeckLinkInput::EnableVideoInput", result)
    }

    pub fn disable_video(&self) -> Result<(), DeckLinkError> {
        let result = unsafe { ((*(*self.raw).vtbl).DisableVideoInput)(self.raw) };
        check("IDeckLinkInput::DisableVideoInput", result)
    }

    pub fn start_streams(&self) -> Result<(), DeckLinkError> {
        let result = unsafe { ((*(*self.raw).vtbl).StartStreams)(self.raw) };
        check("IDeckLinkInput::StartStreams", result)
    }

    pub fn stop_streams(&self) -> Result<(), DeckLinkError> {
        let result = unsafe { ((*(*self.raw).vtbl).StopStreams)(self.raw) };
        check("IDeckLinkInput::StopStreams", result)
    }

    /// Registers the callback invoked from the SDK capture thread. Replaces
    /// any previously registered callback.
    pub fn set_callback(&self, callback: Box<dyn InputCallback>) -> Result<(), DeckLinkError> {
        let object = CallbackObject::new(callback, self.library.clone());
        let result = unsafe {
            ((*(*self.raw).vtbl).SetCallback)(self.raw, object as *mut ffi::IDeckLinkInputCallback)
        };
        if let Err(err) = check("IDeckLinkInput::SetCallback", result) {
            unsafe { ffi::release(object) };
            return Err(err);
        }

        let mut guard = self.callback.lock().unwrap_or_else(|err| err.into_inner());
        if let Some(CallbackHandle(previous)) = guard.replace(CallbackHandle(object)) {
            unsafe { ffi::release(previous) };
        }
        Ok(())
    }

    fn clear_callback(&self) {
        let mut guard = self.callback.lock().unwrap_or_else(|err| err.into_inner());
        if let Some(CallbackHandle(object)) = guard.take() {
            let result = unsafe { ((*(*self.raw).vtbl).SetCallback)(self.raw, ptr::null_mut()) };
            if let Err(err) = check("IDeckLinkInput::SetCallback", result) {
                warn!("Failed to unregister input callback: {err}");
            }
            unsafe { ffi::release(object) };
        }
    }
}

impl Drop for Input {
    fn drop(&mut self) {
        self.clear_callback();
        unsafe { ffi::release(self.raw) };
    }
}
