//! Raw layouts of the DeckLink COM-style interfaces on Linux.
//!
//! Only the vtable slots used by this crate are typed, remaining slots are
//! kept as opaque pointers so offsets stay correct. Layouts follow the
//! Desktop Video SDK 12.x headers.

#![allow(non_snake_case)]

use std::ffi::{c_char, c_long, c_void};

pub type HRESULT = i32;
pub type ULONG = u32;

pub const S_OK: HRESULT = 0;
pub const E_NOINTERFACE: HRESULT = 0x8000_0004_u32 as i32;
pub const E_POINTER: HRESULT = 0x8000_0005_u32 as i32;
pub const E_FAIL: HRESULT = 0x8000_0008_u32 as i32;

/// `REFIID` on Linux is a 16 byte struct passed by value.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct REFIID(pub [u8; 16]);

pub const IID_IUNKNOWN: REFIID = REFIID([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
]);

/* C21CDB6E-F414-46E4-A636-80A566E0ED37 */
pub const IID_IDECKLINK_INPUT: REFIID = REFIID([
    0xC2, 0x1C, 0xDB, 0x6E, 0xF4, 0x14, 0x46, 0xE4, 0xA6, 0x36, 0x80, 0xA5, 0x66, 0xE0, 0xED, 0x37,
]);

/* C6FCE4C9-C4E4-4047-82FB-5D238232A902 */
pub const IID_IDECKLINK_INPUT_CALLBACK: REFIID = REFIID([
    0xC6, 0xFC, 0xE4, 0xC9, 0xC4, 0xE4, 0x40, 0x47, 0x82, 0xFB, 0x5D, 0x23, 0x82, 0x32, 0xA9, 0x02,
]);

pub type BMDDisplayMode = u32;
pub type BMDPixelFormat = u32;
pub type BMDVideoInputFlags = u32;
pub type BMDFrameFlags = u32;
pub type BMDVideoInputFormatChangedEvents = u32;
pub type BMDDetectedVideoInputFormatFlags = u32;

pub const fn fourcc(code: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*code)
}

pub const BMD_MODE_NTSC: BMDDisplayMode = fourcc(b"ntsc");
pub const BMD_MODE_PAL: BMDDisplayMode = fourcc(b"pal ");
pub const BMD_MODE_HD720P50: BMDDisplayMode = fourcc(b"hp50");
pub const BMD_MODE_HD720P5994: BMDDisplayMode = fourcc(b"hp59");
pub const BMD_MODE_HD720P60: BMDDisplayMode = fourcc(b"hp60");
pub const BMD_MODE_HD1080P2997: BMDDisplayMode = fourcc(b"Hp29");
pub const BMD_MODE_HD1080P30: BMDDisplayMode = fourcc(b"Hp30");
pub const BMD_MODE_HD1080I50: BMDDisplayMode = fourcc(b"Hi50");
pub const BMD_MODE_HD1080I5994: BMDDisplayMode = fourcc(b"Hi59");
pub const BMD_MODE_HD1080I6000: BMDDisplayMode = fourcc(b"Hi60");

pub const BMD_FORMAT_8BIT_YUV: BMDPixelFormat = fourcc(b"2vuy");
pub const BMD_FORMAT_10BIT_YUV: BMDPixelFormat = fourcc(b"v210");
pub const BMD_FORMAT_8BIT_ARGB: BMDPixelFormat = 32;
pub const BMD_FORMAT_8BIT_BGRA: BMDPixelFormat = fourcc(b"BGRA");
pub const BMD_FORMAT_10BIT_RGB: BMDPixelFormat = fourcc(b"r210");

pub const BMD_VIDEO_INPUT_ENABLE_FORMAT_DETECTION: BMDVideoInputFlags = 1 << 0;

pub const BMD_FRAME_FLIP_VERTICAL: BMDFrameFlags = 1 << 0;
pub const BMD_FRAME_CAPTURED_AS_PSF: BMDFrameFlags = 1 << 30;
pub const BMD_FRAME_HAS_NO_INPUT_SOURCE: BMDFrameFlags = 1 << 31;

pub const BMD_VIDEO_INPUT_DISPLAY_MODE_CHANGED: BMDVideoInputFormatChangedEvents = 1 << 0;
pub const BMD_VIDEO_INPUT_FIELD_DOMINANCE_CHANGED: BMDVideoInputFormatChangedEvents = 1 << 1;
pub const BMD_VIDEO_INPUT_COLORSPACE_CHANGED: BMDVideoInputFormatChangedEvents = 1 << 2;

pub const BMD_DETECTED_VIDEO_INPUT_YCBCR422: BMDDetectedVideoInputFormatFlags = 1 << 0;
pub const BMD_DETECTED_VIDEO_INPUT_RGB444: BMDDetectedVideoInputFormatFlags = 1 << 1;
pub const BMD_DETECTED_VIDEO_INPUT_DUAL_STREAM_3D: BMDDetectedVideoInputFormatFlags = 1 << 2;
pub const BMD_DETECTED_VIDEO_INPUT_12BIT_DEPTH: BMDDetectedVideoInputFormatFlags = 1 << 3;
pub const BMD_DETECTED_VIDEO_INPUT_10BIT_DEPTH: BMDDetectedVideoInputFormatFlags = 1 << 4;
pub const BMD_DETECTED_VIDEO_INPUT_8BIT_DEPTH: BMDDetectedVideoInputFormatFlags = 1 << 5;

/// Exported by `libDeckLinkAPI.so`, returns null when the driver is not loaded.
pub type CreateIteratorFn = unsafe extern "C" fn() -> *mut IDeckLinkIterator;

pub const CREATE_ITERATOR_SYMBOLS: &[&[u8]] = &[
    b"CreateDeckLinkIteratorInstance_0004\0",
    b"CreateDeckLinkIteratorInstance_0003\0",
    b"CreateDeckLinkIteratorInstance_0002\0",
];

#[repr(C)]
pub struct IUnknownVtbl {
    pub QueryInterface:
        unsafe extern "C" fn(this: *mut c_void, iid: REFIID, ppv: *mut *mut c_void) -> HRESULT,
    pub AddRef: unsafe extern "C" fn(this: *mut c_void) -> ULONG,
    pub Release: unsafe extern "C" fn(this: *mut c_void) -> ULONG,
}

#[repr(C)]
pub struct IDeckLinkIterator {
    pub vtbl: *const IDeckLinkIteratorVtbl,
}

#[repr(C)]
pub struct IDeckLinkIteratorVtbl {
    pub base: IUnknownVtbl,
    pub Next: unsafe extern "C" fn(
        this: *mut IDeckLinkIterator,
        decklink: *mut *mut IDeckLinkInterface,
    ) -> HRESULT,
}

#[repr(C)]
pub struct IDeckLinkInterface {
    pub vtbl: *const IDeckLinkVtbl,
}

#[repr(C)]
pub struct IDeckLinkVtbl {
    pub base: IUnknownVtbl,
    pub GetModelName:
        unsafe extern "C" fn(this: *mut IDeckLinkInterface, name: *mut *const c_char) -> HRESULT,
    pub GetDisplayName:
        unsafe extern "C" fn(this: *mut IDeckLinkInterface, name: *mut *const c_char) -> HRESULT,
}

#[repr(C)]
pub struct IDeckLinkInput {
    pub vtbl: *const IDeckLinkInputVtbl,
}

#[repr(C)]
pub struct IDeckLinkInputVtbl {
    pub base: IUnknownVtbl,
    pub DoesSupportVideoMode: *const c_void,
    pub GetDisplayMode: *const c_void,
    pub GetDisplayModeIterator: *const c_void,
    pub SetScreenPreviewCallback: *const c_void,
    pub EnableVideoInput: unsafe extern "C" fn(
        this: *mut IDeckLinkInput,
        display_mode: BMDDisplayMode,
        pixel_format: BMDPixelFormat,
        flags: BMDVideoInputFlags,
    ) -> HRESULT,
    pub DisableVideoInput: unsafe extern "C" fn(this: *mut IDeckLinkInput) -> HRESULT,
    pub GetAvailableVideoFrameCount: *const c_void,
    pub SetVideoInputFrameMemoryAllocator: *const c_void,
    pub EnableAudioInput: *const c_void,
    pub DisableAudioInput: *const c_void,
    pub GetAvailableAudioSampleFrameCount: *const c_void,
    pub StartStreams: unsafe extern "C" fn(this: *mut IDeckLinkInput) -> HRESULT,
    pub StopStreams: unsafe extern "C" fn(this: *mut IDeckLinkInput) -> HRESULT,
    pub PauseStreams: *const c_void,
    pub FlushStreams: *const c_void,
    pub SetCallback: unsafe extern "C" fn(
        this: *mut IDeckLinkInput,
        callback: *mut IDeckLinkInputCallback,
    ) -> HRESULT,
}

#[repr(C)]
pub struct IDeckLinkDisplayMode {
    pub vtbl: *const IDeckLinkDisplayModeVtbl,
}

#[repr(C)]
pub struct IDeckLinkDisplayModeVtbl {
    pub base: IUnknownVtbl,
    pub GetName: *const c_void,
    pub GetDisplayMode: unsafe extern "C" fn(this: *mut IDeckLinkDisplayMode) -> BMDDisplayMode,
    pub GetWidth: *const c_void,
    pub GetHeight: *const c_void,
}

#[repr(C)]
pub struct IDeckLinkVideoInputFrame {
    pub vtbl: *const IDeckLinkVideoInputFrameVtbl,
}

#[repr(C)]
pub struct IDeckLinkVideoInputFrameVtbl {
    pub base: IUnknownVtbl,
    pub GetWidth: unsafe extern "C" fn(this: *mut IDeckLinkVideoInputFrame) -> c_long,
    pub GetHeight: unsafe extern "C" fn(this: *mut IDeckLinkVideoInputFrame) -> c_long,
    pub GetRowBytes: unsafe extern "C" fn(this: *mut IDeckLinkVideoInputFrame) -> c_long,
    pub GetPixelFormat: unsafe extern "C" fn(this: *mut IDeckLinkVideoInputFrame) -> BMDPixelFormat,
    pub GetFlags: unsafe extern "C" fn(this: *mut IDeckLinkVideoInputFrame) -> BMDFrameFlags,
    pub GetBytes:
        unsafe extern "C" fn(this: *mut IDeckLinkVideoInputFrame, buffer: *mut *mut c_void) -> HRESULT,
}

/// Callback object implemented on the Rust side, see `input_callback.rs`.
#[repr(C)]
pub struct IDeckLinkInputCallback {
    pub vtbl: *const IDeckLinkInputCallbackVtbl,
}

#[repr(C)]
pub struct IDeckLinkInputCallbackVtbl {
    pub base: IUnknownVtbl,
    pub VideoInputFormatChanged: unsafe extern "C" fn(
        this: *mut IDeckLinkInputCallback,
        events: BMDVideoInputFormatChangedEvents,
        display_mode: *mut IDeckLinkDisplayMode,
        flags: BMDDetectedVideoInputFormatFlags,
    ) -> HRESULT,
    pub VideoInputFrameArrived: unsafe extern "C" fn(
        this: *mut IDeckLinkInputCallback,
        video_frame: *mut IDeckLinkVideoInputFrame,
        audio_packet: *mut c_void,
    ) -> HRESULT,
    // virtual destructor slots (complete + deleting), never called by the SDK
    pub Destructor: unsafe extern "C" fn(this: *mut IDeckLinkInputCallback),
    pub DeletingDestructor: unsafe extern "C" fn(this: *mut IDeckLinkInputCallback),
}

/// Calls `Release` on any interface pointer.
///
/// # Safety
/// `object` must be a valid COM interface pointer.
pub unsafe fn release<T>(object: *mut T) -> ULONG {
    unsafe {
        let vtbl = *(object as *mut *const IUnknownVtbl);
        ((*vtbl).Release)(object as *mut c_void)
    }
}

/// Calls `AddRef` on any interface pointer.
///
/// # Safety
/// `object` must be a valid COM interface pointer.
pub unsafe fn add_ref<T>(object: *mut T) -> ULONG {
    unsafe {
        let vtbl = *(object as *mut *const IUnknownVtbl);
        ((*vtbl).AddRef)(object as *mut c_void)
    }
}

/// Calls `QueryInterface` on any interface pointer.
///
/// # Safety
/// `object` must be a valid COM interface pointer.
pub unsafe fn query_interface<T, U>(object: *mut T, iid: REFIID) -> Result<*mut U, HRESULT> {
    unsafe {
        let vtbl = *(object as *mut *const IUnknownVtbl);
        let mut result: *mut c_void = std::ptr::null_mut();
        let hr = ((*vtbl).QueryInterface)(object as *mut c_void, iid, &mut result);
        if hr != S_OK || result.is_null() {
            return Err(hr);
        }
        Ok(result as *mut U)
    }
}
