use std::{
    ffi::c_void,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};

use libloading::Library;

use crate::{
    DetectedVideoInputFormatFlags, DisplayModeType, VideoInputFormatChangedEvents,
    VideoInputFrame, ffi,
};

pub enum InputCallbackResult {
    Ok,
    Failure,
}

/// Receives notifications from the SDK capture thread.
pub trait InputCallback: Send + Sync {
    fn video_input_frame_arrived(&self, video_frame: Option<VideoInputFrame>)
    -> InputCallbackResult;

    fn video_input_format_changed(
        &self,
        events: VideoInputFormatChangedEvents,
        display_mode: DisplayModeType,
        flags: DetectedVideoInputFormatFlags,
    ) -> InputCallbackResult;
}

/// `IDeckLinkInputCallback` implementation handed to the SDK.
#[repr(C)]
pub(crate) struct CallbackObject {
    iface: ffi::IDeckLinkInputCallback,
    ref_count: AtomicU32,
    library: Arc<Library>,
    callback: Box<dyn InputCallback>,
}

static CALLBACK_VTBL: ffi::IDeckLinkInputCallbackVtbl = ffi::IDeckLinkInputCallbackVtbl {
    base: ffi::IUnknownVtbl {
        QueryInterface: query_interface,
        AddRef: add_ref,
        Release: release,
    },
    VideoInputFormatChanged: video_input_format_changed,
    VideoInputFrameArrived: video_input_frame_arrived,
    Destructor: destructor,
    DeletingDestructor: destructor,
};

impl CallbackObject {
    /// Returns an object with a reference count of one, owned by the caller.
    pub(crate) fn new(callback: Box<dyn InputCallback>, library: Arc<Library>) -> *mut Self {
        Box::into_raw(Box::new(Self {
            iface: ffi::IDeckLinkInputCallback {
                vtbl: &CALLBACK_VTBL,
            },
            ref_count: AtomicU32::new(1),
            library,
            callback,
        }))
    }
}

unsafe extern "C" fn query_interface(
    this: *mut c_void,
    iid: ffi::REFIID,
    ppv: *mut *mut c_void,
) -> ffi::HRESULT {
    if ppv.is_null() {
        return ffi::E_POINTER;
    }
    if iid == ffi::IID_IUNKNOWN || iid == ffi::IID_IDECKLINK_INPUT_CALLBACK {
        unsafe {
            add_ref(this);
            *ppv = this;
        }
        ffi::S_OK
    } else {
        unsafe { *ppv = std::ptr::null_mut() };
        ffi::E_NOINTERFACE
    }
}

unsafe extern "C" fn add_ref(this: *mut c_void) -> ffi::ULONG {
    let object = unsafe { &*(this as *const CallbackObject) };
    object.ref_count.fetch_add(1, Ordering::AcqRel) + 1
}

unsafe extern "C" fn release(this: *mut c_void) -> ffi::ULONG {
    let remaining = {
        let object = unsafe { &*(this as *const CallbackObject) };
        object.ref_count.fetch_sub(1, Ordering::AcqRel) - 1
    };
    if remaining == 0 {
        drop(unsafe { Box::from_raw(this as *mut CallbackObject) });
    }
    remaining
}

unsafe extern "C" fn video_input_format_changed(
    this: *mut ffi::IDeckLinkInputCallback,
    events: ffi::BMDVideoInputFormatChangedEvents,
    display_mode: *mut ffi::IDeckLinkDisplayMode,
    flags: ffi::BMDDetectedVideoInputFormatFlags,
) -> ffi::HRESULT {
    let object = unsafe { &*(this as *const CallbackObject) };
    let display_mode = match display_mode.is_null() {
        true => DisplayModeType::Unknown(0),
        false => DisplayModeType::from_raw(unsafe {
            ((*(*display_mode).vtbl).GetDisplayMode)(display_mode)
        }),
    };
    let result =
        object
            .callback
            .video_input_format_changed(events.into(), display_mode, flags.into());
    into_hresult(result)
}

unsafe extern "C" fn video_input_frame_arrived(
    this: *mut ffi::IDeckLinkInputCallback,
    video_frame: *mut ffi::IDeckLinkVideoInputFrame,
    _audio_packet: *mut c_void,
) -> ffi::HRESULT {
    let object = unsafe { &*(this as *const CallbackObject) };
    let video_frame = match video_frame.is_null() {
        true => None,
        false => Some(unsafe { VideoInputFrame::retain(video_frame, object.library.clone()) }),
    };
    into_hresult(object.callback.video_input_frame_arrived(video_frame))
}

unsafe extern "C" fn destructor(_this: *mut ffi::IDeckLinkInputCallback) {}

fn into_hresult(result: InputCallbackResult) -> ffi::HRESULT {
    match result {
        InputCallbackResult::Ok => ffi::S_OK,
        InputCallbackResult::Failure => ffi::E_FAIL,
    }
}

#[cfg(test)]
mod tests {
    use std::{
        ptr,
        sync::{
            Mutex,
            atomic::{AtomicBool, Ordering},
        },
    };

    use super::*;

    #[derive(Default)]
    struct Calls {
        frames: Mutex<Vec<bool>>,
        format_changes: Mutex<Vec<DisplayModeType>>,
        dropped: AtomicBool,
    }

    struct RecordingCallback(Arc<Calls>);

    impl InputCallback for RecordingCallback {
        fn video_input_frame_arrived(
            &self,
            video_frame: Option<VideoInputFrame>,
        ) -> InputCallbackResult {
            self.0.frames.lock().unwrap().push(video_frame.is_some());
            InputCallbackResult::Failure
        }

        fn video_input_format_changed(
            &self,
            _events: VideoInputFormatChangedEvents,
            display_mode: DisplayModeType,
            _flags: DetectedVideoInputFormatFlags,
        ) -> InputCallbackResult {
            self.0.format_changes.lock().unwrap().push(display_mode);
            InputCallbackResult::Ok
        }
    }

    impl Drop for RecordingCallback {
        fn drop(&mut self) {
            self.0.dropped.store(true, Ordering::SeqCst);
        }
    }

    fn new_object() -> (*mut CallbackObject, Arc<Calls>) {
        let library: Library = libloading::os::unix::Library::this().into();
        let calls = Arc::new(Calls::default());
        let object = CallbackObject::new(
            Box::new(RecordingCallback(calls.clone())),
            Arc::new(library),
        );
        (object, calls)
    }

    #[test]
    fn test_reference_counting_frees_on_last_release() {
        let (object, calls) = new_object();

        unsafe {
            assert_eq!(ffi::add_ref(object), 2);
            assert_eq!(ffi::release(object), 1);
            assert!(!calls.dropped.load(Ordering::SeqCst));
            assert_eq!(ffi::release(object), 0);
        }
        assert!(calls.dropped.load(Ordering::SeqCst));
        assert_eq!(Arc::strong_count(&calls), 1);
    }

    #[test]
    fn test_query_interface() {
        let (object, calls) = new_object();

        unsafe {
            let iface = ffi::query_interface::<_, ffi::IDeckLinkInputCallback>(
                object,
                ffi::IID_IDECKLINK_INPUT_CALLBACK,
            )
            .unwrap();
            assert_eq!(iface as *mut c_void, object as *mut c_void);

            let unknown =
                ffi::query_interface::<_, c_void>(object, ffi::IID_IUNKNOWN).unwrap();
            assert_eq!(unknown, object as *mut c_void);

            assert_eq!(
                ffi::query_interface::<_, c_void>(object, ffi::IID_IDECKLINK_INPUT),
                Err(ffi::E_NOINTERFACE)
            );

            let mut ppv = object as *mut c_void;
            let result = query_interface(object as *mut c_void, ffi::IID_IDECKLINK_INPUT, &mut ppv);
            assert_eq!(result, ffi::E_NOINTERFACE);
            assert!(ppv.is_null());

            assert_eq!(
                query_interface(object as *mut c_void, ffi::IID_IUNKNOWN, ptr::null_mut()),
                ffi::E_POINTER
            );

            // one reference from `new` plus one per successful query
            assert_eq!(ffi::release(object), 2);
            assert_eq!(ffi::release(object), 1);
            assert!(!calls.dropped.load(Ordering::SeqCst));
            assert_eq!(ffi::release(object), 0);
        }
        assert!(calls.dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_vtable_dispatches_to_callback() {
        let (object, calls) = new_object();
        let iface = object as *mut ffi::IDeckLinkInputCallback;

        unsafe {
            let vtbl = &*(*iface).vtbl;
            let result = (vtbl.VideoInputFrameArrived)(iface, ptr::null_mut(), ptr::null_mut());
            assert_eq!(result, ffi::E_FAIL);

            let result = (vtbl.VideoInputFormatChanged)(
                iface,
                ffi::BMD_VIDEO_INPUT_DISPLAY_MODE_CHANGED,
                ptr::null_mut(),
                ffi::BMD_DETECTED_VIDEO_INPUT_YCBCR422,
            );
            assert_eq!(result, ffi::S_OK);

            ffi::release(object);
        }

        assert_eq!(*calls.frames.lock().unwrap(), vec![false]);
        assert_eq!(
            *calls.format_changes.lock().unwrap(),
            vec![DisplayModeType::Unknown(0)]
        );
    }
}
