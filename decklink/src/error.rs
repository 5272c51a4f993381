use crate::ffi::HRESULT;

#[derive(Debug, thiserror::Error)]
pub enum DeckLinkError {
    #[error("DeckLink SDK not found. Please install the Blackmagic Desktop Video SDK.")]
    LibraryNotFound(#[source] libloading::Error),

    #[error("DeckLink library does not export an iterator factory.")]
    MissingIteratorFactory(#[source] libloading::Error),

    #[error("Failed to create DeckLink iterator. Is the Desktop Video driver loaded?")]
    IteratorUnavailable,

    #[error("DeckLink device does not support the requested interface (result {0:#010x}).")]
    InterfaceNotSupported(HRESULT),

    #[error("DeckLink call {call} failed with result {result:#010x}.")]
    CallFailed { call: &'static str, result: HRESULT },

    #[error("DeckLink call {0} returned a null pointer.")]
    NullPointer(&'static str),
}

pub(crate) fn check(call: &'static str, result: HRESULT) -> Result<(), DeckLinkError> {
    match result {
        crate::ffi::S_OK => Ok(()),
        result => Err(DeckLinkError::CallFailed { call, result }),
    }
}
