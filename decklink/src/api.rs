use std::{ffi::OsStr, ptr, sync::Arc};

use libloading::Library;
use log::debug;

use crate::{DeckLink, DeckLinkError, ffi};

/// Library names tried by [`DeckLinkApi::load`], in order.
pub const DEFAULT_LIBRARY_PATHS: &[&str] = &["libDeckLinkAPI.so", "/usr/lib/libDeckLinkAPI.so"];

/// Handle to the runtime-loaded `libDeckLinkAPI.so`.
///
/// Every object created through it keeps the library loaded, so it is safe to
/// drop the api handle before devices or frames.
pub struct DeckLinkApi {
    library: Arc<Library>,
    create_iterator: ffi::CreateIteratorFn,
}

impl DeckLinkApi {
    pub fn load() -> Result<Self, DeckLinkError> {
        let mut last_err = None;
        for path in DEFAULT_LIBRARY_PATHS {
            match Self::load_from(path) {
                Ok(api) => return Ok(api),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or(DeckLinkError::IteratorUnavailable))
    }

    pub fn load_from<P: AsRef<OsStr>>(path: P) -> Result<Self, DeckLinkError> {
        let library = unsafe { Library::new(path.as_ref()) }.map_err(DeckLinkError::LibraryNotFound)?;

        let mut last_err = None;
        for symbol in ffi::CREATE_ITERATOR_SYMBOLS {
            match unsafe { library.get::<ffi::CreateIteratorFn>(symbol) } {
                Ok(create_iterator) => {
                    let create_iterator = *create_iterator;
                    debug!(
                        "Loaded DeckLink API from {:?} ({})",
                        path.as_ref(),
                        String::from_utf8_lossy(&symbol[..symbol.len() - 1])
                    );
                    return Ok(Self {
                        library: Arc::new(library),
                        create_iterator,
                    });
                }
                Err(err) => last_err = Some(err),
            }
        }
        match last_err {
            Some(err) => Err(DeckLinkError::MissingIteratorFactory(err)),
            None => Err(DeckLinkError::IteratorUnavailable),
        }
    }

    /// Enumerates all DeckLink devices in the order reported by the driver.
    pub fn decklinks(&self) -> Result<Vec<DeckLink>, DeckLinkError> {
        let iterator = unsafe { (self.create_iterator)() };
        if iterator.is_null() {
            return Err(DeckLinkError::IteratorUnavailable);
        }

        let mut decklinks = Vec::new();
        loop {
            let mut raw = ptr::null_mut();
            let result = unsafe { ((*(*iterator).vtbl).Next)(iterator, &mut raw) };
            if result != ffi::S_OK || raw.is_null() {
                break;
            }
            decklinks.push(unsafe { DeckLink::from_raw(raw, self.library.clone()) });
        }
        unsafe { ffi::release(iterator) };

        Ok(decklinks)
    }
}
