use std::marker::PhantomData;

use anyhow::Result;

/// A named, cross-process shared record.
///
/// `attach` creates the named segment if it does not exist yet
/// (default-initialized) and opens it otherwise. Access is scoped: the
/// mapping is acquired on each call and released before it returns, so the
/// record is never held across unrelated work.
///
/// `T` must be a fixed-layout (`#[repr(C)]`), plain-old-data record; other
/// processes read the same bytes. Records are copied out of and back into the
/// segment on each access rather than referenced in place.
pub struct HostSharedData<T: Copy + Default> {
    segment: backend::Segment,
    _marker: PhantomData<T>,
}

impl<T: Copy + Default> HostSharedData<T> {
    /// Attaches to the named segment, creating it if necessary.
    ///
    /// Failure here is fatal to the caller: there is no fallback store for
    /// process-identity state.
    pub fn attach(name: &str) -> Result<Self> {
        let (segment, created) = backend::Segment::attach(name, size_of::<T>())?;
        let data = Self {
            segment,
            _marker: PhantomData,
        };

        if created {
            data.update(|value| *value = T::default())?;
        }

        Ok(data)
    }

    /// Reads the record under a scoped mapping.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        self.segment.with_bytes(|ptr| {
            // SAFETY: the segment is at least size_of::<T>() bytes and T is
            // plain old data, so reading a copy of it is always valid.
            let value = unsafe { std::ptr::read_unaligned(ptr.cast::<T>()) };
            f(&value)
        })
    }

    /// Read-modify-writes the record under a scoped mapping.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        self.segment.with_bytes(|ptr| {
            // SAFETY: as in `read`; the modified copy is written back before
            // the mapping is released.
            unsafe {
                let mut value = std::ptr::read_unaligned(ptr.cast::<T>());
                let result = f(&mut value);
                std::ptr::write_unaligned(ptr.cast::<T>(), value);
                result
            }
        })
    }
}

#[cfg(windows)]
mod backend {
    use anyhow::{Result, bail};
    use windows::Win32::Foundation::{
        CloseHandle, ERROR_ALREADY_EXISTS, GetLastError, HANDLE, INVALID_HANDLE_VALUE,
    };
    use windows::Win32::System::Memory::{
        CreateFileMappingW, FILE_MAP_ALL_ACCESS, MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile,
        PAGE_READWRITE, UnmapViewOfFile,
    };
    use windows::core::HSTRING;

    /// A named page-file-backed file mapping.
    pub(super) struct Segment {
        mapping: HANDLE,
        len: usize,
    }

    // SAFETY: the mapping handle is only used for MapViewOfFile, which is
    // safe to call from any thread.
    unsafe impl Send for Segment {}
    unsafe impl Sync for Segment {}

    impl Segment {
        /// Creates or opens the named mapping. The second return value is
        /// true when this call created the segment.
        pub(super) fn attach(name: &str, len: usize) -> Result<(Self, bool)> {
            // SAFETY: INVALID_HANDLE_VALUE requests a page-file-backed
            // mapping; the name and size are well-formed.
            let mapping = unsafe {
                CreateFileMappingW(
                    INVALID_HANDLE_VALUE,
                    None,
                    PAGE_READWRITE,
                    0,
                    len as u32,
                    &HSTRING::from(name),
                )
            }?;

            // SAFETY: immediately follows the creation call on this thread.
            let created = unsafe { GetLastError() } != ERROR_ALREADY_EXISTS;

            Ok((Self { mapping, len }, created))
        }

        /// Maps a view, hands its base to `f`, and unmaps it on every exit
        /// path.
        pub(super) fn with_bytes<R>(&self, f: impl FnOnce(*mut u8) -> R) -> Result<R> {
            struct View(MEMORY_MAPPED_VIEW_ADDRESS);

            impl Drop for View {
                fn drop(&mut self) {
                    // SAFETY: the address came from MapViewOfFile and is
                    // unmapped exactly once.
                    let _ = unsafe { UnmapViewOfFile(self.0) };
                }
            }

            // SAFETY: the mapping handle is valid for the lifetime of self.
            let view = unsafe { MapViewOfFile(self.mapping, FILE_MAP_ALL_ACCESS, 0, 0, self.len) };
            if view.Value.is_null() {
                bail!("failed to map view of shared segment");
            }

            let view = View(view);
            Ok(f(view.0.Value.cast()))
        }
    }

    impl Drop for Segment {
        fn drop(&mut self) {
            // SAFETY: the handle came from CreateFileMappingW and is closed
            // exactly once.
            let _ = unsafe { CloseHandle(self.mapping) };
        }
    }
}

#[cfg(not(windows))]
mod backend {
    use std::collections::HashMap;
    use std::sync::{Arc, LazyLock, Mutex};

    use anyhow::Result;

    /// Process-local stand-in for the Windows named file mapping, used for
    /// non-Windows builds and tests. Segments live for the process lifetime,
    /// matching the "persists beyond the shim" contract within one process.
    static SEGMENTS: LazyLock<Mutex<HashMap<String, Arc<Mutex<Box<[u8]>>>>>> =
        LazyLock::new(|| Mutex::new(HashMap::new()));

    pub(super) struct Segment {
        bytes: Arc<Mutex<Box<[u8]>>>,
    }

    impl Segment {
        pub(super) fn attach(name: &str, len: usize) -> Result<(Self, bool)> {
            let mut segments = SEGMENTS.lock().unwrap();
            let created = !segments.contains_key(name);
            let bytes = segments
                .entry(name.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(vec![0u8; len].into_boxed_slice())))
                .clone();

            Ok((Self { bytes }, created))
        }

        pub(super) fn with_bytes<R>(&self, f: impl FnOnce(*mut u8) -> R) -> Result<R> {
            let mut bytes = self.bytes.lock().unwrap();
            Ok(f(bytes.as_mut_ptr()))
        }
    }
}
