use std::io::{Read, Seek};
use std::sync::Arc;

use parking_lot::Mutex;

use super::TwoBitFile;
use crate::Result;

/// A [`TwoBitFile`] that can be cloned and shared between threads
///
/// Every call locks the container for its full duration, so seeks and reads on the
/// shared byte source never interleave and descriptors are populated at most once.
/// For read-heavy parallel workloads one container per worker thread avoids the
/// contention.
pub struct SharedTwoBitFile<R> {
    inner: Arc<Mutex<TwoBitFile<R>>>,
}
impl<R> Clone for SharedTwoBitFile<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
impl<R: Read + Seek> SharedTwoBitFile<R> {
    #[must_use]
    pub fn new(file: TwoBitFile<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(file)),
        }
    }

    /// See [`TwoBitFile::slice_of`]
    pub fn slice_of(&self, name: &str, start: i64, end: Option<i64>) -> Result<String> {
        self.inner.lock().slice_of(name, start, end)
    }

    /// See [`TwoBitFile::sequence_length`]
    pub fn sequence_length(&self, name: &str) -> Result<u32> {
        self.inner.lock().sequence_length(name)
    }

    #[must_use]
    pub fn sequence_names(&self) -> Vec<String> {
        self.inner.lock().sequence_names()
    }

    /// Runs `f` with exclusive access to the container
    pub fn with<T>(&self, f: impl FnOnce(&mut TwoBitFile<R>) -> T) -> T {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod testing {
    use std::io::Cursor;
    use std::thread;

    use super::*;
    use crate::fixtures::{file_bytes, RecordSpec};

    #[test]
    fn test_shared_across_threads() -> Result<()> {
        let bases = "ACGTTGCA".repeat(64);
        let bytes = file_bytes(
            &[
                ("one", RecordSpec::new(&bases)),
                ("two", RecordSpec::new(&bases[..300]).mask_blocks(&[(0, 300)])),
            ],
            false,
        );
        let shared = SharedTwoBitFile::new(TwoBitFile::new(Cursor::new(bytes))?);

        thread::scope(|scope| {
            let workers: Vec<_> = (0..4)
                .map(|worker| {
                    let shared = shared.clone();
                    let bases = &bases;
                    scope.spawn(move || -> Result<()> {
                        for step in 0..50i64 {
                            let start = (worker * 37 + step * 11) % 400;
                            let slice = shared.slice_of("one", start, Some(start + 64))?;
                            assert_eq!(slice, bases[start as usize..start as usize + 64]);
                            let masked = shared.slice_of("two", start % 200, Some(300))?;
                            assert_eq!(masked, bases[(start % 200) as usize..300].to_lowercase());
                        }
                        Ok(())
                    })
                })
                .collect();
            workers
                .into_iter()
                .try_for_each(|w| w.join().expect("worker panicked"))
        })?;

        assert_eq!(shared.with(|tb| tb.num_cached()), 2);
        assert_eq!(shared.sequence_length("two")?, 300);
        assert_eq!(shared.sequence_names(), ["one", "two"]);
        Ok(())
    }
}
