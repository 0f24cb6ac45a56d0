//! Entropy sources.
//!
//! The C exports read through a process-wide *active* source. By default
//! that is the kernel; installing a [`SeededSource`] makes every read
//! reproducible.

pub mod seeded;

use crate::{GrndFlags, Result, sys};
use std::mem::MaybeUninit;
use std::sync::{Arc, RwLock};
use tracing::debug;

pub use seeded::SeededSource;

/// A provider of random bytes with `getrandom` semantics.
///
/// Sources write into possibly-uninitialized memory, since C callers of
/// `getrandom` pass fresh buffers.
///
/// # Safety
///
/// [`fill_uninit`](Self::fill_uninit) must only store initialized bytes in
/// `buf`, and on `Ok(n)` must have written `buf[..n]` with `n <= buf.len()`.
pub unsafe trait EntropySource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Write up to `buf.len()` bytes and return how many were written.
    fn fill_uninit(&self, buf: &mut [MaybeUninit<u8>], flags: GrndFlags) -> Result<usize>;

    /// [`fill_uninit`](Self::fill_uninit) over an initialized buffer.
    fn fill(&self, buf: &mut [u8], flags: GrndFlags) -> Result<usize> {
        // SAFETY: implementations only store initialized bytes.
        self.fill_uninit(unsafe { sys::slice_as_uninit_mut(buf) }, flags)
    }
}

/// The kernel entropy pool, via `getrandom(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KernelSource;

// SAFETY: the kernel only writes random bytes into the first `n` elements.
unsafe impl EntropySource for KernelSource {
    fn name(&self) -> &'static str {
        "kernel"
    }

    fn fill_uninit(&self, buf: &mut [MaybeUninit<u8>], flags: GrndFlags) -> Result<usize> {
        sys::getrandom_uninit(buf, flags)
    }
}

/// Fill all of `buf` from `source`, retrying interrupted and short reads.
pub fn fill_exact(source: &dyn EntropySource, buf: &mut [u8], flags: GrndFlags) -> Result<()> {
    // SAFETY: sources only store initialized bytes.
    fill_exact_uninit(source, unsafe { sys::slice_as_uninit_mut(buf) }, flags)
}

/// [`fill_exact`] into a buffer that may not be initialized yet. On success
/// every element of `buf` is initialized.
pub fn fill_exact_uninit(
    source: &dyn EntropySource,
    buf: &mut [MaybeUninit<u8>],
    flags: GrndFlags,
) -> Result<()> {
    sys::fill_exact_with(buf, |chunk| source.fill_uninit(chunk, flags))
}

/// `getentropy` semantics over any source: at most
/// [`GETENTROPY_MAX`](crate::GETENTROPY_MAX) bytes, all or nothing.
pub fn getentropy(source: &dyn EntropySource, buf: &mut [u8]) -> Result<()> {
    // SAFETY: sources only store initialized bytes.
    getentropy_uninit(source, unsafe { sys::slice_as_uninit_mut(buf) })
}

/// [`getentropy`] into a buffer that may not be initialized yet.
pub fn getentropy_uninit(source: &dyn EntropySource, buf: &mut [MaybeUninit<u8>]) -> Result<()> {
    if buf.len() > sys::GETENTROPY_MAX {
        return Err(crate::Error::TooLong {
            len: buf.len(),
            max: sys::GETENTROPY_MAX,
        });
    }
    fill_exact_uninit(source, buf, GrndFlags::empty())
}

static ACTIVE: RwLock<Option<Arc<dyn EntropySource>>> = RwLock::new(None);

/// Make `source` the active source for the whole process.
pub fn install(source: Arc<dyn EntropySource>) {
    debug!("installing {} entropy source", source.name());
    *ACTIVE.write().unwrap_or_else(|e| e.into_inner()) = Some(source);
}

/// Restore the kernel as the active source.
pub fn reset() {
    debug!("restoring kernel entropy source");
    *ACTIVE.write().unwrap_or_else(|e| e.into_inner()) = None;
}

/// The active source.
pub fn active() -> Arc<dyn EntropySource> {
    ACTIVE
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
        .unwrap_or_else(|| Arc::new(KernelSource) as Arc<dyn EntropySource>)
}
