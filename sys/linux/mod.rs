//! Linux-specific entropy interfaces.
//!
//! # Submodules
//!
//! - [`syscall`] - The raw `getrandom(2)` system call and `errno` access

pub mod syscall;

use crate::{Error, GrndFlags, Result};
use std::mem::MaybeUninit;
use tracing::{debug, trace};

pub use syscall::set_errno;

/// Largest request `getentropy` accepts, in bytes.
pub const GETENTROPY_MAX: usize = 256;

/// Write up to `buf.len()` bytes of randomness into `buf`.
///
/// This is a single system call. The kernel may return fewer bytes than
/// requested (requests above 32 MiB, or a signal during a `GRND_RANDOM`
/// read), in which case only the returned prefix of `buf` is written.
pub fn getrandom(buf: &mut [u8], flags: GrndFlags) -> Result<usize> {
    getrandom_uninit(unsafe { slice_as_uninit_mut(buf) }, flags)
}

/// [`getrandom`] into a buffer that may not be initialized yet.
///
/// On success the first `n` elements of `buf` are initialized.
pub fn getrandom_uninit(buf: &mut [MaybeUninit<u8>], flags: GrndFlags) -> Result<usize> {
    unsafe { syscall::getrandom(buf.as_mut_ptr().cast::<u8>(), buf.len(), flags.bits()) }
        .map_err(Error::from_errno)
}

/// Fill all of `buf` with randomness from the default pool.
///
/// Requests longer than [`GETENTROPY_MAX`] fail with `EIO` without touching
/// the buffer.
pub fn getentropy(buf: &mut [u8]) -> Result<()> {
    if buf.len() > GETENTROPY_MAX {
        return Err(Error::TooLong {
            len: buf.len(),
            max: GETENTROPY_MAX,
        });
    }
    fill_exact_with(unsafe { slice_as_uninit_mut(buf) }, |chunk| {
        getrandom_uninit(chunk, GrndFlags::empty())
    })
}

/// Call `fill` until `buf` is completely written.
///
/// Interrupted calls are retried. A call that writes nothing is reported as
/// `EIO` rather than looping forever.
pub fn fill_exact_with<F>(mut buf: &mut [MaybeUninit<u8>], mut fill: F) -> Result<()>
where
    F: FnMut(&mut [MaybeUninit<u8>]) -> Result<usize>,
{
    while !buf.is_empty() {
        match fill(buf) {
            Ok(0) => return Err(Error::from_errno(libc::EIO)),
            Ok(n) => {
                trace!("filled {} of {} bytes", n, buf.len());
                let rest = std::mem::take(&mut buf);
                buf = rest
                    .get_mut(n..)
                    .ok_or_else(|| Error::from_errno(libc::EIO))?;
            }
            Err(e) if e.is_interrupted() => {
                debug!("entropy read interrupted, retrying");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// View an initialized buffer as a possibly-uninitialized one.
///
/// # Safety
///
/// The caller must not store `MaybeUninit::uninit()` (or any other
/// uninitialized value) through the returned slice.
pub unsafe fn slice_as_uninit_mut(buf: &mut [u8]) -> &mut [MaybeUninit<u8>] {
    unsafe { &mut *(buf as *mut [u8] as *mut [MaybeUninit<u8>]) }
}
