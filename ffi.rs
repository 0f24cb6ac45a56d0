//! C-ABI exports of the `sys/random.h` functions.
//!
//! Both functions follow the C convention: `-1` on failure with the cause in
//! `errno`. They read through the active entropy source (see
//! [`crate::source::active`]).

use crate::{Error, GrndFlags, Result, source, sys};
use libc::{c_int, c_uint, c_void, size_t, ssize_t};
use macros::random_symbol;
use std::mem::MaybeUninit;
use tracing::trace;

/// Write `length` bytes of randomness starting at `buffer`.
///
/// Returns the number of bytes written, or -1 on error.
#[random_symbol]
pub fn getrandom(buffer: *mut c_void, length: size_t, flags: c_uint) -> ssize_t {
    trace!("getrandom(buffer={:?}, length={}, flags=0x{:x})", buffer, length, flags);
    let result = GrndFlags::validate(flags).and_then(|flags| {
        let buf = unsafe { user_buffer(buffer, request_len(length))? };
        source::active().fill_uninit(buf, flags)
    });
    match result {
        Ok(written) => written as ssize_t,
        Err(e) => fail(e) as ssize_t,
    }
}

/// Write `length` bytes of randomness starting at `buffer`.
///
/// Returns 0 on success or -1 on error.
#[random_symbol]
pub fn getentropy(buffer: *mut c_void, length: size_t) -> c_int {
    trace!("getentropy(buffer={:?}, length={})", buffer, length);
    if length > sys::GETENTROPY_MAX {
        return fail(Error::TooLong {
            len: length,
            max: sys::GETENTROPY_MAX,
        });
    }
    let result = unsafe { user_buffer(buffer, length) }
        .and_then(|buf| source::getentropy_uninit(source::active().as_ref(), buf));
    match result {
        Ok(()) => 0,
        Err(e) => fail(e),
    }
}

/// Largest count `getrandom` will try to write, so that the result fits in
/// `ssize_t`.
fn request_len(length: size_t) -> size_t {
    length.min(ssize_t::MAX as size_t)
}

/// Borrow a caller-supplied buffer. Its contents may be uninitialized.
///
/// # Safety
///
/// A non-null `buffer` must be valid for writes of `length` bytes.
unsafe fn user_buffer<'a>(
    buffer: *mut c_void,
    length: size_t,
) -> Result<&'a mut [MaybeUninit<u8>]> {
    if length == 0 {
        return Ok(&mut []);
    }
    if buffer.is_null() {
        return Err(Error::from_errno(libc::EFAULT));
    }
    Ok(unsafe { std::slice::from_raw_parts_mut(buffer.cast::<MaybeUninit<u8>>(), length) })
}

fn fail(err: Error) -> c_int {
    trace!("sys/random call failed: {}", err);
    sys::set_errno(err.errno());
    -1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GRND_INSECURE, GRND_NONBLOCK, GRND_RANDOM};
    use std::ptr;

    fn last_errno() -> c_int {
        std::io::Error::last_os_error().raw_os_error().unwrap()
    }

    #[test]
    fn getrandom_fills_buffer() {
        let mut buf = [0u8; 128];
        let ret = unsafe { sysrandom_getrandom(buf.as_mut_ptr().cast(), buf.len(), 0) };
        assert_eq!(ret, 128);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn getrandom_into_uninitialized_buffer() {
        let mut key = MaybeUninit::<[u8; 32]>::uninit();
        let ret = unsafe { sysrandom_getrandom(key.as_mut_ptr().cast(), 32, 0) };
        assert_eq!(ret, 32);
        let key = unsafe { key.assume_init() };
        assert!(key.iter().any(|&b| b != 0));
    }

    #[test]
    fn getentropy_into_uninitialized_buffer() {
        let mut seed = MaybeUninit::<[u8; 64]>::uninit();
        let ret = unsafe { sysrandom_getentropy(seed.as_mut_ptr().cast(), 64) };
        assert_eq!(ret, 0);
        let seed = unsafe { seed.assume_init() };
        assert!(seed.iter().any(|&b| b != 0));
    }

    #[test]
    fn request_len_fits_ssize_t() {
        assert_eq!(request_len(usize::MAX), ssize_t::MAX as size_t);
        assert_eq!(request_len(ssize_t::MAX as size_t + 1), ssize_t::MAX as size_t);
        assert_eq!(request_len(ssize_t::MAX as size_t), ssize_t::MAX as size_t);
        assert_eq!(request_len(4096), 4096);
        assert_eq!(request_len(0), 0);
        assert!(request_len(usize::MAX) as ssize_t > 0);
    }

    #[test]
    fn getrandom_nonblock() {
        let mut buf = [0u8; 16];
        let ret = unsafe { sysrandom_getrandom(buf.as_mut_ptr().cast(), buf.len(), GRND_NONBLOCK) };
        assert_eq!(ret, 16);
    }

    #[test]
    fn getrandom_zero_length() {
        let ret = unsafe { sysrandom_getrandom(ptr::null_mut(), 0, 0) };
        assert_eq!(ret, 0);
    }

    #[test]
    fn getrandom_null_buffer() {
        let ret = unsafe { sysrandom_getrandom(ptr::null_mut(), 8, 0) };
        assert_eq!(ret, -1);
        assert_eq!(last_errno(), libc::EFAULT);
    }

    #[test]
    fn getrandom_invalid_flags() {
        let mut buf = [0u8; 8];
        let ret = unsafe { sysrandom_getrandom(buf.as_mut_ptr().cast(), 8, 0x40) };
        assert_eq!(ret, -1);
        assert_eq!(last_errno(), libc::EINVAL);

        let ret = unsafe {
            sysrandom_getrandom(buf.as_mut_ptr().cast(), 8, GRND_RANDOM | GRND_INSECURE)
        };
        assert_eq!(ret, -1);
        assert_eq!(last_errno(), libc::EINVAL);
    }

    #[test]
    fn getentropy_fills_buffer() {
        let mut buf = [0u8; 256];
        let ret = unsafe { sysrandom_getentropy(buf.as_mut_ptr().cast(), buf.len()) };
        assert_eq!(ret, 0);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn getentropy_too_long() {
        let mut buf = [0u8; 257];
        let ret = unsafe { sysrandom_getentropy(buf.as_mut_ptr().cast(), buf.len()) };
        assert_eq!(ret, -1);
        assert_eq!(last_errno(), libc::EIO);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn getentropy_null_buffer() {
        assert_eq!(unsafe { sysrandom_getentropy(ptr::null_mut(), 0) }, 0);
        assert_eq!(unsafe { sysrandom_getentropy(ptr::null_mut(), 1) }, -1);
        assert_eq!(last_errno(), libc::EFAULT);
    }
}
