//! Raw `getrandom(2)` system call.
//!
//! The call goes straight to the kernel with `syscall(2)` instead of the C
//! library wrapper, which older glibc releases do not declare.

use libc::{c_int, c_long, c_uint};
use tracing::trace;

/// Issue `getrandom(buf, len, flags)`.
///
/// Returns the number of bytes written, or the negated `errno` on failure.
///
/// # Safety
///
/// `buf` must be valid for writes of `len` bytes.
pub unsafe fn getrandom(buf: *mut u8, len: usize, flags: c_uint) -> Result<usize, c_int> {
    trace!("syscall: getrandom(buf={:?}, len={}, flags=0x{:x})", buf, len, flags);
    let ret: c_long = unsafe { libc::syscall(libc::SYS_getrandom, buf, len, flags) };
    if ret < 0 {
        let errno = errno();
        trace!("syscall: getrandom failed, errno={}", errno);
        return Err(errno);
    }
    Ok(ret as usize)
}

/// The calling thread's `errno`.
pub fn errno() -> c_int {
    std::io::Error::last_os_error()
        .raw_os_error()
        .unwrap_or(libc::EIO)
}

/// Set the calling thread's `errno`.
pub fn set_errno(value: c_int) {
    unsafe {
        *errno_location() = value;
    }
}

#[cfg(target_os = "linux")]
unsafe fn errno_location() -> *mut c_int {
    unsafe { libc::__errno_location() }
}

#[cfg(target_os = "android")]
unsafe fn errno_location() -> *mut c_int {
    unsafe { libc::__errno() }
}
