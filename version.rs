//! C library version guard.
//!
//! glibc added `getrandom` and `getentropy` to `<sys/random.h>` in 2.25.
//! Headers for older releases carry the `GRND_*` flags but not the two
//! declarations.

use crate::{Error, Result};
use std::fmt;

/// A `major.minor` C library release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LibcVersion {
    pub major: u32,
    pub minor: u32,
}

impl LibcVersion {
    /// First glibc release declaring `getrandom` and `getentropy`.
    pub const GETRANDOM: LibcVersion = LibcVersion::new(2, 25);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse a `major.minor[.patch]` version string such as `2.31` or `2.39.1`.
    pub fn parse(s: &str) -> Result<LibcVersion> {
        let invalid = || Error::Version(s.to_string());
        let mut parts = s.trim().split('.');
        let major = parts.next().and_then(number).ok_or_else(invalid)?;
        let minor = parts.next().and_then(number).ok_or_else(invalid)?;
        match (parts.next(), parts.next()) {
            (None, _) => {}
            (Some(patch), None) if number(patch).is_some() => {}
            _ => return Err(invalid()),
        }
        Ok(LibcVersion { major, minor })
    }

    /// Whether this release declares `getrandom` and `getentropy`.
    pub fn declares_getrandom(&self) -> bool {
        (self.major == 2 && self.minor >= 25) || self.major > 2
    }

    /// The glibc version of the running process, if linked against glibc.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    pub fn host() -> Option<LibcVersion> {
        let ptr = unsafe { libc::gnu_get_libc_version() };
        if ptr.is_null() {
            return None;
        }
        let version = unsafe { std::ffi::CStr::from_ptr(ptr) }.to_str().ok()?;
        LibcVersion::parse(version).ok()
    }

    #[cfg(not(all(target_os = "linux", target_env = "gnu")))]
    pub fn host() -> Option<LibcVersion> {
        None
    }
}

/// A version component: one or more ASCII digits, nothing else.
fn number(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for LibcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
