//! Flags for use with `getrandom`.

use crate::{Error, Result};
use libc::c_uint;

/// Do not block when the entropy pool is not yet initialized; fail with
/// `EAGAIN` instead.
pub const GRND_NONBLOCK: c_uint = 0x01;

/// Draw from the blocking `/dev/random` pool instead of `/dev/urandom`.
pub const GRND_RANDOM: c_uint = 0x02;

/// Return bytes even if the pool is not initialized. Not for key material.
pub const GRND_INSECURE: c_uint = 0x04;

bitflags::bitflags! {
    /// Typed set of `GRND_*` flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GrndFlags: c_uint {
        const NONBLOCK = GRND_NONBLOCK;
        const RANDOM = GRND_RANDOM;
        const INSECURE = GRND_INSECURE;
    }
}

impl GrndFlags {
    /// Checks a raw flags argument the way the kernel does.
    ///
    /// Unknown bits are rejected, and so is asking for both the blocking pool
    /// and the insecure mode.
    pub fn validate(raw: c_uint) -> Result<GrndFlags> {
        let flags = GrndFlags::from_bits(raw).ok_or(Error::InvalidFlags(raw))?;
        if flags.contains(GrndFlags::RANDOM | GrndFlags::INSECURE) {
            return Err(Error::InvalidFlags(raw));
        }
        Ok(flags)
    }

    /// Renders the set as C source would spell it, e.g. `GRND_NONBLOCK|GRND_RANDOM`.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "0".to_string();
        }
        self.iter_names()
            .map(|(name, _)| format!("GRND_{name}"))
            .collect::<Vec<_>>()
            .join("|")
    }
}
