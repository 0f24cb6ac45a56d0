//! sysrandom - the `sys/random.h` interface for obtaining random bytes.
//!
//! The kernel's entropy pool is reached through the `getrandom(2)` system
//! call. This crate exposes it three ways: a safe Rust API over byte slices,
//! C-ABI exports with the exact `getrandom`/`getentropy` signatures, and a
//! pluggable entropy source so runs can be made reproducible.
//!
//! # Modules
//!
//! - [`flags`] - The `GRND_*` flag constants and their validation
//! - [`version`] - The C library version guard for the declarations
//! - [`sys`] - Platform system call wrappers
//! - [`source`] - Kernel and deterministic entropy sources
//! - [`ffi`] - C-ABI exports
//! - [`symbols`] - Lookup table for the C-ABI exports
//!
//! # Error Handling
//!
//! All operations use the consolidated [`Error`] type. [`Error::errno`] maps
//! each variant to the `errno` value the C exports report.

pub mod ffi;
pub mod flags;
pub mod source;
pub mod symbols;
pub mod sys;
pub mod version;

/// Consolidated error type for all sysrandom operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid getrandom flags: 0x{0:x}")]
    InvalidFlags(libc::c_uint),

    #[error("requested {len} bytes of entropy, at most {max} allowed")]
    TooLong { len: usize, max: usize },

    #[error("invalid C library version: {0}")]
    Version(String),

    #[error("deterministic source seed must be non-zero")]
    ZeroSeed,
}

impl Error {
    /// The `errno` value a C caller sees for this error.
    pub fn errno(&self) -> libc::c_int {
        match self {
            Error::Io(e) => e.raw_os_error().unwrap_or(libc::EIO),
            Error::InvalidFlags(_) | Error::Version(_) | Error::ZeroSeed => libc::EINVAL,
            Error::TooLong { .. } => libc::EIO,
        }
    }

    /// Whether the call was interrupted by a signal and can be retried.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::Interrupted)
    }

    pub(crate) fn from_errno(errno: libc::c_int) -> Self {
        Error::Io(std::io::Error::from_raw_os_error(errno))
    }
}

pub type Result<T> = core::result::Result<T, Error>;

pub use flags::{GRND_INSECURE, GRND_NONBLOCK, GRND_RANDOM, GrndFlags};
pub use source::{EntropySource, KernelSource, SeededSource, fill_exact, fill_exact_uninit};
pub use sys::{GETENTROPY_MAX, getentropy, getrandom, getrandom_uninit};
pub use version::LibcVersion;
