//! Platform-specific system interfaces.
//!
//! The platform-specific implementations are conditionally compiled based on
//! the target OS, and common functions are re-exported at the module level.

#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod linux;

#[cfg(not(any(target_os = "linux", target_os = "android")))]
compile_error!("sysrandom supports only Linux and Android targets");

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use linux::{
    GETENTROPY_MAX, fill_exact_with, getentropy, getrandom, getrandom_uninit, set_errno,
    slice_as_uninit_mut,
};
