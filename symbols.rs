//! Symbol registration and lookup for the exported `sys/random.h` functions.
//!
//! This module provides a distributed slice that collects all symbols
//! registered via the `#[random_symbol]` attribute macro.

use linkme::distributed_slice;

/// A function pointer wrapper that's Sync.
#[derive(Clone, Copy)]
pub struct FnPtr(pub *const ());

// SAFETY: Function pointers point to immutable code, so they're safe to share.
unsafe impl Sync for FnPtr {}

/// Distributed slice of exported symbol mappings.
///
/// Each entry maps a C symbol name (e.g., "getrandom") to the address of the
/// exported implementation (e.g., `sysrandom_getrandom`).
#[distributed_slice]
pub static RANDOM_SYMBOLS: [(&str, FnPtr)] = [..];

/// Look up an exported symbol by its C name.
///
/// Returns the function address if found, or None if this crate does not
/// provide the symbol.
pub fn lookup(symbol_name: &str) -> Option<u64> {
    RANDOM_SYMBOLS
        .iter()
        .find(|(name, _)| *name == symbol_name)
        .map(|(_, ptr)| ptr.0 as u64)
}

/// Names of every registered symbol, in registration order.
pub fn names() -> impl Iterator<Item = &'static str> {
    RANDOM_SYMBOLS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_both_exports() {
        let getrandom = crate::ffi::sysrandom_getrandom as *const () as u64;
        let getentropy = crate::ffi::sysrandom_getentropy as *const () as u64;
        assert_eq!(lookup("getrandom"), Some(getrandom));
        assert_eq!(lookup("getentropy"), Some(getentropy));
    }

    #[test]
    fn lookup_unknown_symbol() {
        assert_eq!(lookup("arc4random"), None);
        assert_eq!(lookup("sysrandom_getrandom"), None);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = names().collect();
        names.sort_unstable();
        let len = names.len();
        names.dedup();
        assert_eq!(names.len(), len);
        assert!(names.contains(&"getrandom"));
    }
}
