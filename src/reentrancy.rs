//! Debug-only guard against reentrant calls into the map.
//!
//! Probing a chain runs user code (`K: Hash`, `K: Eq`). If that code calls
//! back into the same map, the walk could observe a half-linked chain. In
//! debug builds the guard turns such reentry into a panic at the second
//! entry point; in release builds it compiles to nothing.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-map reentry flag. Public operations open a section with
/// `let _g = self.reentrancy.enter();` and hold the guard for their whole
/// body. Sections never nest, so a plain flag suffices.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    in_section: Cell<bool>,
    // The map is single-threaded; keep it !Send + !Sync.
    _single_thread: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            in_section: Cell::new(false),
            _single_thread: PhantomData,
        }
    }

    /// Open a guarded section; the returned guard closes it on drop.
    /// In debug builds, panics if a section is already open.
    #[inline]
    pub fn enter(&self) -> SectionGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.in_section.replace(true),
                "reentrant call into a map operation"
            );
            return SectionGuard {
                flag: &self.in_section,
            };
        }

        #[cfg(not(debug_assertions))]
        {
            return SectionGuard {
                _marker: PhantomData,
            };
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by [`DebugReentrancy::enter`].
pub struct SectionGuard<'a> {
    #[cfg(debug_assertions)]
    flag: &'a Cell<bool>,
    #[cfg(not(debug_assertions))]
    _marker: PhantomData<&'a ()>,
}

impl Drop for SectionGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.flag.set(false);
    }
}
