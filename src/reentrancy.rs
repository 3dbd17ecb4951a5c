//! Debug-only reentrancy detection for `HashTable`.
//!
//! Key-based table operations and the resize path each hold a guard for
//! their whole body. While a guard is held the bucket array may be
//! half-built (mid-rehash), so a second entry is a bug: debug builds panic,
//! release builds compile the check away.
//!
//! The depth lives in a `Cell`, which keeps the owning table `!Sync` but
//! still `Send`.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug, Default)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
    #[cfg(not(debug_assertions))]
    _unsync: PhantomData<core::cell::Cell<()>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
            #[cfg(not(debug_assertions))]
            _unsync: PhantomData,
        }
    }

    /// Mark the start of a guarded section; `what` names it in the panic.
    #[inline]
    pub(crate) fn enter(&self, what: &'static str) -> Entered<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get();
            assert!(d == 0, "reentrant call into HashTable::{what}");
            self.depth.set(d + 1);
            return Entered {
                owner: self,
                _lt: PhantomData,
            };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = what;
            return Entered { _lt: PhantomData };
        }
    }
}

/// Held for the duration of a guarded section; leaving it resets the depth.
pub(crate) struct Entered<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    _lt: PhantomData<&'a ()>,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.owner.depth.get();
            debug_assert!(d > 0);
            self.owner.depth.set(d - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn sequential_sections_are_fine() {
        let r = DebugReentrancy::new();
        {
            let _g = r.enter("set");
        }
        let _g = r.enter("resize");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_section_panics_in_debug() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = r.enter("set");
            let _inner = r.enter("set");
        }));
        assert!(res.is_err(), "expected nested entry to panic in debug builds");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn depth_resets_after_panic_unwinds() {
        let r = DebugReentrancy::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g = r.enter("get");
            panic!("boom");
        }));
        let _g = r.enter("get");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_section_is_noop_in_release() {
        let r = DebugReentrancy::new();
        let _outer = r.enter("set");
        let _inner = r.enter("set");
    }
}
