//! Debug-only reentrancy check for the probe table.
//!
//! `ProbeTable` calls into user code (`K: Hash`, `K: Eq`) while it walks a
//! probe chain. If that code reaches back into the same table the slot
//! array may be observed half-updated. In debug builds the check records
//! which operation is active and panics on a nested entry, naming both
//! operations. In release builds it compiles to nothing.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table tracker. Public entry points start with
/// `let _g = self.reentrancy.enter("op");`.
#[derive(Debug)]
pub struct ReentrancyCheck {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // The table is single-threaded; keep the tracker !Send + !Sync.
    _single_thread: PhantomData<*mut ()>,
}

impl ReentrancyCheck {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _single_thread: PhantomData,
        }
    }

    /// Marks `op` as running until the returned guard drops.
    ///
    /// Panics in debug builds when another operation is still running.
    #[inline]
    pub fn enter(&self, op: &'static str) -> EntryGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrant `{op}` while `{outer}` is probing the same table");
            }
            self.active.set(Some(op));
            EntryGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            EntryGuard {
                _owner: PhantomData,
            }
        }
    }

    /// Name of the operation currently inside the table, if any.
    #[cfg(all(test, debug_assertions))]
    pub fn active(&self) -> Option<&'static str> {
        self.active.get()
    }
}

impl Default for ReentrancyCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by [`ReentrancyCheck::enter`].
pub struct EntryGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ReentrancyCheck,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a ()>,
}

impl Drop for EntryGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReentrancyCheck;

    #[test]
    fn sequential_entries_are_allowed() {
        let r = ReentrancyCheck::new();
        {
            let _g = r.enter("put");
        }
        let _g = r.enter("get");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn guard_tracks_active_operation() {
        let r = ReentrancyCheck::new();
        assert_eq!(r.active(), None);
        let g = r.enter("remove");
        assert_eq!(r.active(), Some("remove"));
        drop(g);
        assert_eq!(r.active(), None);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_entry_panics_in_debug() {
        let r = ReentrancyCheck::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = r.enter("put");
            let _inner = r.enter("get");
        }));
        assert!(res.is_err(), "nested entry must panic in debug builds");
    }
}
