//! Arena allocation and the owning handle type.
//!
//! `Arena` wraps a `bumpalo::Bump`. `Handle<T>` is the move-only, explicit-
//! release, destructor-on-drop wrapper every parse-tree and AST child is
//! stored behind: `bumpalo::boxed::Box` already has exactly this contract
//! (run `T::drop`, never deallocate the page), so the handle is a thin
//! newtype rather than a hand-rolled unsafe pointer.

use bumpalo::boxed::Box as ArenaBox;
use bumpalo::Bump;

/// A reactor-owned region that allocates node memory in bulk and releases it
/// only at teardown (when the `Arena` itself drops).
pub struct Arena {
    bump: Bump,
}

impl Arena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Allocates `val` in the arena and returns an owning handle to it.
    /// Returns `None` on allocation failure -- the caller's contract with
    /// the reactor is to treat that as `reactor_out_of_memory`.
    pub fn try_alloc<'a, T>(&'a self, val: T) -> Option<Handle<'a, T>> {
        self.bump
            .try_alloc_layout(std::alloc::Layout::new::<T>())
            .ok()?;
        Some(Handle(ArenaBox::new_in(val, &self.bump)))
    }

    /// Infallible allocation for call sites that don't route through the
    /// reactor's `allocate` contract (e.g. constructing fixtures in tests).
    pub fn alloc<'a, T>(&'a self, val: T) -> Handle<'a, T> {
        Handle(ArenaBox::new_in(val, &self.bump))
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

/// A move-only wrapper binding a node pointer to deterministic destruction
/// on drop, without freeing the arena's backing memory. Exclusive ownership:
/// there is exactly one `Handle` per allocated node at any time.
pub struct Handle<'a, T>(ArenaBox<'a, T>);

impl<'a, T> Handle<'a, T> {
    /// Consumes the handle and hands back a bare borrowed reference tied to
    /// the arena's lifetime, for call sites that need to re-parent a node
    /// without tracking an owning wrapper.
    pub fn release(self) -> &'a mut T {
        ArenaBox::leak(self.0)
    }

    pub fn as_ref(&self) -> &T {
        &self.0
    }

    pub fn as_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> std::ops::Deref for Handle<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> std::ops::DerefMut for Handle<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Handle<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct DropCounter<'a>(&'a AtomicUsize);
    impl Drop for DropCounter<'_> {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn handle_drop_runs_destructor_exactly_once() {
        let count = AtomicUsize::new(0);
        let arena = Arena::new();
        {
            let handle = arena.alloc(DropCounter(&count));
            assert_eq!(count.load(Ordering::SeqCst), 0);
            drop(handle);
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn released_reference_outlives_the_handle_wrapper() {
        let arena = Arena::new();
        let handle = arena.alloc(41i32);
        let r = handle.release();
        *r += 1;
        assert_eq!(*r, 42);
    }
}
