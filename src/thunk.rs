//! Memoizing suspensions.
//!
//! A [`Thunk`] is either an already-concrete value or a deferred computation.
//! [`Thunk::force`] evaluates the deferred computation at most once and caches
//! the result; every later call returns the cached value. Initializers are
//! assumed referentially transparent, since memoization elides re-invocation.

use std::cell::Cell;
use std::fmt;

use once_cell::unsync::OnceCell;

type Init<'a, T> = Box<dyn FnOnce() -> T + 'a>;

/// A value that may still be an unevaluated computation.
///
/// The two states are `Unforced` (initializer pending) and `Forced` (value
/// cached); the transition happens exactly once, on the first [`force`], and
/// is terminal.
///
/// `Thunk` is an unsynchronized cell type (`!Send`, `!Sync`), so the
/// check-then-cache sequence in `force` cannot race.
///
/// [`force`]: Thunk::force
pub struct Thunk<'a, T> {
    value: OnceCell<T>,
    init: Cell<Option<Init<'a, T>>>,
}

impl<'a, T> Thunk<'a, T> {
    /// Creates a deferred thunk. `f` is not called until the first `force`.
    pub fn new(f: impl FnOnce() -> T + 'a) -> Self {
        Thunk {
            value: OnceCell::new(),
            init: Cell::new(Some(Box::new(f))),
        }
    }

    /// Creates an already-forced thunk holding a concrete value.
    pub fn of(value: T) -> Self {
        Thunk {
            value: OnceCell::from(value),
            init: Cell::new(None),
        }
    }

    /// Resolves this thunk to its concrete value.
    ///
    /// The initializer runs on the first call only; the result is cached and
    /// returned on every later call.
    pub fn force(&self) -> &T {
        self.value.get_or_init(|| match self.init.take() {
            Some(f) => f(),
            None => panic!("no initializer"),
        })
    }

    /// Returns the cached value without forcing.
    pub fn try_get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Whether this thunk has been resolved to a concrete value.
    pub fn is_forced(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T> From<T> for Thunk<'_, T> {
    fn from(value: T) -> Self {
        Thunk::of(value)
    }
}

impl<T: PartialEq> PartialEq for Thunk<'_, T> {
    /// Forces both thunks and compares the resolved values.
    fn eq(&self, other: &Self) -> bool {
        self.force() == other.force()
    }
}
impl<T: Eq> Eq for Thunk<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Thunk<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(v) => f.debug_tuple("Thunk").field(v).finish(),
            None => f.write_str("Thunk(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::Thunk;

    /// Creates a deferred thunk plus a cell counting initializer invocations.
    fn counted<'a, T: 'a>(t: T) -> (Rc<Cell<usize>>, Thunk<'a, T>) {
        let ct = Rc::new(Cell::new(0));
        let ct2 = Rc::clone(&ct);
        let thunk = Thunk::new(move || {
            ct2.set(ct2.get() + 1);
            t
        });
        (ct, thunk)
    }

    #[test]
    fn deferred_until_forced() {
        let (ct, thunk) = counted(7);
        assert!(!thunk.is_forced());
        assert_eq!(thunk.try_get(), None);
        assert_eq!(ct.get(), 0);

        assert_eq!(*thunk.force(), 7);
        assert!(thunk.is_forced());
        assert_eq!(ct.get(), 1);
    }

    #[test]
    fn forced_at_most_once() {
        let (ct, thunk) = counted(String::from("once"));
        assert_eq!(thunk.force(), "once");
        assert_eq!(thunk.force(), "once");
        assert_eq!(thunk.try_get().map(String::as_str), Some("once"));
        assert_eq!(ct.get(), 1);
    }

    #[test]
    fn concrete_never_invokes() {
        let thunk = Thunk::of(3);
        assert!(thunk.is_forced());
        assert_eq!(*thunk.force(), 3);

        let thunk = Thunk::from(4);
        assert_eq!(*thunk.force(), 4);
    }

    #[test]
    fn eq_forces_both_sides() {
        let (ct, thunk) = counted(3);
        assert_eq!(thunk, Thunk::of(3));
        assert_eq!(ct.get(), 1);
        assert_ne!(thunk, Thunk::new(|| 4));
    }
}
