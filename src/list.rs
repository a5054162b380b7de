//! A lazily-evaluated, memoizing singly-linked list.
//!
//! A [`LazyList`] is either [`Nil`] or a [`Cons`] cell holding one head
//! element (possibly an unevaluated [`Thunk`]) and a tail that is itself a
//! list, possibly behind a thunk producing one. Cells are shared behind
//! [`Rc`], so a tail may be reused across several lists (structural sharing)
//! and forcing it through one list populates the cache for all of them.
//!
//! Forcing, length and display walk the whole chain and diverge on an
//! infinite list; that is a caller responsibility, not a detected error.
//! Bounded operations ([`get`] with a non-negative index, [`iter`] consumed
//! finitely) are safe on infinite lists.
//!
//! [`Nil`]: LazyList::Nil
//! [`Cons`]: LazyList::Cons
//! [`get`]: LazyList::get
//! [`iter`]: LazyList::iter

use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use thiserror::Error;

use crate::thunk::Thunk;

/// The position passed to [`LazyList::get`] resolves to no cell.
///
/// Carries the index as originally requested, before any negative-index
/// shifting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("lazy list index {index} out of range")]
pub struct IndexError {
    pub index: i64,
}

/// A lazy cons list: the empty list, or a head/tail cell.
///
/// The variant set is closed; every operation matches exhaustively on it.
/// All empty lists are the `Nil` unit variant, so "the empty list" is a
/// single canonical value by construction.
pub enum LazyList<'a, T> {
    Nil,
    Cons(Rc<ConsCell<'a, T>>),
}

/// One node of a [`LazyList`]: a head slot, a tail slot, and the one-shot
/// cache for the fully forced normal form.
///
/// Neither slot is mutated after construction; the only write is the
/// one-time cache fill in `force`. The cache is an unsynchronized cell,
/// which is sound because the whole structure is `Rc`-based and cannot
/// cross threads.
pub struct ConsCell<'a, T> {
    head: Rc<Thunk<'a, T>>,
    tail: Thunk<'a, LazyList<'a, T>>,
    forced: OnceCell<Rc<[T]>>,
}

impl<'a, T> LazyList<'a, T> {
    /// The canonical empty list.
    pub fn nil() -> Self {
        LazyList::Nil
    }

    /// Prepends a head thunk onto `tail`.
    pub fn cons(head: Thunk<'a, T>, tail: LazyList<'a, T>) -> Self {
        LazyList::Cons(Rc::new(ConsCell {
            head: Rc::new(head),
            tail: Thunk::of(tail),
            forced: OnceCell::new(),
        }))
    }

    /// Prepends a concrete value onto `tail`.
    pub fn cons_known(value: T, tail: LazyList<'a, T>) -> Self {
        LazyList::cons(Thunk::of(value), tail)
    }

    /// Prepends a head thunk onto a tail that is itself still a deferred
    /// computation. This is the constructor for infinite lists.
    pub fn cons_deferred(
        head: Thunk<'a, T>,
        tail: impl FnOnce() -> LazyList<'a, T> + 'a,
    ) -> Self {
        LazyList::Cons(Rc::new(ConsCell {
            head: Rc::new(head),
            tail: Thunk::new(tail),
            forced: OnceCell::new(),
        }))
    }

    /// Builds a list from a generator, one node per `Some`.
    ///
    /// The generator is polled once per node as the chain is walked; nodes
    /// past the last one visited stay unconstructed, so an unbounded
    /// generator yields an unbounded list.
    pub fn iterate(mut f: impl FnMut() -> Option<T> + 'a) -> Self {
        match f() {
            Some(v) => LazyList::cons_deferred(Thunk::of(v), move || LazyList::iterate(f)),
            None => LazyList::Nil,
        }
    }

    /// Whether this is the empty list.
    pub fn is_empty(&self) -> bool {
        matches!(self, LazyList::Nil)
    }

    /// The head thunk, unforced.
    pub fn first(&self) -> Option<&Thunk<'a, T>> {
        match self {
            LazyList::Nil => None,
            LazyList::Cons(cell) => Some(cell.head.as_ref()),
        }
    }

    /// Iterates over the head thunks without forcing their values.
    ///
    /// Each call starts a fresh traversal from this node. Advancing forces
    /// only the tail-structure thunk needed to find the next cell, never
    /// the elements, so a finite prefix of an infinite list can be visited.
    pub fn iter(&self) -> Iter<'_, 'a, T> {
        Iter { cur: self }
    }

    /// Iterates over elements, forcing each visited head.
    pub fn iter_forced(&self) -> IterForced<'_, 'a, T> {
        IterForced(self.iter())
    }
}

impl<'a, T: Clone> LazyList<'a, T> {
    /// Resolves the whole chain to its normal form: the concrete, ordered,
    /// finite sequence of elements.
    ///
    /// Each cell caches its normal form the first time it is computed, so
    /// re-forcing any node is O(1) and returns the identical `Rc`. Diverges
    /// if the chain is infinite.
    pub fn force(&self) -> Rc<[T]> {
        match self {
            LazyList::Nil => Rc::from(Vec::new()),
            LazyList::Cons(cell) => cell.force(),
        }
    }

    /// The number of elements. Forces the entire chain: a chain's length is
    /// unknowable without walking it.
    pub fn len(&self) -> usize {
        match self {
            LazyList::Nil => 0,
            LazyList::Cons(cell) => cell.force().len(),
        }
    }

    /// The head thunk at `index`, unforced.
    ///
    /// A negative index counts from the end: the effective position is
    /// `len() + index`, which forces the entire chain even when the target
    /// is near the head. A non-negative index walks only as many tail links
    /// as needed and never forces element values, so it is safe on an
    /// infinite list.
    pub fn get(&self, index: i64) -> Result<Rc<Thunk<'a, T>>, IndexError> {
        self.head_at(index).map(Rc::clone)
    }

    /// The element at `index`, forced.
    pub fn get_forced(&self, index: i64) -> Result<&T, IndexError> {
        self.head_at(index).map(|head| head.force())
    }

    fn head_at(&self, index: i64) -> Result<&Rc<Thunk<'a, T>>, IndexError> {
        let resolved = if index < 0 {
            self.len() as i64 + index
        } else {
            index
        };
        if resolved < 0 {
            return Err(IndexError { index });
        }

        let mut cur = self;
        let mut remaining = resolved;
        loop {
            match cur {
                LazyList::Nil => return Err(IndexError { index }),
                LazyList::Cons(cell) => {
                    if remaining == 0 {
                        return Ok(&cell.head);
                    }
                    remaining -= 1;
                    cur = cell.tail.force();
                }
            }
        }
    }
}

impl<'a, T: Clone> ConsCell<'a, T> {
    /// Computes and caches the normal form of the chain starting here.
    fn force(&self) -> Rc<[T]> {
        Rc::clone(self.forced.get_or_init(|| {
            let head = self.head.force().clone();
            let tail = self.tail.force().force();

            let mut nf = Vec::with_capacity(tail.len() + 1);
            nf.push(head);
            nf.extend_from_slice(&tail);
            Rc::from(nf)
        }))
    }
}

impl<T> Clone for LazyList<'_, T> {
    fn clone(&self) -> Self {
        match self {
            LazyList::Nil => LazyList::Nil,
            LazyList::Cons(cell) => LazyList::Cons(Rc::clone(cell)),
        }
    }
}

impl<T> Default for LazyList<'_, T> {
    fn default() -> Self {
        LazyList::Nil
    }
}

impl<T: PartialEq> PartialEq for LazyList<'_, T> {
    /// Compares element-wise, forcing heads as they are visited.
    fn eq(&self, other: &Self) -> bool {
        self.iter_forced().eq(other.iter_forced())
    }
}
impl<T: Eq> Eq for LazyList<'_, T> {}

impl<T: Clone + fmt::Debug> fmt::Debug for LazyList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.force().iter()).finish()
    }
}

impl<T: Clone + fmt::Display> fmt::Display for LazyList<'_, T> {
    /// Renders the forced normal form as a tuple: `(1, 2, 3)`, `(1,)`, `()`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nf = self.force();
        f.write_str("(")?;
        for (i, v) in nf.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        if nf.len() == 1 {
            f.write_str(",")?;
        }
        f.write_str(")")
    }
}

impl<T> FromIterator<T> for LazyList<'_, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut items: Vec<T> = iter.into_iter().collect();
        let mut list = LazyList::Nil;
        while let Some(v) = items.pop() {
            list = LazyList::cons_known(v, list);
        }
        list
    }
}

impl<T, const N: usize> From<[T; N]> for LazyList<'_, T> {
    fn from(value: [T; N]) -> Self {
        LazyList::from_iter(value)
    }
}

impl<'r, 'a, T> IntoIterator for &'r LazyList<'a, T> {
    type Item = &'r Thunk<'a, T>;
    type IntoIter = Iter<'r, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over head thunks. Created by [`LazyList::iter`].
pub struct Iter<'r, 'a, T> {
    cur: &'r LazyList<'a, T>,
}
impl<'r, 'a, T> Iterator for Iter<'r, 'a, T> {
    type Item = &'r Thunk<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.cur;
        match cur {
            LazyList::Nil => None,
            LazyList::Cons(cell) => {
                self.cur = cell.tail.force();
                Some(cell.head.as_ref())
            }
        }
    }
}

/// Iterator over forced elements. Created by [`LazyList::iter_forced`].
pub struct IterForced<'r, 'a, T>(Iter<'r, 'a, T>);
impl<'r, 'a, T> Iterator for IterForced<'r, 'a, T> {
    type Item = &'r T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(Thunk::force)
    }
}
