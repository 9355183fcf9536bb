use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::{ListId, Node};

/// A doubly-linked list of externally-owned objects that carry their own link state.
///
/// The list owns no member storage. It only holds references to the first and last members
/// and rearranges the [`Links`][crate::Links] embedded in the member objects, so insertion
/// and removal are O(1) and perform no heap allocation. Members are handled as [`Rc`]
/// references; cloning an `Rc` adjusts a reference count and allocates nothing.
///
/// Each object can be in at most one list at a time. The list records its own identity in
/// every member, which is how [`remove()`][Self::remove] can reject objects that belong to a
/// different list and how [`push_back()`][Self::push_back] can reject objects that are
/// already listed. Violations of these contracts are programmer errors and panic.
///
/// # Iteration
///
/// [`iter()`][Self::iter] walks the list head to tail without allocating. The iterator
/// borrows the list, so mutating the list while an iterator is alive is a compile-time
/// borrow error rather than a documented hazard.
///
/// # Dropping
///
/// Membership cannot outlive the list: dropping a populated list unlinks every remaining
/// member, so surviving objects come out unlisted and immediately eligible for another
/// list. The list releases its references to the members; their own lifetimes are governed
/// by whoever else holds them.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
///
/// use intrusive_list::{Links, Node, NodeList};
///
/// #[derive(Default)]
/// struct Particle {
///     links: Links<Particle>,
/// }
///
/// impl Node for Particle {
///     fn links(&self) -> &Links<Self> {
///         &self.links
///     }
/// }
///
/// let mut list = NodeList::new();
///
/// let a = Rc::new(Particle::default());
/// let b = Rc::new(Particle::default());
///
/// list.push_back(Rc::clone(&a));
/// list.push_back(Rc::clone(&b));
/// assert_eq!(list.len(), 2);
///
/// list.remove(&a);
/// assert_eq!(list.len(), 1);
/// assert!(Rc::ptr_eq(&list.remove_first(), &b));
/// assert!(list.is_empty());
/// ```
pub struct NodeList<T: Node> {
    id: ListId,

    /// First member. This is the root of the only strong chain through the list: each member
    /// holds a strong reference to its successor and a weak one to its predecessor.
    head: Option<Rc<T>>,

    /// Last member. An extra strong reference to an object already kept alive via `head`.
    tail: Option<Rc<T>>,

    len: usize,
}

impl<T: Node> NodeList<T> {
    /// Creates an empty list with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ListId::mint(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// The identity recorded in every member of this list.
    #[must_use]
    pub fn id(&self) -> ListId {
        self.id
    }

    /// The number of objects in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `value` is currently a member of this specific list.
    ///
    /// This is an identity check on the membership state embedded in `value`; it does not
    /// traverse the list.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        value.links().current_list() == Some(self.id)
    }

    /// Appends an object at the tail of the list in O(1).
    ///
    /// The list stores the given reference; the caller may keep further clones of it.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use std::rc::Rc;
    /// # use intrusive_list::{Links, Node, NodeList};
    /// # #[derive(Default)]
    /// # struct Particle {
    /// #     links: Links<Particle>,
    /// # }
    /// # impl Node for Particle {
    /// #     fn links(&self) -> &Links<Self> {
    /// #         &self.links
    /// #     }
    /// # }
    /// let mut list = NodeList::new();
    ///
    /// let particle = Rc::new(Particle::default());
    /// list.push_back(Rc::clone(&particle));
    ///
    /// assert!(list.contains(&particle));
    /// assert_eq!(list.len(), 1);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the object is already in a list (this one or any other).
    pub fn push_back(&mut self, value: Rc<T>) {
        let links = value.links();

        assert!(
            links.current_list().is_none(),
            "cannot add a node that is already in a list"
        );

        links.set_list(Some(self.id));
        links.set_prev(self.tail.as_ref().map(Rc::downgrade));

        match self.tail.take() {
            Some(old_tail) => old_tail.links().set_next(Some(Rc::clone(&value))),
            None => self.head = Some(Rc::clone(&value)),
        }

        self.tail = Some(value);
        self.len = self
            .len
            .checked_add(1)
            .expect("list length cannot exceed usize::MAX because each member is a distinct allocation");
    }

    /// Splices all members of `other` onto the tail of this list, leaving `other` empty.
    ///
    /// The link chains are joined in O(1), but every moved member must have its recorded
    /// list identity rewritten, so the operation is O(len of `other`) overall. Either or
    /// both lists may be empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use std::rc::Rc;
    /// # use intrusive_list::{Links, Node, NodeList};
    /// # #[derive(Default)]
    /// # struct Particle {
    /// #     links: Links<Particle>,
    /// # }
    /// # impl Node for Particle {
    /// #     fn links(&self) -> &Links<Self> {
    /// #         &self.links
    /// #     }
    /// # }
    /// let mut first = NodeList::new();
    /// let mut second = NodeList::new();
    ///
    /// first.push_back(Rc::new(Particle::default()));
    /// second.push_back(Rc::new(Particle::default()));
    /// second.push_back(Rc::new(Particle::default()));
    ///
    /// first.append(&mut second);
    ///
    /// assert_eq!(first.len(), 3);
    /// assert!(second.is_empty());
    /// ```
    pub fn append(&mut self, other: &mut Self) {
        if other.is_empty() {
            return;
        }

        // Rewrite membership while the other chain is still intact.
        let mut cursor = other.head.as_ref().map(Rc::clone);
        while let Some(node) = cursor {
            node.links().set_list(Some(self.id));
            cursor = node.links().next();
        }

        let other_head = other
            .head
            .take()
            .expect("a non-empty list always has a head");
        let other_tail = other
            .tail
            .take()
            .expect("a non-empty list always has a tail");

        match self.tail.take() {
            Some(old_tail) => {
                other_head.links().set_prev(Some(Rc::downgrade(&old_tail)));
                old_tail.links().set_next(Some(other_head));
            }
            None => self.head = Some(other_head),
        }

        self.tail = Some(other_tail);
        self.len = self
            .len
            .checked_add(other.len)
            .expect("list length cannot exceed usize::MAX because each member is a distinct allocation");
        other.len = 0;
    }

    /// Removes an object from the list in O(1), clearing its link state.
    ///
    /// After this returns, the object is unlinked: its next, previous and list references
    /// are all gone and it may be added to any list again.
    ///
    /// # Panics
    ///
    /// Panics if the object is not a member of this specific list - including the case
    /// where it is a member of a different list, and the case where it was already removed.
    pub fn remove(&mut self, value: &T) {
        assert_eq!(
            value.links().current_list(),
            Some(self.id),
            "cannot remove a node that is not a member of this list"
        );

        self.unlink(value);
    }

    /// Removes and returns the first object in O(1).
    ///
    /// # Example
    ///
    /// ```rust
    /// # use std::rc::Rc;
    /// # use intrusive_list::{Links, Node, NodeList};
    /// # #[derive(Default)]
    /// # struct Particle {
    /// #     links: Links<Particle>,
    /// # }
    /// # impl Node for Particle {
    /// #     fn links(&self) -> &Links<Self> {
    /// #         &self.links
    /// #     }
    /// # }
    /// let mut list = NodeList::new();
    ///
    /// let a = Rc::new(Particle::default());
    /// let b = Rc::new(Particle::default());
    /// list.push_back(Rc::clone(&a));
    /// list.push_back(Rc::clone(&b));
    ///
    /// // Members come back out in insertion order.
    /// assert!(Rc::ptr_eq(&list.remove_first(), &a));
    /// assert!(Rc::ptr_eq(&list.remove_first(), &b));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn remove_first(&mut self) -> Rc<T> {
        let first = self
            .head
            .as_ref()
            .map(Rc::clone)
            .expect("cannot remove the first member of an empty list");

        self.unlink(&first);
        first
    }

    /// Removes and returns the last object in O(1).
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn remove_last(&mut self) -> Rc<T> {
        let last = self
            .tail
            .as_ref()
            .map(Rc::clone)
            .expect("cannot remove the last member of an empty list");

        self.unlink(&last);
        last
    }

    /// Returns the first object without removing it, or `None` if the list is empty.
    #[must_use]
    pub fn peek_first(&self) -> Option<Rc<T>> {
        self.head.as_ref().map(Rc::clone)
    }

    /// Returns the last object without removing it, or `None` if the list is empty.
    #[must_use]
    pub fn peek_last(&self) -> Option<Rc<T>> {
        self.tail.as_ref().map(Rc::clone)
    }

    /// Iterates over the list from head to tail without allocating.
    ///
    /// The iterator holds a shared borrow of the list for its entire lifetime, so any
    /// attempt to mutate the list mid-iteration fails to compile. Iteration is restartable:
    /// call `iter()` again for a fresh pass.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_ref().map(Rc::clone),
            remaining: self.len,
            _list: PhantomData,
        }
    }

    /// Detaches `value` from the chain and repairs its neighbors' links.
    ///
    /// Caller has already established that `value` is a member of this list.
    fn unlink(&mut self, value: &T) {
        let links = value.links();

        let next = links.take_next();
        let prev_weak = links.take_prev();
        let prev = prev_weak.as_ref().map(|weak| {
            weak.upgrade()
                .expect("a member's predecessor is kept alive by the list's strong chain")
        });

        // Patch the successor side first; the owned halves then move to their new homes.
        match &next {
            Some(successor) => successor.links().set_prev(prev_weak),
            None => self.tail = prev.as_ref().map(Rc::clone),
        }

        match prev {
            Some(predecessor) => predecessor.links().set_next(next),
            None => self.head = next,
        }

        links.set_list(None);
        self.len = self
            .len
            .checked_sub(1)
            .expect("a list with a member to unlink cannot have length zero");
    }

    /// Verifies the structural invariants of the whole list, panicking on any violation.
    ///
    /// Walks the chain in both directions and checks member state against the list header:
    /// the recorded length matches reachability from either end, the endpoints have no outer
    /// links, and every member records this list as its current list. This is a diagnostic
    /// for tests and debug assertions; correct use of the list cannot violate these
    /// invariants, so release code has no reason to call it.
    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    pub fn integrity_check(&self) {
        if let Some(head) = &self.head {
            assert!(
                head.links().prev().is_none(),
                "the first member must not have a predecessor"
            );
        }

        if let Some(tail) = &self.tail {
            assert!(
                tail.links().next().is_none(),
                "the last member must not have a successor"
            );
        }

        assert_eq!(self.head.is_some(), self.tail.is_some());

        let mut forward = 0_usize;
        let mut cursor = self.head.as_ref().map(Rc::clone);

        while let Some(node) = cursor {
            assert_eq!(
                node.links().current_list(),
                Some(self.id),
                "every member must record this list as its current list"
            );

            forward = forward.checked_add(1).expect("count cannot overflow usize");
            cursor = node.links().next();
        }

        let mut backward = 0_usize;
        let mut cursor = self.tail.as_ref().map(Rc::clone);

        while let Some(node) = cursor {
            backward = backward.checked_add(1).expect("count cannot overflow usize");
            cursor = node
                .links()
                .prev()
                .map(|weak| weak.upgrade().expect("predecessors are kept alive by the strong chain"));
        }

        assert_eq!(forward, self.len, "forward walk must match the recorded length");
        assert_eq!(backward, self.len, "backward walk must match the recorded length");
    }
}

impl<T: Node> Default for NodeList<T> {
    /// Creates an empty list with a fresh identity.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Node> Drop for NodeList<T> {
    /// Unlinks every remaining member so that membership does not outlive the list.
    fn drop(&mut self) {
        while !self.is_empty() {
            _ = self.remove_first();
        }
    }
}

impl<T: Node> fmt::Debug for NodeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeList")
            .field("id", &self.id)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl<'a, T: Node> IntoIterator for &'a NodeList<T> {
    type Item = Rc<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`NodeList`], created by [`NodeList::iter()`].
///
/// Yields a clone of the `Rc` handle of each member from head to tail. Holds a shared borrow
/// of the list, which is what makes mutation during iteration impossible.
pub struct Iter<'a, T: Node> {
    next: Option<Rc<T>>,
    remaining: usize,
    _list: PhantomData<&'a NodeList<T>>,
}

impl<T: Node> Iterator for Iter<'_, T> {
    type Item = Rc<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        self.next = current.links().next();
        self.remaining = self
            .remaining
            .checked_sub(1)
            .expect("the chain cannot be longer than the length captured at iteration start");

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Node> ExactSizeIterator for Iter<'_, T> {}

impl<T: Node> FusedIterator for Iter<'_, T> {}

impl<T: Node> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}
