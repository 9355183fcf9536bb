use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Weak;

use intrusive_list::Node;

use crate::Pool;

/// Types whose instances can be recycled through a [`Pool`].
///
/// A poolable type is a list-capable type (see [`Node`]) that additionally carries the
/// pool-side bookkeeping: which pool owns the instance and whether it currently sits in
/// that pool's free set. Both live in an embedded [`PoolState<Self>`] field, mirroring how
/// the list links live in an embedded [`Links`][intrusive_list::Links] field.
///
/// The two lifecycle hooks bracket every trip through the pool:
///
/// - [`initialize()`][Self::initialize] runs each time the instance is handed out by
///   [`Pool::allocate()`], whether freshly constructed or recycled.
/// - [`reset()`][Self::reset] runs each time the instance is returned via
///   [`free()`][crate::free], before it enters the free set.
///
/// Instances circulate as shared [`Rc`][std::rc::Rc] handles, so the hooks take `&self`
/// and recyclable state belongs in [`Cell`]/[`RefCell`] fields.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
///
/// use intrusive_list::{Links, Node};
/// use recycle_pool::{PoolState, Poolable};
///
/// #[derive(Default)]
/// struct Projectile {
///     links: Links<Projectile>,
///     pool: PoolState<Projectile>,
///     ttl: Cell<u32>,
/// }
///
/// impl Node for Projectile {
///     fn links(&self) -> &Links<Self> {
///         &self.links
///     }
/// }
///
/// impl Poolable for Projectile {
///     fn pool_state(&self) -> &PoolState<Self> {
///         &self.pool
///     }
///
///     fn initialize(&self) {
///         self.ttl.set(120);
///     }
///
///     fn reset(&self) {
///         self.ttl.set(0);
///     }
/// }
/// ```
pub trait Poolable: Node {
    /// Borrows the embedded pool bookkeeping state of this instance.
    ///
    /// The returned [`PoolState`] must be a field of `self` - the pool treats it as the
    /// object's own state.
    fn pool_state(&self) -> &PoolState<Self>;

    /// Called every time this instance is handed out by [`Pool::allocate()`].
    ///
    /// Runs after the instance has left the free set (or straight after construction) and
    /// before `allocate` returns it. The default does nothing.
    fn initialize(&self) {}

    /// Called every time this instance is returned via [`free()`][crate::free].
    ///
    /// Runs before the instance enters the free set. Use it to drop or clear whatever the
    /// instance accumulated while in use. The default does nothing.
    fn reset(&self) {}
}

/// Default embedded storage for the pool side of the [`Poolable`] contract.
///
/// Embed one of these next to your [`Links`][intrusive_list::Links] field and return it
/// from [`Poolable::pool_state()`]. A fresh (default) instance belongs to no pool; the
/// owning pool stamps itself in at first allocation and the identity never changes after
/// that. The relation is held as a [`Weak`] reference - owning an item does not keep its
/// pool alive.
pub struct PoolState<T: Poolable> {
    owner: RefCell<Option<Weak<Pool<T>>>>,
    in_free_set: Cell<bool>,
}

impl<T: Poolable> PoolState<T> {
    pub(crate) fn owner(&self) -> Option<Weak<Pool<T>>> {
        self.owner.borrow().as_ref().map(Weak::clone)
    }

    pub(crate) fn set_owner(&self, owner: Weak<Pool<T>>) {
        *self.owner.borrow_mut() = Some(owner);
    }

    pub(crate) fn in_free_set(&self) -> bool {
        self.in_free_set.get()
    }

    pub(crate) fn set_in_free_set(&self, in_free_set: bool) {
        self.in_free_set.set(in_free_set);
    }
}

impl<T: Poolable> Default for PoolState<T> {
    /// Creates bookkeeping state for an instance that no pool owns yet.
    fn default() -> Self {
        Self {
            owner: RefCell::new(None),
            in_free_set: Cell::new(false),
        }
    }
}

impl<T: Poolable> fmt::Debug for PoolState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolState")
            .field("has_owner", &self.owner.borrow().is_some())
            .field("in_free_set", &self.in_free_set.get())
            .finish()
    }
}
