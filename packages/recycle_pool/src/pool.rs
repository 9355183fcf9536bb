use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::thread;

use intrusive_list::{Node, NodeList};

use crate::{DropPolicy, PoolBuilder, Poolable};

/// An object pool that recycles instances of a single poolable type.
///
/// In steady state, [`allocate()`][Self::allocate] hands out a recycled instance from the
/// pool's free set and [`free()`] returns it there, so no construction or destruction
/// happens on the hot path. The free set is an intrusive
/// [`NodeList`] of spare instances; moving an instance in or out of it is link surgery on
/// state the instance itself carries, which allocates nothing.
///
/// The pool is used through an [`Rc`] handle (see [`builder()`][Self::builder] and
/// [`new()`][Self::new]), because every item carries a weak back-reference to its owning
/// pool - that is what lets the free function route an item home without the caller naming
/// the pool. The back-reference is set at first construction and never changes: an instance
/// belongs to exactly one pool for its entire life.
///
/// Item lifecycle: constructed lazily when the free set is empty, then cycling between
/// *in use* (handed out, [`initialize()`][Poolable::initialize] has run) and *free* (in the
/// free set, [`reset()`][Poolable::reset] has run) until the pool goes away. The pool never
/// destroys an instance while it exists.
///
/// Misuse - double free, freeing an item that is still in a list, freeing through a dead
/// pool - is a programmer error and panics at the call site.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
///
/// use intrusive_list::{Links, Node};
/// use recycle_pool::{Pool, PoolState, Poolable};
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
///
/// let pool = Pool::new(Projectile::default);
///
/// let projectile = pool.allocate();
/// assert_eq!(projectile.ttl.get(), 120);
///
/// recycle_pool::free(projectile);
/// assert_eq!(pool.free_len(), 1);
///
/// // The next allocation recycles the same instance.
/// let _recycled = pool.allocate();
/// assert_eq!(pool.free_len(), 0);
/// ```
pub struct Pool<T: Poolable> {
    /// Spare instances, available for recycling. The most recently freed instance sits at
    /// the tail and is the first to be handed out again, so the hottest memory is reused.
    free_items: RefCell<NodeList<T>>,

    /// Constructs a new instance when the free set is empty.
    factory: Box<dyn Fn() -> T>,

    /// Our own identity, stamped into every instance we construct so that [`free()`] can
    /// find the way back here.
    this: Weak<Self>,

    /// Number of items currently handed out. Only used for diagnostics and the drop policy.
    outstanding: Cell<usize>,

    drop_policy: DropPolicy,
}

impl<T: Poolable> Pool<T> {
    /// Creates a new [`Pool`] with the given factory and the default configuration.
    ///
    /// The pool starts empty; the factory runs whenever an allocation finds the free set
    /// empty. Use [`builder()`][Self::builder] to customize prefilling or the drop policy.
    #[must_use]
    pub fn new(factory: impl Fn() -> T + 'static) -> Rc<Self> {
        Self::builder().factory(factory).build()
    }

    /// Starts building a new [`Pool`].
    pub fn builder() -> PoolBuilder<T> {
        PoolBuilder::new()
    }

    pub(crate) fn new_inner(
        factory: Box<dyn Fn() -> T>,
        prefill: usize,
        drop_policy: DropPolicy,
    ) -> Rc<Self> {
        let pool = Rc::new_cyclic(|this| Self {
            free_items: RefCell::new(NodeList::new()),
            factory,
            this: Weak::clone(this),
            outstanding: Cell::new(0),
            drop_policy,
        });

        for _ in 0..prefill {
            let item = pool.construct();
            item.pool_state().set_in_free_set(true);
            pool.free_items.borrow_mut().push_back(item);
        }

        pool
    }

    /// Hands out an instance, recycling from the free set when possible.
    ///
    /// If the free set is non-empty, the most recently freed instance is taken - its memory
    /// is the most likely to still be cache-hot. Otherwise the factory constructs a new
    /// instance and this pool stamps itself in as the owner. Either way the instance's
    /// [`initialize()`][Poolable::initialize] hook runs before it is returned.
    ///
    /// This operation cannot fail: exhaustion of the free set means construction, and a
    /// construction failure is a failure of the factory itself (a panic), not a recoverable
    /// condition the pool models.
    #[must_use]
    pub fn allocate(&self) -> Rc<T> {
        let recycled = {
            let mut free_items = self.free_items.borrow_mut();

            if free_items.is_empty() {
                None
            } else {
                Some(free_items.remove_last())
            }
        };

        // Construct outside the borrow so a factory that touches this pool cannot trip
        // the RefCell.
        let item = recycled.unwrap_or_else(|| self.construct());

        item.pool_state().set_in_free_set(false);
        self.outstanding.set(
            self.outstanding
                .get()
                .checked_add(1)
                .expect("cannot have more outstanding items than distinct allocations fit in usize"),
        );

        item.initialize();
        item
    }

    /// The number of instances currently waiting in the free set.
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.free_items.borrow().len()
    }

    /// The number of instances currently handed out and not yet returned.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding.get()
    }

    /// Whether `value` currently sits in this pool's free set.
    ///
    /// Membership in an application list does not count - this asks specifically about the
    /// pool's own internal list. A diagnostic for debug-time assertions; correct code does
    /// not need it to decide anything.
    #[must_use]
    pub fn is_pooled(&self, value: &T) -> bool {
        self.free_items.borrow().contains(value)
    }

    /// Takes back an instance that was handed out by this pool.
    ///
    /// Reached only through [`free()`]; the item's own back-reference picks the pool, so a
    /// mismatch here means corrupted bookkeeping rather than a confused caller.
    pub(crate) fn deallocate(&self, value: Rc<T>) {
        let state = value.pool_state();

        let owner = state
            .owner()
            .expect("an item handed out by a pool always records its owner");
        assert!(
            owner.ptr_eq(&self.this),
            "cannot free an item that belongs to a different pool"
        );
        assert!(
            !state.in_free_set(),
            "cannot free an item that is already in the free set (double free)"
        );
        assert!(
            !value.links().is_linked(),
            "cannot free an item that is still in a list; remove it first"
        );

        value.reset();
        state.set_in_free_set(true);
        self.outstanding.set(
            self.outstanding
                .get()
                .checked_sub(1)
                .expect("cannot return more items than were handed out"),
        );

        self.free_items.borrow_mut().push_back(value);
    }

    fn construct(&self) -> Rc<T> {
        let item = Rc::new((self.factory)());
        item.pool_state().set_owner(Weak::clone(&self.this));
        item
    }
}

impl<T: Poolable> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field(
                "item_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("free_len", &self.free_items.borrow().len())
            .field("outstanding", &self.outstanding.get())
            .field("drop_policy", &self.drop_policy)
            .finish_non_exhaustive()
    }
}

impl<T: Poolable> Drop for Pool<T> {
    fn drop(&mut self) {
        if self.drop_policy == DropPolicy::MustNotHaveOutstanding
            && self.outstanding.get() > 0
            && !thread::panicking()
        {
            panic!(
                "pool dropped while {} items were still outstanding",
                self.outstanding.get()
            );
        }
    }
}

/// Returns an instance to the pool that owns it.
///
/// This is the only public way back into a pool. The instance's own bookkeeping identifies
/// the owner, so call sites do not need a pool reference in hand. The instance's
/// [`reset()`][Poolable::reset] hook runs before it enters the free set.
///
/// The caller must have removed the instance from any [`NodeList`] it was in; this
/// function does not unlink it (it has no mutable access to the owning list) and treats
/// lingering membership as a bug. [`free_all()`] is the convenient way to return a whole
/// list at once.
///
/// # Example
///
/// ```rust
/// # use std::cell::Cell;
/// # use intrusive_list::{Links, Node};
/// # use recycle_pool::{Pool, PoolState, Poolable};
/// # #[derive(Default)]
/// # struct Projectile {
/// #     links: Links<Projectile>,
/// #     pool: PoolState<Projectile>,
/// # }
/// # impl Node for Projectile {
/// #     fn links(&self) -> &Links<Self> {
/// #         &self.links
/// #     }
/// # }
/// # impl Poolable for Projectile {
/// #     fn pool_state(&self) -> &PoolState<Self> {
/// #         &self.pool
/// #     }
/// # }
/// let pool = Pool::new(Projectile::default);
///
/// let projectile = pool.allocate();
/// recycle_pool::free(projectile);
///
/// assert_eq!(pool.free_len(), 1);
/// ```
///
/// # Panics
///
/// Panics if the instance was never allocated from a pool, if its pool no longer exists,
/// if it is already in the free set (double free), or if it is still a member of a list.
pub fn free<T: Poolable>(value: Rc<T>) {
    let pool = value
        .pool_state()
        .owner()
        .expect("cannot free an item that was never allocated from a pool")
        .upgrade()
        .expect("cannot free an item whose owning pool no longer exists");

    pool.deallocate(value);
}

/// Drains a list, returning every member to the pool that owns it.
///
/// Members are removed from the back and freed one by one; each gets its
/// [`reset()`][Poolable::reset] hook exactly once. Draining the list is itself the removal,
/// so no per-element membership checking is needed the way it would be if the caller
/// removed and freed each member by hand. The list is empty when this returns.
///
/// # Panics
///
/// Panics under the same conditions as [`free()`] for any member.
pub fn free_all<T: Poolable>(list: &mut NodeList<T>) {
    while !list.is_empty() {
        free(list.remove_last());
    }
}

#[cfg(test)]
mod tests {
    use static_assertions::assert_not_impl_any;

    use super::*;
    use intrusive_list::Links;
    use crate::PoolState;

    #[derive(Default)]
    struct TestItem {
        links: Links<TestItem>,
        pool: PoolState<TestItem>,
        initialize_count: Cell<usize>,
        reset_count: Cell<usize>,
    }

    impl Node for TestItem {
        fn links(&self) -> &Links<Self> {
            &self.links
        }
    }

    impl Poolable for TestItem {
        fn pool_state(&self) -> &PoolState<Self> {
            &self.pool
        }

        fn initialize(&self) {
            self.initialize_count
                .set(self.initialize_count.get().wrapping_add(1));
        }

        fn reset(&self) {
            self.reset_count.set(self.reset_count.get().wrapping_add(1));
        }
    }

    /// A pool whose factory counts how many instances it has constructed.
    fn counting_pool() -> (Rc<Pool<TestItem>>, Rc<Cell<usize>>) {
        let constructed = Rc::new(Cell::new(0_usize));

        let pool = Pool::new({
            let constructed = Rc::clone(&constructed);
            move || {
                constructed.set(constructed.get().wrapping_add(1));
                TestItem::default()
            }
        });

        (pool, constructed)
    }

    assert_not_impl_any!(Pool<TestItem>: Send, Sync);

    #[test]
    fn smoke_test() {
        let pool = Pool::new(TestItem::default);

        assert_eq!(pool.free_len(), 0);
        assert_eq!(pool.outstanding(), 0);

        let item = pool.allocate();
        assert_eq!(pool.outstanding(), 1);
        assert_eq!(item.initialize_count.get(), 1);

        free(item);
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.free_len(), 1);
    }

    #[test]
    fn allocate_constructs_only_when_free_set_is_empty() {
        let (pool, constructed) = counting_pool();

        let item = pool.allocate();
        assert_eq!(constructed.get(), 1);

        let keep = Rc::clone(&item);
        free(item);

        // Recycled, not constructed.
        let again = pool.allocate();
        assert_eq!(constructed.get(), 1);
        assert!(Rc::ptr_eq(&again, &keep));

        // A second simultaneous allocation does need a new instance.
        let second = pool.allocate();
        assert_eq!(constructed.get(), 2);
        assert!(!Rc::ptr_eq(&second, &again));
    }

    #[test]
    fn hooks_run_on_every_transition() {
        let pool = Pool::new(TestItem::default);

        let item = pool.allocate();
        assert_eq!(item.initialize_count.get(), 1);
        assert_eq!(item.reset_count.get(), 0);

        let keep = Rc::clone(&item);
        free(item);
        assert_eq!(keep.reset_count.get(), 1);

        let again = pool.allocate();
        assert!(Rc::ptr_eq(&again, &keep));
        assert_eq!(again.initialize_count.get(), 2);
        assert_eq!(again.reset_count.get(), 1);
    }

    #[test]
    fn most_recently_freed_is_recycled_first() {
        let pool = Pool::new(TestItem::default);

        let first = pool.allocate();
        let second = pool.allocate();

        let first_keep = Rc::clone(&first);
        let second_keep = Rc::clone(&second);

        free(first);
        free(second);

        assert!(Rc::ptr_eq(&pool.allocate(), &second_keep));
        assert!(Rc::ptr_eq(&pool.allocate(), &first_keep));
    }

    #[test]
    fn freed_item_sits_in_the_free_set() {
        let pool = Pool::new(TestItem::default);

        let item = pool.allocate();
        assert!(!pool.is_pooled(&item));
        assert!(!item.pool_state().in_free_set());

        let keep = Rc::clone(&item);
        free(item);

        assert!(pool.is_pooled(&keep));
        assert!(keep.pool_state().in_free_set());
    }

    #[test]
    fn application_list_membership_is_not_pooled() {
        let pool = Pool::new(TestItem::default);
        let mut active = NodeList::new();

        let item = pool.allocate();
        active.push_back(Rc::clone(&item));

        assert!(!pool.is_pooled(&item));

        active.remove(&item);
        let keep = Rc::clone(&item);
        free(item);

        assert!(pool.is_pooled(&keep));
    }

    #[test]
    fn free_all_drains_and_resets_each_member_once() {
        let pool = Pool::new(TestItem::default);
        let mut active = NodeList::new();

        let a = pool.allocate();
        let b = pool.allocate();
        let c = pool.allocate();

        active.push_back(Rc::clone(&a));
        active.push_back(Rc::clone(&b));
        active.push_back(Rc::clone(&c));

        free_all(&mut active);

        assert_eq!(active.len(), 0);
        assert_eq!(pool.free_len(), 3);
        assert_eq!(pool.outstanding(), 0);

        for item in [&a, &b, &c] {
            assert_eq!(item.reset_count.get(), 1);
            assert!(pool.is_pooled(item));
        }
    }

    #[test]
    fn free_all_on_empty_list_is_noop() {
        let mut empty = NodeList::<TestItem>::new();

        free_all(&mut empty);

        assert!(empty.is_empty());
    }

    #[test]
    fn outstanding_tracks_circulation() {
        let pool = Pool::new(TestItem::default);

        let a = pool.allocate();
        let b = pool.allocate();
        assert_eq!(pool.outstanding(), 2);

        free(a);
        assert_eq!(pool.outstanding(), 1);

        free(b);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    #[should_panic]
    fn double_free_panics() {
        let pool = Pool::new(TestItem::default);

        let item = pool.allocate();
        let again = Rc::clone(&item);

        free(item);
        free(again);
    }

    #[test]
    #[should_panic]
    fn free_while_listed_panics() {
        let pool = Pool::new(TestItem::default);
        let mut active = NodeList::new();

        let item = pool.allocate();
        active.push_back(Rc::clone(&item));

        free(item);
    }

    #[test]
    #[should_panic]
    fn free_never_allocated_panics() {
        let item = Rc::new(TestItem::default());

        free(item);
    }

    #[test]
    #[should_panic]
    fn free_after_pool_dropped_panics() {
        let pool = Pool::new(TestItem::default);
        let item = pool.allocate();

        drop(pool);

        free(item);
    }

    #[test]
    #[should_panic]
    fn deallocate_through_foreign_pool_panics() {
        let owner = Pool::new(TestItem::default);
        let other = Pool::new(TestItem::default);

        let item = owner.allocate();

        other.deallocate(item);
    }

    #[test]
    fn foreign_deallocate_leaves_both_pools_intact() {
        let owner = Pool::new(TestItem::default);
        let other = Pool::new(TestItem::default);

        let item = owner.allocate();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            other.deallocate(Rc::clone(&item));
        }));

        assert!(result.is_err());
        assert_eq!(owner.outstanding(), 1);
        assert_eq!(other.free_len(), 0);
        assert!(!item.pool_state().in_free_set());
    }

    #[test]
    #[should_panic]
    fn strict_drop_policy_with_outstanding_panics() {
        let pool = Pool::builder()
            .factory(TestItem::default)
            .drop_policy(DropPolicy::MustNotHaveOutstanding)
            .build();

        let _item = pool.allocate();

        drop(pool);
    }

    #[test]
    fn strict_drop_policy_without_outstanding_is_ok() {
        let pool = Pool::builder()
            .factory(TestItem::default)
            .drop_policy(DropPolicy::MustNotHaveOutstanding)
            .build();

        let item = pool.allocate();
        free(item);

        drop(pool);
    }

    #[test]
    fn default_drop_policy_tolerates_outstanding() {
        let pool = Pool::new(TestItem::default);

        let item = pool.allocate();

        drop(pool);

        // The item keeps working for its holder; only the way back is gone.
        assert_eq!(item.initialize_count.get(), 1);
    }

    #[test]
    fn pool_drop_releases_free_items() {
        let pool = Pool::new(TestItem::default);

        let item = pool.allocate();
        let weak = Rc::downgrade(&item);
        free(item);

        drop(pool);

        assert!(weak.upgrade().is_none());
    }
}
