use std::fmt;
use std::rc::Rc;

use crate::{DropPolicy, Pool, Poolable};

/// Builder for creating an instance of [`Pool`].
///
/// A factory is mandatory - it is how the pool constructs instances when the free set is
/// empty. Everything else is optional: [`prefill()`][Self::prefill] constructs instances
/// eagerly so the first allocations recycle instead of constructing, and
/// [`drop_policy()`][Self::drop_policy] governs dropping a pool with items still checked
/// out.
///
/// # Examples
///
/// ```
/// use recycle_pool::Pool;
/// # use intrusive_list::{Links, Node};
/// # use recycle_pool::{PoolState, Poolable};
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
///
/// let pool = Pool::builder()
///     .factory(Projectile::default)
///     .prefill(64)
///     .build();
///
/// assert_eq!(pool.free_len(), 64);
/// ```
#[must_use]
pub struct PoolBuilder<T> {
    factory: Option<Box<dyn Fn() -> T>>,
    prefill: usize,
    drop_policy: DropPolicy,
}

impl<T> fmt::Debug for PoolBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolBuilder")
            .field(
                "item_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("has_factory", &self.factory.is_some())
            .field("prefill", &self.prefill)
            .field("drop_policy", &self.drop_policy)
            .finish()
    }
}

impl<T: Poolable> PoolBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            factory: None,
            prefill: 0,
            drop_policy: DropPolicy::default(),
        }
    }

    /// Sets the factory the pool uses to construct an instance when the free set is empty.
    ///
    /// The factory must produce instances in the unlinked, unowned state that
    /// [`Links::default()`][intrusive_list::Links] and
    /// [`PoolState::default()`][crate::PoolState] provide; for most types this is simply
    /// the type's `Default` implementation.
    pub fn factory(mut self, factory: impl Fn() -> T + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Sets the number of instances to construct eagerly when the pool is built.
    ///
    /// Prefilled instances go straight into the free set without running any lifecycle
    /// hook; [`initialize()`][crate::Poolable::initialize] runs when they are first handed
    /// out, like for any other instance.
    pub fn prefill(mut self, count: usize) -> Self {
        self.prefill = count;
        self
    }

    /// Sets the [drop policy][DropPolicy] for the pool. This governs how to treat items
    /// that are still checked out when the pool is dropped.
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the pool with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if no factory was specified.
    #[must_use]
    pub fn build(self) -> Rc<Pool<T>> {
        let factory = self
            .factory
            .expect("a factory must be specified to build a pool");

        Pool::new_inner(factory, self.prefill, self.drop_policy)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use intrusive_list::{Links, Node};

    use super::*;
    use crate::PoolState;

    #[derive(Default)]
    struct TestItem {
        links: Links<TestItem>,
        pool: PoolState<TestItem>,
        generation: Cell<u64>,
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
            self.generation.set(self.generation.get().wrapping_add(1));
        }
    }

    #[test]
    fn defaults_are_empty_pool_with_lenient_drop() {
        let pool = Pool::builder().factory(TestItem::default).build();

        assert_eq!(pool.free_len(), 0);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn prefill_constructs_eagerly() {
        let constructed = Rc::new(Cell::new(0_usize));

        let pool = Pool::builder()
            .factory({
                let constructed = Rc::clone(&constructed);
                move || {
                    constructed.set(constructed.get().wrapping_add(1));
                    TestItem::default()
                }
            })
            .prefill(3)
            .build();

        assert_eq!(constructed.get(), 3);
        assert_eq!(pool.free_len(), 3);

        // Allocation now recycles; nothing further is constructed.
        let item = pool.allocate();
        assert_eq!(constructed.get(), 3);
        assert_eq!(pool.free_len(), 2);

        crate::free(item);
        assert_eq!(pool.free_len(), 3);
    }

    #[test]
    #[should_panic]
    fn build_without_factory_panics() {
        _ = PoolBuilder::<TestItem>::new().build();
    }
}
