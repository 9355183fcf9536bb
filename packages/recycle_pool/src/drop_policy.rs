/// Determines how a [`Pool`][crate::Pool] reacts to being dropped while some of its items
/// are still checked out.
///
/// Items in the free set are always released together with the pool. Items in use are kept
/// alive by whoever holds them; only their way back into a pool disappears. The policy
/// governs whether that situation is acceptable.
///
/// # Examples
///
/// ```
/// use recycle_pool::{DropPolicy, Pool};
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
/// // The drop policy is set at pool creation time.
/// let pool = Pool::builder()
///     .factory(Projectile::default)
///     .drop_policy(DropPolicy::MustNotHaveOutstanding)
///     .build();
///
/// // Every allocation must be returned before the pool goes away.
/// let projectile = pool.allocate();
/// recycle_pool::free(projectile);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The pool may be dropped while items are still checked out. This is the default.
    ///
    /// Outstanding items keep working for as long as their holders keep them; attempting to
    /// [`free()`][crate::free] one afterwards panics because the owning pool is gone.
    #[default]
    MayDropOutstanding,

    /// The pool will panic if it is dropped while items are still checked out.
    ///
    /// This may be valuable for catching leaks: in steady-state designs every item is
    /// expected to be back in the free set by the time the pool itself goes away.
    MustNotHaveOutstanding,
}
