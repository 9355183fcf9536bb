//! An object pool that recycles instances of a fixed type instead of freeing them.
//!
//! This crate provides [`Pool`], a free-list-backed allocator for performance-sensitive
//! code that must not pay construction or heap-allocation costs in hot loops. Together
//! with its companion crate [`intrusive_list`], it makes steady-state execution fully
//! allocation-free: instances are constructed once, then circulate between "in use" and
//! the pool's free set for the life of the process.
//!
//! # Key Features
//!
//! - **Recycling allocation**: [`Pool::allocate()`] hands out the most recently freed
//!   instance (cache-hot) and only constructs when the free set is empty
//! - **Lifecycle hooks**: a poolable type's [`initialize()`][Poolable::initialize] runs on
//!   every hand-out and [`reset()`][Poolable::reset] on every return
//! - **Self-routing return**: [`free()`] finds the owning pool through the instance's own
//!   bookkeeping; call sites need no pool reference
//! - **Bulk return**: [`free_all()`] drains an entire [`NodeList`][intrusive_list::NodeList]
//!   back into the pool
//! - **Leak detection**: an optional [`DropPolicy`] panics if a pool is dropped while
//!   items are still checked out
//! - **Misuse is caught at the call site**: double frees, freeing a still-listed item and
//!   freeing through a dead pool all panic immediately
//!
//! A poolable type embeds two pieces of state - [`Links`][intrusive_list::Links] for list
//! membership and [`PoolState`] for pool membership - and implements the [`Node`][intrusive_list::Node]
//! and [`Poolable`] traits by returning them. Instances circulate as
//! [`Rc`][std::rc::Rc] handles, so everything here is single-threaded (`!Send`, `!Sync`);
//! wrap the pool in a lock if it must be shared, as with any externally-synchronized use.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//!
//! use intrusive_list::{Links, Node, NodeList};
//! use recycle_pool::{Pool, PoolState, Poolable};
//!
//! #[derive(Default)]
//! struct Projectile {
//!     links: Links<Projectile>,
//!     pool: PoolState<Projectile>,
//!     ttl: Cell<u32>,
//! }
//!
//! impl Node for Projectile {
//!     fn links(&self) -> &Links<Self> {
//!         &self.links
//!     }
//! }
//!
//! impl Poolable for Projectile {
//!     fn pool_state(&self) -> &PoolState<Self> {
//!         &self.pool
//!     }
//!
//!     fn initialize(&self) {
//!         self.ttl.set(120);
//!     }
//!
//!     fn reset(&self) {
//!         self.ttl.set(0);
//!     }
//! }
//!
//! let pool = Pool::new(Projectile::default);
//! let mut in_flight = NodeList::new();
//!
//! // Spawn: allocate and track.
//! for _ in 0..3 {
//!     in_flight.push_back(pool.allocate());
//! }
//! assert_eq!(pool.outstanding(), 3);
//!
//! // End of frame: everything goes back to the pool in one sweep.
//! recycle_pool::free_all(&mut in_flight);
//! assert_eq!(pool.outstanding(), 0);
//! assert_eq!(pool.free_len(), 3);
//!
//! // The next spawn recycles instead of constructing.
//! let projectile = pool.allocate();
//! assert_eq!(projectile.ttl.get(), 120);
//! # recycle_pool::free(projectile);
//! ```

mod builder;
mod drop_policy;
mod pool;
mod poolable;

pub use builder::*;
pub use drop_policy::*;
pub use pool::*;
pub use poolable::*;
