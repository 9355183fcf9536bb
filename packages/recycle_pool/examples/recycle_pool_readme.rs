//! Example from the package README.

use std::cell::Cell;

use intrusive_list::{Links, Node};
use recycle_pool::{Pool, PoolState, Poolable};

#[derive(Default)]
struct Projectile {
    links: Links<Projectile>,
    pool: PoolState<Projectile>,
    ttl: Cell<u32>,
}

impl Node for Projectile {
    fn links(&self) -> &Links<Self> {
        &self.links
    }
}

impl Poolable for Projectile {
    fn pool_state(&self) -> &PoolState<Self> {
        &self.pool
    }

    fn initialize(&self) {
        self.ttl.set(120);
    }

    fn reset(&self) {
        self.ttl.set(0);
    }
}

fn main() {
    let pool = Pool::new(Projectile::default);

    let projectile = pool.allocate();
    assert_eq!(projectile.ttl.get(), 120);

    recycle_pool::free(projectile);
    assert_eq!(pool.free_len(), 1);

    println!("README example completed successfully!");
}
