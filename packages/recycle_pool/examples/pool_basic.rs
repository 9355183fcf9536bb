//! Demonstrates the basic operations of `Pool`.
//!
//! Shows allocation, recycling by identity, bulk return through a list, and prefilling.

use std::cell::Cell;
use std::rc::Rc;

use intrusive_list::{Links, Node, NodeList};
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

fn demonstrate_allocation() {
    println!("Example 1: Allocation and lifecycle hooks");
    println!("-----------------------------------------");

    let pool = Pool::new(Projectile::default);

    let projectile = pool.allocate();
    println!(
        "Allocated; initialize() has run: ttl = {}",
        projectile.ttl.get()
    );
    println!(
        "Free set: {}, outstanding: {}",
        pool.free_len(),
        pool.outstanding()
    );

    recycle_pool::free(projectile);
    println!(
        "After free: free set = {}, outstanding = {}",
        pool.free_len(),
        pool.outstanding()
    );

    println!();
}

fn demonstrate_recycling_identity() {
    println!("Example 2: Recycling returns the same instance");
    println!("----------------------------------------------");

    let pool = Pool::new(Projectile::default);

    let first = pool.allocate();
    let remembered = Rc::clone(&first);
    recycle_pool::free(first);

    let second = pool.allocate();
    println!(
        "Recycled the exact same instance: {}",
        Rc::ptr_eq(&second, &remembered)
    );

    recycle_pool::free(second);

    println!();
}

fn demonstrate_bulk_return() {
    println!("Example 3: Returning a whole list at once");
    println!("-----------------------------------------");

    let pool = Pool::new(Projectile::default);
    let mut in_flight = NodeList::new();

    for _ in 0..5 {
        in_flight.push_back(pool.allocate());
    }
    println!(
        "Spawned: in_flight = {}, outstanding = {}",
        in_flight.len(),
        pool.outstanding()
    );

    recycle_pool::free_all(&mut in_flight);
    println!(
        "After free_all: in_flight = {}, free set = {}",
        in_flight.len(),
        pool.free_len()
    );

    println!();
}

fn demonstrate_prefill() {
    println!("Example 4: Prefilling the free set");
    println!("----------------------------------");

    let pool = Pool::builder()
        .factory(Projectile::default)
        .prefill(8)
        .build();

    println!("Built with prefill(8): free set = {}", pool.free_len());

    let projectile = pool.allocate();
    println!(
        "First allocation recycled a prefilled instance: free set = {}",
        pool.free_len()
    );

    recycle_pool::free(projectile);

    println!();
}

fn main() {
    println!("=== Pool Examples ===");
    println!();

    demonstrate_allocation();
    demonstrate_recycling_identity();
    demonstrate_bulk_return();
    demonstrate_prefill();

    println!("Pool example completed successfully!");
}
