//! Basic benchmarks for the `recycle_pool` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::time::Instant;

use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};
use intrusive_list::{Links, Node, NodeList};
use recycle_pool::{Pool, PoolState, Poolable};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

#[derive(Default)]
struct TestItem {
    links: Links<TestItem>,
    pool: PoolState<TestItem>,
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
}

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("pool_cycle");

    let allocs_op = allocs.operation("allocate_free_cycle");
    group.bench_function("allocate_free_cycle", |b| {
        b.iter_custom(|iters| {
            let pool = Pool::new(TestItem::default);

            // Warm the pool so the measured loop is pure recycling.
            recycle_pool::free(pool.allocate());

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                recycle_pool::free(black_box(pool.allocate()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("free_all_100");
    group.bench_function("free_all_100", |b| {
        b.iter_custom(|iters| {
            let pool = Pool::builder()
                .factory(TestItem::default)
                .prefill(100)
                .build();

            let mut in_flight = NodeList::new();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                for _ in 0..100 {
                    in_flight.push_back(pool.allocate());
                }

                recycle_pool::free_all(&mut in_flight);
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
