// benches/bench_wait_queue.rs

use bridge_crossing::bridge::queue::WaitQueue;
use bridge_crossing::bridge::{Direction, Vehicle, VehicleId, VehicleKind};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use tokio::sync::Notify;

fn bench_queue_churn(c: &mut Criterion) {
    let batch_sizes = [10, 50, 200];
    let mut group = c.benchmark_group("wait_queue_churn");

    for &batch_size in &batch_sizes {
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &size| {
                b.iter(|| {
                    let mut queue = WaitQueue::new();
                    for id in 0..size as u64 {
                        let direction = if id % 3 == 0 {
                            Direction::Northbound
                        } else {
                            Direction::Southbound
                        };
                        queue.push_back(
                            Vehicle::new(VehicleId(id), VehicleKind::Car, direction),
                            Arc::new(Notify::new()),
                        );
                    }
                    black_box(queue.heading(Direction::Northbound).count());
                    while let Some(entry) = queue.pop_front() {
                        queue.wake_head();
                        black_box(entry.vehicle.id);
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_queue_churn);
criterion_main!(benches);
