// benches/bench_batch_simulation.rs

use bridge_crossing::bridge::BridgeController;
use bridge_crossing::schedule::Batch;
use bridge_crossing::simulation::{GroupScheduler, SimClock, VehicleGenerator};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::time::Duration;

fn bench_batch_simulation(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");

    let mut group = c.benchmark_group("batch_simulation");
    group.sample_size(20);

    for &count in &[10u32, 40] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                rt.block_on(async {
                    let controller = Arc::new(BridgeController::new(Duration::ZERO));
                    let scheduler = GroupScheduler::new(
                        controller,
                        VehicleGenerator::new(Some(11)),
                        SimClock::start(),
                    );
                    let schedule = [
                        Batch {
                            count,
                            northbound_probability: 0.5,
                            delay_secs: 0,
                        },
                        Batch {
                            count,
                            northbound_probability: 0.3,
                            delay_secs: 0,
                        },
                    ];
                    black_box(scheduler.run(&schedule).await)
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_batch_simulation);
criterion_main!(benches);
