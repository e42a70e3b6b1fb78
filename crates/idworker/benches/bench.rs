use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use idworker::{
    AtomicIdGenerator, BasicIdGenerator, IdGenerator, IdWorkerId, LockIdGenerator, Poll,
    SystemClock, TimeSource, WorkerConfig,
};
use std::{
    sync::Barrier,
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded). One full millisecond of sequence space.
const TOTAL_IDS: usize = 4096;

/// Benchmarks a hot-path generator where IDs are always `Ready`.
fn bench_generator<G, T>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: IdGenerator<IdWorkerId, T>,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    match generator.poll_id() {
                        Poll::Ready { id } => {
                            black_box(id);
                        }
                        Poll::Pending { .. } => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks generators against the wall clock, where callers spin through
/// exhausted milliseconds.
fn bench_generator_spin<G, T>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: IdGenerator<IdWorkerId, T>,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one shared generator across threads.
fn bench_generator_threaded<G, T>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: IdGenerator<IdWorkerId, T> + Send + Sync,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);

    for threads in [2, 4, 8] {
        group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{threads}"), |b| {
            b.iter_custom(|iters| {
                let mut total = core::time::Duration::ZERO;
                for _ in 0..iters {
                    let generator = generator_factory();
                    let barrier = Barrier::new(threads + 1);
                    let mut start = None;

                    scope(|s| {
                        for _ in 0..threads {
                            s.spawn(|| {
                                barrier.wait();
                                for _ in 0..TOTAL_IDS {
                                    black_box(generator.next_id());
                                }
                            });
                        }
                        barrier.wait();
                        start = Some(Instant::now());
                    });
                    // The scope joined every thread before returning
                    total += start.map(|t| t.elapsed()).unwrap_or_default();
                }
                total
            });
        });
    }

    group.finish();
}

fn benches(c: &mut Criterion) {
    let config = WorkerConfig::<IdWorkerId>::new(1, 1).expect("valid config");

    bench_generator(c, "mono/basic", || {
        BasicIdGenerator::new(config, FixedMockTime { millis: 1 })
    });
    bench_generator(c, "mono/lock", || {
        LockIdGenerator::new(config, FixedMockTime { millis: 1 })
    });
    bench_generator(c, "mono/atomic", || {
        AtomicIdGenerator::new(config, FixedMockTime { millis: 1 })
    });

    let clock = SystemClock::default();
    bench_generator_spin(c, "mono/clock/basic", || BasicIdGenerator::new(config, clock));
    bench_generator_spin(c, "mono/clock/lock", || LockIdGenerator::new(config, clock));
    bench_generator_spin(c, "mono/clock/atomic", || AtomicIdGenerator::new(config, clock));

    bench_generator_threaded(c, "multi/clock/lock", || LockIdGenerator::new(config, clock));
    bench_generator_threaded(c, "multi/clock/atomic", || {
        AtomicIdGenerator::new(config, clock)
    });
}

criterion_group!(benchmarks, benches);
criterion_main!(benchmarks);
