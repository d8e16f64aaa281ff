use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, Criterion};
use eligo::{Context, Customer, Order, ValidationRules, Voucher};
use serde_json::{json, Map};

fn build_shared_rules() -> (Arc<ValidationRules>, Context) {
    let n = 20;
    let mut rules = Map::new();
    for i in 0..n {
        rules.insert(
            format!("r{i}"),
            json!({"name": "customer.metadata.score", "conditions": {"$gte": i}}),
        );
    }
    let logic = (0..n).map(|i| format!("r{i}")).collect::<Vec<_>>().join(" and ");
    let compiled = ValidationRules::from_json(&json!({"rules": rules, "logic": logic})).unwrap();

    let ctx = Context::new(Voucher::new("BENCH"))
        .with_customer(Customer::new().with_metadata("score", 100_i64))
        .with_order(Order::new(1000));

    (Arc::new(compiled), ctx)
}

fn bench_throughput(c: &mut Criterion) {
    let thread_counts = [1, 2, 4, 8];

    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(5));

    for &threads in &thread_counts {
        let (rules, ctx) = build_shared_rules();

        group.bench_function(&format!("{threads}_threads"), |b| {
            b.iter_custom(|iters| {
                let per_thread = iters / threads as u64;
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let rules = Arc::clone(&rules);
                        let c = ctx.clone();
                        thread::spawn(move || {
                            let start = Instant::now();
                            for _ in 0..per_thread {
                                let _ = rules.evaluate(&c);
                            }
                            start.elapsed()
                        })
                    })
                    .collect();

                let mut max_elapsed = Duration::ZERO;
                for h in handles {
                    let elapsed = h.join().unwrap();
                    if elapsed > max_elapsed {
                        max_elapsed = elapsed;
                    }
                }
                max_elapsed
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
