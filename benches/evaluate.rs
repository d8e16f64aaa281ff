use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eligo::{
    Context, Customer, FilterSet, Metadata, Order, OrderItem, Sorter, ValidationRules, Value,
    Voucher,
};
use serde_json::{json, Map, Value as Json};

/// Build a payload with `n` order-amount rules chained by `and`.
fn build_payload(n: usize) -> Json {
    let mut rules = Map::new();
    for i in 0..n {
        rules.insert(
            format!("r{i}"),
            json!({"name": "order.amount", "conditions": {"$gte": i}}),
        );
    }
    let logic = (0..n).map(|i| format!("r{i}")).collect::<Vec<_>>().join(" and ");
    json!({"rules": rules, "logic": logic})
}

fn build_context(items: usize) -> Context {
    let mut order = Order::new(10_000);
    for i in 0..items {
        order = order.with_item(OrderItem::new(format!("SKU-{i}"), 1).with_price(100));
    }
    Context::new(Voucher::new("BENCH"))
        .with_customer(Customer::new().with_email("bench@x.com"))
        .with_order(order)
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_eval");
    let ctx = build_context(10);

    for &n in &[5, 20, 50] {
        let payload = build_payload(n);
        let rules = ValidationRules::from_json(&payload).unwrap();

        group.bench_function(&format!("{n}_rules_compiled"), |b| {
            b.iter(|| rules.evaluate(black_box(&ctx)));
        });

        group.bench_function(&format!("{n}_rules_from_payload"), |b| {
            b.iter(|| eligo::evaluate(black_box(&payload), black_box(&ctx)));
        });
    }

    group.finish();
}

fn bench_item_collections(c: &mut Criterion) {
    let mut group = c.benchmark_group("item_collections");
    let rules = ValidationRules::from_json(&json!({
        "rules": {
            "1": {"name": "order.items.sku", "conditions": {"$contains_any": ["SKU-MISSING", "SKU-0"]}},
            "2": {"name": "order.items.price", "conditions": {"$gte": 100}}
        }
    }))
    .unwrap();

    for &items in &[10, 100, 1000] {
        let ctx = build_context(items);
        group.bench_function(&format!("{items}_items"), |b| {
            b.iter(|| rules.evaluate(black_box(&ctx)));
        });
    }

    group.finish();
}

fn bench_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("compilation");

    for &n in &[5, 20, 50] {
        let payload = build_payload(n);
        group.bench_function(&format!("{n}_rules"), |b| {
            b.iter(|| black_box(ValidationRules::from_json(black_box(&payload)).unwrap()));
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let set = FilterSet::from_query([
        ("filters[code][conditions][$starts_with]", "summer"),
        ("filters[result][conditions][$in][]", "SUCCESS"),
        ("filters[result][conditions][$in][]", "PENDING"),
        ("order", "-created_at"),
    ])
    .unwrap();
    let sorter = Sorter::new("created_at", |a: &Metadata, b: &Metadata| {
        let at = |m: &Metadata| m.get("created_at").and_then(Value::as_decimal);
        at(a).cmp(&at(b))
    });

    for &n in &[100, 1000, 10_000] {
        let rows: Vec<Metadata> = (0..n)
            .map(|i: i64| {
                let mut m = Metadata::new();
                let season = if i % 2 == 0 { "SUMMER" } else { "WINTER" };
                let result = if i % 3 == 0 { "FAILURE" } else { "SUCCESS" };
                m.insert("code".into(), Value::from(format!("{season}-{i}")));
                m.insert("result".into(), Value::from(result));
                m.insert("created_at".into(), Value::from(i));
                m
            })
            .collect();

        group.bench_function(&format!("{n}_rows"), |b| {
            b.iter(|| set.apply(black_box(&rows), &sorter).len());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_item_collections,
    bench_compilation,
    bench_filter
);
criterion_main!(benches);
