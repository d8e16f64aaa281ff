use std::sync::Arc;
use std::thread;

use eligo::{Context, Customer, FilterSet, Metadata, Order, Sorter, ValidationRules, Value, Voucher};
use serde_json::json;

#[test]
fn evaluate_across_threads() {
    let rules = Arc::new(
        ValidationRules::from_json(&json!({
            "rules": {
                "min_amount": {"name": "order.amount", "conditions": {"$gte": 1000}},
                "corporate": {"name": "customer.email", "conditions": {"$contains": "@x.com"}},
                "vip": {"name": "customer.metadata.tier", "conditions": {"$is": ["gold"]}}
            },
            "logic": "min_amount and corporate or vip"
        }))
        .unwrap(),
    );

    let contexts = vec![
        // amount and email -> true
        (1500, "a@x.com", "silver"),
        // gold tier rescues a small order -> true
        (10, "b@y.com", "gold"),
        // neither branch -> false
        (10, "a@x.com", "silver"),
        // big order, wrong domain -> false
        (5000, "b@y.com", "bronze"),
    ];

    let handles: Vec<_> = contexts
        .into_iter()
        .map(|(amount, email, tier)| {
            let rules = Arc::clone(&rules);
            thread::spawn(move || {
                let ctx = Context::new(Voucher::new("V"))
                    .with_customer(Customer::new().with_email(email).with_metadata("tier", tier))
                    .with_order(Order::new(amount));
                (0..100).map(|_| rules.evaluate(&ctx)).collect::<Vec<bool>>()
            })
        })
        .collect();

    let results: Vec<Vec<bool>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let expected = [true, true, false, false];
    for (runs, want) in results.iter().zip(expected) {
        assert!(runs.iter().all(|r| *r == want));
    }
}

#[test]
fn filter_across_threads() {
    let rows: Arc<Vec<Metadata>> = Arc::new(
        (0..50_i64)
            .map(|i| {
                let mut m = Metadata::new();
                m.insert("code".into(), Value::from(format!("CODE-{i:02}")));
                m.insert("created_at".into(), Value::from(i));
                m
            })
            .collect(),
    );
    let set = Arc::new(
        FilterSet::from_query([
            ("filters[code][conditions][$starts_with]", "code-1"),
            ("order", "created_at"),
        ])
        .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let rows = Arc::clone(&rows);
            let set = Arc::clone(&set);
            thread::spawn(move || {
                let sorter = Sorter::new("created_at", |a: &Metadata, b: &Metadata| {
                    let at = |m: &Metadata| m.get("created_at").and_then(Value::as_decimal);
                    at(a).cmp(&at(b))
                });
                set.apply(&rows, &sorter)
                    .iter()
                    .filter_map(|m| m.get("code").and_then(Value::as_str).map(str::to_owned))
                    .collect::<Vec<String>>()
            })
        })
        .collect();

    let expected: Vec<String> = (10..20).map(|i| format!("CODE-{i}")).collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
