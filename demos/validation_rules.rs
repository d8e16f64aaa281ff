use eligo::{
    Campaign, Context, Customer, EvaluationOptions, Order, OrderItem, ValidationRules, Voucher,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rules = ValidationRules::from_json(&json!({
        "rules": {
            "1": {"name": "order.amount", "conditions": {"$gte": 1000}},
            "2": {"name": "customer.email", "conditions": {"$contains": "@x.com"}},
            "3": {"name": "order.items.sku", "conditions": {"$contains_any": ["A", "Z"]}},
            "4": {"name": "redemptions.count.per_customer", "conditions": {"$lt": 1}}
        },
        "logic": "(1 and 2) or 3 and 4"
    }))
    .expect("failed to compile rules");

    println!("{rules}");

    let ctx = Context::new(Voucher::new("SUMMER-24").with_campaign(Campaign::new("summer")))
        .with_customer(Customer::new().with_source_id("cust_1").with_email("a@x.com"))
        .with_order(
            Order::new(1500)
                .with_item(OrderItem::new("A", 1))
                .with_item(OrderItem::new("B", 2)),
        )
        .with_counters(12, 0);

    println!("eligible: {}", rules.evaluate(&ctx));

    let customer_only = EvaluationOptions::new().allow_prefix("customer.");
    let report = rules.evaluate_detailed(&ctx, &customer_only);
    println!("{report}");

    // Malformed payloads still evaluate, failing the broken rule closed.
    let lenient = ValidationRules::from_json_lenient(&json!({
        "rules": {
            "1": {"name": "order.amount", "conditions": {"$between": [1, 10]}},
            "2": {"name": "voucher.code", "conditions": {"$eq": "SUMMER-24"}}
        },
        "logic": "1 or"
    }));
    for problem in lenient.diagnostics() {
        println!("diagnostic: {problem}");
    }
    println!("lenient result: {}", lenient.evaluate(&ctx));

    // Legacy redemption limits.
    let legacy = json!({"redemptions": {"quantity": 10, "per_customer": 1}});
    println!("legacy result: {}", eligo::evaluate(&legacy, &ctx));
}
