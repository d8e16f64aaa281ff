use eligo::{FilterSet, Filterable, Sorter, Subject};
use tracing_subscriber::EnvFilter;

struct Publication {
    id: &'static str,
    voucher_code: Option<&'static str>,
    result: &'static str,
    created_at: u32,
}

impl Filterable for Publication {
    fn subject(&self, field: &str) -> Subject<'_> {
        match field {
            "voucher_code" => self.voucher_code.into(),
            "result" => self.result.into(),
            _ => Subject::Absent,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let publications = vec![
        Publication { id: "pub_1", voucher_code: Some("SUMMER-1"), result: "SUCCESS", created_at: 1 },
        Publication { id: "pub_2", voucher_code: None, result: "FAILURE", created_at: 2 },
        Publication { id: "pub_3", voucher_code: Some("WINTER-1"), result: "SUCCESS", created_at: 3 },
        Publication { id: "pub_4", voucher_code: Some("SUMMER-2"), result: "FAILURE", created_at: 4 },
    ];

    let sorter = Sorter::new("created_at", |a: &Publication, b: &Publication| {
        a.created_at.cmp(&b.created_at)
    })
    .with("voucher_code", |a, b| a.voucher_code.cmp(&b.voucher_code));

    let queries: [&[(&str, &str)]; 3] = [
        &[
            ("filters[voucher_code][conditions][$contains]", "summer"),
            ("filters[result][conditions][$is]", "SUCCESS"),
        ],
        &[
            ("filters[voucher_code][conditions][$contains]", "summer"),
            ("filters[result][conditions][$is]", "SUCCESS"),
            ("filters[junction]", "OR"),
            ("order", "voucher_code"),
        ],
        &[("filters[voucher_code][conditions][$is_unknown]", "true")],
    ];

    for pairs in queries {
        let set = FilterSet::from_query(pairs.iter().copied()).expect("invalid filter query");
        let ids: Vec<&str> = set.apply(&publications, &sorter).iter().map(|p| p.id).collect();
        println!("{pairs:?}\n  -> {ids:?}");
    }
}
