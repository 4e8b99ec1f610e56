use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use referral_report::{join::left_join, table::Table};

fn referrals(rows: usize) -> Table {
    let headers = ["referral_id", "referee_id", "user_referral_status_id"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows = (0..rows)
        .map(|i| vec![i.to_string(), (i * 7 % 1000).to_string(), (i % 5).to_string()])
        .collect();
    Table::new("user_referrals", headers, rows).expect("referrals")
}

fn leads(rows: usize) -> Table {
    let headers = ["lead_id", "col2", "col3"].iter().map(|h| h.to_string()).collect();
    let rows = (0..rows)
        .map(|i| {
            let source = match i % 3 {
                0 => "web",
                1 => "app",
                _ => "referral",
            };
            vec![i.to_string(), source.to_string(), format!("2024-01-{:02}", i % 28 + 1)]
        })
        .collect();
    Table::new("lead_logs", headers, rows).expect("leads")
}

fn bench_left_join(c: &mut Criterion) {
    let left = referrals(50_000);
    let right = leads(1_000);
    c.bench_function("left_join_referee_to_lead", |b| {
        b.iter(|| left_join(black_box(&left), black_box(&right), "referee_id", "lead_id").expect("join"))
    });
}

criterion_group!(benches, bench_left_join);
criterion_main!(benches);
