use std::sync::Arc;

use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use models::period::parse_period;
use service::subscription::domain::Subscription;
use service::subscription::filter::build_filter;
use service::subscription::repository::mock::MockSubscriptionRepository;
use service::subscription::{RequestContext, SubscriptionService, TotalCostRequest};
use uuid::Uuid;

fn bench_parse_and_filter(c: &mut Criterion) {
    c.bench_function("parse_period", |b| {
        b.iter(|| parse_period(criterion::black_box("07-2024")).unwrap());
    });

    let uid = Uuid::new_v4();
    c.bench_function("build_filter", |b| {
        b.iter(|| build_filter(Some(uid), Some("Netflix".into()), "01-2024", "12-2024").unwrap());
    });
}

fn bench_total_cost(c: &mut Criterion) {
    let repo = Arc::new(MockSubscriptionRepository::default());
    let uid = Uuid::new_v4();
    // seed outside of the measured loop
    for i in 0..1_000u32 {
        let month = i % 12 + 1;
        repo.seed(Subscription {
            id: Uuid::new_v4(),
            service_name: format!("svc-{}", i % 10),
            price: 100 + i as i32,
            user_id: uid,
            start_date: parse_period(&format!("{month:02}-2024")).unwrap(),
            end_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
    }
    let svc = SubscriptionService::new(repo);
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ctx = RequestContext::new();

    c.bench_function("total_cost_1k_rows", |b| {
        b.iter(|| {
            let req = TotalCostRequest {
                user_id: Some(uid),
                service_name: None,
                start_period: "06-2024".into(),
                end_period: "12-2024".into(),
            };
            rt.block_on(svc.calculate_total_cost(&ctx, req)).unwrap()
        });
    });
}

criterion_group!(benches, bench_parse_and_filter, bench_total_cost);
criterion_main!(benches);
