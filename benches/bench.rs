// Criterion benchmarks for FitLink Match

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use fitlink_match::core::{MatchTelemetry, RequestMatcher, fuzzy_match, similarity};
use fitlink_match::models::{RequestStatus, SearchCriteria, StoredRequest};
use chrono::Utc;

fn create_request(id: usize) -> StoredRequest {
    let now = Utc::now();
    // Alternate between account ids and emails, like real stored data
    let member_id = if id % 2 == 0 {
        format!("user_{:05}", id)
    } else {
        format!("member{}@gym{}.io", id, id % 7)
    };

    StoredRequest {
        id: id.to_string(),
        trainer_id: format!("trainer_{}", id % 13),
        member_id,
        status: RequestStatus::Pending,
        message: None,
        created_at: now,
        updated_at: now,
    }
}

fn bench_similarity(c: &mut Criterion) {
    c.bench_function("similarity", |b| {
        b.iter(|| similarity(black_box("jane.doe@gym.io"), black_box("jane.do@gym.io")));
    });

    c.bench_function("fuzzy_match", |b| {
        b.iter(|| fuzzy_match(black_box("USR_9999"), black_box("usr_9998"), black_box(0.8)));
    });
}

fn bench_matching(c: &mut Criterion) {
    let matcher = RequestMatcher::new();
    let mut group = c.benchmark_group("matching");

    for request_count in [10, 100, 1000].iter() {
        let requests: Vec<StoredRequest> = (0..*request_count).map(create_request).collect();

        // Exact hit on the first tier
        let exact = SearchCriteria::by_account_id("user_00004");
        // Falls through every tier
        let miss = SearchCriteria::new(
            Some("nobody_here".to_string()),
            Some("ghost@nowhere.example".to_string()),
        );

        group.bench_with_input(
            BenchmarkId::new("exact_hit", request_count),
            request_count,
            |b, _| b.iter(|| matcher.find_requests(black_box(&exact), black_box(&requests))),
        );

        group.bench_with_input(
            BenchmarkId::new("full_cascade_miss", request_count),
            request_count,
            |b, _| b.iter(|| matcher.find_requests(black_box(&miss), black_box(&requests))),
        );
    }

    group.finish();
}

fn bench_recorded_matching(c: &mut Criterion) {
    let matcher = RequestMatcher::new();
    let telemetry = MatchTelemetry::new();
    let requests: Vec<StoredRequest> = (0..100).map(create_request).collect();
    let criteria = SearchCriteria::by_email("member3@gym3.io");

    c.bench_function("find_requests_recorded_100", |b| {
        b.iter(|| matcher.find_requests_recorded(black_box(&criteria), black_box(&requests), &telemetry));
    });
}

criterion_group!(
    benches,
    bench_similarity,
    bench_matching,
    bench_recorded_matching
);

criterion_main!(benches);
