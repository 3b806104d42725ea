//! Benchmarks for barrage moderation operations

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use barrage_core::{ActivityId, AuthToken, Comment};
use barrage_engine::{Activity, ActivityTokens};

fn bench_activity() -> Activity {
    Activity::new(
        ActivityId::new(1),
        "bench",
        ActivityTokens {
            comment: AuthToken::from_raw("cc123456"),
            review: AuthToken::from_raw("rr123456"),
            display: AuthToken::from_raw("dd123456"),
        },
    )
}

fn text_comment() -> Comment {
    let mut attrs = HashMap::new();
    attrs.insert("text".to_string(), "benchmark comment".to_string());
    attrs.insert("color".to_string(), "red".to_string());
    Comment::new("text", &attrs).unwrap()
}

fn bench_add(c: &mut Criterion) {
    let activity = bench_activity();
    let comment = text_comment();

    c.bench_function("activity_add", |b| {
        b.iter(|| black_box(activity.add(black_box(comment.clone()))))
    });
}

fn bench_review_drain(c: &mut Criterion) {
    let activity = bench_activity();
    let comment = text_comment();

    c.bench_function("activity_review_1000", |b| {
        b.iter_with_setup(
            || {
                for _ in 0..1000 {
                    activity.add(comment.clone());
                }
            },
            |_| black_box(activity.review()),
        )
    });
}

fn bench_approve_then_display(c: &mut Criterion) {
    let activity = bench_activity();
    let comment = text_comment();

    c.bench_function("activity_approve_display_100", |b| {
        b.iter_with_setup(
            || {
                for _ in 0..100 {
                    activity.add(comment.clone());
                }
                activity.review().iter().map(|lc| lc.id).collect::<Vec<_>>()
            },
            |ids| {
                activity.approve(black_box(&ids));
                black_box(activity.display())
            },
        )
    });
}

criterion_group!(
    benches,
    bench_add,
    bench_review_drain,
    bench_approve_then_display
);
criterion_main!(benches);
