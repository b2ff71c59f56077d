//! Benchmarks for blocklist consolidation performance.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hostfold::aggregator::{aggregate, FeedLines};
use hostfold::apex::collect_apexes;
use hostfold::domain::DomainClassifier;
use hostfold::pipeline::{consolidate, LocalLists};
use hostfold::reducer::reduce;
use std::collections::HashSet;
use std::hint::black_box;

const TLDS: [&str; 4] = ["com", "net", "co.uk", "org"];

/// Generate feed lines with a mix of apexes, subdomains and noise
fn generate_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let domain = format!("site{}.{}", i % (count / 10 + 1), TLDS[i % TLDS.len()]);
            match i % 5 {
                0 => domain,
                1 => format!("ads{}.{}", i, domain),
                2 => format!("127.0.0.1 # comment {}", i),
                3 => format!("WWW.Track{}.{}.", i, domain),
                _ => format!("cdn.{}", domain),
            }
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for size in [1000, 10000, 100000] {
        let feeds = vec![FeedLines::new("bench", generate_lines(size))];
        group.bench_with_input(BenchmarkId::new("lines", size), &feeds, |b, feeds| {
            b.iter(|| black_box(aggregate(feeds, &[])))
        });
    }

    group.finish();
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");
    let classifier = DomainClassifier::default();
    let whitelist = HashSet::new();

    for size in [1000, 10000, 100000] {
        let feeds = vec![FeedLines::new("bench", generate_lines(size))];
        let hosts = aggregate(&feeds, &[]).hosts;
        let apexes = collect_apexes(&hosts, &whitelist, &classifier);
        group.bench_with_input(BenchmarkId::new("hosts", size), &hosts, |b, hosts| {
            b.iter(|| black_box(reduce(hosts, &apexes, &whitelist, &classifier)))
        });
    }

    group.finish();
}

fn bench_consolidate(c: &mut Criterion) {
    let classifier = DomainClassifier::default();
    let feeds = vec![
        FeedLines::new("a", generate_lines(50000)),
        FeedLines::new("b", generate_lines(20000)),
    ];
    let lists = LocalLists {
        whitelist: vec!["site1.com".to_string()],
        blacklist: vec!["site2.net".to_string()],
    };

    c.bench_function("consolidate_70k", |b| {
        b.iter(|| black_box(consolidate(&feeds, &lists, &classifier)))
    });
}

criterion_group!(benches, bench_aggregate, bench_reduce, bench_consolidate);
criterion_main!(benches);
