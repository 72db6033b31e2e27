//! exnum benchmark suite.
//!
//! Hot paths:
//!   variant_lookup_cached ........ accessor hit on an existing variant
//!   variant_first_materialization  miss path, new registry per iteration
//!   exception_construct .......... construct with a three-part message
//!   narrow_match_200_variants .... match_error against a populated scope
//!   statement_prepare_10 ......... rewrite of ten placeholders

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use exnum_core::{AccessorOptions, Exception, Registry};
use exnum_sql::statement;

/// Benchmark: cached variant lookup.
fn bench_cached_lookup(c: &mut Criterion) {
    let registry = Registry::new();
    let errors = registry.accessor(AccessorOptions::scoped("bench").with_range(1000));
    errors.variants(["NotFound", "InvalidParams", "Timeout"]);

    c.bench_function("variant_lookup_cached", |b| {
        b.iter(|| black_box(errors.variant(black_box("InvalidParams"))));
    });
}

/// Benchmark: first access of a name, including registry insert.
fn bench_first_materialization(c: &mut Criterion) {
    c.bench_function("variant_first_materialization", |b| {
        b.iter(|| {
            let registry = Registry::new();
            let errors = registry.accessor(AccessorOptions::scoped("bench"));
            black_box(errors.variant(black_box(42)));
        });
    });
}

/// Benchmark: exception construction.
fn bench_construct(c: &mut Criterion) {
    let registry = Registry::new();
    let not_found = registry.accessor(AccessorOptions::default()).variant(404);

    c.bench_function("exception_construct", |b| {
        b.iter(|| black_box(not_found.construct(black_box(["user", "42", "missing"]))));
    });
}

/// Benchmark: narrowing a boxed error against many candidate variants.
fn bench_narrow_match(c: &mut Criterion) {
    let registry = Registry::new();
    let errors = registry.accessor(AccessorOptions::scoped("bench"));
    let candidates: Vec<_> = (0..200).map(|i| errors.variant(i)).collect();
    let raised: Box<dyn std::error::Error + Send + Sync> =
        Box::new(candidates[150].construct(["late", "match"]));

    c.bench_function("narrow_match_200_variants", |b| {
        b.iter(|| {
            let hit = candidates
                .iter()
                .find_map(|v| v.match_error(&raised, Exception::code));
            black_box(hit);
        });
    });
}

/// Benchmark: named to positional placeholder rewrite.
fn bench_statement_prepare(c: &mut Criterion) {
    let names: Vec<String> = (0..10).map(|i| format!("p{i}")).collect();
    let sql = statement(format!(
        "SELECT * FROM t WHERE {}",
        names
            .iter()
            .map(|n| format!("{n} = ${n}"))
            .collect::<Vec<_>>()
            .join(" AND ")
    ));
    let values: HashMap<String, i64> = names
        .iter()
        .zip(0i64..)
        .map(|(n, i)| (n.clone(), i))
        .collect();

    c.bench_function("statement_prepare_10", |b| {
        b.iter(|| black_box(sql.prepare(black_box(&values))));
    });
}

criterion_group!(
    benches,
    bench_cached_lookup,
    bench_first_materialization,
    bench_construct,
    bench_narrow_match,
    bench_statement_prepare,
);
criterion_main!(benches);
