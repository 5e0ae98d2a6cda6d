#![allow(dead_code, unused, clippy::type_complexity)]
//! Benchmarks for filter operations and SQL generation.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quarry_mssql::MssqlDialect;
use quarry_mysql::MysqlDialect;
use quarry_query::cache::FilterCache;
use quarry_query::compiler::compile;
use quarry_query::expr::{Capture, Expr, Operand};
use quarry_query::filter::{QueryFilter, SingleFilter};
use quarry_query::predicate::{CompareOp, FieldPredicate};
use quarry_query::sql::SqlDialect;
use quarry_query::value::Value;

/// Create a sample single-comparison filter.
fn create_equals_filter() -> QueryFilter {
    SingleFilter::new().eq("id", 42).into()
}

/// Create a filter with `count` AND-joined predicates.
fn create_and_filter(count: usize) -> QueryFilter {
    let mut filter = SingleFilter::new();
    for i in 0..count {
        filter.push(format!("field_{}", i), CompareOp::Eq, i as i64);
    }
    filter.into()
}

/// Create an alternating AND/OR tree of the given depth.
fn create_nested_filter(depth: usize) -> QueryFilter {
    let mut filter: QueryFilter = SingleFilter::new().eq("f0", 0).into();
    for i in 1..=depth {
        let leaf = SingleFilter::new().eq(format!("f{}", i), i as i64);
        filter = if i % 2 == 0 {
            QueryFilter::and(filter, leaf)
        } else {
            QueryFilter::or(filter, leaf)
        };
    }
    filter
}

/// A captured aggregate for compilation benchmarks.
#[derive(Debug)]
struct Policy {
    min_age: i64,
}

impl Capture for Policy {
    fn get(&self, member: &str) -> Option<Operand> {
        match member {
            "min_age" => Some(Operand::value(self.min_age)),
            _ => None,
        }
    }

    fn call(&self, _: &str) -> Option<Operand> {
        None
    }
}

/// Create value rows for batch insert benchmarks.
fn create_rows(rows: usize, columns: usize) -> Vec<Vec<Value>> {
    (0..rows)
        .map(|r| (0..columns).map(|c| Value::Int((r * columns + c) as i64)).collect())
        .collect()
}

/// Benchmark filter construction.
fn bench_filter_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_creation");

    group.bench_function("equals", |b| b.iter(|| black_box(create_equals_filter())));

    group.bench_function("chained_builders", |b| {
        b.iter(|| {
            black_box(
                SingleFilter::new()
                    .eq("active", true)
                    .gte("age", 18)
                    .lt("age", 120),
            )
        })
    });

    group.bench_function("and_10_conditions", |b| {
        b.iter(|| black_box(create_and_filter(10)))
    });

    group.bench_function("combined_pair", |b| {
        b.iter(|| {
            let adults = SingleFilter::new().gte("age", 18);
            let staff = SingleFilter::new().eq("role", "staff");
            black_box(QueryFilter::and(adults, staff))
        })
    });

    group.bench_function("nested_depth_5", |b| {
        b.iter(|| black_box(create_nested_filter(5)))
    });

    group.finish();
}

/// Benchmark predicate expression compilation.
fn bench_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("compilation");

    let comparison = Expr::field("age").gte(21);
    group.bench_function("comparison", |b| {
        b.iter(|| black_box(compile(&comparison)))
    });

    let connected = Expr::field("age")
        .gte(18)
        .and(Expr::field("active").eq(true));
    group.bench_function("connector_pair", |b| {
        b.iter(|| black_box(compile(&connected)))
    });

    let captured =
        Expr::field("age").gte(Expr::captured(Policy { min_age: 18 }).member("min_age"));
    group.bench_function("captured_member", |b| {
        b.iter(|| black_box(compile(&captured)))
    });

    let deferred = Expr::field("created_at").lt(Expr::invoke(|| Value::Int(1_700_000_000)));
    group.bench_function("deferred_invoke", |b| {
        b.iter(|| black_box(compile(&deferred)))
    });

    group.finish();
}

/// Benchmark the compiled-filter cache.
fn bench_filter_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_cache");

    let cache = FilterCache::new(256);
    let expr = Expr::field("age")
        .gte(18)
        .and(Expr::field("active").eq(true));
    cache.get_or_compile(&expr).expect("warm-up compile");

    group.bench_function("hit", |b| {
        b.iter(|| black_box(cache.get_or_compile(&expr)))
    });

    group.bench_function("contains", |b| b.iter(|| black_box(cache.contains(&expr))));

    group.bench_function("compile_uncached", |b| {
        b.iter(|| black_box(compile(&expr)))
    });

    group.finish();
}

/// Benchmark WHERE-fragment rendering for both dialects.
fn bench_where_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("where_rendering");

    let mysql = MysqlDialect::new();
    let mssql = MssqlDialect::new();

    for size in &[1usize, 5, 10, 20] {
        let filter = create_and_filter(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("mysql", size), &filter, |b, filter| {
            b.iter(|| black_box(filter.to_sql(&mysql)))
        });

        group.bench_with_input(BenchmarkId::new("mssql", size), &filter, |b, filter| {
            b.iter(|| black_box(filter.to_sql(&mssql)))
        });
    }

    group.finish();
}

/// Benchmark paginated SELECT assembly.
fn bench_pagination(c: &mut Criterion) {
    let mut group = c.benchmark_group("pagination");

    let mysql = MysqlDialect::new();
    let mssql = MssqlDialect::new();

    group.bench_function("mysql_first_page", |b| {
        b.iter(|| {
            black_box(mysql.build_pagination_sql(0, 25, "SELECT * FROM `users`", "ORDER BY `id`", None))
        })
    });

    group.bench_function("mysql_offset_page", |b| {
        b.iter(|| {
            black_box(mysql.build_pagination_sql(40, 25, "SELECT * FROM `users`", "ORDER BY `id`", None))
        })
    });

    group.bench_function("mssql_window", |b| {
        b.iter(|| {
            black_box(mssql.build_pagination_sql(40, 25, "SELECT * FROM [users]", "ORDER BY [id]", None))
        })
    });

    group.bench_function("mssql_window_with_where", |b| {
        b.iter(|| {
            black_box(mssql.build_pagination_sql(
                40,
                25,
                "SELECT [id], [name] FROM [users]",
                "ORDER BY [id]",
                Some("WHERE [active] = @P1"),
            ))
        })
    });

    group.finish();
}

/// Benchmark batch INSERT generation.
fn bench_batch_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_insert");

    let mysql = MysqlDialect::new();
    let columns = ["a", "b", "c", "d"];

    for rows in &[1usize, 10, 100] {
        let data = create_rows(*rows, columns.len());
        group.throughput(Throughput::Elements((*rows * columns.len()) as u64));

        group.bench_with_input(BenchmarkId::new("mysql_rows", rows), &data, |b, data| {
            b.iter(|| {
                let mut bound = Vec::with_capacity(data.len() * columns.len());
                let sql = mysql.build_batch_insert_sql("t", &columns, data, &mut |param, value| {
                    bound.push((param.name.clone(), value.clone()));
                });
                black_box((sql, bound))
            })
        });
    }

    group.finish();
}

/// Benchmark identifier quoting and placeholder formatting.
fn bench_quoting(c: &mut Criterion) {
    let mut group = c.benchmark_group("quoting");

    let mysql = MysqlDialect::new();
    let mssql = MssqlDialect::new();

    group.bench_function("plain_ident", |b| {
        b.iter(|| black_box(mysql.quote_ident("created_at")))
    });

    group.bench_function("embedded_closer", |b| {
        b.iter(|| black_box(mssql.quote_ident("we]ird")))
    });

    group.bench_function("positional_placeholder", |b| {
        b.iter(|| black_box(mssql.placeholder(7)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_filter_creation,
    bench_compilation,
    bench_filter_cache,
    bench_where_rendering,
    bench_pagination,
    bench_batch_insert,
    bench_quoting,
);

criterion_main!(benches);
