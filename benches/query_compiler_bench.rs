use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use drive_query::{compile, QueryCompiler, QueryExpression, SearchScope};
use std::hint::black_box;

fn test_cases() -> Vec<(&'static str, &'static str)> {
    vec![
        ("simple", r#"{"name": "budget"}"#),
        ("medium", r#"{"name": {"any": ["budget", "plan"]}, "starred": true, "modifiedTime": {"gte": "2024-01-01"}}"#),
        (
            "complex",
            r#"{"$or": [
                {"$and": [{"mimeType": "application/pdf"}, {"fullText": {"all": ["Q3", "revenue"]}}]},
                {"$not": {"owner": {"none": ["a@example.com", "b@example.com"]}}},
                {"sharedWithMe": true, "modifiedTime": {"gte": "2024-01-01", "lt": "2024-02-01"}}
            ]}"#,
        ),
        ("wide_or", r#"{"name": {"any": ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"]}}"#),
    ]
}

// 基准测试：JSON 解析
fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_performance");

    for (name, json) in test_cases() {
        group.bench_with_input(BenchmarkId::new("from_json", name), &json, |b, &json| {
            b.iter(|| black_box(QueryExpression::from_json(black_box(json)).expect("解析应该成功")))
        });
    }

    group.finish();
}

// 基准测试：编译性能
fn benchmark_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_performance");

    for (name, json) in test_cases() {
        let expr = QueryExpression::from_json(json).expect("解析应该成功");

        group.bench_with_input(BenchmarkId::new("compile", name), &expr, |b, expr| {
            b.iter(|| black_box(compile(black_box(expr)).expect("编译应该成功")))
        });
    }

    group.finish();
}

// 基准测试：带作用域的端到端处理
fn benchmark_end_to_end(c: &mut Criterion) {
    let compiler = QueryCompiler::with_scope(SearchScope::folder("0AbCdEfGhIj"));
    let mut group = c.benchmark_group("end_to_end_performance");

    for (name, json) in test_cases() {
        group.bench_with_input(BenchmarkId::new("full_pipeline", name), &json, |b, &json| {
            b.iter(|| {
                let expr = QueryExpression::from_json(black_box(json)).expect("解析应该成功");
                black_box(compiler.compile_scoped(&expr).expect("编译应该成功"))
            })
        });
    }

    group.finish();
}

// 基准测试：深层嵌套
fn benchmark_deep_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_nesting");

    for depth in [4usize, 16, 48] {
        let mut json = r#"{"name": "leaf"}"#.to_string();
        for level in 0..depth {
            let op = if level % 2 == 0 { "$and" } else { "$or" };
            json = format!(r#"{{"{}": [{}, {{"owner": "u{}"}}]}}"#, op, json, level);
        }
        let expr = QueryExpression::from_json(&json).expect("解析应该成功");

        group.bench_with_input(BenchmarkId::new("compile", depth), &expr, |b, expr| {
            b.iter(|| black_box(compile(black_box(expr)).expect("编译应该成功")))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_compile,
    benchmark_end_to_end,
    benchmark_deep_nesting
);
criterion_main!(benches);
