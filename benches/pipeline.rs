//! Benchmarks for the mapstyle pipeline.

use std::fs;
use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mapstyle::diagnostics::Diagnostics;
use mapstyle::expression::parse_expression;
use mapstyle::parser::{parse, parse_symbolset};
use mapstyle::MapfileStyleParser;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name)).unwrap()
}

/// A Mapfile with `count` copies of the point fixture's layer.
fn many_layers(count: usize) -> String {
    let point = load_fixture("point.map");
    let start = point.find("  LAYER").unwrap();
    let end = point.rfind("END").unwrap();
    let layer = &point[start..end];

    let mut content = String::from("MAP\n");
    for _ in 0..count {
        content.push_str(layer);
    }
    content.push_str("END\n");
    content
}

// -- Parsing benchmarks --

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    let point = load_fixture("point.map");
    let symbols = load_fixture("symbols.sym");
    let large = many_layers(200);

    group.bench_function("parse_point_map", |b| {
        b.iter(|| parse(black_box(&point), &mut Diagnostics::new()).unwrap())
    });

    group.bench_function("parse_symbolset", |b| {
        b.iter(|| parse_symbolset(black_box(&symbols), &mut Diagnostics::new()).unwrap())
    });

    group.bench_function("parse_200_layers", |b| {
        b.iter(|| parse(black_box(&large), &mut Diagnostics::new()).unwrap())
    });

    group.bench_function("parse_expression", |b| {
        let expr = "([class] = 'railways' AND [service] != 'spur' AND ([usage] eq 'main' OR [usage] ~* 'branch'))";
        b.iter(|| parse_expression(black_box(expr)).unwrap())
    });

    group.finish();
}

// -- Translation benchmarks --

fn bench_translation(c: &mut Criterion) {
    let mut group = c.benchmark_group("translation");

    let parser = MapfileStyleParser::new()
        .with_args(Vec::<String>::new())
        .with_base_dir(fixtures_dir());

    for name in ["point.map", "line.map", "polygon.map", "raster.map"] {
        let content = load_fixture(name);
        group.bench_function(format!("read_style_{}", name), |b| {
            b.iter(|| parser.read_style(black_box(&content)).unwrap())
        });
    }

    let large = many_layers(200);
    group.bench_function("read_multi_styles_200_layers", |b| {
        b.iter(|| parser.read_multi_styles(black_box(&large)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_translation);
criterion_main!(benches);
