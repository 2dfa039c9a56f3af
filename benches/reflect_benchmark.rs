use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use goreflect::generate::{self, Context, EmitError, FileSpec, Files, Granularity};
use goreflect::{Parser, Results};
use goreflect_syntax::{parse_source, tokenize};
use std::hint::black_box as bb;

// =============================================================================
// Corpus
// =============================================================================

const SMALL: &str = r#"
package main

func main() {
    println("Hello, World!")
}
"#;

const MEDIUM: &str = r#"
package geometry

import "math"

// +Shape=true
type Point struct {
    X, Y float64 `json:"x"`
}

func (p Point) Abs() float64 {
    return math.Sqrt(p.X*p.X + p.Y*p.Y)
}

func (p *Point) Scale(f float64) {
    p.X = p.X * f
    p.Y = p.Y * f
}

type Shape interface {
    Area() float64
    Grow(delta float64) error
}

type Rectangle struct {
    Min, Max Point
    Tags     map[string][]string
    Done     chan<- struct{}
}

func (r Rectangle) Area() float64 {
    return (r.Max.X - r.Min.X) * (r.Max.Y - r.Min.Y)
}
"#;

/// A package of `n` structs with fields, methods and markers.
fn synthetic_package(n: usize) -> String {
    let mut src = String::from("package bench\n\nimport \"time\"\n\n");
    for i in 0..n {
        src.push_str(&format!(
            "// +Entity=true\n// +Index={i}\ntype Entity{i} struct {{\n\
             \tID   int64             `json:\"id\" db:\"id\"`\n\
             \tName string            `json:\"name,omitempty\"`\n\
             \tAt   time.Time\n\
             \tRefs map[string]*Entity{i}\n\
             }}\n\n\
             func (e *Entity{i}) Touch(at time.Time, names ...string) (bool, error) {{\n\
             \tif e == nil {{ return false, nil }}\n\
             \te.At = at\n\
             \treturn true, nil\n\
             }}\n\n\
             const Limit{i} = {i}\n\n"
        ));
    }
    src
}

fn analyze(src: &str) -> Results {
    match Parser::new().parse_sources([("bench.go", src)]) {
        Ok(r) => r,
        Err(e) => panic!("bench corpus failed to parse: {e}"),
    }
}

// =============================================================================
// Benchmark 1: front end (tokenize, then parse)
// =============================================================================

fn bench_front_end(c: &mut Criterion) {
    let large = synthetic_package(200);
    let inputs = [("small", SMALL), ("medium", MEDIUM), ("large", large.as_str())];

    let mut group = c.benchmark_group("front_end");
    for (name, input) in inputs {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("tokenize", name), input, |b, input| {
            b.iter(|| bb(tokenize(bb(input)).toks.len()));
        });
        group.bench_with_input(BenchmarkId::new("parse_source", name), input, |b, input| {
            b.iter(|| bb(parse_source(bb(input)).is_ok()));
        });
    }
    group.finish();
}

// =============================================================================
// Benchmark 2: model construction (resolve + classify + link)
// =============================================================================

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    for n in [10usize, 100, 400] {
        let src = synthetic_package(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("structs", n), &src, |b, src| {
            b.iter(|| bb(analyze(bb(src)).packages.len()));
        });
    }
    group.finish();
}

// =============================================================================
// Benchmark 3: generation walk with a counting emitter
// =============================================================================

fn bench_walk(c: &mut Criterion) {
    let results = analyze(&synthetic_package(400));
    let files: Files = Granularity::ALL
        .iter()
        .map(|&g| FileSpec::new(g, "t.tmpl", "out.go"))
        .collect();

    c.bench_function("walk/all_granularities_400_structs", |b| {
        b.iter(|| {
            let mut n = 0usize;
            let mut emitter = |_: &FileSpec, ctx: &Context<'_>| -> Result<(), EmitError> {
                n += ctx.scope().len();
                Ok(())
            };
            let _ = generate::execute(bb(&results), &files, &mut emitter);
            bb(n);
        });
    });
}

criterion_group!(benches, bench_front_end, bench_analysis, bench_walk);
criterion_main!(benches);
