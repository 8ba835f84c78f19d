use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use venn_plot::curves::trace_curves;
use venn_plot::geometry::Projection;
use venn_plot::layout::compute_layout;
use venn_plot::matrix::IntersectionMatrix;
use venn_plot::{CrossingSequence, DrawingMode, Palette, RenderOptions, Renderer};

fn fixture(name: &str) -> &'static str {
    match name {
        "venn3" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/venn3.txt")),
        "venn5" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/venn5.txt")),
        "venn7" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/venn7.txt")),
        _ => panic!("unknown fixture"),
    }
}

const FIXTURES: [(&str, usize); 3] = [("venn3", 3), ("venn5", 5), ("venn7", 7)];

fn first_sequence(name: &str, n: usize) -> CrossingSequence {
    let palette = Palette::default_for(n);
    let renderer = Renderer::new(RenderOptions::classic(n), &palette).expect("bad options");
    renderer
        .reader(fixture(name))
        .expect("bad curve count")
        .next()
        .expect("empty fixture")
        .expect("malformed fixture")
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for (name, n) in FIXTURES {
        let sequence = first_sequence(name, n);
        group.bench_with_input(BenchmarkId::from_parameter(name), &sequence, |b, sequence| {
            b.iter(|| {
                let matrix = IntersectionMatrix::build(black_box(sequence));
                let layout = compute_layout(&matrix);
                black_box(layout.crossings.len());
            });
        });
    }
    group.finish();
}

fn bench_curves(c: &mut Criterion) {
    let mut group = c.benchmark_group("curves");
    let config = venn_plot::config::LayoutConfig::default();
    for (name, n) in FIXTURES {
        let layout = compute_layout(&IntersectionMatrix::build(&first_sequence(name, n)));
        for mode in [DrawingMode::Radial, DrawingMode::Cylindrical] {
            let projection = Projection::new(&layout, mode, &config);
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}").to_lowercase(), name),
                &projection,
                |b, projection| {
                    b.iter(|| {
                        let curves = trace_curves(black_box(&layout), projection);
                        black_box(curves.len());
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    for (name, n) in FIXTURES {
        let palette = Palette::default_for(n);
        let sequence = first_sequence(name, n);
        for mode in [DrawingMode::Radial, DrawingMode::Cylindrical] {
            let renderer = Renderer::new(RenderOptions::classic(n).with_mode(mode), &palette)
                .expect("bad options");
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}").to_lowercase(), name),
                &sequence,
                |b, sequence| {
                    b.iter(|| {
                        let svg = renderer.render(black_box(sequence));
                        black_box(svg.len());
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_layout, bench_curves, bench_end_to_end
);
criterion_main!(benches);
