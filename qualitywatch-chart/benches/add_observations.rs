use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qualitywatch_chart::StripChart;

/// Benchmark a single add on a chart that has reached steady state
fn bench_add_steady_state(c: &mut Criterion) {
    let mut chart = StripChart::new(400.0, 100.0);
    let mut t = 0.0;
    for _ in 0..10_000 {
        t += 0.1;
        chart.add(t, [("loss", t.sin()), ("accuracy", t.cos())]);
    }

    c.bench_function("add_steady_state", |b| {
        b.iter(|| {
            t += 0.1;
            chart.add(black_box(t), black_box([("loss", 0.5), ("accuracy", 0.25)]));
        });
    });
}

/// Benchmark add with varying numbers of series per observation
fn bench_add_varying_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_varying_series");

    for count in [1usize, 4, 16, 64].iter() {
        let names: Vec<String> = (0..*count).map(|i| format!("series-{}", i)).collect();
        let mut chart = StripChart::new(400.0, 100.0);
        let mut t = 0.0;

        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| {
                t += 0.1;
                chart.add(black_box(t), names.iter().map(|n| (n.as_str(), 1.0)));
            });
        });
    }
    group.finish();
}

/// Benchmark re-decimation after a resize
fn bench_resize(c: &mut Criterion) {
    c.bench_function("resize", |b| {
        b.iter_with_setup(
            || {
                let mut chart = StripChart::new(2_000.0, 100.0);
                for i in 0..5_000 {
                    chart.add(i as f64, [("s", i as f64)]);
                }
                chart
            },
            |mut chart| chart.set_width(black_box(200.0)),
        );
    });
}

criterion_group!(benches, bench_add_steady_state, bench_add_varying_series, bench_resize);
criterion_main!(benches);
