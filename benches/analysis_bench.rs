use criterion::{black_box, criterion_group, criterion_main, Criterion};

use powertrace::{statistics, BatterySpec, PowerSample, PowerSeries, PreviewCache, TimeRange};

fn synthetic_samples(points: usize) -> Vec<PowerSample> {
    (0..points)
        .map(|i| {
            let t = i as f64 * 0.001;
            let ripple = (i % 11) as f64 * 1e-4;
            PowerSample::new(t, 3.7, (0.05 + ripple) / 3.7, 0.05 + ripple)
        })
        .collect()
}

fn bench_statistics(c: &mut Criterion) {
    let samples = synthetic_samples(10_000);
    let battery = BatterySpec::default();

    c.bench_function("statistics_compute_10k", |b| {
        b.iter(|| statistics::compute(black_box(&samples), &battery).unwrap())
    });
}

fn bench_preview_cache(c: &mut Criterion) {
    let series = PowerSeries::build(synthetic_samples(10_000), "bench.csv", "Nolight").unwrap();
    let battery = BatterySpec::default();
    let range = TimeRange::new(1.0, 9.0);

    c.bench_function("preview_cache_miss", |b| {
        b.iter(|| {
            let mut cache = PreviewCache::new();
            cache
                .get_or_compute(black_box(&series), range, &battery)
                .unwrap()
        })
    });

    c.bench_function("preview_cache_hit", |b| {
        let mut cache = PreviewCache::new();
        cache.get_or_compute(&series, range, &battery).unwrap();
        b.iter(|| {
            cache
                .get_or_compute(black_box(&series), range, &battery)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_statistics, bench_preview_cache);
criterion_main!(benches);
