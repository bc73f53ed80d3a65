use {
    chrono::NaiveDate,
    criterion::{black_box, criterion_group, criterion_main, Benchmark, Criterion},
    ndarray::Array2,
    ocean_column::{
        grid::DepthGrid,
        parameters::Parameters,
        stokes::{FrequencyBands, SpectrumSeries, StokesProfileBuilder},
    },
};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench(
        "stokes",
        Benchmark::new("build_series_2920x12", |b| {
            let params = Parameters::default();
            let grid = DepthGrid::from_segments(&params.grid.segments).unwrap();
            let bands = FrequencyBands((1..=12).map(|i| 0.035 * i as f64).collect());

            // One year of 3 hourly spectra
            let start = NaiveDate::from_ymd(2008, 6, 1).and_hms(0, 0, 0);
            let times = (0..2920)
                .map(|i| start + chrono::Duration::hours(3 * i))
                .collect::<Vec<_>>();
            let eastward = Array2::from_shape_fn((2920, 12), |(t, f)| {
                0.01 * (1.0 + (t as f64 / 100.0).sin()) / (f + 1) as f64
            });
            let northward = eastward.mapv(|v| -0.5 * v);
            let series = SpectrumSeries::new(times, bands.clone(), eastward, northward).unwrap();

            let builder = StokesProfileBuilder::new(grid, bands, params.physical.gravity).unwrap();

            b.iter(|| builder.build_series(black_box(&series)).unwrap())
        })
        .sample_size(20),
    );
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
