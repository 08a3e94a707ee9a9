use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use typedkmeans_rs::{cluster_with_config, KMeans, KMeansConfig};

/// Random RGB pixels, as read from a noisy image
fn random_pixels(n_samples: usize, seed: u64) -> Array1<[u8; 3]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n_samples).map(|_| rng.gen::<[u8; 3]>()).collect()
}

fn benchmark_kmeans_varying_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_samples");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let k = 8;
    let sample_sizes = [1_000, 10_000, 50_000];

    for n_samples in sample_sizes.iter() {
        group.throughput(Throughput::Elements(*n_samples as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(n_samples),
            n_samples,
            |b, &n_samples| {
                let pixels = random_pixels(n_samples, 42);
                let config = KMeansConfig::new(k).with_seed(42).with_max_iters(5);

                // A capped run is reported as non-convergence; both outcomes are timed
                b.iter(|| cluster_with_config(black_box(&pixels.view()), &config).is_ok());
            },
        );
    }
    group.finish();
}

fn benchmark_kmeans_varying_clusters(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_clusters");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let n_samples = 10_000;
    let cluster_counts = [2, 8, 32];

    for k in cluster_counts.iter() {
        group.throughput(Throughput::Elements(*k as u64));
        group.bench_with_input(BenchmarkId::from_parameter(k), k, |b, &k| {
            let pixels = random_pixels(n_samples, 7);
            let config = KMeansConfig::new(k).with_seed(42).with_max_iters(5);

            b.iter(|| cluster_with_config(black_box(&pixels.view()), &config).is_ok());
        });
    }
    group.finish();
}

fn benchmark_element_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_shapes");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let n_samples = 10_000;
    let config = KMeansConfig::new(4).with_seed(42).with_max_iters(5);
    let pixels = random_pixels(n_samples, 3);

    let grey: Array1<u8> = pixels.mapv(|p| p[0]);
    let chroma: Array1<[u8; 2]> = pixels.mapv(|p| [p[1], p[2]]);
    let rgb_float: Array1<[f32; 3]> = pixels.mapv(|p| p.map(f32::from));

    group.bench_function("grey_u8", |b| {
        b.iter(|| cluster_with_config(black_box(&grey.view()), &config).is_ok())
    });
    group.bench_function("chroma_u8x2", |b| {
        b.iter(|| cluster_with_config(black_box(&chroma.view()), &config).is_ok())
    });
    group.bench_function("rgb_u8x3", |b| {
        b.iter(|| cluster_with_config(black_box(&pixels.view()), &config).is_ok())
    });
    group.bench_function("rgb_f32x3", |b| {
        b.iter(|| cluster_with_config(black_box(&rgb_float.view()), &config).is_ok())
    });
    group.finish();
}

fn benchmark_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_predict");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let k = 16;
    let predict_sizes = [1_000, 10_000];

    // Pre-train the model
    let train_pixels = random_pixels(5_000, 1);
    let mut kmeans = KMeans::with_config(KMeansConfig::new(k).with_seed(42));
    kmeans.train(&train_pixels.view()).unwrap();

    for n_predict in predict_sizes.iter() {
        group.throughput(Throughput::Elements(*n_predict as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(n_predict),
            n_predict,
            |b, &n_predict| {
                let test_pixels = random_pixels(n_predict, 2);

                b.iter(|| kmeans.predict(black_box(&test_pixels.view())).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_kmeans_varying_samples,
    benchmark_kmeans_varying_clusters,
    benchmark_element_shapes,
    benchmark_predict,
);

criterion_main!(benches);
