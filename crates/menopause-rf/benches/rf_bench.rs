//! Criterion benchmarks for menopause-rf: forest training, prediction and encoding.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use menopause_rf::RandomForestConfig;

/// Rows shaped like the clinical feature matrix: 4 continuous, 7 binary.
fn make_rows(n_samples: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<usize>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut features = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = i % 3;
        labels.push(class);
        let mut row: Vec<f64> = (0..4)
            .map(|f| {
                let base = if f < 2 { class as f64 * 2.0 } else { 0.0 };
                base + rng.r#gen::<f64>()
            })
            .collect();
        row.extend((0..7).map(|_| f64::from(u8::from(rng.r#gen::<bool>()))));
        features.push(row);
    }
    let names = (0..11).map(|f| format!("f{f}")).collect();
    (features, labels, names)
}

fn bench_rf_train(c: &mut Criterion) {
    let (features, labels, names) = make_rows(800, 42);
    let cfg = RandomForestConfig::new(300).unwrap();

    c.bench_function("rf_train_800x11_300trees", |b| {
        b.iter(|| cfg.fit(&features, &labels, &names).unwrap());
    });
}

fn bench_rf_predict_batch(c: &mut Criterion) {
    let (features, labels, names) = make_rows(800, 42);
    let forest = RandomForestConfig::new(300)
        .unwrap()
        .fit(&features, &labels, &names)
        .unwrap()
        .into_forest();

    c.bench_function("rf_predict_batch_800x11_300trees", |b| {
        b.iter(|| forest.predict_batch(&features).unwrap());
    });
}

fn bench_rf_to_bytes(c: &mut Criterion) {
    let (features, labels, names) = make_rows(800, 42);
    let forest = RandomForestConfig::new(300)
        .unwrap()
        .fit(&features, &labels, &names)
        .unwrap()
        .into_forest();

    c.bench_function("rf_to_bytes_300trees", |b| {
        b.iter(|| forest.to_bytes().unwrap());
    });
}

criterion_group!(benches, bench_rf_train, bench_rf_predict_batch, bench_rf_to_bytes);
criterion_main!(benches);
