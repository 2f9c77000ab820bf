use criterion::{criterion_group, criterion_main, Criterion, black_box};

use cavern::generation::{
    CaveConfig, CaveGenerator, RegionClassifier, SeededRandom, DEFAULT_REGION_SCALE,
};
use cavern::scene::ObjectScene;
use cavern::terrain::{GridTerrain, NoiseConfig, TerrainHeightSynthesizer};

use glam::Vec3;

fn terrain(resolution: usize) -> GridTerrain {
    GridTerrain::new(Vec3::ZERO, Vec3::new(256.0, 100.0, 256.0), resolution)
        .expect("valid terrain")
}

fn bench_synthesize_129(c: &mut Criterion) {
    let synth = TerrainHeightSynthesizer::new(NoiseConfig::default());
    let mut t = terrain(129);

    c.bench_function("synthesize_129", |b| {
        b.iter(|| {
            synth
                .synthesize(&mut t, black_box(42), 15.0, 4, 0.0, 1.0)
                .expect("synthesis")
        });
    });
}

fn bench_synthesize_513(c: &mut Criterion) {
    let synth = TerrainHeightSynthesizer::new(NoiseConfig::default());
    let mut t = terrain(513);

    c.bench_function("synthesize_513", |b| {
        b.iter(|| {
            synth
                .synthesize(&mut t, black_box(42), 15.0, 4, 0.0, 1.0)
                .expect("synthesis")
        });
    });
}

fn bench_classify_256(c: &mut Criterion) {
    let mut t = terrain(129);
    TerrainHeightSynthesizer::default()
        .synthesize(&mut t, 42, 15.0, 4, 0.0, 1.0)
        .expect("synthesis");
    let classifier = RegionClassifier::new(42, DEFAULT_REGION_SCALE);

    c.bench_function("classify_256", |b| {
        b.iter(|| classifier.classify(black_box(&t)));
    });
}

fn bench_generate_default(c: &mut Criterion) {
    let mut config = CaveConfig::default();
    config.seed = Some(42);

    c.bench_function("generate_default_cave", |b| {
        b.iter(|| {
            let mut generator = CaveGenerator::new(
                config.clone(),
                terrain(129),
                terrain(129),
                ObjectScene::default(),
                SeededRandom::new(42),
            )
            .expect("valid config");
            generator.generate().expect("generation")
        });
    });
}

criterion_group!(
    benches,
    bench_synthesize_129,
    bench_synthesize_513,
    bench_classify_256,
    bench_generate_default,
);
criterion_main!(benches);
