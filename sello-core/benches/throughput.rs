use criterion::{Criterion, black_box, criterion_group, criterion_main};

use sello_core::key::XorShift64;
use sello_core::{CarrierBank, SecretKey, WatermarkConfig};

fn make_audio(frames: usize, channels: usize) -> Vec<f32> {
    let mut prng = XorShift64::new(0xBE7C4);
    (0..frames * channels)
        .map(|_| (2.0 * prng.next_f64() - 1.0) as f32 * 0.1)
        .collect()
}

fn payload(bits: usize) -> Vec<u8> {
    (0..bits).map(|k| ((k * 7 + 3) % 2) as u8).collect()
}

fn bench_carrier_bank(c: &mut Criterion) {
    let key = SecretKey::from_passphrase("bench");
    let config = WatermarkConfig::default();

    c.bench_function("carrier_bank_64_positions", |b| {
        b.iter(|| {
            let bank = CarrierBank::generate(&key, 64, config.samples_per_bit());
            black_box(bank);
        });
    });
}

fn bench_embed(c: &mut Criterion) {
    let key = SecretKey::from_passphrase("bench");
    let config = WatermarkConfig::default();
    let bits = payload(64);
    // ~10 seconds of stereo audio at 44.1 kHz
    let audio = make_audio(44100 * 10, 2);

    c.bench_function("embed_10s_stereo_44khz", |b| {
        b.iter(|| {
            let mut samples = audio.clone();
            sello_core::embed(black_box(&mut samples), &bits, &key, &config).unwrap();
        });
    });
}

fn bench_extract(c: &mut Criterion) {
    let key = SecretKey::from_passphrase("bench");
    let config = WatermarkConfig::default();
    let bits = payload(64);
    let mut audio = make_audio(44100 * 10, 2);
    sello_core::embed(&mut audio, &bits, &key, &config).unwrap();

    c.bench_function("extract_10s_stereo_44khz", |b| {
        b.iter(|| {
            let extraction =
                sello_core::extract(black_box(&audio), bits.len(), &key, &config).unwrap();
            black_box(extraction);
        });
    });
}

#[cfg(feature = "parallel")]
fn bench_parallel_embed(c: &mut Criterion) {
    let key = SecretKey::from_passphrase("bench");
    let config = WatermarkConfig::default();
    let bits = payload(64);
    let audio = make_audio(44100 * 10, 2);

    c.bench_function("parallel_embed_10s_stereo_44khz", |b| {
        b.iter(|| {
            let mut samples = audio.clone();
            sello_core::embed_parallel(black_box(&mut samples), &bits, &key, &config).unwrap();
        });
    });
}

#[cfg(feature = "parallel")]
fn bench_parallel_extract(c: &mut Criterion) {
    let key = SecretKey::from_passphrase("bench");
    let config = WatermarkConfig::default();
    let bits = payload(64);
    let mut audio = make_audio(44100 * 10, 2);
    sello_core::embed(&mut audio, &bits, &key, &config).unwrap();

    c.bench_function("parallel_extract_10s_stereo_44khz", |b| {
        b.iter(|| {
            let extraction =
                sello_core::extract_parallel(black_box(&audio), bits.len(), &key, &config).unwrap();
            black_box(extraction);
        });
    });
}

#[cfg(not(feature = "parallel"))]
criterion_group!(benches, bench_carrier_bank, bench_embed, bench_extract);

#[cfg(feature = "parallel")]
criterion_group!(
    benches,
    bench_carrier_bank,
    bench_embed,
    bench_extract,
    bench_parallel_embed,
    bench_parallel_extract,
);

criterion_main!(benches);
