use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rank::cosine_similarity;

fn vector(dim: usize, seed: u32) -> Vec<f32> {
  // Deterministic pseudo-random values, enough to defeat trivial folding
  (0..dim)
    .map(|i| {
      let x = (i as u32).wrapping_mul(2654435761).wrapping_add(seed);
      (x % 1000) as f32 / 1000.0 - 0.5
    })
    .collect()
}

fn bench_cosine(c: &mut Criterion) {
  let a = vector(1536, 1);
  let b = vector(1536, 2);

  c.bench_function("cosine_similarity_1536", |bencher| {
    bencher.iter(|| cosine_similarity(black_box(&a), black_box(&b)))
  });
}

fn bench_scoring_pass(c: &mut Criterion) {
  // Worst case: full rolling window, full candidate batch
  let records: Vec<(Vec<f32>, f32)> = (0..50)
    .map(|i| (vector(1536, i), if i % 3 == 0 { -1.0 } else { 1.0 }))
    .collect();
  let candidates: Vec<Vec<f32>> = (0..5).map(|i| vector(1536, 100 + i)).collect();

  c.bench_function("score_5_candidates_50_records", |bencher| {
    bencher.iter(|| {
      let scores: Vec<f32> = candidates
        .iter()
        .map(|c| records.iter().map(|(e, sign)| sign * cosine_similarity(c, e)).sum())
        .collect();
      black_box(scores)
    })
  });
}

criterion_group!(benches, bench_cosine, bench_scoring_pass);
criterion_main!(benches);
