use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sweepline::naive;
use sweepline::sweep::DEFAULT_EPS;
use sweepline::Segments;

// Random segments spanning a horizontal strip, from a fixed-seed generator
// so runs are comparable.
fn strip_segments(n: usize) -> Segments {
    let mut state = 0x2545f4914f6cdd1du64;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) % 1000) as f64
    };

    let mut segs = Segments::default();
    for _ in 0..n {
        segs.add_segment((next(), 1000.0), (next(), 0.0)).unwrap();
    }
    segs
}

fn sweep_strip(c: &mut Criterion) {
    for n in [20, 100, 500] {
        let segs = strip_segments(n);
        c.bench_function(&format!("sweep {n} strip segments"), |b| {
            b.iter(|| sweepline::sweep::sweep(&segs, DEFAULT_EPS, |_, _| {}))
        });
    }
}

fn pairwise_strip(c: &mut Criterion) {
    for n in [20, 100, 500] {
        let segs = strip_segments(n);
        c.bench_function(&format!("pairwise check {n} strip segments"), |b| {
            b.iter(|| black_box(naive::pairwise_intersections(&segs)))
        });
    }
}

criterion_group!(benches, sweep_strip, pairwise_strip);
criterion_main!(benches);
