use chrono::{DateTime, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use flightwatch_engine::{merge, predict, Flight, Position};

fn setup(n: usize) -> Vec<Flight> {
    let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
    (0..n)
        .map(|i| {
            let pos = Position::new(48. + (i as f64) * 0.001, 2. + (i as f64) * 0.001);
            Flight {
                icao24: format!("{:06x}", i),
                callsign: None,
                origin_country: "France".to_string(),
                baro_altitude: Some(10_000.),
                geo_altitude: None,
                on_ground: false,
                velocity: Some(230.),
                heading: Some((i % 360) as f64),
                vertical_rate: None,
                squawk: None,
                last_contact: now,
                anchored_at: now,
                actual: pos,
                display: pos,
            }
        })
        .collect()
}

fn bench_predict(c: &mut Criterion) {
    let from = Position::new(48.573174, 2.319671);

    c.bench_function("predict::one", |b| {
        b.iter(|| {
            black_box(predict(
                black_box(from),
                Some(230.),
                Some(87.),
                false,
                black_box(15_000.),
            ));
        })
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut flights = setup(1_000);
    let now = DateTime::<Utc>::from_timestamp(1_700_000_010, 0).unwrap();
    let max = chrono::Duration::seconds(120);

    c.bench_function("predict::tick-1000", |b| {
        b.iter(|| {
            flights
                .iter_mut()
                .for_each(|f| f.display = f.predict_at(black_box(now), max).normalized());
        })
    });
}

fn bench_merge(c: &mut Criterion) {
    let current = setup(1_000);
    let fresh = setup(1_000);

    c.bench_function("merge-1000", |b| {
        b.iter(|| {
            black_box(merge(fresh.clone(), &current));
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_predict, bench_tick, bench_merge
}

criterion_main!(benches);
