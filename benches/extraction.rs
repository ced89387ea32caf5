//! Extraction benchmark: session JSON → 19-feature vector, and a batch into a table.

use bba_pipeline::dataset::DatasetBuilder;
use bba_pipeline::error::ExtractError;
use bba_pipeline::features::FeatureExtractor;
use bba_pipeline::session::SessionSource;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn make_session(taps: usize) -> String {
    let zones = ["top_left", "middle_center", "bottom_right", "top_right"];
    let tap_events: Vec<String> = (0..taps)
        .map(|i| format!(r#"{{"screen": "screen_{}", "zone": "{}"}}"#, i % 5, zones[i % zones.len()]))
        .collect();
    let tap_durations: Vec<String> = (0..taps).map(|i| (80 + i % 60).to_string()).collect();
    let swipes: Vec<String> = (0..taps / 4)
        .map(|i| {
            format!(
                r#"{{"screen": "screen_{}", "speed_px_per_ms": {}, "distance_px": {}}}"#,
                i % 5,
                0.5 + (i % 7) as f64 * 0.1,
                150 + i % 200
            )
        })
        .collect();
    format!(
        r#"{{
            "session": {{"duration_seconds": 180}},
            "tap_durations_ms": [{}],
            "tap_events": [{}],
            "swipe_events": [{}],
            "screen_durations": {{"screen_0": 40, "screen_1": 25, "screen_2": 60}},
            "session_input": {{"fd_broken": true, "loan_taken": false, "time_from_login_to_fd": 95}}
        }}"#,
        tap_durations.join(","),
        tap_events.join(","),
        swipes.join(",")
    )
}

fn bench_extract_session(c: &mut Criterion) {
    let extractor = FeatureExtractor::new(1);
    let json = make_session(200);

    c.bench_function("extract_session_200_taps", |b| {
        b.iter(|| black_box(extractor.extract_json(black_box(&json))))
    });
}

fn bench_build_batch(c: &mut Criterion) {
    let builder = DatasetBuilder::new(FeatureExtractor::new(1));
    let sessions: Vec<String> = (0..100).map(|i| make_session(20 + i)).collect();

    c.bench_function("build_table_100_sessions", |b| {
        b.iter(|| {
            let sources = sessions
                .iter()
                .enumerate()
                .map(|(i, s)| Ok::<_, (String, ExtractError)>(SessionSource::new(format!("s{}", i), s.clone())));
            black_box(builder.build(sources))
        })
    });
}

criterion_group!(benches, bench_extract_session, bench_build_batch);
criterion_main!(benches);
