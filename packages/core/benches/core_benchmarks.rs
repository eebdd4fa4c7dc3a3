//! Benchmarks for the hot paths in the oracle core: quality assessment
//! and consensus aggregation.
//!
//! ```bash
//! cargo bench --bench core_benchmarks
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dispute_oracle_core::assessor::{self, QualityCriteria};
use dispute_oracle_core::config::Config;
use dispute_oracle_core::embedder::HashingEmbedder;
use dispute_oracle_core::oracle::{calculate_consensus, OracleAssessment};
use serde_json::json;

fn bench_assess(c: &mut Criterion) {
    let embedder = HashingEmbedder::new();
    let payload = json!({
        "data": (0..10).map(|i| json!({
            "protocol": "Uniswap V3",
            "chain": "Ethereum",
            "tx_hash": format!("0x{:064x}", i),
            "amount_usd": 1000 + i,
            "timestamp": "2026-07-01T00:00:00Z",
        })).collect::<Vec<_>>(),
    });
    let criteria = QualityCriteria {
        required_fields: Some(vec!["protocol".into(), "chain".into(), "tx_hash".into()]),
        max_age_days: Some(30.0),
        ..Default::default()
    };

    c.bench_function("assess_ten_record_payload", |b| {
        b.iter(|| {
            assessor::assess(
                &embedder,
                black_box("Uniswap V3 exploits on Ethereum"),
                black_box(&payload),
                black_box(&criteria),
                black_box(Some(10)),
            )
        })
    });
}

fn bench_consensus(c: &mut Criterion) {
    let config = Config::default();
    let assessments: Vec<OracleAssessment> = [70u8, 72, 70, 71, 68]
        .into_iter()
        .enumerate()
        .map(|(i, score)| OracleAssessment {
            oracle_pubkey: format!("pk{i}"),
            quality_score: score,
            reasoning: "semantic=0.80 completeness=0.75".to_string(),
            signature: String::new(),
            timestamp: 0,
        })
        .collect();

    c.bench_function("calculate_consensus_five_assessments", |b| {
        b.iter(|| calculate_consensus(black_box(assessments.clone()), black_box(&config)))
    });
}

criterion_group!(benches, bench_assess, bench_consensus);
criterion_main!(benches);
