//! # Hashweave Subsystem Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | hw-01 Transaction Pool | submit + drain | < 10µs per tx |
//! | hw-02 Event Creation | event hash | < 50µs |
//! | hw-04 State Validation | state merkle root | < 10ms for 10k leaves |
//! | hw-04 State Validation | ISS round tally | < 1ms per round |

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hw_01_transaction_pool::{TransactionPool, TransactionPoolConfig};
use hw_02_event_creation::EventHasher;
use hw_04_state_validation::{
    IssDetector, IssDetectorConfig, ReservedSignedState, SignedState, StateHasher,
    StateHasherConfig, StateWithHashComplexity,
};
use hw_tests::fixtures::{hashed_state, roster, state_signature};
use rand::Rng;
use shared_types::{EventDescriptor, NodeId, Transaction, UnsignedEvent};

fn random_payloads(count: usize, size: usize) -> Vec<Vec<u8>> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| (0..size).map(|_| rng.gen()).collect())
        .collect()
}

fn bench_transaction_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("hw-01-transaction-pool");

    for count in [10usize, 100, 1_000] {
        let payloads = random_payloads(count, 128);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("submit_and_drain", count),
            &payloads,
            |b, payloads| {
                b.iter(|| {
                    let pool = TransactionPool::new(TransactionPoolConfig::default())
                        .expect("default pool config");
                    pool.update_platform_status(shared_types::PlatformStatus::Active);
                    for payload in payloads {
                        pool.submit_application_transaction(payload.clone());
                    }
                    black_box(pool.get_transactions().len())
                })
            },
        );
    }

    group.finish();
}

fn bench_event_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hw-02-event-hashing");
    let hasher = EventHasher::new();

    for count in [0usize, 16, 256] {
        let event = UnsignedEvent {
            creator: NodeId(0),
            self_parent: Some(EventDescriptor {
                hash: [1; 32],
                creator: NodeId(0),
                birth_round: 10,
                generation: 41,
            }),
            other_parents: vec![EventDescriptor {
                hash: [2; 32],
                creator: NodeId(1),
                birth_round: 10,
                generation: 40,
            }],
            birth_round: 11,
            generation: 42,
            time_created: 1_000,
            transactions: random_payloads(count, 256)
                .into_iter()
                .map(Transaction::application)
                .collect(),
        };
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("hash", count), &event, |b, event| {
            b.iter(|| black_box(hasher.hash(event)))
        });
    }

    group.finish();
}

fn bench_state_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hw-04-state-hashing");
    group.measurement_time(Duration::from_secs(10));
    let hasher = StateHasher::new(StateHasherConfig::default());

    for leaves in [100usize, 1_000, 10_000] {
        let payloads = random_payloads(leaves, 64);
        group.throughput(Throughput::Elements(leaves as u64));
        group.bench_with_input(
            BenchmarkId::new("merkle_root", leaves),
            &payloads,
            |b, payloads| {
                b.iter(|| {
                    let state = SignedState::new(1, 1_000, payloads.clone());
                    let reserved = ReservedSignedState::new(state, "bench");
                    black_box(hasher.hash_state(StateWithHashComplexity::new(reserved, 1)))
                })
            },
        );
    }

    group.finish();
}

fn bench_iss_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("hw-04-iss-detection");
    let hash = [0x11; 32];

    for size in [4u64, 16, 64] {
        let roster = roster(size);
        let signatures: Vec<_> = (0..size).map(|signer| state_signature(signer, 1, hash)).collect();
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(
            BenchmarkId::new("round_tally", size),
            &signatures,
            |b, signatures| {
                b.iter(|| {
                    let mut detector =
                        IssDetector::new(NodeId(0), roster.clone(), &IssDetectorConfig::default())
                            .expect("valid detector config");
                    detector.signal_end_of_preconsensus_replay();
                    let mut notifications = detector.handle_state(hashed_state(1, hash));
                    notifications.extend(detector.handle_state_signature_transactions(signatures));
                    black_box(notifications)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_transaction_pool,
    bench_event_hashing,
    bench_state_hashing,
    bench_iss_detection,
);

criterion_main!(benches);
