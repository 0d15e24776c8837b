// Zero-knowledge proof benchmarks for the ZKAT protocol.
//
// Covers parameter setup, token commitment, single range proofs, and full
// issue and transfer proving/verification over BN254. Range proof cost grows
// with base × digits, so both test configurations are measured.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use rand::{rngs::StdRng, SeedableRng};

use zkat_protocol::crypto::random_scalar;
use zkat_protocol::zkp::{
    commit, issue, transfer, PublicParams, RangeProof, Token, TokenDataWitness,
};

fn bench_setup(c: &mut Criterion) {
    c.bench_function("zkp/setup_100x2", |b| {
        b.iter(|| PublicParams::setup(100, 2, None).unwrap());
    });
}

fn bench_commit(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let pp = PublicParams::setup(100, 2, None).unwrap();
    let value = zkat_protocol::crypto::scalar_from_u64(1_000);
    let blinding = random_scalar(&mut rng);

    c.bench_function("zkp/commit", |b| {
        b.iter(|| commit(&pp, &value, &blinding, "USD"));
    });
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("zkp/range");
    for (base, digits, value) in [(10u64, 4u32, 4_321u64), (100, 2, 4_321)] {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = PublicParams::setup(base, digits, None).unwrap();
        let witness = TokenDataWitness::random("USD", value, &mut rng);
        let token = witness.to_token(&pp);
        let label = format!("{}x{}", base, digits);

        group.bench_with_input(BenchmarkId::new("prove", &label), &pp, |b, pp| {
            b.iter(|| RangeProof::prove(pp, &token, &witness, &mut rng).unwrap());
        });

        let proof = RangeProof::prove(&pp, &token, &witness, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::new("verify", &label), &pp, |b, pp| {
            b.iter(|| proof.verify(pp, &token).unwrap());
        });
    }
    group.finish();
}

fn bench_issue(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let pp = Arc::new(PublicParams::setup(100, 2, None).unwrap());
    let witnesses: Vec<TokenDataWitness> = [120u64, 190]
        .iter()
        .map(|v| TokenDataWitness::random("USD", *v, &mut rng))
        .collect();
    let tokens: Vec<Token> = witnesses.iter().map(|w| w.to_token(&pp)).collect();

    let prover = issue::Prover::new(witnesses, tokens.clone(), true, Arc::clone(&pp));
    c.bench_function("zkp/issue_prove_2", |b| {
        b.iter(|| prover.prove_with_rng(&mut rng).unwrap());
    });

    let proof = prover.prove_with_rng(&mut rng).unwrap();
    let verifier = issue::Verifier::new(tokens, true, pp);
    c.bench_function("zkp/issue_verify_2", |b| {
        b.iter(|| verifier.verify(&proof).unwrap());
    });
}

fn bench_transfer(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let pp = Arc::new(PublicParams::setup(100, 2, None).unwrap());
    let inputs: Vec<TokenDataWitness> = [90u64, 60]
        .iter()
        .map(|v| TokenDataWitness::random("USD", *v, &mut rng))
        .collect();
    let outputs: Vec<TokenDataWitness> = [50u64, 100]
        .iter()
        .map(|v| TokenDataWitness::random("USD", *v, &mut rng))
        .collect();
    let in_tokens: Vec<Token> = inputs.iter().map(|w| w.to_token(&pp)).collect();
    let out_tokens: Vec<Token> = outputs.iter().map(|w| w.to_token(&pp)).collect();

    let prover = transfer::Prover::new(
        inputs,
        outputs,
        in_tokens.clone(),
        out_tokens.clone(),
        Arc::clone(&pp),
    );
    c.bench_function("zkp/transfer_prove_2x2", |b| {
        b.iter(|| prover.prove_with_rng(&mut rng).unwrap());
    });

    let proof = prover.prove_with_rng(&mut rng).unwrap();
    let verifier = transfer::Verifier::new(in_tokens, out_tokens, pp);
    c.bench_function("zkp/transfer_verify_2x2", |b| {
        b.iter(|| verifier.verify(&proof).unwrap());
    });
}

criterion_group!(
    benches,
    bench_setup,
    bench_commit,
    bench_range,
    bench_issue,
    bench_transfer,
);
criterion_main!(benches);
