//! Integration tests for the pq-bench harness

use pq_bench::adapter::{
    Ciphertext, EcdsaP256, Ed25519, Family, KeyPair, MlDsa44, MlKem768, SharedSecret, Signature,
    Variant,
};
use pq_bench::error::AdapterResult;
use pq_bench::prelude::*;
use std::sync::Arc;

/// Signature scheme whose key generation always fails
#[derive(Clone, Copy)]
struct BrokenKeygen;

impl SignatureScheme for BrokenKeygen {
    type PublicKey = ();
    type PrivateKey = ();

    fn variant(&self) -> Variant {
        Variant::new(Family::Ecdsa, "ECDSA-Broken")
    }

    fn generate_key(&self) -> AdapterResult<KeyPair<(), ()>> {
        Err(AdapterError::KeyGeneration {
            variant: "ECDSA-Broken",
            reason: "entropy source unavailable".to_string(),
        })
    }

    fn sign(&self, _private_key: &(), _message: &[u8]) -> AdapterResult<Signature> {
        Ok(Signature::from(Vec::new()))
    }

    fn verify(&self, _public_key: &(), _message: &[u8], _signature: &Signature) -> AdapterResult<bool> {
        Ok(true)
    }
}

/// Signature scheme that rejects every signature
#[derive(Clone, Copy)]
struct RejectEverything;

impl SignatureScheme for RejectEverything {
    type PublicKey = ();
    type PrivateKey = ();

    fn variant(&self) -> Variant {
        Variant::new(Family::EdDsa, "EdDSA-Rejecting")
    }

    fn generate_key(&self) -> AdapterResult<KeyPair<(), ()>> {
        Ok(KeyPair::new(SignatureScheme::variant(self), (), ()))
    }

    fn sign(&self, _private_key: &(), message: &[u8]) -> AdapterResult<Signature> {
        Ok(Signature::from(message))
    }

    fn verify(&self, _public_key: &(), _message: &[u8], _signature: &Signature) -> AdapterResult<bool> {
        Ok(false)
    }
}

/// KEM whose decapsulation recovers a different secret than was encapsulated
#[derive(Clone, Copy)]
struct MismatchedSecret;

impl KemScheme for MismatchedSecret {
    type EncapsulationKey = ();
    type DecapsulationKey = ();

    fn variant(&self) -> Variant {
        Variant::new(Family::MlKem, "MLKEM-Mismatched")
    }

    fn generate_key(&self) -> AdapterResult<KeyPair<(), ()>> {
        Ok(KeyPair::new(KemScheme::variant(self), (), ()))
    }

    fn encapsulate(&self, _public_key: &()) -> AdapterResult<(Ciphertext, SharedSecret)> {
        Ok((Ciphertext::from(vec![0u8; 32]), SharedSecret::from(vec![0x11; 32])))
    }

    fn decapsulate(&self, _private_key: &(), _ciphertext: &Ciphertext) -> AdapterResult<SharedSecret> {
        Ok(SharedSecret::from(vec![0x22; 32]))
    }
}

fn config(iterations: u64) -> BenchConfig {
    BenchConfig::default()
        .with_iterations(iterations)
        .expect("Failed to set iterations")
}

#[test]
fn test_library_version() {
    assert!(!pq_bench::VERSION.is_empty());
    assert_eq!(pq_bench::CRATE_NAME, "pq-bench");
}

#[test]
fn test_ecdsa_p256_scenario() {
    let message = Message::standard();
    let key_pair = EcdsaP256.generate_key().expect("Failed to generate key");

    let signature = EcdsaP256
        .sign(key_pair.private_key(), message.as_bytes())
        .expect("Failed to sign");
    assert!(EcdsaP256
        .verify(key_pair.public_key(), message.as_bytes(), &signature)
        .expect("Failed to verify"));

    let mut mutated = signature.clone();
    mutated.as_bytes_mut()[10] ^= 0x80;
    assert!(!EcdsaP256
        .verify(key_pair.public_key(), message.as_bytes(), &mutated)
        .expect("Mutated signature must not be an error"));
}

#[test]
fn test_ml_kem_768_scenario() {
    let key_pair = MlKem768.generate_key().expect("Failed to generate key");
    let (ciphertext, sent) = MlKem768
        .encapsulate(key_pair.public_key())
        .expect("Failed to encapsulate");
    let received = MlKem768
        .decapsulate(key_pair.private_key(), &ciphertext)
        .expect("Failed to decapsulate");

    assert_eq!(sent.len(), 32);
    assert_eq!(received.len(), 32);
    assert_eq!(sent, received);
}

#[test]
fn test_iteration_configuration() {
    for raw in ["0", "-5", "abc"] {
        let config = BenchConfig::from_lookup(|key| {
            (key == pq_bench::config::ITERATIONS_ENV).then(|| raw.to_string())
        });
        assert_eq!(config.iterations.get(), 100, "BENCH_ITER={}", raw);
    }

    let config = BenchConfig::from_lookup(|key| {
        (key == pq_bench::config::ITERATIONS_ENV).then(|| "3".to_string())
    });
    let group = BenchGroup::new("Sign1").with_case(BenchCase::signature(
        Arc::new(Ed25519),
        SignatureOp::Sign,
        Message::standard(),
    ));

    let outcomes = Runner::new(config).run_group(&group);
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].result().expect("Case failed").iterations, 3);
}

#[test]
fn test_partial_failure_isolation() {
    let message = Message::standard();
    let group = BenchGroup::new("Sign1")
        .with_case(BenchCase::signature(Arc::new(BrokenKeygen), SignatureOp::Sign, message))
        .with_case(BenchCase::signature(Arc::new(MlDsa44), SignatureOp::Sign, message))
        .with_case(BenchCase::signature(Arc::new(Ed25519), SignatureOp::Sign, message));

    let report = Runner::new(config(2)).run_all(&[group]);
    assert!(report.has_failures());
    assert_eq!(report.outcomes().len(), 3);
    assert_eq!(report.failures().count(), 1);

    let failure = report
        .get("Sign1/ECDSA-Broken")
        .and_then(CaseOutcome::failure)
        .expect("Broken case must fail");
    match &failure.error {
        CaseError::Setup { case, source } => {
            assert_eq!(case, "Sign1/ECDSA-Broken");
            assert!(matches!(source, AdapterError::KeyGeneration { .. }));
        }
        other => panic!("unexpected error: {}", other),
    }

    for name in ["Sign1/ML-DSA44", "Sign1/EdDSA-Ed25519"] {
        let result = report
            .get(name)
            .and_then(CaseOutcome::result)
            .expect("Case must complete");
        assert_eq!(result.iterations, 2);
    }
}

#[test]
fn test_key_generation_failure_is_an_iteration_error() {
    let group = BenchGroup::new("GenKey1").with_case(BenchCase::signature(
        Arc::new(BrokenKeygen),
        SignatureOp::GenerateKey,
        Message::standard(),
    ));

    let report = Runner::new(config(5)).run_all(&[group]);
    let failure = report.failures().next().expect("Case must fail");
    match &failure.error {
        CaseError::Iteration { iteration, source, .. } => {
            assert_eq!(*iteration, 0);
            assert!(matches!(
                source,
                OperationError::Adapter(AdapterError::KeyGeneration { .. })
            ));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_rejected_signature_fails_first_iteration() {
    let group = BenchGroup::new("Verify1").with_case(BenchCase::signature(
        Arc::new(RejectEverything),
        SignatureOp::Verify,
        Message::standard(),
    ));

    let report = Runner::new(config(10)).run_all(&[group]);
    let failure = report.failures().next().expect("Case must fail");
    match &failure.error {
        CaseError::Iteration { iteration, source, .. } => {
            assert_eq!(*iteration, 0);
            assert_eq!(
                *source,
                OperationError::VerificationFailed { variant: "EdDSA-Rejecting" }
            );
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(report.to_table().contains("--- FAIL: BenchmarkVerify1/EdDSA-Rejecting"));
}

#[test]
fn test_mismatched_secret_fails_first_iteration() {
    let group = BenchGroup::new("KemDecap")
        .with_case(BenchCase::kem(Arc::new(MismatchedSecret), KemOp::Decapsulate))
        .with_case(BenchCase::kem(Arc::new(MlKem768), KemOp::Decapsulate));

    let report = Runner::new(config(4)).run_all(&[group]);
    assert_eq!(report.failures().count(), 1);

    let failure = report
        .get("KemDecap/MLKEM-Mismatched")
        .and_then(CaseOutcome::failure)
        .expect("Mismatched case must fail");
    assert_eq!(
        failure.error,
        CaseError::Iteration {
            case: "KemDecap/MLKEM-Mismatched".to_string(),
            iteration: 0,
            source: OperationError::SharedSecretMismatch { variant: "MLKEM-Mismatched" },
        }
    );
    assert!(report.to_table().contains("--- FAIL: BenchmarkKemDecap/MLKEM-Mismatched"));

    let result = report
        .get("KemDecap/MLKEM-768")
        .and_then(CaseOutcome::result)
        .expect("ML-KEM-768 must complete");
    assert_eq!(result.iterations, 4);
}

#[test]
fn test_standard_suites_complete() {
    let report = Runner::new(config(1)).run_all(&suite::all());

    assert!(!report.has_failures(), "{}", report);
    assert!(report.results().count() >= 39);
    assert!(report.get("Verify3/ML-DSA87").is_some());
    assert!(report.get("KemDecap/MLKEM-1024").is_some());
}

#[test]
fn test_parallel_run_matches_sequential_layout() {
    let groups = suite::kem_suites();
    let sequential = Runner::new(config(2)).run_all(&groups);
    let parallel = Runner::new(config(2).with_parallel(true)).run_all(&groups);

    let names = |report: &Report| -> Vec<String> {
        report.outcomes().iter().map(CaseOutcome::name).collect()
    };
    assert_eq!(names(&sequential), names(&parallel));
    assert!(!parallel.has_failures());
}

#[cfg(feature = "serde_support")]
#[test]
fn test_json_report() {
    let group = suite::signature_group(
        suite::SecurityTier::Two,
        SignatureOp::Verify,
        Message::standard(),
    );
    let report = Runner::new(config(1).with_format(ReportFormat::Json)).run_all(&[group]);

    let rendered = report.render(ReportFormat::Json).expect("Failed to render");
    let value: serde_json::Value = serde_json::from_str(&rendered).expect("Invalid JSON");
    let names: Vec<&str> = value["results"]
        .as_array()
        .expect("results must be an array")
        .iter()
        .filter_map(|result| result["name"].as_str())
        .collect();
    assert_eq!(names, ["Verify2/ECDSA-P384", "Verify2/EdDSA-Ed448", "Verify2/ML-DSA65"]);
}
