//! Standard benchmark suites
//!
//! Signature groups compare one classical ECDSA curve, one EdDSA curve and one
//! ML-DSA parameter set of roughly matching security strength. KEM groups
//! compare every ML-KEM parameter set.

use super::{BenchCase, BenchGroup};
use crate::adapter::{
    EcdsaP256, EcdsaP384, EcdsaP521, EcdsaSecp256k1, Ed25519, Ed448, MlDsa44, MlDsa65, MlDsa87,
    MlKem1024, MlKem512, MlKem768,
};
use crate::workload::{KemOp, KemWorkload, Message, SignatureOp, SignatureWorkload};
use std::sync::Arc;

/// Security tier of a signature group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityTier {
    /// P-256, secp256k1, Ed25519, ML-DSA44
    One,
    /// P-384, Ed448, ML-DSA65
    Two,
    /// P-521, Ed448, ML-DSA87
    Three,
}

impl SecurityTier {
    /// All tiers in suite order
    pub const ALL: [SecurityTier; 3] = [Self::One, Self::Two, Self::Three];

    /// Numeric suffix of the group name
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Signature variants compared in this tier
    pub fn variants(self) -> Vec<Arc<dyn SignatureWorkload>> {
        match self {
            Self::One => vec![
                signature_workload(EcdsaP256),
                signature_workload(EcdsaSecp256k1),
                signature_workload(Ed25519),
                signature_workload(MlDsa44),
            ],
            Self::Two => vec![
                signature_workload(EcdsaP384),
                signature_workload(Ed448),
                signature_workload(MlDsa65),
            ],
            Self::Three => vec![
                signature_workload(EcdsaP521),
                signature_workload(Ed448),
                signature_workload(MlDsa87),
            ],
        }
    }

    /// Group name for `op`, e.g. `Verify2`
    pub fn group_name(self, op: SignatureOp) -> String {
        format!("{}{}", op.label(), self.number())
    }
}

/// Every ML-KEM variant
pub fn kem_variants() -> Vec<Arc<dyn KemWorkload>> {
    #[allow(unused_mut)]
    let mut variants = vec![
        kem_workload(MlKem512),
        kem_workload(MlKem768),
        kem_workload(MlKem1024),
    ];

    #[cfg(feature = "compare-pqcrypto")]
    {
        use crate::adapter::{PqcleanMlKem1024, PqcleanMlKem512, PqcleanMlKem768};
        variants.push(kem_workload(PqcleanMlKem512));
        variants.push(kem_workload(PqcleanMlKem768));
        variants.push(kem_workload(PqcleanMlKem1024));
    }

    variants
}

fn signature_workload<S: SignatureWorkload + 'static>(scheme: S) -> Arc<dyn SignatureWorkload> {
    Arc::new(scheme)
}

fn kem_workload<K: KemWorkload + 'static>(scheme: K) -> Arc<dyn KemWorkload> {
    Arc::new(scheme)
}

/// One signature group
pub fn signature_group(tier: SecurityTier, op: SignatureOp, message: Message) -> BenchGroup {
    tier.variants()
        .into_iter()
        .fold(BenchGroup::new(tier.group_name(op)), |group, workload| {
            group.with_case(BenchCase::signature(workload, op, message))
        })
}

/// One KEM group
pub fn kem_group(op: KemOp) -> BenchGroup {
    kem_variants()
        .into_iter()
        .fold(BenchGroup::new(op.label()), |group, workload| {
            group.with_case(BenchCase::kem(workload, op))
        })
}

/// `GenKey1..3`, `Sign1..3` and `Verify1..3`
pub fn signature_suites(message: &Message) -> Vec<BenchGroup> {
    SignatureOp::ALL
        .into_iter()
        .flat_map(|op| {
            SecurityTier::ALL
                .into_iter()
                .map(move |tier| signature_group(tier, op, *message))
        })
        .collect()
}

/// `KemGenKey`, `KemEncap` and `KemDecap`
pub fn kem_suites() -> Vec<BenchGroup> {
    KemOp::ALL.into_iter().map(kem_group).collect()
}

/// Every standard group over the standard message
pub fn all() -> Vec<BenchGroup> {
    let mut groups = signature_suites(&Message::standard());
    groups.extend(kem_suites());
    groups
}
