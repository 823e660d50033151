//! EdDSA adapters: Ed25519 via `ed25519-dalek`, Ed448 via `ed448-rust`

use crate::adapter::{
    fixed_bytes, malformed_signature, Family, KeyPair, Signature, SignatureScheme, Variant,
};
use crate::error::{AdapterError, AdapterResult};
use rand_core::OsRng;
use signature::{Signer, Verifier};

/// Ed25519 signature size in bytes
pub const ED25519_SIGNATURE_SIZE: usize = 64;

/// Ed448 signature size in bytes
pub const ED448_SIGNATURE_SIZE: usize = 114;

/// Pure Ed25519 (RFC 8032)
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519;

impl Ed25519 {
    /// Identifier of this variant
    pub const VARIANT: Variant = Variant::new(Family::EdDsa, "EdDSA-Ed25519");
}

impl SignatureScheme for Ed25519 {
    type PublicKey = ed25519_dalek::VerifyingKey;
    type PrivateKey = ed25519_dalek::SigningKey;

    fn variant(&self) -> Variant {
        Self::VARIANT
    }

    fn generate_key(&self) -> AdapterResult<KeyPair<Self::PublicKey, Self::PrivateKey>> {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        Ok(KeyPair::new(Self::VARIANT, signing_key.verifying_key(), signing_key))
    }

    fn sign(&self, private_key: &Self::PrivateKey, message: &[u8]) -> AdapterResult<Signature> {
        let signature: ed25519_dalek::Signature =
            private_key
                .try_sign(message)
                .map_err(|e| AdapterError::Signing {
                    variant: Self::VARIANT.name,
                    reason: e.to_string(),
                })?;
        Ok(Signature::from(signature.to_bytes().to_vec()))
    }

    fn verify(
        &self,
        public_key: &Self::PublicKey,
        message: &[u8],
        signature: &Signature,
    ) -> AdapterResult<bool> {
        let bytes: [u8; ED25519_SIGNATURE_SIZE] = fixed_bytes(signature.as_bytes())
            .map_err(|reason| malformed_signature(Self::VARIANT, reason))?;
        let signature = ed25519_dalek::Signature::from_bytes(&bytes);
        Ok(public_key.verify(message, &signature).is_ok())
    }
}

/// Pure Ed448 (RFC 8032) with an empty context
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed448;

impl Ed448 {
    /// Identifier of this variant
    pub const VARIANT: Variant = Variant::new(Family::EdDsa, "EdDSA-Ed448");
}

impl SignatureScheme for Ed448 {
    type PublicKey = ed448_rust::PublicKey;
    type PrivateKey = ed448_rust::PrivateKey;

    fn variant(&self) -> Variant {
        Self::VARIANT
    }

    fn generate_key(&self) -> AdapterResult<KeyPair<Self::PublicKey, Self::PrivateKey>> {
        let private_key = ed448_rust::PrivateKey::new(&mut OsRng);
        let public_key = ed448_rust::PublicKey::from(&private_key);
        Ok(KeyPair::new(Self::VARIANT, public_key, private_key))
    }

    fn sign(&self, private_key: &Self::PrivateKey, message: &[u8]) -> AdapterResult<Signature> {
        let signature = private_key
            .sign(message, None)
            .map_err(|e| AdapterError::Signing {
                variant: Self::VARIANT.name,
                reason: format!("{:?}", e),
            })?;
        Ok(Signature::from(signature.to_vec()))
    }

    fn verify(
        &self,
        public_key: &Self::PublicKey,
        message: &[u8],
        signature: &Signature,
    ) -> AdapterResult<bool> {
        if signature.len() != ED448_SIGNATURE_SIZE {
            return Err(malformed_signature(
                Self::VARIANT,
                format!(
                    "expected {} bytes, got {}",
                    ED448_SIGNATURE_SIZE,
                    signature.len()
                ),
            ));
        }
        // Any library error past the length check is a rejected signature
        Ok(public_key.verify(message, signature.as_bytes(), None).is_ok())
    }
}
