//! ECDSA adapters
//!
//! NIST curves are backed by the RustCrypto `p256`, `p384` and `p521` crates and
//! sign with the curve's conventional digest (SHA-256, SHA-384, SHA-512).
//! secp256k1 is backed by libsecp256k1 and signs the SHA-256 of the message.

use crate::adapter::{
    fixed_bytes, malformed_signature, Family, KeyPair, Signature, SignatureScheme, Variant,
};
use crate::error::{AdapterError, AdapterResult};
use rand::RngCore;
use rand_core::OsRng;
use secp256k1::{ecdsa::Signature as Secp256k1Signature, Message as Secp256k1Message, SECP256K1};
use sha2::{Digest, Sha256};
use signature::{Signer, Verifier};

/// Encoded `r || s` signature sizes
pub mod constants {
    //! Fixed-width ECDSA signature sizes

    /// P-256 signature size in bytes
    pub const P256_SIGNATURE_SIZE: usize = 64;

    /// P-384 signature size in bytes
    pub const P384_SIGNATURE_SIZE: usize = 96;

    /// P-521 signature size in bytes
    pub const P521_SIGNATURE_SIZE: usize = 132;

    /// secp256k1 compact signature size in bytes
    pub const SECP256K1_SIGNATURE_SIZE: usize = 64;

    /// secp256k1 private key size in bytes
    pub const SECP256K1_PRIVATE_KEY_SIZE: usize = 32;
}

use constants::*;

macro_rules! rustcrypto_ecdsa {
    ($(#[$meta:meta])* $name:ident, $curve:ident, $label:literal, $size:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            /// Identifier of this variant
            pub const VARIANT: Variant = Variant::new(Family::Ecdsa, $label);
        }

        impl SignatureScheme for $name {
            type PublicKey = $curve::ecdsa::VerifyingKey;
            type PrivateKey = $curve::ecdsa::SigningKey;

            fn variant(&self) -> Variant {
                Self::VARIANT
            }

            fn generate_key(&self) -> AdapterResult<KeyPair<Self::PublicKey, Self::PrivateKey>> {
                let signing_key = $curve::ecdsa::SigningKey::random(&mut OsRng);
                let verifying_key = $curve::ecdsa::VerifyingKey::from(&signing_key);
                Ok(KeyPair::new(Self::VARIANT, verifying_key, signing_key))
            }

            fn sign(&self, private_key: &Self::PrivateKey, message: &[u8]) -> AdapterResult<Signature> {
                let signature: $curve::ecdsa::Signature = private_key
                    .try_sign(message)
                    .map_err(|e| AdapterError::Signing {
                        variant: $label,
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
                let bytes: [u8; $size] = fixed_bytes(signature.as_bytes())
                    .map_err(|reason| malformed_signature(Self::VARIANT, reason))?;

                // Out-of-range scalars are a failed verification, not malformed input
                let signature = match $curve::ecdsa::Signature::from_slice(&bytes) {
                    Ok(signature) => signature,
                    Err(_) => return Ok(false),
                };
                Ok(public_key.verify(message, &signature).is_ok())
            }
        }
    };
}

rustcrypto_ecdsa!(
    /// ECDSA over NIST P-256 with SHA-256
    EcdsaP256,
    p256,
    "ECDSA-P256",
    P256_SIGNATURE_SIZE
);

rustcrypto_ecdsa!(
    /// ECDSA over NIST P-384 with SHA-384
    EcdsaP384,
    p384,
    "ECDSA-P384",
    P384_SIGNATURE_SIZE
);

rustcrypto_ecdsa!(
    /// ECDSA over NIST P-521 with SHA-512
    EcdsaP521,
    p521,
    "ECDSA-P521",
    P521_SIGNATURE_SIZE
);

/// ECDSA over secp256k1 with SHA-256
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaSecp256k1;

impl EcdsaSecp256k1 {
    /// Identifier of this variant
    pub const VARIANT: Variant = Variant::new(Family::Ecdsa, "ECDSA-secp256k1");

    fn digest(message: &[u8]) -> Secp256k1Message {
        Secp256k1Message::from_digest(Sha256::digest(message).into())
    }
}

impl SignatureScheme for EcdsaSecp256k1 {
    type PublicKey = secp256k1::PublicKey;
    type PrivateKey = secp256k1::SecretKey;

    fn variant(&self) -> Variant {
        Self::VARIANT
    }

    fn generate_key(&self) -> AdapterResult<KeyPair<Self::PublicKey, Self::PrivateKey>> {
        let mut rng = rand::rng();
        let mut key_bytes = [0u8; SECP256K1_PRIVATE_KEY_SIZE];
        rng.fill_bytes(&mut key_bytes);
        let private_key = secp256k1::SecretKey::from_byte_array(key_bytes).map_err(|e| {
            AdapterError::KeyGeneration {
                variant: Self::VARIANT.name,
                reason: format!("Failed to generate private key: {}", e),
            }
        })?;
        let public_key = secp256k1::PublicKey::from_secret_key(SECP256K1, &private_key);
        Ok(KeyPair::new(Self::VARIANT, public_key, private_key))
    }

    fn sign(&self, private_key: &Self::PrivateKey, message: &[u8]) -> AdapterResult<Signature> {
        let signature = SECP256K1.sign_ecdsa(Self::digest(message), private_key);
        Ok(Signature::from(signature.serialize_compact().to_vec()))
    }

    fn verify(
        &self,
        public_key: &Self::PublicKey,
        message: &[u8],
        signature: &Signature,
    ) -> AdapterResult<bool> {
        let bytes: [u8; SECP256K1_SIGNATURE_SIZE] = fixed_bytes(signature.as_bytes())
            .map_err(|reason| malformed_signature(Self::VARIANT, reason))?;

        let signature = match Secp256k1Signature::from_compact(&bytes) {
            Ok(signature) => signature,
            Err(_) => return Ok(false),
        };
        Ok(SECP256K1
            .verify_ecdsa(Self::digest(message), &signature, public_key)
            .is_ok())
    }
}
