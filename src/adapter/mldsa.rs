//! ML-DSA (FIPS 204) adapters backed by the `fips204` crate
//!
//! Signing is hedged and uses an empty context string.

use crate::adapter::{
    fixed_bytes, malformed_signature, Family, KeyPair, Signature, SignatureScheme, Variant,
};
use crate::error::{AdapterError, AdapterResult};
use fips204::traits::{Signer, Verifier};

macro_rules! fips204_mldsa {
    ($(#[$meta:meta])* $name:ident, $module:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            /// Identifier of this variant
            pub const VARIANT: Variant = Variant::new(Family::MlDsa, $label);

            /// Encoded signature size in bytes
            pub const SIGNATURE_SIZE: usize = fips204::$module::SIG_LEN;
        }

        impl SignatureScheme for $name {
            type PublicKey = fips204::$module::PublicKey;
            type PrivateKey = fips204::$module::PrivateKey;

            fn variant(&self) -> Variant {
                Self::VARIANT
            }

            fn generate_key(&self) -> AdapterResult<KeyPair<Self::PublicKey, Self::PrivateKey>> {
                let (public_key, private_key) =
                    fips204::$module::try_keygen().map_err(|e| AdapterError::KeyGeneration {
                        variant: $label,
                        reason: e.to_string(),
                    })?;
                Ok(KeyPair::new(Self::VARIANT, public_key, private_key))
            }

            fn sign(&self, private_key: &Self::PrivateKey, message: &[u8]) -> AdapterResult<Signature> {
                let signature = private_key
                    .try_sign(message, &[])
                    .map_err(|e| AdapterError::Signing {
                        variant: $label,
                        reason: e.to_string(),
                    })?;
                Ok(Signature::from(signature.to_vec()))
            }

            fn verify(
                &self,
                public_key: &Self::PublicKey,
                message: &[u8],
                signature: &Signature,
            ) -> AdapterResult<bool> {
                let bytes: [u8; fips204::$module::SIG_LEN] = fixed_bytes(signature.as_bytes())
                    .map_err(|reason| malformed_signature(Self::VARIANT, reason))?;
                Ok(public_key.verify(message, &bytes, &[]))
            }
        }
    };
}

fips204_mldsa!(
    /// ML-DSA-44, NIST security category 2
    MlDsa44,
    ml_dsa_44,
    "ML-DSA44"
);

fips204_mldsa!(
    /// ML-DSA-65, NIST security category 3
    MlDsa65,
    ml_dsa_65,
    "ML-DSA65"
);

fips204_mldsa!(
    /// ML-DSA-87, NIST security category 5
    MlDsa87,
    ml_dsa_87,
    "ML-DSA87"
);
