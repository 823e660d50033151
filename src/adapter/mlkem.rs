//! ML-KEM (FIPS 203) adapters
//!
//! The default implementation is the `fips203` crate. With the
//! `compare-pqcrypto` feature the PQClean reference code is available as a
//! second implementation of the same parameter sets.

use crate::adapter::{fixed_bytes, Ciphertext, Family, KemScheme, KeyPair, SharedSecret, Variant};
use crate::error::{AdapterError, AdapterResult};
use fips203::traits::{Decaps, Encaps, KeyGen, SerDes};

/// Shared secret size in bytes for every ML-KEM parameter set
pub const SHARED_SECRET_SIZE: usize = 32;

macro_rules! fips203_mlkem {
    ($(#[$meta:meta])* $name:ident, $module:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            /// Identifier of this variant
            pub const VARIANT: Variant = Variant::new(Family::MlKem, $label);

            /// Encoded ciphertext size in bytes
            pub const CIPHERTEXT_SIZE: usize = fips203::$module::CT_LEN;
        }

        impl KemScheme for $name {
            type EncapsulationKey = fips203::$module::EncapsKey;
            type DecapsulationKey = fips203::$module::DecapsKey;

            fn variant(&self) -> Variant {
                Self::VARIANT
            }

            fn generate_key(
                &self,
            ) -> AdapterResult<KeyPair<Self::EncapsulationKey, Self::DecapsulationKey>> {
                let (encaps_key, decaps_key) = <fips203::$module::KG as KeyGen>::try_keygen()
                    .map_err(|e| AdapterError::KeyGeneration {
                        variant: $label,
                        reason: e.to_string(),
                    })?;
                Ok(KeyPair::new(Self::VARIANT, encaps_key, decaps_key))
            }

            fn encapsulate(
                &self,
                public_key: &Self::EncapsulationKey,
            ) -> AdapterResult<(Ciphertext, SharedSecret)> {
                let (shared_secret, ciphertext) =
                    public_key.try_encaps().map_err(|e| AdapterError::Encapsulation {
                        variant: $label,
                        reason: e.to_string(),
                    })?;
                Ok((
                    Ciphertext::from(ciphertext.into_bytes().to_vec()),
                    SharedSecret::from(shared_secret.into_bytes().to_vec()),
                ))
            }

            fn decapsulate(
                &self,
                private_key: &Self::DecapsulationKey,
                ciphertext: &Ciphertext,
            ) -> AdapterResult<SharedSecret> {
                let decapsulation_error = |reason: String| AdapterError::Decapsulation {
                    variant: $label,
                    reason,
                };

                let bytes: [u8; fips203::$module::CT_LEN] =
                    fixed_bytes(ciphertext.as_bytes()).map_err(decapsulation_error)?;
                let ciphertext = fips203::$module::CipherText::try_from_bytes(bytes)
                    .map_err(|e| decapsulation_error(e.to_string()))?;
                let shared_secret = private_key
                    .try_decaps(&ciphertext)
                    .map_err(|e| decapsulation_error(e.to_string()))?;
                Ok(SharedSecret::from(shared_secret.into_bytes().to_vec()))
            }
        }
    };
}

fips203_mlkem!(
    /// ML-KEM-512, NIST security category 1
    MlKem512,
    ml_kem_512,
    "MLKEM-512"
);

fips203_mlkem!(
    /// ML-KEM-768, NIST security category 3
    MlKem768,
    ml_kem_768,
    "MLKEM-768"
);

fips203_mlkem!(
    /// ML-KEM-1024, NIST security category 5
    MlKem1024,
    ml_kem_1024,
    "MLKEM-1024"
);

#[cfg(feature = "compare-pqcrypto")]
mod pqclean {
    use super::*;
    use pqcrypto_traits::kem::{Ciphertext as _, SharedSecret as _};

    macro_rules! pqclean_mlkem {
        ($(#[$meta:meta])* $name:ident, $module:ident, $label:literal) => {
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            impl $name {
                /// Identifier of this variant
                pub const VARIANT: Variant = Variant::new(Family::MlKem, $label);
            }

            impl KemScheme for $name {
                type EncapsulationKey = pqcrypto_mlkem::$module::PublicKey;
                type DecapsulationKey = pqcrypto_mlkem::$module::SecretKey;

                fn variant(&self) -> Variant {
                    Self::VARIANT
                }

                fn generate_key(
                    &self,
                ) -> AdapterResult<KeyPair<Self::EncapsulationKey, Self::DecapsulationKey>> {
                    let (public_key, secret_key) = pqcrypto_mlkem::$module::keypair();
                    Ok(KeyPair::new(Self::VARIANT, public_key, secret_key))
                }

                fn encapsulate(
                    &self,
                    public_key: &Self::EncapsulationKey,
                ) -> AdapterResult<(Ciphertext, SharedSecret)> {
                    let (shared_secret, ciphertext) = pqcrypto_mlkem::$module::encapsulate(public_key);
                    Ok((
                        Ciphertext::from(ciphertext.as_bytes()),
                        SharedSecret::from(shared_secret.as_bytes().to_vec()),
                    ))
                }

                fn decapsulate(
                    &self,
                    private_key: &Self::DecapsulationKey,
                    ciphertext: &Ciphertext,
                ) -> AdapterResult<SharedSecret> {
                    let ciphertext =
                        pqcrypto_mlkem::$module::Ciphertext::from_bytes(ciphertext.as_bytes())
                            .map_err(|e| AdapterError::Decapsulation {
                                variant: $label,
                                reason: e.to_string(),
                            })?;
                    let shared_secret = pqcrypto_mlkem::$module::decapsulate(&ciphertext, private_key);
                    Ok(SharedSecret::from(shared_secret.as_bytes().to_vec()))
                }
            }
        };
    }

    pqclean_mlkem!(
        /// ML-KEM-512 from the PQClean reference code
        PqcleanMlKem512,
        mlkem512,
        "PQClean-MLKEM-512"
    );

    pqclean_mlkem!(
        /// ML-KEM-768 from the PQClean reference code
        PqcleanMlKem768,
        mlkem768,
        "PQClean-MLKEM-768"
    );

    pqclean_mlkem!(
        /// ML-KEM-1024 from the PQClean reference code
        PqcleanMlKem1024,
        mlkem1024,
        "PQClean-MLKEM-1024"
    );
}

#[cfg(feature = "compare-pqcrypto")]
pub use pqclean::{PqcleanMlKem1024, PqcleanMlKem512, PqcleanMlKem768};
