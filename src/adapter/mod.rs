//! Primitive adapters
//!
//! Each adapter wraps one external library behind a uniform trait for its
//! algorithm family, so the harness can invoke heterogeneous libraries in the
//! same way. Adapters are zero-sized: they own no key material and cache
//! nothing between calls.
//!
//! # Example
//!
//! ```rust
//! use pq_bench::adapter::{EcdsaP256, SignatureScheme};
//! use pq_bench::workload::Message;
//!
//! let scheme = EcdsaP256;
//! let message = Message::standard();
//! let key_pair = scheme.generate_key()?;
//! let signature = scheme.sign(key_pair.private_key(), message.as_bytes())?;
//! assert!(scheme.verify(key_pair.public_key(), message.as_bytes(), &signature)?);
//! # Ok::<(), pq_bench::AdapterError>(())
//! ```

pub mod ecdsa;
pub mod eddsa;
pub mod mldsa;
pub mod mlkem;

// Re-export the concrete adapters for convenience
pub use ecdsa::{EcdsaP256, EcdsaP384, EcdsaP521, EcdsaSecp256k1};
pub use eddsa::{Ed25519, Ed448};
pub use mldsa::{MlDsa44, MlDsa65, MlDsa87};
pub use mlkem::{MlKem1024, MlKem512, MlKem768};

#[cfg(feature = "compare-pqcrypto")]
pub use mlkem::{PqcleanMlKem1024, PqcleanMlKem512, PqcleanMlKem768};

use crate::error::{AdapterError, AdapterResult};
use subtle::ConstantTimeEq;

/// Algorithm family of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Elliptic-curve DSA over a short Weierstrass curve
    Ecdsa,
    /// Edwards-curve DSA
    EdDsa,
    /// Module-lattice signatures
    MlDsa,
    /// Module-lattice key encapsulation
    MlKem,
}

impl Family {
    /// Whether the family is a signature scheme
    pub fn is_signature(self) -> bool {
        !matches!(self, Self::MlKem)
    }
}

/// Identifier of a concrete algorithm variant, e.g. `ECDSA-P256` or `ML-DSA65`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
    /// Algorithm family
    pub family: Family,
    /// Display name, also used as the benchmark case name
    pub name: &'static str,
}

impl Variant {
    /// Create a new variant identifier
    pub const fn new(family: Family, name: &'static str) -> Self {
        Self { family, name }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Library-native key material tagged with the variant that produced it
pub struct KeyPair<P, S> {
    variant: Variant,
    public_key: P,
    private_key: S,
}

impl<P, S> KeyPair<P, S> {
    /// Tag a public/private key pair with its variant
    pub fn new(variant: Variant, public_key: P, private_key: S) -> Self {
        Self {
            variant,
            public_key,
            private_key,
        }
    }

    /// Variant that generated the key pair
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Public (verifying or encapsulation) key
    pub fn public_key(&self) -> &P {
        &self.public_key
    }

    /// Private (signing or decapsulation) key
    pub fn private_key(&self) -> &S {
        &self.private_key
    }

    /// Split into public and private halves
    pub fn into_parts(self) -> (P, S) {
        (self.public_key, self.private_key)
    }
}

impl<P, S> std::fmt::Debug for KeyPair<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("variant", &self.variant.name)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

macro_rules! byte_buffer {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(Vec<u8>);

        impl $name {
            /// Borrow the encoded bytes
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            /// Mutable access to the encoded bytes
            pub fn as_bytes_mut(&mut self) -> &mut [u8] {
                &mut self.0
            }

            /// Take ownership of the encoded bytes
            pub fn into_bytes(self) -> Vec<u8> {
                self.0
            }

            /// Encoded length in bytes
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Whether the buffer is empty
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }
        }

        impl From<&[u8]> for $name {
            fn from(bytes: &[u8]) -> Self {
                Self(bytes.to_vec())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({} bytes)", stringify!($name), self.0.len())
            }
        }
    };
}

byte_buffer!(
    /// Encoded signature bytes
    Signature
);

byte_buffer!(
    /// Encoded KEM ciphertext bytes
    Ciphertext
);

/// Shared secret recovered from a KEM
///
/// Equality is evaluated in constant time.
#[derive(Clone)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    /// Borrow the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Secret length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for SharedSecret {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes().ct_eq(other.as_bytes()).into()
    }
}

impl Eq for SharedSecret {}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedSecret([REDACTED]; {} bytes)", self.0.len())
    }
}

/// Uniform interface over a digital signature library
pub trait SignatureScheme: Clone + Send + Sync + 'static {
    /// Library-native verifying key
    type PublicKey: Send + 'static;
    /// Library-native signing key
    type PrivateKey: Send + 'static;

    /// Identifier of this variant
    fn variant(&self) -> Variant;

    /// Generate a fresh key pair
    fn generate_key(&self) -> AdapterResult<KeyPair<Self::PublicKey, Self::PrivateKey>>;

    /// Sign `message`
    fn sign(&self, private_key: &Self::PrivateKey, message: &[u8]) -> AdapterResult<Signature>;

    /// Verify `signature` over `message`
    ///
    /// A signature that does not match is `Ok(false)`; only malformed input
    /// such as a wrong-length signature is an error.
    fn verify(
        &self,
        public_key: &Self::PublicKey,
        message: &[u8],
        signature: &Signature,
    ) -> AdapterResult<bool>;
}

/// Uniform interface over a key-encapsulation library
pub trait KemScheme: Clone + Send + Sync + 'static {
    /// Library-native encapsulation key
    type EncapsulationKey: Send + 'static;
    /// Library-native decapsulation key
    type DecapsulationKey: Send + 'static;

    /// Identifier of this variant
    fn variant(&self) -> Variant;

    /// Generate a fresh key pair
    fn generate_key(
        &self,
    ) -> AdapterResult<KeyPair<Self::EncapsulationKey, Self::DecapsulationKey>>;

    /// Produce a ciphertext and the shared secret it carries
    fn encapsulate(
        &self,
        public_key: &Self::EncapsulationKey,
    ) -> AdapterResult<(Ciphertext, SharedSecret)>;

    /// Recover the shared secret from `ciphertext`
    ///
    /// A ciphertext of the right length always yields a secret; a corrupted one
    /// yields the primitive's implicit-rejection secret, which callers must
    /// compare.
    fn decapsulate(
        &self,
        private_key: &Self::DecapsulationKey,
        ciphertext: &Ciphertext,
    ) -> AdapterResult<SharedSecret>;
}

/// Convert a variable-length encoding into a fixed-size array, reporting the
/// expected length on mismatch
pub(crate) fn fixed_bytes<const N: usize>(bytes: &[u8]) -> Result<[u8; N], String> {
    <[u8; N]>::try_from(bytes)
        .map_err(|_| format!("expected {} bytes, got {}", N, bytes.len()))
}

/// Build a verification error for a wrong-length signature
pub(crate) fn malformed_signature(variant: Variant, reason: String) -> AdapterError {
    AdapterError::Verification {
        variant: variant.name,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_display() {
        let variant = Variant::new(Family::MlDsa, "ML-DSA65");
        assert_eq!(variant.to_string(), "ML-DSA65");
        assert!(variant.family.is_signature());
        assert!(!Family::MlKem.is_signature());
    }

    #[test]
    fn test_shared_secret_equality() {
        let a = SharedSecret::from(vec![7u8; 32]);
        let b = SharedSecret::from(vec![7u8; 32]);
        let mut c_bytes = vec![7u8; 32];
        c_bytes[31] ^= 0x01;
        let c = SharedSecret::from(c_bytes);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, SharedSecret::from(vec![7u8; 16]));
    }

    #[test]
    fn test_debug_does_not_leak_bytes() {
        let secret = SharedSecret::from(vec![0xAB; 32]);
        assert!(!format!("{:?}", secret).contains("171"));

        let key_pair = KeyPair::new(Variant::new(Family::EdDsa, "EdDSA-Ed25519"), [1u8; 32], [2u8; 32]);
        assert!(format!("{:?}", key_pair).contains("REDACTED"));
    }

    #[test]
    fn test_fixed_bytes() {
        let array: [u8; 4] = fixed_bytes(&[1, 2, 3, 4]).unwrap();
        assert_eq!(array, [1, 2, 3, 4]);

        let error = fixed_bytes::<4>(&[1, 2, 3]).unwrap_err();
        assert_eq!(error, "expected 4 bytes, got 3");
    }
}
