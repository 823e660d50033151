//! Workload generation
//!
//! Produces the fixed message digest and, for each benchmark case, the key
//! material and precomputed inputs the timed operation needs. Everything here
//! runs before the timed region; the returned [`TimedOp`] holds only the
//! primitive call.

use crate::adapter::{KemScheme, SignatureScheme, Variant};
use crate::error::{AdapterResult, OperationError, OperationResult};
use sha2::{Digest, Sha256};
use std::hint::black_box;

/// Payload whose SHA-256 digest is signed by every signature case
pub const STANDARD_PAYLOAD: &[u8] = b"PLEASE SIGN THIS DATA!";

/// Size of a message digest in bytes
pub const MESSAGE_SIZE: usize = 32;

/// A 32-byte SHA-256 digest used as the message to sign
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Message([u8; MESSAGE_SIZE]);

impl Message {
    /// Digest of [`STANDARD_PAYLOAD`]
    pub fn standard() -> Self {
        Self::digest_of(STANDARD_PAYLOAD)
    }

    /// SHA-256 digest of arbitrary bytes
    pub fn digest_of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Wrap an existing digest
    pub fn from_digest(digest: [u8; MESSAGE_SIZE]) -> Self {
        Self(digest)
    }

    /// Borrow the digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex encoding of the digest
    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(&self.0)
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Message({})", self.to_hex())
    }
}

/// The body of one timed iteration
///
/// Returning an error aborts the case at that iteration.
pub type TimedOp = Box<dyn FnMut() -> OperationResult<()> + Send>;

/// Signature operation to benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureOp {
    /// Fresh key pair per iteration
    GenerateKey,
    /// Sign the message with a fixed key
    Sign,
    /// Verify a fixed signature
    Verify,
}

impl SignatureOp {
    /// All operations in suite order
    pub const ALL: [SignatureOp; 3] = [Self::GenerateKey, Self::Sign, Self::Verify];

    /// Group-name prefix, e.g. `GenKey` for `GenKey1`
    pub fn label(self) -> &'static str {
        match self {
            Self::GenerateKey => "GenKey",
            Self::Sign => "Sign",
            Self::Verify => "Verify",
        }
    }
}

/// KEM operation to benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KemOp {
    /// Fresh key pair per iteration
    GenerateKey,
    /// Encapsulate to a fixed key
    Encapsulate,
    /// Decapsulate a fixed ciphertext
    Decapsulate,
}

impl KemOp {
    /// All operations in suite order
    pub const ALL: [KemOp; 3] = [Self::GenerateKey, Self::Encapsulate, Self::Decapsulate];

    /// Group name
    pub fn label(self) -> &'static str {
        match self {
            Self::GenerateKey => "KemGenKey",
            Self::Encapsulate => "KemEncap",
            Self::Decapsulate => "KemDecap",
        }
    }
}

/// Object-safe view of a signature adapter that can prepare timed operations
pub trait SignatureWorkload: Send + Sync {
    /// Variant the workload benchmarks
    fn variant(&self) -> Variant;

    /// Run the setup for `op` and return the timed body
    fn prepare(&self, op: SignatureOp, message: &Message) -> AdapterResult<TimedOp>;
}

impl<S: SignatureScheme> SignatureWorkload for S {
    fn variant(&self) -> Variant {
        SignatureScheme::variant(self)
    }

    fn prepare(&self, op: SignatureOp, message: &Message) -> AdapterResult<TimedOp> {
        let scheme = self.clone();
        let message = *message;

        match op {
            SignatureOp::GenerateKey => Ok(Box::new(move || -> OperationResult<()> {
                black_box(scheme.generate_key()?);
                Ok(())
            })),
            SignatureOp::Sign => {
                let (_, private_key) = self.generate_key()?.into_parts();
                Ok(Box::new(move || -> OperationResult<()> {
                    black_box(scheme.sign(&private_key, message.as_bytes())?);
                    Ok(())
                }))
            }
            SignatureOp::Verify => {
                let key_pair = self.generate_key()?;
                let signature = self.sign(key_pair.private_key(), message.as_bytes())?;
                let (public_key, _) = key_pair.into_parts();
                Ok(Box::new(move || -> OperationResult<()> {
                    let valid =
                        black_box(scheme.verify(&public_key, message.as_bytes(), &signature)?);
                    if valid {
                        Ok(())
                    } else {
                        Err(OperationError::VerificationFailed {
                            variant: SignatureScheme::variant(&scheme).name,
                        })
                    }
                }))
            }
        }
    }
}

/// Object-safe view of a KEM adapter that can prepare timed operations
pub trait KemWorkload: Send + Sync {
    /// Variant the workload benchmarks
    fn variant(&self) -> Variant;

    /// Run the setup for `op` and return the timed body
    fn prepare(&self, op: KemOp) -> AdapterResult<TimedOp>;
}

impl<K: KemScheme> KemWorkload for K {
    fn variant(&self) -> Variant {
        KemScheme::variant(self)
    }

    fn prepare(&self, op: KemOp) -> AdapterResult<TimedOp> {
        let scheme = self.clone();

        match op {
            KemOp::GenerateKey => Ok(Box::new(move || -> OperationResult<()> {
                black_box(scheme.generate_key()?);
                Ok(())
            })),
            KemOp::Encapsulate => {
                let (encaps_key, _) = self.generate_key()?.into_parts();
                Ok(Box::new(move || -> OperationResult<()> {
                    black_box(scheme.encapsulate(&encaps_key)?);
                    Ok(())
                }))
            }
            KemOp::Decapsulate => {
                let (encaps_key, decaps_key) = self.generate_key()?.into_parts();
                let (ciphertext, expected) = self.encapsulate(&encaps_key)?;
                Ok(Box::new(move || -> OperationResult<()> {
                    let recovered = black_box(scheme.decapsulate(&decaps_key, &ciphertext)?);
                    if recovered == expected {
                        Ok(())
                    } else {
                        Err(OperationError::SharedSecretMismatch {
                            variant: KemScheme::variant(&scheme).name,
                        })
                    }
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Ed25519, MlKem512};

    #[test]
    fn test_standard_message_digest() {
        let message = Message::standard();
        assert_eq!(
            message.to_hex(),
            "c54038d4b3345db129d9f842f4a984e8c5b5575273f5a4ab4124e1605eead7ff"
        );
        assert_eq!(message.as_bytes().len(), MESSAGE_SIZE);
        assert_eq!(Message::default(), message);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = SignatureOp::ALL.iter().map(|op| op.label()).collect();
        assert_eq!(labels, ["GenKey", "Sign", "Verify"]);

        let labels: Vec<_> = KemOp::ALL.iter().map(|op| op.label()).collect();
        assert_eq!(labels, ["KemGenKey", "KemEncap", "KemDecap"]);
    }

    #[test]
    fn test_signature_workloads_run() {
        let message = Message::standard();
        for op in SignatureOp::ALL {
            let mut timed = SignatureWorkload::prepare(&Ed25519, op, &message).unwrap();
            for _ in 0..3 {
                timed().unwrap();
            }
        }
    }

    #[test]
    fn test_kem_workloads_run() {
        for op in KemOp::ALL {
            let mut timed = KemWorkload::prepare(&MlKem512, op).unwrap();
            for _ in 0..3 {
                timed().unwrap();
            }
        }
    }

    #[test]
    fn test_workloads_are_object_safe() {
        let workload: Box<dyn SignatureWorkload> = Box::new(Ed25519);
        assert_eq!(workload.variant().name, "EdDSA-Ed25519");

        let workload: Box<dyn KemWorkload> = Box::new(MlKem512);
        assert_eq!(workload.variant().name, "MLKEM-512");
    }
}
