//! use certcloner::error::CertClonerError;

use thiserror::Error;

/// Represents errors that can occur while cloning certificates.
///
/// The first three variants abort a whole cloning batch: a chain that is
/// only partially cloned has no use, so no partial output is ever returned.
#[derive(Debug, Error, Clone)]
pub enum CertClonerError {
    /// Two input certificates share a subject but carry different public keys.
    ///
    /// This also fires when a batch contains both a certificate and a clone
    /// of it, since the clone keeps the subject and replaces the key.
    #[error("Duplicate subject `{subject}`: certificates share a subject but not a public key")]
    DuplicateSubject { subject: String },

    /// A certificate's own public key algorithm cannot be cloned.
    #[error("Unsupported public key algorithm {algorithm} in certificate `{subject}`")]
    UnsupportedKey { subject: String, algorithm: String },

    /// A certificate was signed with an algorithm that cannot be reproduced.
    #[error("Unsupported signature algorithm {algorithm} in certificate `{subject}`")]
    UnsupportedSignatureInCert { subject: String, algorithm: String },

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Error while producing a signature.
    #[error("Signing error: {0}")]
    SigningError(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CertClonerError>;

impl From<der::Error> for CertClonerError {
    /// Converts a `der::Error` into a `CertClonerError`.
    fn from(err: der::Error) -> Self {
        CertClonerError::DecodingError(err.to_string())
    }
}

impl From<rsa::Error> for CertClonerError {
    fn from(err: rsa::Error) -> Self {
        CertClonerError::KeyGenerationError(err.to_string())
    }
}

impl From<x509_cert::spki::Error> for CertClonerError {
    fn from(err: x509_cert::spki::Error) -> Self {
        CertClonerError::EncodingError(err.to_string())
    }
}

impl From<pkcs8::Error> for CertClonerError {
    fn from(err: pkcs8::Error) -> Self {
        CertClonerError::EncodingError(err.to_string())
    }
}

impl From<ecdsa::signature::Error> for CertClonerError {
    fn from(err: ecdsa::signature::Error) -> Self {
        CertClonerError::SigningError(err.to_string())
    }
}

impl From<pem::PemError> for CertClonerError {
    fn from(err: pem::PemError) -> Self {
        CertClonerError::DecodingError(err.to_string())
    }
}
