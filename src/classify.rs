//! Classification of certificate key and signature algorithms.
//!
//! Cloning only works for algorithms the RustCrypto stack can both generate
//! and sign with. Everything else lands in [`Support::Unsupported`] together
//! with the offending OID so callers can report it.

use const_oid::ObjectIdentifier;
use der::asn1::Any;
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::traits::PublicKeyParts;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::cert::Certificate;

pub const RSA_ENCRYPTION: ObjectIdentifier = const_oid::db::rfc5912::RSA_ENCRYPTION;
pub const ID_EC_PUBLIC_KEY: ObjectIdentifier = const_oid::db::rfc5912::ID_EC_PUBLIC_KEY;
pub const SECP_256_R_1: ObjectIdentifier = const_oid::db::rfc5912::SECP_256_R_1;
pub const SECP_384_R_1: ObjectIdentifier = const_oid::db::rfc5912::SECP_384_R_1;
pub const SECP_521_R_1: ObjectIdentifier = const_oid::db::rfc5912::SECP_521_R_1;

const SHA_1_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.5");
const SHA_224_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.14");
const SHA_256_WITH_RSA: ObjectIdentifier = const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION;
const SHA_384_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");
const SHA_512_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");
const ECDSA_WITH_SHA_1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.1");
const ECDSA_WITH_SHA_224: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.1");
const ECDSA_WITH_SHA_256: ObjectIdentifier = const_oid::db::rfc5912::ECDSA_WITH_SHA_256;
const ECDSA_WITH_SHA_384: ObjectIdentifier = const_oid::db::rfc5912::ECDSA_WITH_SHA_384;
const ECDSA_WITH_SHA_512: ObjectIdentifier = const_oid::db::rfc5912::ECDSA_WITH_SHA_512;

/// Outcome of classifying an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support<T> {
    /// The algorithm can be cloned.
    Supported(T),
    /// The algorithm cannot be cloned. Holds the OID that was rejected.
    Unsupported(ObjectIdentifier),
}

/// Named elliptic curves that can be cloned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    P256,
    P384,
    P521,
}

/// Public key algorithms that can be cloned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// RSA with the given modulus size in bits.
    Rsa { bits: usize },
    /// ECDSA on a named curve.
    Ec(EcCurve),
}

/// Digests used by the supported signature schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

/// Signature schemes that can be reproduced on a clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// RSASSA-PKCS1-v1_5 with the given digest.
    RsaPkcs1v15(DigestAlgorithm),
    /// ECDSA with the given digest.
    Ecdsa(DigestAlgorithm),
}

impl SignatureAlgorithm {
    pub fn digest(&self) -> DigestAlgorithm {
        match self {
            SignatureAlgorithm::RsaPkcs1v15(digest) | SignatureAlgorithm::Ecdsa(digest) => *digest,
        }
    }

    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            SignatureAlgorithm::RsaPkcs1v15(DigestAlgorithm::Sha1) => SHA_1_WITH_RSA,
            SignatureAlgorithm::RsaPkcs1v15(DigestAlgorithm::Sha224) => SHA_224_WITH_RSA,
            SignatureAlgorithm::RsaPkcs1v15(DigestAlgorithm::Sha256) => SHA_256_WITH_RSA,
            SignatureAlgorithm::RsaPkcs1v15(DigestAlgorithm::Sha384) => SHA_384_WITH_RSA,
            SignatureAlgorithm::RsaPkcs1v15(DigestAlgorithm::Sha512) => SHA_512_WITH_RSA,
            SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha1) => ECDSA_WITH_SHA_1,
            SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha224) => ECDSA_WITH_SHA_224,
            SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha256) => ECDSA_WITH_SHA_256,
            SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha384) => ECDSA_WITH_SHA_384,
            SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha512) => ECDSA_WITH_SHA_512,
        }
    }
}

impl From<SignatureAlgorithm> for AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA identifiers carry an explicit NULL parameter (RFC 4055), ECDSA
    /// identifiers omit parameters (RFC 5758).
    fn from(value: SignatureAlgorithm) -> Self {
        let parameters = match value {
            SignatureAlgorithm::RsaPkcs1v15(_) => Some(Any::null()),
            SignatureAlgorithm::Ecdsa(_) => None,
        };
        AlgorithmIdentifierOwned {
            oid: value.oid(),
            parameters,
        }
    }
}

/// Key and signature classification of a single certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub key: Support<KeyAlgorithm>,
    pub signature: Support<SignatureAlgorithm>,
}

/// Classifies both the subject key and the signature of `cert`.
pub fn classify(cert: &Certificate) -> Classification {
    Classification {
        key: classify_public_key(cert.public_key_info()),
        signature: classify_signature(&cert.inner.signature_algorithm),
    }
}

/// Classifies a subject public key.
///
/// RSA keys whose modulus cannot be decoded, EC keys without a named curve and
/// EC keys on any other curve are unsupported.
pub fn classify_public_key(spki: &SubjectPublicKeyInfoOwned) -> Support<KeyAlgorithm> {
    let oid = spki.algorithm.oid;
    if oid == RSA_ENCRYPTION {
        return match RsaPublicKey::from_pkcs1_der(spki.subject_public_key.raw_bytes()) {
            Ok(public) => Support::Supported(KeyAlgorithm::Rsa {
                bits: public.size() * 8,
            }),
            Err(_) => Support::Unsupported(oid),
        };
    }
    if oid == ID_EC_PUBLIC_KEY {
        let Some(curve) = spki
            .algorithm
            .parameters
            .as_ref()
            .and_then(|params| params.decode_as::<ObjectIdentifier>().ok())
        else {
            return Support::Unsupported(oid);
        };
        return match curve {
            SECP_256_R_1 => Support::Supported(KeyAlgorithm::Ec(EcCurve::P256)),
            SECP_384_R_1 => Support::Supported(KeyAlgorithm::Ec(EcCurve::P384)),
            SECP_521_R_1 => Support::Supported(KeyAlgorithm::Ec(EcCurve::P521)),
            other => Support::Unsupported(other),
        };
    }
    Support::Unsupported(oid)
}

/// Classifies the algorithm a certificate was signed with.
pub fn classify_signature(algorithm: &AlgorithmIdentifierOwned) -> Support<SignatureAlgorithm> {
    let supported = match algorithm.oid {
        SHA_1_WITH_RSA => SignatureAlgorithm::RsaPkcs1v15(DigestAlgorithm::Sha1),
        SHA_224_WITH_RSA => SignatureAlgorithm::RsaPkcs1v15(DigestAlgorithm::Sha224),
        SHA_256_WITH_RSA => SignatureAlgorithm::RsaPkcs1v15(DigestAlgorithm::Sha256),
        SHA_384_WITH_RSA => SignatureAlgorithm::RsaPkcs1v15(DigestAlgorithm::Sha384),
        SHA_512_WITH_RSA => SignatureAlgorithm::RsaPkcs1v15(DigestAlgorithm::Sha512),
        ECDSA_WITH_SHA_1 => SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha1),
        ECDSA_WITH_SHA_224 => SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha224),
        ECDSA_WITH_SHA_256 => SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha256),
        ECDSA_WITH_SHA_384 => SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha384),
        ECDSA_WITH_SHA_512 => SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha512),
        other => return Support::Unsupported(other),
    };
    Support::Supported(supported)
}
