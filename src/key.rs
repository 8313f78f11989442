use std::fmt;

use ecdsa::signature::{SignatureEncoding, Signer};
use p256::ecdsa::{SigningKey as P256SigningKey, VerifyingKey as P256VerifyingKey};
use p384::ecdsa::{SigningKey as P384SigningKey, VerifyingKey as P384VerifyingKey};
use p521::ecdsa::SigningKey as P521SigningKey;
use pkcs8::{EncodePrivateKey, LineEnding};
use rand_core::CryptoRngCore;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::classify::{DigestAlgorithm, EcCurve, KeyAlgorithm, SignatureAlgorithm};
use crate::error::{CertClonerError, Result};

/// A freshly generated key pair backing one or more cloned certificates.
pub enum KeyPair {
    Rsa {
        private: Box<RsaPrivateKey>,
        public: RsaPublicKey,
    },
    EcdsaP256 {
        signing_key: P256SigningKey,
        verifying_key: P256VerifyingKey,
    },
    EcdsaP384 {
        signing_key: P384SigningKey,
        verifying_key: P384VerifyingKey,
    },
    /// p521 wraps its ecdsa keys in newtypes without pkcs8 support, so the
    /// raw secret is kept next to the signing key.
    EcdsaP521 {
        secret_key: p521::SecretKey,
        signing_key: P521SigningKey,
    },
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

impl KeyPair {
    /// Generates a key pair of the given algorithm.
    pub fn generate<R: CryptoRngCore>(algorithm: KeyAlgorithm, rng: &mut R) -> Result<Self> {
        match algorithm {
            KeyAlgorithm::Rsa { bits } => Self::generate_rsa(bits, rng),
            KeyAlgorithm::Ec(EcCurve::P256) => Ok(Self::generate_ecdsa_p256(rng)),
            KeyAlgorithm::Ec(EcCurve::P384) => Ok(Self::generate_ecdsa_p384(rng)),
            KeyAlgorithm::Ec(EcCurve::P521) => Self::generate_ecdsa_p521(rng),
        }
    }

    /// Generate an RSA key pair with the specified number of bits.
    pub fn generate_rsa<R: CryptoRngCore>(bits: usize, rng: &mut R) -> Result<Self> {
        let private = RsaPrivateKey::new(rng, bits)?;
        let public = RsaPublicKey::from(&private);
        Ok(KeyPair::Rsa {
            private: Box::new(private),
            public,
        })
    }

    /// Generate an ECDSA P-256 key pair.
    pub fn generate_ecdsa_p256<R: CryptoRngCore>(rng: &mut R) -> Self {
        let signing_key = P256SigningKey::random(rng);
        let verifying_key = signing_key.verifying_key().to_owned();
        KeyPair::EcdsaP256 {
            signing_key,
            verifying_key,
        }
    }

    /// Generate an ECDSA P-384 key pair.
    pub fn generate_ecdsa_p384<R: CryptoRngCore>(rng: &mut R) -> Self {
        let signing_key = P384SigningKey::random(rng);
        let verifying_key = signing_key.verifying_key().to_owned();
        KeyPair::EcdsaP384 {
            signing_key,
            verifying_key,
        }
    }

    /// Generate an ECDSA P-521 key pair.
    pub fn generate_ecdsa_p521<R: CryptoRngCore>(rng: &mut R) -> Result<Self> {
        let secret_key = p521::SecretKey::random(rng);
        let signing_key = P521SigningKey::from_bytes(&secret_key.to_bytes())
            .map_err(|e| CertClonerError::KeyGenerationError(e.to_string()))?;
        Ok(KeyPair::EcdsaP521 {
            secret_key,
            signing_key,
        })
    }

    /// The algorithm (and strength) of this key.
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            KeyPair::Rsa { public, .. } => KeyAlgorithm::Rsa {
                bits: rsa::traits::PublicKeyParts::size(public) * 8,
            },
            KeyPair::EcdsaP256 { .. } => KeyAlgorithm::Ec(EcCurve::P256),
            KeyPair::EcdsaP384 { .. } => KeyAlgorithm::Ec(EcCurve::P384),
            KeyPair::EcdsaP521 { .. } => KeyAlgorithm::Ec(EcCurve::P521),
        }
    }

    /// The public half as a SubjectPublicKeyInfo.
    pub fn public_key_info(&self) -> Result<SubjectPublicKeyInfoOwned> {
        let spki = match self {
            KeyPair::Rsa { public, .. } => SubjectPublicKeyInfoOwned::from_key(public.clone())?,
            KeyPair::EcdsaP256 { verifying_key, .. } => {
                SubjectPublicKeyInfoOwned::from_key(*verifying_key)?
            }
            KeyPair::EcdsaP384 { verifying_key, .. } => {
                SubjectPublicKeyInfoOwned::from_key(*verifying_key)?
            }
            KeyPair::EcdsaP521 { secret_key, .. } => {
                SubjectPublicKeyInfoOwned::from_key(secret_key.public_key())?
            }
        };
        Ok(spki)
    }

    /// Picks the scheme this key signs with when re-signing a certificate
    /// originally signed with `original`.
    ///
    /// RSA keeps SHA-256/384/512 and upgrades weaker digests to SHA-256.
    /// ECDSA always uses the digest matching its curve.
    pub fn signature_algorithm_for(&self, original: SignatureAlgorithm) -> SignatureAlgorithm {
        match self {
            KeyPair::Rsa { .. } => SignatureAlgorithm::RsaPkcs1v15(match original.digest() {
                DigestAlgorithm::Sha384 => DigestAlgorithm::Sha384,
                DigestAlgorithm::Sha512 => DigestAlgorithm::Sha512,
                _ => DigestAlgorithm::Sha256,
            }),
            KeyPair::EcdsaP256 { .. } => SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha256),
            KeyPair::EcdsaP384 { .. } => SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha384),
            KeyPair::EcdsaP521 { .. } => SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha512),
        }
    }

    /// Signs `data`, returning the signature bytes as they go into a
    /// certificate's signatureValue (DER ECDSA-Sig-Value for ECDSA).
    pub fn sign_data(&self, data: &[u8], algorithm: SignatureAlgorithm) -> Result<Vec<u8>> {
        if algorithm != self.signature_algorithm_for(algorithm) {
            return Err(CertClonerError::SigningError(format!(
                "{:?} cannot sign with {:?}",
                self.algorithm(),
                algorithm
            )));
        }
        match self {
            KeyPair::Rsa { private, .. } => match algorithm.digest() {
                DigestAlgorithm::Sha384 => rsa_sign::<Sha384>(private, data),
                DigestAlgorithm::Sha512 => rsa_sign::<Sha512>(private, data),
                _ => rsa_sign::<Sha256>(private, data),
            },
            KeyPair::EcdsaP256 { signing_key, .. } => {
                let signature: p256::ecdsa::Signature = signing_key.try_sign(data)?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            KeyPair::EcdsaP384 { signing_key, .. } => {
                let signature: p384::ecdsa::Signature = signing_key.try_sign(data)?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            KeyPair::EcdsaP521 { signing_key, .. } => {
                let signature: p521::ecdsa::Signature = signing_key.try_sign(data)?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }

    /// Encodes the private key as a PKCS#8 PEM document.
    pub fn to_pkcs8_pem(&self) -> Result<String> {
        let pem = match self {
            KeyPair::Rsa { private, .. } => private.to_pkcs8_pem(LineEnding::LF)?,
            KeyPair::EcdsaP256 { signing_key, .. } => signing_key.to_pkcs8_pem(LineEnding::LF)?,
            KeyPair::EcdsaP384 { signing_key, .. } => signing_key.to_pkcs8_pem(LineEnding::LF)?,
            KeyPair::EcdsaP521 { secret_key, .. } => secret_key.to_pkcs8_pem(LineEnding::LF)?,
        };
        Ok(pem.to_string())
    }
}

fn rsa_sign<D>(private: &RsaPrivateKey, data: &[u8]) -> Result<Vec<u8>>
where
    D: sha2::Digest + const_oid::AssociatedOid,
{
    let signing_key = rsa::pkcs1v15::SigningKey::<D>::new(private.clone());
    let signature = signing_key.try_sign(data)?;
    Ok(signature.to_vec())
}
