pub mod extensions;
pub mod name;
pub mod params;

use std::sync::Arc;

use der::{Decode, DecodePem, Encode, EncodePem};
use extensions::{SubjectKeyIdentifier, ToAndFromX509Extension};
use name::NormalizedName;
use x509_cert::certificate::CertificateInner;
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::{CertClonerError, Result};
use crate::issuer::Issuer;
use crate::key::KeyPair;

/// Represents an X.509 certificate.
///
/// Cloning reads these as input and produces them as output. The wrapped
/// `x509_cert` structure is public so callers can inspect any field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl From<CertificateInner> for Certificate {
    fn from(inner: CertificateInner) -> Self {
        Self { inner }
    }
}

impl Certificate {
    /// Parses a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        Ok(Self {
            inner: CertificateInner::from_der(der)?,
        })
    }

    /// Parses a single PEM-encoded certificate.
    pub fn from_pem(pem: &str) -> Result<Self> {
        Ok(Self {
            inner: CertificateInner::from_pem(pem.as_bytes())?,
        })
    }

    /// Encodes the certificate into DER format.
    ///
    /// # Returns
    /// A byte vector containing the DER-encoded certificate.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertClonerError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into PEM format.
    ///
    /// # Returns
    /// A string containing the PEM-encoded certificate.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| CertClonerError::EncodingError(e.to_string()))
    }

    pub fn subject(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    pub fn issuer(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    /// A certificate is self-signed when its subject and issuer names match.
    pub fn is_self_signed(&self) -> bool {
        NormalizedName::new(self.subject()) == NormalizedName::new(self.issuer())
    }

    pub fn public_key_info(&self) -> &SubjectPublicKeyInfoOwned {
        &self.inner.tbs_certificate.subject_public_key_info
    }

    pub fn serial_number(&self) -> &SerialNumber {
        &self.inner.tbs_certificate.serial_number
    }

    /// All extensions, in certificate order.
    pub fn extensions(&self) -> &[Extension] {
        self.inner
            .tbs_certificate
            .extensions
            .as_deref()
            .unwrap_or_default()
    }

    /// Returns the first extension with the given OID.
    pub fn extension(&self, oid: &const_oid::ObjectIdentifier) -> Option<&Extension> {
        self.extensions().iter().find(|ext| ext.extn_id == *oid)
    }

    /// Finds and decodes an extension of type `E`.
    pub fn find_extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        self.extension(&E::OID)
            .map(|ext| E::from_x509_extension_value(ext.extn_value.as_bytes()))
            .transpose()
    }
}

/// A cloned certificate together with the key its public key belongs to.
///
/// Certificates cloned from one cross-signed group share the same `key`.
#[derive(Debug, Clone)]
pub struct CertificateWithPrivateKey {
    pub cert: Certificate,
    pub key: Arc<KeyPair>,
}

impl Issuer for CertificateWithPrivateKey {
    fn issuer_name(&self) -> &Name {
        // The name of the issuer is the subject of the certificate
        self.cert.subject()
    }

    fn signing_key(&self) -> &KeyPair {
        &self.key
    }

    fn serial_number(&self) -> SerialNumber {
        self.cert.serial_number().clone()
    }

    fn key_identifier(&self) -> Result<Vec<u8>> {
        match self.cert.find_extension::<SubjectKeyIdentifier>()? {
            Some(ski) => Ok(ski.key_identifier),
            None => Ok(extensions::key_identifier(self.cert.public_key_info())),
        }
    }
}
