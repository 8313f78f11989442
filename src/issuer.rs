use der::Encode;
use der::asn1::BitString;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;

use crate::cert::Certificate;
use crate::cert::extensions::key_identifier;
use crate::error::Result;
use crate::key::KeyPair;
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of signing cloned certificates.
///
/// Implemented by already cloned certificates (for their subjects) and by
/// [`SelfIssuer`] for self-signed roots.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> &Name;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Returns the serial number of the issuer's certificate.
    fn serial_number(&self) -> SerialNumber;

    /// Returns the issuer's key identifier, which becomes the
    /// keyIdentifier of the AKI in certificates it signs.
    fn key_identifier(&self) -> Result<Vec<u8>>;

    /// Signs a rebuilt TBS structure, producing the final certificate.
    ///
    /// # Arguments
    /// * `tbs` - The rebuilt TBS. Its signature algorithm must be one this
    ///   issuer's key can produce.
    fn issue(&self, tbs: &TbsCertificate) -> Result<Certificate> {
        let tbs_cert_inner = tbs.to_tbs_certificate_inner()?;
        let tbs_der = tbs_cert_inner.to_der()?;

        let signature = self
            .signing_key()
            .sign_data(&tbs_der, tbs.signature_algorithm)?;

        log::trace!(
            "signed {} as {}",
            tbs_cert_inner.subject,
            self.issuer_name()
        );

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: tbs.signature_algorithm.into(),
            signature: BitString::from_bytes(&signature)?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}

/// Issuer for self-signed certificates: the certificate being cloned signs
/// itself with its own new key.
pub struct SelfIssuer<'a> {
    pub name: &'a Name,
    pub key: &'a KeyPair,
    pub serial_number: SerialNumber,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> &Name {
        self.name
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    fn serial_number(&self) -> SerialNumber {
        self.serial_number.clone()
    }

    fn key_identifier(&self) -> Result<Vec<u8>> {
        Ok(key_identifier(&self.key.public_key_info()?))
    }
}
