//! Helpers for unit tests that need certificates without real signatures.

use core::str::FromStr;
use std::time::Duration;

use der::asn1::BitString;
use x509_cert::certificate::{CertificateInner, TbsCertificateInner, Version};
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::time::Validity;

use crate::cert::Certificate;
use crate::cert::extensions::{AuthorityKeyIdentifier, SubjectKeyIdentifier};
use crate::cert::params::ExtensionParam;
use crate::classify::{DigestAlgorithm, SignatureAlgorithm};
use crate::key::KeyPair;

/// Builds an ECDSA-"signed" certificate whose signature is all zeros.
pub(crate) fn fake_cert(
    subject: &str,
    issuer: &str,
    key: &KeyPair,
    extensions: Vec<Extension>,
) -> Certificate {
    fake_cert_with_spki(subject, issuer, key.public_key_info().unwrap(), extensions)
}

pub(crate) fn fake_cert_with_spki(
    subject: &str,
    issuer: &str,
    spki: SubjectPublicKeyInfoOwned,
    extensions: Vec<Extension>,
) -> Certificate {
    let signature_algorithm = SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha256);
    let tbs_certificate = TbsCertificateInner {
        version: Version::V3,
        serial_number: SerialNumber::new(&[1]).unwrap(),
        signature: signature_algorithm.into(),
        issuer: Name::from_str(issuer).unwrap(),
        validity: Validity::from_now(Duration::from_secs(3600)).unwrap(),
        subject: Name::from_str(subject).unwrap(),
        subject_public_key_info: spki,
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: (!extensions.is_empty()).then_some(extensions),
    };
    Certificate {
        inner: CertificateInner {
            tbs_certificate,
            signature_algorithm: signature_algorithm.into(),
            signature: BitString::from_bytes(&[0; 8]).unwrap(),
        },
    }
}

/// An SKI derived from `key` and an AKI carrying `authority_key_id`.
pub(crate) fn ski_aki_extensions(key: &KeyPair, authority_key_id: &[u8]) -> Vec<Extension> {
    let ski = SubjectKeyIdentifier::from_public_key(&key.public_key_info().unwrap());
    let aki = AuthorityKeyIdentifier {
        key_identifier: Some(authority_key_id.to_vec()),
        authority_cert_issuer: None,
        authority_cert_serial_number: None,
    };
    vec![
        ExtensionParam::from_extension(&ski, false)
            .unwrap()
            .to_x509()
            .unwrap(),
        ExtensionParam::from_extension(&aki, false)
            .unwrap()
            .to_x509()
            .unwrap(),
    ]
}
