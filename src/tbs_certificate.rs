use der::asn1::BitString;
use x509_cert::certificate::{TbsCertificateInner, Version};
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::time::Validity;

use crate::cert::Certificate;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, NetscapeComment, SubjectKeyIdentifier, ToAndFromX509Extension,
};
use crate::cert::params::ExtensionParam;
use crate::classify::SignatureAlgorithm;
use crate::cloner::CloneOptions;
use crate::error::Result;
use crate::issuer::Issuer;

/// Represents the "To Be Signed" (TBS) portion of a cloned X.509 certificate.
///
/// # Fields
/// * `version` - The X.509 version.
/// * `serial_number` - The unique identifier for the certificate.
/// * `signature_algorithm` - The algorithm the issuer signs with.
/// * `issuer` - The distinguished name of the certificate issuer.
/// * `validity` - The validity window, copied from the original.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The cloned public key.
/// * `extensions` - Additional X.509 extensions for the certificate.
#[derive(Clone, Debug)]
pub struct TbsCertificate {
    pub version: Version,
    pub serial_number: SerialNumber,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key: SubjectPublicKeyInfoOwned,
    pub issuer_unique_id: Option<BitString>,
    pub subject_unique_id: Option<BitString>,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Rebuilds the TBS portion of `original` around a new public key.
    ///
    /// Names, validity and unique identifiers are copied. Extensions are
    /// copied in order, except that:
    /// * with `update_key_identifiers`, the SKI is derived from
    ///   `subject_public_key` and the AKI points at `issuer`'s new key;
    /// * with `include_comment`, an existing comment is kept and a missing
    ///   one is appended; without it, comments are dropped.
    pub fn rebuild(
        original: &Certificate,
        subject_public_key: SubjectPublicKeyInfoOwned,
        issuer: &dyn Issuer,
        serial_number: SerialNumber,
        signature_algorithm: SignatureAlgorithm,
        options: &CloneOptions,
    ) -> Result<Self> {
        let extensions = rebuild_extensions(original, &subject_public_key, issuer, options)?;
        let original_tbs = &original.inner.tbs_certificate;

        let version = if extensions.is_empty() {
            original_tbs.version
        } else {
            Version::V3
        };

        Ok(Self {
            version,
            serial_number,
            signature_algorithm,
            issuer: original_tbs.issuer.clone(),
            validity: original_tbs.validity.clone(),
            subject: original_tbs.subject.clone(),
            subject_public_key,
            issuer_unique_id: original_tbs.issuer_unique_id.clone(),
            subject_unique_id: original_tbs.subject_unique_id.clone(),
            extensions,
        })
    }

    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner> {
        let extensions = self
            .extensions
            .iter()
            .map(ExtensionParam::to_x509)
            .collect::<Result<Vec<_>>>()?;

        Ok(TbsCertificateInner {
            version: self.version,
            serial_number: self.serial_number.clone(),
            signature: self.signature_algorithm.into(),
            issuer: self.issuer.clone(),
            validity: self.validity.clone(),
            subject: self.subject.clone(),
            subject_public_key_info: self.subject_public_key.clone(),
            issuer_unique_id: self.issuer_unique_id.clone(),
            subject_unique_id: self.subject_unique_id.clone(),
            extensions: (!extensions.is_empty()).then_some(extensions),
        })
    }
}

fn rebuild_extensions(
    original: &Certificate,
    subject_public_key: &SubjectPublicKeyInfoOwned,
    issuer: &dyn Issuer,
    options: &CloneOptions,
) -> Result<Vec<ExtensionParam>> {
    let mut extensions = Vec::with_capacity(original.extensions().len() + 1);
    let mut has_comment = false;

    for ext in original.extensions() {
        let copied = ExtensionParam::from_x509(ext);

        if ext.extn_id == SubjectKeyIdentifier::OID && options.update_key_identifiers {
            let ski = SubjectKeyIdentifier::from_public_key(subject_public_key);
            extensions.push(ExtensionParam::from_extension(&ski, ext.critical)?);
        } else if ext.extn_id == AuthorityKeyIdentifier::OID && options.update_key_identifiers {
            let mut aki: AuthorityKeyIdentifier = copied.to_extension()?;
            aki.key_identifier = Some(issuer.key_identifier()?);
            if aki.authority_cert_serial_number.is_some() {
                aki.authority_cert_serial_number = Some(issuer.serial_number());
            }
            extensions.push(ExtensionParam::from_extension(&aki, ext.critical)?);
        } else if ext.extn_id == NetscapeComment::OID {
            // Provenance is recorded once; an existing comment is never rewritten.
            if options.include_comment {
                has_comment = true;
                extensions.push(copied);
            }
        } else {
            extensions.push(copied);
        }
    }

    if options.include_comment && !has_comment {
        extensions.push(ExtensionParam::from_extension(
            &NetscapeComment::cloned(),
            false,
        )?);
    }

    Ok(extensions)
}
