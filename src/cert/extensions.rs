use const_oid::AssociatedOid;
use der::{
    Decode, Encode,
    asn1::{Ia5String, OctetString},
    oid::ObjectIdentifier,
};
use sha1::{Digest, Sha1};
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::CertClonerError;

/// Text written into the comment extension of a freshly cloned certificate.
pub const CLONED_COMMENT: &str = "This is a cloned cert created by certcloner.";

/// Trait for converting to and from X.509 extensions.
///
/// This trait provides methods to encode and decode X.509 extension values.
///
/// # Example
/// ```
/// use certcloner::cert::extensions::{NetscapeComment, ToAndFromX509Extension};
/// let comment = NetscapeComment { comment: "hello".to_string() };
/// let encoded = comment.to_x509_extension_value().unwrap();
/// let decoded = NetscapeComment::from_x509_extension_value(&encoded).unwrap();
/// assert_eq!(comment.comment, decoded.comment);
/// ```
pub trait ToAndFromX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Encodes the extension into a DER-encoded byte vector.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertClonerError>;

    /// Decodes the extension from a DER-encoded byte slice.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertClonerError>
    where
        Self: Sized;
}

/// Computes the RFC 5280 (method 1) key identifier of a public key: the SHA-1
/// digest of the subjectPublicKey BIT STRING contents.
pub fn key_identifier(spki: &SubjectPublicKeyInfoOwned) -> Vec<u8> {
    Sha1::digest(spki.subject_public_key.raw_bytes()).to_vec()
}

/// Represents the Subject Key Identifier (SKI) extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl SubjectKeyIdentifier {
    /// Derives the identifier from `spki`.
    pub fn from_public_key(spki: &SubjectPublicKeyInfoOwned) -> Self {
        Self {
            key_identifier: key_identifier(spki),
        }
    }
}

impl ToAndFromX509Extension for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = <x509_cert::ext::pkix::SubjectKeyIdentifier as AssociatedOid>::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertClonerError> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier(OctetString::new(
            self.key_identifier.clone(),
        )?);
        Ok(ski.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertClonerError> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier::from_der(extension)?;
        Ok(Self {
            key_identifier: ski.0.as_bytes().to_vec(),
        })
    }
}

/// Represents the Authority Key Identifier (AKI) extension.
///
/// This extension identifies the public key corresponding to the private key used to sign the certificate.
///
/// # Fields
/// * `key_identifier` - The issuer's key identifier.
/// * `authority_cert_issuer` - The names of the issuer's issuer.
/// * `authority_cert_serial_number` - The issuer's certificate serial number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<Vec<u8>>,
    pub authority_cert_issuer: Option<Vec<GeneralName>>,
    pub authority_cert_serial_number: Option<SerialNumber>,
}

impl ToAndFromX509Extension for AuthorityKeyIdentifier {
    const OID: ObjectIdentifier = <x509_cert::ext::pkix::AuthorityKeyIdentifier as AssociatedOid>::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertClonerError> {
        let key_identifier = match &self.key_identifier {
            Some(id) => Some(OctetString::new(id.clone())?),
            None => None,
        };

        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier {
            key_identifier,
            authority_cert_issuer: self.authority_cert_issuer.clone(),
            authority_cert_serial_number: self.authority_cert_serial_number.clone(),
        };

        Ok(aki.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertClonerError> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier::from_der(extension)?;
        Ok(Self {
            key_identifier: aki.key_identifier.map(|id| id.as_bytes().to_vec()),
            authority_cert_issuer: aki.authority_cert_issuer,
            authority_cert_serial_number: aki.authority_cert_serial_number,
        })
    }
}

/// Represents the Netscape comment extension (`2.16.840.1.113730.1.13`).
///
/// The value is an IA5String. Some issuers write a UTF8String instead, which
/// is accepted when decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetscapeComment {
    pub comment: String,
}

impl NetscapeComment {
    /// The comment stamped on certificates created by this crate.
    pub fn cloned() -> Self {
        Self {
            comment: CLONED_COMMENT.to_string(),
        }
    }
}

impl ToAndFromX509Extension for NetscapeComment {
    const OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.113730.1.13");

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertClonerError> {
        let value = Ia5String::new(&self.comment)
            .map_err(|e| CertClonerError::InvalidInput(e.to_string()))?;
        Ok(value.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertClonerError> {
        let comment = match Ia5String::from_der(extension) {
            Ok(value) => value.to_string(),
            Err(_) => String::from_der(extension)?,
        };
        Ok(Self { comment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use der::asn1::BitString;
    use x509_cert::name::Name;
    use x509_cert::spki::AlgorithmIdentifierOwned;

    #[test]
    fn test_key_identifier_is_sha1_of_key_bits() {
        let spki = SubjectPublicKeyInfoOwned {
            algorithm: AlgorithmIdentifierOwned {
                oid: crate::classify::ID_EC_PUBLIC_KEY,
                parameters: None,
            },
            subject_public_key: BitString::from_bytes(b"abc").unwrap(),
        };
        // SHA-1("abc")
        assert_eq!(
            key_identifier(&spki),
            vec![
                0xa9, 0x99, 0x3e, 0x36, 0x47, 0x06, 0x81, 0x6a, 0xba, 0x3e, 0x25, 0x71, 0x78, 0x50,
                0xc2, 0x6c, 0x9c, 0xd0, 0xd8, 0x9d
            ]
        );
    }

    #[test]
    fn test_authority_key_identifier_encoding_decoding() {
        let original = AuthorityKeyIdentifier {
            key_identifier: Some(vec![1, 2, 3, 4, 5]),
            authority_cert_issuer: Some(vec![GeneralName::DirectoryName(
                Name::from_str("CN=Test CA,O=Test Org").unwrap(),
            )]),
            authority_cert_serial_number: Some(SerialNumber::new(&[6, 7, 8, 9, 10]).unwrap()),
        };
        let encoded = original.to_x509_extension_value().unwrap();
        let decoded = AuthorityKeyIdentifier::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_authority_key_identifier_without_key_id() {
        let original = AuthorityKeyIdentifier {
            key_identifier: None,
            authority_cert_issuer: None,
            authority_cert_serial_number: Some(SerialNumber::new(&[1]).unwrap()),
        };
        let encoded = original.to_x509_extension_value().unwrap();
        let decoded = AuthorityKeyIdentifier::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(decoded.key_identifier, None);
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_subject_key_identifier_encoding_decoding() {
        let original = SubjectKeyIdentifier {
            key_identifier: vec![9; 20],
        };
        let encoded = original.to_x509_extension_value().unwrap();
        let decoded = SubjectKeyIdentifier::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_netscape_comment_accepts_utf8_string() {
        let encoded = "written by another tool".to_string().to_der().unwrap();
        let decoded = NetscapeComment::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(decoded.comment, "written by another tool");
    }

    #[test]
    fn test_cloned_comment_text() {
        let encoded = NetscapeComment::cloned().to_x509_extension_value().unwrap();
        let decoded = NetscapeComment::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(decoded.comment, CLONED_COMMENT);
    }
}
