#![allow(dead_code)]

use certcloner::cert::Certificate;
use openssl::asn1::Asn1Time;
use openssl::bn::{BigNum, MsbOption};
use openssl::dsa::Dsa;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::extension::{
    AuthorityKeyIdentifier, BasicConstraints, SubjectKeyIdentifier,
};
use openssl::x509::{X509, X509NameBuilder, X509Ref};

/// An OpenSSL-issued certificate and the key it certifies.
pub struct Fixture {
    pub x509: X509,
    pub key: PKey<Private>,
}

impl Fixture {
    pub fn certificate(&self) -> Certificate {
        Certificate::from_der(&self.x509.to_der().unwrap()).unwrap()
    }
}

pub fn ec_key(curve: Nid) -> PKey<Private> {
    let group = EcGroup::from_curve_name(curve).unwrap();
    PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
}

pub fn p256_key() -> PKey<Private> {
    ec_key(Nid::X9_62_PRIME256V1)
}

pub fn rsa_key(bits: u32) -> PKey<Private> {
    PKey::from_rsa(Rsa::generate(bits).unwrap()).unwrap()
}

pub fn dsa_key() -> PKey<Private> {
    PKey::from_dsa(Dsa::generate(2048).unwrap()).unwrap()
}

/// How a fixture certificate is issued.
pub struct Issue<'a> {
    pub issuer: Option<&'a Fixture>,
    pub is_ca: bool,
    pub digest: MessageDigest,
    /// Put the issuer name and serial into the AKI next to the key id.
    pub aki_issuer_serial: bool,
    pub comment: Option<&'a str>,
}

impl Default for Issue<'_> {
    fn default() -> Self {
        Self {
            issuer: None,
            is_ca: false,
            digest: MessageDigest::sha256(),
            aki_issuer_serial: false,
            comment: None,
        }
    }
}

/// Self-signed CA certificate for `cn`.
pub fn root(cn: &str, key: PKey<Private>) -> Fixture {
    issue(
        cn,
        key,
        Issue {
            is_ca: true,
            ..Default::default()
        },
    )
}

/// CA certificate for `cn` signed by `issuer`.
pub fn intermediate(cn: &str, key: PKey<Private>, issuer: &Fixture) -> Fixture {
    issue(
        cn,
        key,
        Issue {
            issuer: Some(issuer),
            is_ca: true,
            ..Default::default()
        },
    )
}

/// End-entity certificate for `cn` signed by `issuer`.
pub fn leaf(cn: &str, key: PKey<Private>, issuer: &Fixture) -> Fixture {
    issue(
        cn,
        key,
        Issue {
            issuer: Some(issuer),
            ..Default::default()
        },
    )
}

pub fn issue(cn: &str, key: PKey<Private>, how: Issue<'_>) -> Fixture {
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_nid(Nid::COMMONNAME, cn).unwrap();
    name.append_entry_by_nid(Nid::ORGANIZATIONNAME, "Fixture Corp")
        .unwrap();
    let name = name.build();

    let mut serial = BigNum::new().unwrap();
    serial.rand(64, MsbOption::MAYBE_ZERO, false).unwrap();

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    builder
        .set_serial_number(&serial.to_asn1_integer().unwrap())
        .unwrap();
    builder.set_subject_name(&name).unwrap();
    let issuer_name = how.issuer.map_or(&*name, |issuer| issuer.x509.subject_name());
    builder.set_issuer_name(issuer_name).unwrap();
    builder.set_pubkey(&key).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(365).unwrap())
        .unwrap();

    if how.is_ca {
        let bc = BasicConstraints::new().critical().ca().build().unwrap();
        builder.append_extension(bc).unwrap();
    }

    let issuer_x509: Option<&X509Ref> = how.issuer.map(|issuer| &*issuer.x509);
    let ski = SubjectKeyIdentifier::new()
        .build(&builder.x509v3_context(issuer_x509, None))
        .unwrap();
    builder.append_extension(ski).unwrap();

    let mut aki = AuthorityKeyIdentifier::new();
    aki.keyid(true);
    if how.aki_issuer_serial {
        aki.issuer(true);
    }
    let aki = aki
        .build(&builder.x509v3_context(issuer_x509, None))
        .unwrap();
    builder.append_extension(aki).unwrap();

    if let Some(comment) = how.comment {
        #[allow(deprecated)]
        let ext = openssl::x509::X509Extension::new_nid(
            None,
            None,
            Nid::NETSCAPE_COMMENT,
            comment,
        )
        .unwrap();
        builder.append_extension(ext).unwrap();
    }

    let signer = how.issuer.map_or(&key, |issuer| &issuer.key);
    builder.sign(signer, how.digest).unwrap();

    Fixture {
        x509: builder.build(),
        key,
    }
}

pub fn to_x509(cert: &Certificate) -> X509 {
    X509::from_der(&cert.to_der().unwrap()).unwrap()
}
