//! Clones whole certificate sets, keeping their chain structure intact.

mod group;
mod keys;
mod resolve;
mod serial;

use bon::Builder;
use rand_core::{CryptoRngCore, OsRng};

use crate::cert::name::NormalizedName;
use crate::cert::{Certificate, CertificateWithPrivateKey};
use crate::error::{CertClonerError, Result};
use crate::issuer::{Issuer, SelfIssuer};
use crate::tbs_certificate::TbsCertificate;
use group::SubjectGroups;
use resolve::{IssuerIndex, named_issuers, processing_order};
use serial::SerialNumbers;

/// Controls how cloned certificates differ from their originals.
///
/// ```
/// use certcloner::CloneOptions;
///
/// let options = CloneOptions::builder().include_comment(false).build();
/// assert!(!options.include_comment);
/// assert!(options.update_key_identifiers);
/// ```
#[derive(Clone, Debug, Builder)]
pub struct CloneOptions {
    /// Mark clones with a Netscape comment extension. When off, comments
    /// present on the originals are dropped as well.
    #[builder(default = true)]
    pub include_comment: bool,
    /// Recompute the subject and authority key identifiers so they match
    /// the new keys instead of the originals.
    #[builder(default = true)]
    pub update_key_identifiers: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Clones `certs`, generating fresh keys with the operating system RNG.
///
/// Returns one clone per input certificate, in input order. Certificates
/// sharing a subject (cross-signed ones) share one new key.
pub fn clone_certs(
    certs: &[Certificate],
    include_comment: bool,
    update_key_identifiers: bool,
) -> Result<Vec<CertificateWithPrivateKey>> {
    let options = CloneOptions::builder()
        .include_comment(include_comment)
        .update_key_identifiers(update_key_identifiers)
        .build();
    clone_certs_with_options(certs, &options, &mut OsRng)
}

/// Clones `certs` drawing keys and serial numbers from `rng`.
///
/// Nothing is generated until every certificate has been grouped and
/// classified, so unsupported input fails fast and never yields a partial
/// result.
pub fn clone_certs_with_options<R: CryptoRngCore>(
    certs: &[Certificate],
    options: &CloneOptions,
    rng: &mut R,
) -> Result<Vec<CertificateWithPrivateKey>> {
    if certs.is_empty() {
        return Ok(Vec::new());
    }

    let groups = SubjectGroups::from_certificates(certs)?;
    log::debug!(
        "cloning {} certificates with {} distinct subjects",
        certs.len(),
        groups.len()
    );
    for group in groups.iter().filter(|group| group.is_cross_signed(certs)) {
        log::debug!(
            "{} is cross-signed by {} issuers",
            group.subject,
            group.members.len()
        );
    }

    let key_algorithms = keys::group_key_algorithms(&groups, certs)?;
    let signature_algorithms = keys::signature_algorithms(certs)?;
    let named = named_issuers(certs, &groups);
    let order = processing_order(certs, &groups, &named)?;
    log::debug!("processing order: {order:?}");

    let group_keys = keys::generate_group_keys(&groups, &key_algorithms, rng)?;

    let mut serials = SerialNumbers::new(rng);
    let mut index = IssuerIndex::default();
    let mut cloned: Vec<Option<CertificateWithPrivateKey>> = vec![None; certs.len()];

    for idx in order {
        let original = &certs[idx];
        let key = &group_keys[groups.group_of_cert(idx)];
        let subject_public_key = key.public_key_info()?;
        let serial_number = serials.next_serial()?;

        let self_issuer;
        let issuer: &dyn Issuer = if original.is_self_signed() {
            self_issuer = SelfIssuer {
                name: original.subject(),
                key: key.as_ref(),
                serial_number: serial_number.clone(),
            };
            &self_issuer
        } else {
            // The clone of the certificate an AKI names by serial signs, so
            // the rewritten serial points at the right cross-signed member.
            let issuer_name = NormalizedName::new(original.issuer());
            named[idx]
                .and_then(|issuer_idx| cloned[issuer_idx].as_ref())
                .or_else(|| index.get(&issuer_name))
                .ok_or_else(|| {
                    CertClonerError::InvalidInput(format!(
                        "issuer `{issuer_name}` was not cloned before `{}`",
                        original.subject()
                    ))
                })?
        };

        let signature_algorithm = issuer
            .signing_key()
            .signature_algorithm_for(signature_algorithms[idx]);
        let tbs = TbsCertificate::rebuild(
            original,
            subject_public_key,
            issuer,
            serial_number,
            signature_algorithm,
            options,
        )?;
        let cert = issuer.issue(&tbs)?;
        log::trace!(
            "cloned {} (input #{idx}) with {:?}",
            cert.subject(),
            signature_algorithm
        );

        let output = CertificateWithPrivateKey {
            cert,
            key: key.clone(),
        };
        index.insert(&output);
        cloned[idx] = Some(output);
    }

    cloned
        .into_iter()
        .map(|output| {
            output.ok_or_else(|| {
                CertClonerError::InvalidInput("certificate left out of processing order".into())
            })
        })
        .collect()
}
