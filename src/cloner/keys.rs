use std::sync::Arc;

use rand_core::CryptoRngCore;

use super::group::SubjectGroups;
use crate::cert::Certificate;
use crate::classify::{KeyAlgorithm, SignatureAlgorithm, Support, classify};
use crate::error::{CertClonerError, Result};
use crate::key::KeyPair;

/// Classifies the key of every group, failing on the first unsupported one.
///
/// All members of a group share one public key, so the representative
/// speaks for the group.
pub(crate) fn group_key_algorithms(
    groups: &SubjectGroups,
    certs: &[Certificate],
) -> Result<Vec<KeyAlgorithm>> {
    groups
        .iter()
        .map(|group| {
            let cert = &certs[group.representative()];
            match classify(cert).key {
                Support::Supported(algorithm) => Ok(algorithm),
                Support::Unsupported(oid) => Err(CertClonerError::UnsupportedKey {
                    subject: group.subject.to_string(),
                    algorithm: oid.to_string(),
                }),
            }
        })
        .collect()
}

/// Classifies the signature of every certificate, in input order.
pub(crate) fn signature_algorithms(certs: &[Certificate]) -> Result<Vec<SignatureAlgorithm>> {
    certs
        .iter()
        .map(|cert| match classify(cert).signature {
            Support::Supported(algorithm) => Ok(algorithm),
            Support::Unsupported(oid) => Err(CertClonerError::UnsupportedSignatureInCert {
                subject: cert.subject().to_string(),
                algorithm: oid.to_string(),
            }),
        })
        .collect()
}

/// Generates exactly one key per group, mirroring the group's original key.
///
/// The returned keys are indexed like the groups.
pub(crate) fn generate_group_keys<R: CryptoRngCore>(
    groups: &SubjectGroups,
    algorithms: &[KeyAlgorithm],
    rng: &mut R,
) -> Result<Vec<Arc<KeyPair>>> {
    groups
        .iter()
        .zip(algorithms)
        .map(|(group, &algorithm)| {
            log::debug!("generating {algorithm:?} key for {}", group.subject);
            KeyPair::generate(algorithm, rng).map(Arc::new)
        })
        .collect()
}
