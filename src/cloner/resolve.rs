use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use x509_cert::ext::pkix::name::GeneralName;

use super::group::SubjectGroups;
use crate::cert::extensions::AuthorityKeyIdentifier;
use crate::cert::name::NormalizedName;
use crate::cert::{Certificate, CertificateWithPrivateKey};
use crate::error::{CertClonerError, Result};

/// For every input certificate, the input index of the exact issuer
/// certificate its AKI names through `authorityCertSerialNumber` (and
/// `authorityCertIssuer`, when that carries a directory name).
///
/// `None` when the AKI names no serial, or names one that is not in the input.
pub(crate) fn named_issuers(certs: &[Certificate], groups: &SubjectGroups) -> Vec<Option<usize>> {
    certs
        .iter()
        .map(|cert| {
            if cert.is_self_signed() {
                return None;
            }
            let issuer_group = groups.group_of_subject(&NormalizedName::new(cert.issuer()))?;
            // A malformed AKI only loses the hint; rebuilding reports it.
            let aki = cert
                .find_extension::<AuthorityKeyIdentifier>()
                .ok()
                .flatten()?;
            let serial = aki.authority_cert_serial_number?;
            let issuer_of_issuer: Vec<NormalizedName> = aki
                .authority_cert_issuer
                .iter()
                .flatten()
                .filter_map(|name| match name {
                    GeneralName::DirectoryName(name) => Some(NormalizedName::new(name)),
                    _ => None,
                })
                .collect();

            groups
                .members_of(issuer_group)
                .iter()
                .copied()
                .find(|&member| {
                    let candidate = &certs[member];
                    *candidate.serial_number() == serial
                        && (issuer_of_issuer.is_empty()
                            || issuer_of_issuer.contains(&NormalizedName::new(candidate.issuer())))
                })
        })
        .collect()
}

/// Orders input indices so every certificate comes after a certificate of
/// its issuer's subject.
///
/// Self-signed certificates start the order, in input order. A certificate
/// whose AKI names a specific issuer certificate (see [`named_issuers`])
/// waits for that certificate. Any other certificate becomes ready as soon as
/// any member of its issuer's group has been processed, which lets
/// cross-signed groups be reached through whichever issuer is cloned first.
///
/// When only named-issuer waits are left and their issuer groups have been
/// processed, they fall back to the group rule rather than deadlock.
pub(crate) fn processing_order(
    certs: &[Certificate],
    groups: &SubjectGroups,
    named: &[Option<usize>],
) -> Result<Vec<usize>> {
    let mut ready = VecDeque::new();
    let mut waiting_on_group: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut waiting_on_cert: HashMap<usize, Vec<usize>> = HashMap::new();

    for (idx, cert) in certs.iter().enumerate() {
        if cert.is_self_signed() {
            ready.push_back(idx);
            continue;
        }
        let issuer = NormalizedName::new(cert.issuer());
        let issuer_group = groups.group_of_subject(&issuer).ok_or_else(|| {
            CertClonerError::InvalidInput(format!(
                "issuer `{issuer}` of `{}` is not part of the input",
                cert.subject()
            ))
        })?;
        match named[idx] {
            Some(issuer_idx) => waiting_on_cert.entry(issuer_idx).or_default().push(idx),
            None => waiting_on_group.entry(issuer_group).or_default().push(idx),
        }
    }

    let mut processed = vec![false; groups.len()];
    let mut order = Vec::with_capacity(certs.len());

    loop {
        while let Some(idx) = ready.pop_front() {
            order.push(idx);
            if let Some(children) = waiting_on_cert.remove(&idx) {
                ready.extend(children);
            }
            let group = groups.group_of_cert(idx);
            if !processed[group] {
                processed[group] = true;
                if let Some(children) = waiting_on_group.remove(&group) {
                    ready.extend(children);
                }
            }
        }

        let mut released: Vec<usize> = waiting_on_cert
            .keys()
            .copied()
            .filter(|&issuer_idx| processed[groups.group_of_cert(issuer_idx)])
            .collect();
        if released.is_empty() {
            break;
        }
        released.sort_unstable();
        for issuer_idx in released {
            if let Some(children) = waiting_on_cert.remove(&issuer_idx) {
                ready.extend(children);
            }
        }
    }

    if order.len() != certs.len() {
        let mut stuck: Vec<_> = waiting_on_group
            .values()
            .chain(waiting_on_cert.values())
            .flatten()
            .copied()
            .collect();
        stuck.sort_unstable();
        let stuck: Vec<_> = stuck
            .into_iter()
            .map(|idx| certs[idx].subject().to_string())
            .collect();
        return Err(CertClonerError::InvalidInput(format!(
            "no self-signed root reaches: {}",
            stuck.join(", ")
        )));
    }

    Ok(order)
}

/// Cloned certificates that can sign others, keyed by their subject.
///
/// The first clone registered for a subject stays its issuer for the rest of
/// the run.
#[derive(Debug, Default)]
pub(crate) struct IssuerIndex {
    issuers: HashMap<NormalizedName, CertificateWithPrivateKey>,
}

impl IssuerIndex {
    pub fn get(&self, subject: &NormalizedName) -> Option<&CertificateWithPrivateKey> {
        self.issuers.get(subject)
    }

    /// Registers `cloned` as the issuer for its subject unless one exists.
    pub fn insert(&mut self, cloned: &CertificateWithPrivateKey) {
        let subject = NormalizedName::new(cloned.cert.subject());
        if let Entry::Vacant(entry) = self.issuers.entry(subject) {
            entry.insert(cloned.clone());
        }
    }
}
