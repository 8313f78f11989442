use std::collections::{HashMap, HashSet};

use der::Encode;

use crate::cert::Certificate;
use crate::cert::name::NormalizedName;
use crate::error::{CertClonerError, Result};

/// All input certificates sharing one subject, and therefore one public key.
#[derive(Debug, Clone)]
pub(crate) struct SubjectGroup {
    pub subject: NormalizedName,
    /// Indices into the input slice, in input order.
    pub members: Vec<usize>,
    public_key_der: Vec<u8>,
}

impl SubjectGroup {
    /// The first member, whose public key stands for the whole group.
    pub fn representative(&self) -> usize {
        self.members[0]
    }

    /// A group is cross-signed when its members have more than one issuer.
    pub fn is_cross_signed(&self, certs: &[Certificate]) -> bool {
        let issuers: HashSet<_> = self
            .members
            .iter()
            .map(|&idx| NormalizedName::new(certs[idx].issuer()))
            .collect();
        issuers.len() > 1
    }
}

/// Input certificates partitioned by normalized subject.
///
/// Groups are kept in order of first appearance in the input so everything
/// derived from them (key generation in particular) happens in a stable order.
#[derive(Debug, Clone)]
pub(crate) struct SubjectGroups {
    groups: Vec<SubjectGroup>,
    by_subject: HashMap<NormalizedName, usize>,
    group_of_cert: Vec<usize>,
}

impl SubjectGroups {
    /// Partitions `certs` by subject.
    ///
    /// Fails with [`CertClonerError::DuplicateSubject`] when two certificates
    /// with the same subject carry different public keys.
    pub fn from_certificates(certs: &[Certificate]) -> Result<Self> {
        let mut groups: Vec<SubjectGroup> = Vec::new();
        let mut by_subject = HashMap::new();
        let mut group_of_cert = Vec::with_capacity(certs.len());

        for (idx, cert) in certs.iter().enumerate() {
            let subject = NormalizedName::new(cert.subject());
            let public_key_der = cert.public_key_info().to_der()?;

            let group_idx = match by_subject.get(&subject).copied() {
                Some(group_idx) => {
                    let group: &mut SubjectGroup = &mut groups[group_idx];
                    if group.public_key_der != public_key_der {
                        return Err(CertClonerError::DuplicateSubject {
                            subject: subject.to_string(),
                        });
                    }
                    group.members.push(idx);
                    group_idx
                }
                None => {
                    let group_idx = groups.len();
                    by_subject.insert(subject.clone(), group_idx);
                    groups.push(SubjectGroup {
                        subject,
                        members: vec![idx],
                        public_key_der,
                    });
                    group_idx
                }
            };
            group_of_cert.push(group_idx);
        }

        Ok(Self {
            groups,
            by_subject,
            group_of_cert,
        })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubjectGroup> {
        self.groups.iter()
    }

    /// Index of the group owning the certificate at input index `cert_idx`.
    pub fn group_of_cert(&self, cert_idx: usize) -> usize {
        self.group_of_cert[cert_idx]
    }

    /// Input indices of the certificates in group `group_idx`.
    pub fn members_of(&self, group_idx: usize) -> &[usize] {
        &self.groups[group_idx].members
    }

    /// Index of the group with the given subject, if any certificate has it.
    pub fn group_of_subject(&self, subject: &NormalizedName) -> Option<usize> {
        self.by_subject.get(subject).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyPair;
    use crate::test_utils::{fake_cert, fake_cert_with_spki};
    use rand_core::OsRng;

    #[test]
    fn test_single_certificate_is_a_singleton_group() {
        let key = KeyPair::generate_ecdsa_p256(&mut OsRng);
        let certs = vec![fake_cert("CN=Root", "CN=Root", &key, vec![])];
        let groups = SubjectGroups::from_certificates(&certs).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.group_of_cert(0), 0);
        assert!(!groups.iter().next().unwrap().is_cross_signed(&certs));
    }

    #[test]
    fn test_cross_signed_certificates_share_a_group() {
        let root_a = KeyPair::generate_ecdsa_p256(&mut OsRng);
        let root_b = KeyPair::generate_ecdsa_p256(&mut OsRng);
        let intermediate = KeyPair::generate_ecdsa_p256(&mut OsRng);
        let spki = intermediate.public_key_info().unwrap();
        let certs = vec![
            fake_cert_with_spki("CN=Intermediate", "CN=Root A", spki.clone(), vec![]),
            fake_cert("CN=Root A", "CN=Root A", &root_a, vec![]),
            fake_cert_with_spki("CN=Intermediate", "CN=Root B", spki, vec![]),
            fake_cert("CN=Root B", "CN=Root B", &root_b, vec![]),
        ];

        let groups = SubjectGroups::from_certificates(&certs).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups.group_of_cert(0), groups.group_of_cert(2));

        let intermediates = groups.iter().next().unwrap();
        assert_eq!(intermediates.members, vec![0, 2]);
        assert_eq!(intermediates.representative(), 0);
        assert!(intermediates.is_cross_signed(&certs));

        let subject = NormalizedName::new(certs[3].subject());
        assert_eq!(groups.group_of_subject(&subject), Some(2));
    }

    #[test]
    fn test_same_subject_with_different_keys_is_rejected() {
        let first = KeyPair::generate_ecdsa_p256(&mut OsRng);
        let second = KeyPair::generate_ecdsa_p256(&mut OsRng);
        let certs = vec![
            fake_cert("CN=Leaf", "CN=Root", &first, vec![]),
            fake_cert("CN=Leaf", "CN=Other Root", &second, vec![]),
        ];

        let err = SubjectGroups::from_certificates(&certs).unwrap_err();
        assert!(matches!(err, CertClonerError::DuplicateSubject { subject } if subject == "CN=Leaf"));
    }
}
