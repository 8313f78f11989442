use crate::cert::Certificate;
use crate::error::Result;

const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Convert a PEM‑encoded string to DER‑encoded bytes.
pub fn pem_to_der(pem_str: &str) -> Result<Vec<u8>> {
    let pem = pem::parse(pem_str)?;
    Ok(pem.contents().to_vec())
}

/// Parses every `CERTIFICATE` block of a PEM bundle, in bundle order.
///
/// Blocks with other labels (private keys, CRLs) are skipped.
pub fn certificates_from_pem(bundle: &str) -> Result<Vec<Certificate>> {
    pem::parse_many(bundle)?
        .iter()
        .filter(|block| block.tag() == CERTIFICATE_TAG)
        .map(|block| Certificate::from_der(block.contents()))
        .collect()
}

/// Encodes certificates as one concatenated PEM bundle.
pub fn certificates_to_pem(certs: &[Certificate]) -> Result<String> {
    let mut bundle = String::new();
    for cert in certs {
        bundle.push_str(&der_to_pem(&cert.to_der()?, CERTIFICATE_TAG));
    }
    Ok(bundle)
}
