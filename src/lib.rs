//! # CertCloner - Clone X.509 Certificate Chains With Fresh Keys
//!
//! CertCloner takes a set of existing certificates (typically a chain, possibly
//! with cross-signed intermediates) and produces look-alike copies: same names,
//! validity and extensions, but new key pairs, new serial numbers and new
//! signatures. The cloned set keeps the issuer/subject relationships of the
//! original, so a cloned leaf verifies against the cloned intermediate and
//! root. Built entirely on the RustCrypto crates.
//!
//! ## Supported Key Types
//!
//! - **RSA**: any modulus size, regenerated at the original's size
//! - **ECDSA**: P-256, P-384 and P-521 curves
//!
//! Certificates with other keys are rejected with
//! [`CertClonerError::UnsupportedKey`](error::CertClonerError::UnsupportedKey),
//! and certificates signed with anything but RSA PKCS#1 v1.5 or ECDSA with
//! [`CertClonerError::UnsupportedSignatureInCert`](error::CertClonerError::UnsupportedSignatureInCert).
//!
//! ## Quick Start
//!
//! ### Cloning a PEM Bundle
//!
//! ```rust,no_run
//! use certcloner::{clone_certs, pem_utils};
//!
//! # fn main() -> Result<(), certcloner::error::CertClonerError> {
//! let bundle = std::fs::read_to_string("chain.pem").unwrap();
//! let originals = pem_utils::certificates_from_pem(&bundle)?;
//!
//! // Add the provenance comment and relink key identifiers
//! let clones = clone_certs(&originals, true, true)?;
//!
//! for clone in &clones {
//!     println!("{}", clone.cert.to_pem()?);
//!     println!("{}", clone.key.to_pkcs8_pem()?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Choosing Options and the Random Source
//!
//! ```rust,no_run
//! use certcloner::{clone_certs_with_options, cert::Certificate, CloneOptions};
//! use rand_core::OsRng;
//!
//! # fn main() -> Result<(), certcloner::error::CertClonerError> {
//! let der = std::fs::read("root.der").unwrap();
//! let root = Certificate::from_der(&der)?;
//!
//! // Keep the original key identifier extensions byte for byte
//! let options = CloneOptions::builder()
//!     .update_key_identifiers(false)
//!     .build();
//!
//! let clones = clone_certs_with_options(&[root], &options, &mut OsRng)?;
//! assert_eq!(clones.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! A batch either clones completely or fails with one error:
//!
//! ```rust
//! use certcloner::{cert::Certificate, error::CertClonerError};
//!
//! match Certificate::from_pem("invalid pem data") {
//!     Ok(cert) => println!("Parsed {}", cert.subject()),
//!     Err(CertClonerError::DecodingError(msg)) => println!("Failed to decode: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`cloner`]: Grouping, ordering and cloning of certificate sets
//! - [`classify`]: Recognition of key and signature algorithms
//! - [`key`]: Key generation, signing and PKCS#8 export
//! - [`cert`]: Certificate encoding/decoding and extension handling
//! - [`issuer`]: Signing rebuilt certificates
//! - [`tbs_certificate`]: Rebuilding the "to be signed" structure
//! - [`pem_utils`]: PEM helpers and bundles
//! - [`error`]: Error types

pub mod cert;
pub mod classify;
pub mod cloner;
pub mod error;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod tbs_certificate;

#[cfg(test)]
mod test_utils;

pub use cloner::{CloneOptions, clone_certs, clone_certs_with_options};
