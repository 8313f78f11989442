use std::collections::HashSet;

use rand_core::CryptoRngCore;
use x509_cert::serial_number::SerialNumber;

use crate::error::Result;

const SERIAL_LEN: usize = 16;

/// Hands out random serial numbers, never the same one twice per run.
pub(crate) struct SerialNumbers<'r, R> {
    rng: &'r mut R,
    issued: HashSet<[u8; SERIAL_LEN]>,
}

impl<'r, R: CryptoRngCore> SerialNumbers<'r, R> {
    pub fn new(rng: &'r mut R) -> Self {
        Self {
            rng,
            issued: HashSet::new(),
        }
    }

    pub fn next_serial(&mut self) -> Result<SerialNumber> {
        loop {
            let mut bytes = [0u8; SERIAL_LEN];
            self.rng.fill_bytes(&mut bytes);
            // Positive, and exactly SERIAL_LEN bytes once DER encoded.
            bytes[0] &= 0x7F;
            bytes[0] |= 0x40;

            if self.issued.insert(bytes) {
                return Ok(SerialNumber::new(&bytes)?);
            }
        }
    }
}
