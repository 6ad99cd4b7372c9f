//! Integrity checksums appended to protected PDUs. The only algorithm in
//! service today is CRC-CCITT; it stays behind a trait plus name registry so
//! schemas select their checksum the same way they select an FEC codec.
//!
//! Several PDU families XOR the transmitted checksum with a fixed mask to
//! separate otherwise identical payloads; the mask is applied on top of the
//! algorithm, never inside it.
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::core::CrcReport;

/// A 16-bit checksum algorithm.
pub trait CrcAlgorithm: Send + Sync {
    /// Registry key, e.g. `crc_ccitt`.
    fn name(&self) -> &'static str;
    fn compute(&self, bytes: &[u8]) -> u16;
}

/// CRC-CCITT: polynomial 0x1021, zero initial value, MSB-first, no final
/// XOR and no reflection.
#[derive(Debug, Default, Clone, Copy)]
pub struct Crc16Ccitt;

impl CrcAlgorithm for Crc16Ccitt {
    fn name(&self) -> &'static str {
        "crc_ccitt"
    }

    fn compute(&self, bytes: &[u8]) -> u16 {
        let mut crc: u16 = 0;
        for &byte in bytes {
            crc ^= (byte as u16) << 8;
            for _ in 0..8 {
                crc = if crc & 0x8000 != 0 {
                    (crc << 1) ^ 0x1021
                } else {
                    crc << 1
                };
            }
        }
        crc
    }
}

static ALGORITHMS: LazyLock<HashMap<&'static str, Box<dyn CrcAlgorithm>>> = LazyLock::new(|| {
    let algorithms: [Box<dyn CrcAlgorithm>; 1] = [Box::new(Crc16Ccitt)];
    algorithms.into_iter().map(|a| (a.name(), a)).collect()
});

/// Look up a checksum algorithm by its registry key.
pub fn lookup(name: &str) -> Option<&'static dyn CrcAlgorithm> {
    ALGORITHMS.get(name).map(|a| a.as_ref())
}

/// Checksum of `bytes` with the PDU family's XOR mask applied.
pub fn compute_masked(algorithm: &dyn CrcAlgorithm, bytes: &[u8], mask: Option<u16>) -> u16 {
    algorithm.compute(bytes) ^ mask.unwrap_or(0)
}

/// Verify a protected span whose last two bytes carry the big-endian
/// checksum. Detection only: the report states the mismatch, nothing is
/// corrected. Returns `None` when the span cannot hold a checksum.
pub fn verify(bytes: &[u8], algorithm: &dyn CrcAlgorithm, mask: Option<u16>) -> Option<CrcReport> {
    let split = bytes.len().checked_sub(2)?;
    let computed = compute_masked(algorithm, &bytes[..split], mask);
    let received = u16::from_be_bytes([bytes[split], bytes[split + 1]]);
    if computed != received {
        log::debug!("crc mismatch: computed {computed:#06x}, received {received:#06x}");
    }
    Some(CrcReport {
        valid: computed == received,
        computed,
        received,
    })
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
