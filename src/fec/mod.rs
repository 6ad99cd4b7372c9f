//! Forward error correction for burst payloads. Each codec is exposed
//! behind the byte-oriented [`FecCodec`] trait and registered by name so the
//! codec layer can bind a schema's protection directive at link time.
//!
//! Bit-level codewords that do not fill whole bytes (Golay, quadratic
//! residue) travel MSB-aligned with zero padding in the trailing byte, the
//! same convention the bit readers use everywhere else.
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::FecError;

pub mod block;
pub mod gf256;
pub mod reed_solomon;

use block::BlockCode;
use reed_solomon::ReedSolomon1294;

/// Outcome of a byte-level decode. Mirrors the per-codec results: decode
/// never errors, it degrades to `uncorrectable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FecDecode {
    /// Corrected data bytes, MSB-aligned when `data_bits` is not a multiple
    /// of eight.
    pub data: Vec<u8>,
    pub errors_found: usize,
    pub uncorrectable: bool,
}

/// Byte-oriented view of one FEC codec.
pub trait FecCodec: Send + Sync {
    /// Registry key, e.g. `reed_solomon_12_9_4`.
    fn name(&self) -> &'static str;
    fn data_bits(&self) -> usize;
    fn codeword_bits(&self) -> usize;

    /// Data payload size in whole bytes (MSB-aligned).
    fn data_len(&self) -> usize {
        self.data_bits().div_ceil(8)
    }

    /// Codeword size in whole bytes (MSB-aligned).
    fn codeword_len(&self) -> usize {
        self.codeword_bits().div_ceil(8)
    }

    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, FecError>;
    fn decode(&self, codeword: &[u8]) -> FecDecode;
}

impl FecCodec for ReedSolomon1294 {
    fn name(&self) -> &'static str {
        "reed_solomon_12_9_4"
    }

    fn data_bits(&self) -> usize {
        reed_solomon::DATA_SIZE * 8
    }

    fn codeword_bits(&self) -> usize {
        reed_solomon::CODEWORD_SIZE * 8
    }

    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, FecError> {
        ReedSolomon1294::encode(self, data).map(|cw| cw.to_vec())
    }

    fn decode(&self, codeword: &[u8]) -> FecDecode {
        let out = ReedSolomon1294::decode(self, codeword);
        FecDecode {
            data: out.data.to_vec(),
            errors_found: out.errors_found,
            uncorrectable: out.uncorrectable,
        }
    }
}

impl FecCodec for BlockCode {
    fn name(&self) -> &'static str {
        BlockCode::name(self)
    }

    fn data_bits(&self) -> usize {
        BlockCode::data_bits(self) as usize
    }

    fn codeword_bits(&self) -> usize {
        BlockCode::codeword_bits(self) as usize
    }

    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, FecError> {
        if data.len() != self.data_len() {
            return Err(FecError::InvalidLength {
                expected: self.data_len(),
                found: data.len(),
            });
        }
        let word = word_from_bytes(data, FecCodec::data_bits(self));
        let codeword = self.encode_word(word)?;
        Ok(word_to_bytes(codeword, FecCodec::codeword_bits(self)))
    }

    fn decode(&self, codeword: &[u8]) -> FecDecode {
        if codeword.len() != self.codeword_len() {
            let mut data = vec![0u8; self.data_len()];
            let n = codeword.len().min(data.len());
            data[..n].copy_from_slice(&codeword[..n]);
            return FecDecode {
                data,
                errors_found: 0,
                uncorrectable: true,
            };
        }
        let word = word_from_bytes(codeword, FecCodec::codeword_bits(self));
        let (data, errors, uncorrectable) = self.decode_word(word);
        FecDecode {
            data: word_to_bytes(data, FecCodec::data_bits(self)),
            errors_found: errors as usize,
            uncorrectable,
        }
    }
}

/// Read the top `bits` bits of an MSB-aligned byte buffer as a word.
fn word_from_bytes(bytes: &[u8], bits: usize) -> u32 {
    let mut word: u64 = 0;
    for &b in bytes {
        word = (word << 8) | b as u64;
    }
    (word >> (bytes.len() * 8 - bits)) as u32
}

/// Lay the low `bits` bits of `word` into an MSB-aligned byte buffer.
fn word_to_bytes(word: u32, bits: usize) -> Vec<u8> {
    let len = bits.div_ceil(8);
    let shifted = (word as u64) << (len * 8 - bits);
    (0..len)
        .map(|i| (shifted >> (8 * (len - 1 - i))) as u8)
        .collect()
}

//==================================================================================REGISTRY

static CODECS: LazyLock<HashMap<&'static str, Box<dyn FecCodec>>> = LazyLock::new(|| {
    let codecs: [Box<dyn FecCodec>; 3] = [
        Box::new(ReedSolomon1294),
        Box::new(BlockCode::golay_20_8()),
        Box::new(BlockCode::quadratic_residue_16_7()),
    ];
    codecs.into_iter().map(|c| (c.name(), c)).collect()
});

/// Look up a codec by its registry key.
pub fn lookup(name: &str) -> Option<&'static dyn FecCodec> {
    CODECS.get(name).map(|c| c.as_ref())
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
