//! Short binary block codes decoded by exhaustive minimum-distance search.
//! The codebooks are small (≤ 256 codewords) so a full table scan beats any
//! algebraic decoder in both code size and robustness: every correctable
//! pattern inside the packing radius is handled uniformly.
use crate::error::FecError;

/// Extended Golay(24,12) generator matrix, one row per data bit: identity
/// part in the top 12 bits, parity part in the low 12. The (20,8) code used
/// on the air interface is this code shortened by its four leading data bits.
const GOLAY_ROWS: [u32; 12] = [
    0b100000000000_100111110001,
    0b010000000000_010011111010,
    0b001000000000_001001111101,
    0b000100000000_100100111110,
    0b000010000000_110010011101,
    0b000001000000_111001001110,
    0b000000100000_111100100101,
    0b000000010000_111110010010,
    0b000000001000_011111001001,
    0b000000000100_001111100110,
    0b000000000010_010101010111,
    0b000000000001_101010101011,
];

/// Generator polynomial of the (16,7) quadratic-residue-style code:
/// x⁹+x⁸+x⁶+x³+x+1, a degree-8+1 factor of x¹⁷+1 shortened by one bit.
const QR_GENERATOR: u32 = 0x34B;

/// A systematic binary block code with a precomputed codebook indexed by
/// data word. Codewords are at most 24 bits wide.
pub struct BlockCode {
    name: &'static str,
    data_bits: u32,
    codeword_bits: u32,
    /// Guaranteed correction radius in bits.
    correctable: u32,
    table: Vec<u32>,
}

impl BlockCode {
    /// Shortened Golay code: 8 data bits, 12 parity bits, corrects up to
    /// 3 bit errors per codeword.
    pub fn golay_20_8() -> Self {
        let mut table = vec![0u32; 256];
        for (data, slot) in table.iter_mut().enumerate() {
            let mut codeword = 0u32;
            for (i, row) in GOLAY_ROWS.iter().enumerate() {
                if data & (1 << (11 - i)) != 0 {
                    codeword ^= row;
                }
            }
            *slot = codeword & 0xF_FFFF;
        }
        Self {
            name: "golay_20_8_7",
            data_bits: 8,
            codeword_bits: 20,
            correctable: 3,
            table,
        }
    }

    /// The (16,7) code protecting short signalling words, corrects up to
    /// 2 bit errors per codeword.
    pub fn quadratic_residue_16_7() -> Self {
        let mut table = vec![0u32; 128];
        for (data, slot) in table.iter_mut().enumerate() {
            let shifted = (data as u32) << 9;
            *slot = shifted | polynomial_remainder(shifted);
        }
        Self {
            name: "quadratic_residue_16_7_6",
            data_bits: 7,
            codeword_bits: 16,
            correctable: 2,
            table,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn data_bits(&self) -> u32 {
        self.data_bits
    }

    pub fn codeword_bits(&self) -> u32 {
        self.codeword_bits
    }

    /// Systematic encode of a data word (low `data_bits` bits).
    pub fn encode_word(&self, data: u32) -> Result<u32, FecError> {
        self.table
            .get(data as usize)
            .copied()
            .ok_or(FecError::InvalidLength {
                expected: self.data_bits as usize,
                found: 32 - data.leading_zeros() as usize,
            })
    }

    /// Minimum-distance decode. Returns `(data, bit_errors, uncorrectable)`;
    /// when the nearest codeword sits outside the correction radius the
    /// systematic data bits of the received word are passed through.
    pub fn decode_word(&self, word: u32) -> (u32, u32, bool) {
        let word = word & ((1 << self.codeword_bits) - 1);
        let mut best_data = 0u32;
        let mut best_dist = u32::MAX;
        for (data, &codeword) in self.table.iter().enumerate() {
            let dist = (word ^ codeword).count_ones();
            if dist < best_dist {
                best_dist = dist;
                best_data = data as u32;
                if dist == 0 {
                    break;
                }
            }
        }
        if best_dist <= self.correctable {
            (best_data, best_dist, false)
        } else {
            (word >> (self.codeword_bits - self.data_bits), best_dist, true)
        }
    }

    /// Minimum Hamming weight over the nonzero codewords. For a linear code
    /// this equals the minimum distance.
    pub fn min_distance(&self) -> u32 {
        self.table
            .iter()
            .skip(1)
            .map(|cw| cw.count_ones())
            .min()
            .unwrap_or(0)
    }
}

/// Remainder of `value` divided by the generator polynomial (degree 9).
fn polynomial_remainder(value: u32) -> u32 {
    let mut rem = value;
    for bit in (9..16).rev() {
        if rem & (1 << bit) != 0 {
            rem ^= QR_GENERATOR << (bit - 9);
        }
    }
    rem
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
