//! Systematic Reed-Solomon(12,9,4) codec over GF(256): 9 data bytes plus 3
//! parity bytes, correcting up to one byte error per codeword. The decoder
//! runs the classic pipeline (syndromes, iterative locator derivation, Chien
//! search, algebraic correction) and is the template every byte-symbol FEC
//! codec in the registry follows.
use super::gf256::GF;
use crate::error::FecError;

/// Number of data bytes per codeword.
pub const DATA_SIZE: usize = 9;
/// Number of parity (checksum) bytes per codeword.
pub const CHECKSUM_SIZE: usize = 3;
/// Total codeword size in bytes.
pub const CODEWORD_SIZE: usize = DATA_SIZE + CHECKSUM_SIZE;
/// Degree bound of intermediate polynomials (2 × checksum size).
const POLY_MAX: usize = 2 * CHECKSUM_SIZE;

/// Generator polynomial with roots α¹, α², α³, highest degree first.
const GENERATOR: [u8; CHECKSUM_SIZE + 1] = [0x01, 0x0E, 0x38, 0x40];

/// Decode outcome. Never an `Err`: length or pattern failures surface as
/// `uncorrectable` with the payload passed through best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsDecode {
    pub data: [u8; DATA_SIZE],
    pub errors_found: usize,
    pub uncorrectable: bool,
}

/// Caller-owned scratch space holding every intermediate buffer of one
/// decode call, so repeated decodes allocate nothing.
///
/// Not safe for concurrent reuse: one workspace belongs to one call chain at
/// a time (single-owner, sequential reuse only).
#[derive(Debug, Default)]
pub struct RsWorkspace {
    codeword: [u8; CODEWORD_SIZE],
    syndromes: [u8; CHECKSUM_SIZE],
    /// Error-locator polynomial Λ(x), low-degree coefficient first.
    locator: [u8; CHECKSUM_SIZE + 1],
    /// Auxiliary polynomial of the discrepancy update.
    scratch: [u8; CHECKSUM_SIZE + 1],
    /// Full locator × syndrome product before truncation.
    product: [u8; POLY_MAX],
    /// Error-evaluator polynomial Ω(x) = (S·Λ) mod x³.
    evaluator: [u8; CHECKSUM_SIZE],
    positions: [usize; CHECKSUM_SIZE],
}

impl RsWorkspace {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The RS(12,9,4) codec. Stateless; all tables live in [`GF`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ReedSolomon1294;

impl ReedSolomon1294 {
    /// Systematic encode: 9 data bytes in, 12-byte codeword out (data
    /// unchanged, 3 parity bytes appended).
    pub fn encode(&self, data: &[u8]) -> Result<[u8; CODEWORD_SIZE], FecError> {
        if data.len() != DATA_SIZE {
            return Err(FecError::InvalidLength {
                expected: DATA_SIZE,
                found: data.len(),
            });
        }

        // LFSR division of data · x³ by the generator polynomial; the
        // remainder becomes the parity tail.
        let mut codeword = [0u8; CODEWORD_SIZE];
        codeword[..DATA_SIZE].copy_from_slice(data);
        for i in 0..DATA_SIZE {
            let coef = codeword[i];
            if coef != 0 {
                for j in 1..GENERATOR.len() {
                    codeword[i + j] ^= GF.multiply(GENERATOR[j], coef);
                }
            }
        }
        // The division overwrote the data prefix; restore it.
        codeword[..DATA_SIZE].copy_from_slice(data);
        Ok(codeword)
    }

    /// Decode with a transient workspace. See [`decode_with`](Self::decode_with).
    pub fn decode(&self, codeword: &[u8]) -> RsDecode {
        let mut ws = RsWorkspace::new();
        self.decode_with(codeword, &mut ws)
    }

    /// Syndrome-based decode using a caller-owned workspace (allocation-free).
    ///
    /// Known protocol quirk, preserved on purpose: a nonzero syndrome whose
    /// Chien search finds no locator roots (an error pattern beyond the
    /// code's reach that still evades the root search) is reported as zero
    /// errors with the payload unchanged, not as uncorrectable.
    pub fn decode_with(&self, codeword: &[u8], ws: &mut RsWorkspace) -> RsDecode {
        // Wrong-sized input fails soft, never raises.
        if codeword.len() != CODEWORD_SIZE {
            let mut data = [0u8; DATA_SIZE];
            let n = codeword.len().min(DATA_SIZE);
            data[..n].copy_from_slice(&codeword[..n]);
            return RsDecode {
                data,
                errors_found: 0,
                uncorrectable: true,
            };
        }
        ws.codeword.copy_from_slice(codeword);

        // (1) Syndromes: evaluate the received polynomial at α¹..α³ by
        // Horner's method, first byte = highest-degree coefficient.
        let mut clean = true;
        for j in 0..CHECKSUM_SIZE {
            let x = GF.alpha_pow(j + 1);
            let mut acc = 0u8;
            for &byte in ws.codeword.iter() {
                acc = GF.multiply(acc, x) ^ byte;
            }
            ws.syndromes[j] = acc;
            clean &= acc == 0;
        }

        // (2) All-zero syndrome: clean codeword.
        if clean {
            return self.passthrough(ws, 0, false);
        }

        // (3) Discrepancy-driven locator derivation, bounded to
        // CHECKSUM_SIZE iterations.
        let locator_len = self.derive_locator(ws);

        // (4) Evaluator Ω(x): low-degree terms of Λ(x) · S(x).
        GF.multiply_polynomials(
            &ws.syndromes,
            &ws.locator[..locator_len],
            &mut ws.product[..CHECKSUM_SIZE + locator_len - 1],
        );
        ws.evaluator.copy_from_slice(&ws.product[..CHECKSUM_SIZE]);

        // (5) Chien search: Λ(αʳ) == 0 marks error position 255 - r.
        let mut roots = 0usize;
        for r in 1..=255usize {
            if eval_poly(&ws.locator[..locator_len], GF.alpha_pow(r)) == 0 {
                if roots < CHECKSUM_SIZE {
                    ws.positions[roots] = 255 - r;
                }
                roots += 1;
                if roots >= CHECKSUM_SIZE {
                    break;
                }
            }
        }

        // (6) Degenerate: detectable but unlocatable. Literal no-op result.
        if roots == 0 {
            return self.passthrough(ws, 0, false);
        }
        if roots >= CHECKSUM_SIZE {
            return self.passthrough(ws, roots, true);
        }

        // Forney: e = Ω(α⁻ⁱ) / Λ'(α⁻ⁱ), XORed into the affected byte.
        for k in 0..roots {
            let pos = ws.positions[k];
            if pos >= CODEWORD_SIZE {
                return self.passthrough(ws, roots, true);
            }
            let x_inv = GF.alpha_pow(255 - pos);
            let num = eval_poly(&ws.evaluator, x_inv);
            let den = eval_derivative(&ws.locator[..locator_len], x_inv);
            if den == 0 {
                return self.passthrough(ws, roots, true);
            }
            let magnitude = GF.divide(num, den);
            ws.codeword[CODEWORD_SIZE - 1 - pos] ^= magnitude;
            log::debug!(
                "rs(12,9,4): corrected byte {} (magnitude {:#04x})",
                CODEWORD_SIZE - 1 - pos,
                magnitude
            );
        }

        self.passthrough(ws, roots, false)
    }

    /// Berlekamp-Massey style update of Λ(x) and the auxiliary polynomial.
    /// Returns the locator coefficient count (degree + 1).
    fn derive_locator(&self, ws: &mut RsWorkspace) -> usize {
        ws.locator = [0; CHECKSUM_SIZE + 1];
        ws.scratch = [0; CHECKSUM_SIZE + 1];
        ws.locator[0] = 1;
        ws.scratch[0] = 1;
        let mut loc_len = 1usize;
        let mut scr_len = 1usize;
        let cap = CHECKSUM_SIZE + 1;

        for i in 0..CHECKSUM_SIZE {
            let mut delta = ws.syndromes[i];
            for j in 1..loc_len {
                if i >= j {
                    delta ^= GF.multiply(ws.locator[j], ws.syndromes[i - j]);
                }
            }

            // Auxiliary polynomial shifts up by one degree each round.
            for k in (1..cap).rev() {
                ws.scratch[k] = ws.scratch[k - 1];
            }
            ws.scratch[0] = 0;
            scr_len = (scr_len + 1).min(cap);

            if delta != 0 {
                if scr_len > loc_len {
                    // Swap roles, rescaling both polynomials.
                    let inv = GF.inverse(delta);
                    let mut swapped = [0u8; CHECKSUM_SIZE + 1];
                    for k in 0..cap {
                        swapped[k] = GF.multiply(ws.scratch[k], delta);
                    }
                    for k in 0..cap {
                        ws.scratch[k] = GF.multiply(ws.locator[k], inv);
                    }
                    ws.locator = swapped;
                    std::mem::swap(&mut loc_len, &mut scr_len);
                }
                for k in 0..cap {
                    ws.locator[k] ^= GF.multiply(ws.scratch[k], delta);
                }
                loc_len = loc_len.max(scr_len);
            }
        }

        // Drop trailing zero coefficients.
        while loc_len > 1 && ws.locator[loc_len - 1] == 0 {
            loc_len -= 1;
        }
        loc_len
    }

    /// Package the (possibly corrected) workspace codeword as a result.
    fn passthrough(&self, ws: &RsWorkspace, errors_found: usize, uncorrectable: bool) -> RsDecode {
        let mut data = [0u8; DATA_SIZE];
        data.copy_from_slice(&ws.codeword[..DATA_SIZE]);
        RsDecode {
            data,
            errors_found,
            uncorrectable,
        }
    }
}

/// Evaluate a polynomial given low-degree-first coefficients.
fn eval_poly(coeffs: &[u8], x: u8) -> u8 {
    let mut acc = 0u8;
    for &c in coeffs.iter().rev() {
        acc = GF.multiply(acc, x) ^ c;
    }
    acc
}

/// Evaluate the formal derivative of Λ(x): in characteristic 2 only the
/// odd-degree terms survive, each dropping one degree.
fn eval_derivative(coeffs: &[u8], x: u8) -> u8 {
    let x2 = GF.multiply(x, x);
    let mut acc = 0u8;
    let mut pow = 1u8;
    let mut k = 1;
    while k < coeffs.len() {
        acc ^= GF.multiply(coeffs[k], pow);
        pow = GF.multiply(pow, x2);
        k += 2;
    }
    acc
}
