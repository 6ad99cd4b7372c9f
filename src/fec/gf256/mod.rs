//! Arithmetic over GF(256) with primitive polynomial 0x11D and primitive
//! element α = 2, the field used by the radio protocol's Reed-Solomon codes.
//! Exponent/log tables are computed once at compile time and shared
//! read-only; no mutable state exists anywhere in the engine.

/// Exponent/log table pair for GF(256).
///
/// The exponent table is doubled (512 entries) so `exp[log a + log b]` never
/// needs an explicit modulo in the multiply hot path.
pub struct Gf256 {
    exp: [u8; 512],
    log: [u8; 256],
}

/// Process-wide immutable field tables.
pub static GF: Gf256 = Gf256::new();

impl Gf256 {
    /// Build the tables by walking the powers of α = 2 and reducing by the
    /// primitive polynomial x⁸+x⁴+x³+x²+1 (0x11D).
    const fn new() -> Self {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        let mut i = 0;
        while i < 255 {
            exp[i] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= 0x11D;
            }
            i += 1;
        }
        while i < 512 {
            exp[i] = exp[i - 255];
            i += 1;
        }
        Self { exp, log }
    }

    /// Field product. Zero absorbs: returns 0 if either operand is 0.
    #[inline]
    pub fn multiply(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            0
        } else {
            self.exp[self.log[a as usize] as usize + self.log[b as usize] as usize]
        }
    }

    /// Multiplicative inverse. `a` must be nonzero.
    #[inline]
    pub fn inverse(&self, a: u8) -> u8 {
        debug_assert!(a != 0);
        self.exp[255 - self.log[a as usize] as usize]
    }

    /// `a / b` with `b` nonzero.
    #[inline]
    pub fn divide(&self, a: u8, b: u8) -> u8 {
        if a == 0 {
            return 0;
        }
        self.multiply(a, self.inverse(b))
    }

    /// α^i for any exponent (wraps modulo 255).
    #[inline]
    pub fn alpha_pow(&self, i: usize) -> u8 {
        self.exp[i % 255]
    }

    /// Discrete log of a nonzero element.
    #[inline]
    pub fn log(&self, a: u8) -> u8 {
        debug_assert!(a != 0);
        self.log[a as usize]
    }

    /// Polynomial product over the field by repeated scale-shift-XOR
    /// accumulation. Coefficient slices are degree-bounded by the caller
    /// (degree ≤ 2 × checksum size for the RS codecs); `out` must hold at
    /// least `p1.len() + p2.len() - 1` coefficients and is fully rewritten.
    ///
    /// This is the only routine that would change when generalizing to other
    /// field sizes.
    pub fn multiply_polynomials(&self, p1: &[u8], p2: &[u8], out: &mut [u8]) {
        debug_assert!(out.len() + 1 >= p1.len() + p2.len());
        for o in out.iter_mut() {
            *o = 0;
        }
        for (i, &a) in p1.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in p2.iter().enumerate() {
                out[i + j] ^= self.multiply(a, b);
            }
        }
    }
}
