//! Arithmetic in GF(2^8).
//!
//! The field is built on the AES polynomial x^8 + x^4 + x^3 + x + 1 (`0x11B`)
//! with `0x03` as the generator of the multiplicative group. Every share ever
//! produced by this crate depends on that choice, so it must never change.

use std::ops::{Add, AddAssign, Mul, MulAssign, Sub};

use zeroize::Zeroize;

/// Reduction polynomial, including the x^8 term.
pub const FIELD_POLYNOMIAL: u16 = 0x11B;

/// Generator of the multiplicative group for [`FIELD_POLYNOMIAL`].
pub const GENERATOR: u8 = 0x03;

struct Tables {
    /// `log[x]` is the discrete log of `x`; `log[0]` is unused.
    log: [u8; 256],
    /// `exp[i] = g^i`, stored twice so `log a + log b` never needs a reduction.
    exp: [u8; 510],
}

const fn build_tables() -> Tables {
    let mut log = [0u8; 256];
    let mut exp = [0u8; 510];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        exp[i + 255] = x as u8;
        log[x as usize] = i as u8;

        // x *= 3, i.e. x ^ (x * 2) reduced
        let mut doubled = x << 1;
        if doubled & 0x100 != 0 {
            doubled ^= FIELD_POLYNOMIAL;
        }
        x ^= doubled;
        i += 1;
    }
    Tables { log, exp }
}

static TABLES: Tables = build_tables();

/// An element of GF(2^8).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Zeroize)]
pub struct Gf256(pub u8);

impl Gf256 {
    pub const ZERO: Gf256 = Gf256(0);
    pub const ONE: Gf256 = Gf256(1);

    /// Multiplicative inverse. `None` for zero, which has no inverse.
    pub fn inverse(self) -> Option<Gf256> {
        if self.0 == 0 {
            return None;
        }
        let log = TABLES.log[self.0 as usize] as usize;
        Some(Gf256(TABLES.exp[255 - log]))
    }

    /// Division, `None` when `rhs` is zero.
    pub fn checked_div(self, rhs: Gf256) -> Option<Gf256> {
        rhs.inverse().map(|inv| self * inv)
    }
}

impl From<u8> for Gf256 {
    fn from(value: u8) -> Self {
        Gf256(value)
    }
}

impl From<Gf256> for u8 {
    fn from(value: Gf256) -> Self {
        value.0
    }
}

impl Add for Gf256 {
    type Output = Gf256;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Gf256) -> Gf256 {
        Gf256(self.0 ^ rhs.0)
    }
}

impl AddAssign for Gf256 {
    #[inline]
    #[allow(clippy::suspicious_op_assign_impl)]
    fn add_assign(&mut self, rhs: Gf256) {
        self.0 ^= rhs.0;
    }
}

// Characteristic 2: subtraction is addition.
impl Sub for Gf256 {
    type Output = Gf256;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn sub(self, rhs: Gf256) -> Gf256 {
        Gf256(self.0 ^ rhs.0)
    }
}

impl Mul for Gf256 {
    type Output = Gf256;

    #[inline]
    fn mul(self, rhs: Gf256) -> Gf256 {
        if self.0 == 0 || rhs.0 == 0 {
            return Gf256::ZERO;
        }
        let log_a = TABLES.log[self.0 as usize] as usize;
        let log_b = TABLES.log[rhs.0 as usize] as usize;
        Gf256(TABLES.exp[log_a + log_b])
    }
}

impl MulAssign for Gf256 {
    #[inline]
    fn mul_assign(&mut self, rhs: Gf256) {
        *self = *self * rhs;
    }
}

/// Evaluates the polynomial `coefficients[0] + coefficients[1]*x + ...` at `x`
/// using Horner's method.
pub fn eval_polynomial(coefficients: &[Gf256], x: Gf256) -> Gf256 {
    coefficients
        .iter()
        .rev()
        .fold(Gf256::ZERO, |acc, &coeff| acc * x + coeff)
}

/// Lagrange basis weights `l_i(0) = ∏(j≠i) x_j / (x_i - x_j)` for the given
/// x-coordinates.
///
/// The weights depend only on the x-coordinates, so a caller interpolating
/// many y-vectors over the same points computes them once. Returns `None` if
/// two x-coordinates coincide.
pub fn lagrange_weights_at_zero(xs: &[Gf256]) -> Option<Vec<Gf256>> {
    xs.iter()
        .enumerate()
        .map(|(i, &x_i)| {
            let mut numerator = Gf256::ONE;
            let mut denominator = Gf256::ONE;

            for (j, &x_j) in xs.iter().enumerate() {
                if i != j {
                    // (0 - x_j) is x_j in characteristic 2
                    numerator *= x_j;
                    denominator *= x_i - x_j;
                }
            }

            numerator.checked_div(denominator)
        })
        .collect()
}

/// Recovers `P(0)` from the points `(x_i, y_i)` by Lagrange interpolation.
///
/// Returns `None` if two points share an x-coordinate.
pub fn interpolate_at_zero(points: &[(Gf256, Gf256)]) -> Option<Gf256> {
    let xs: Vec<Gf256> = points.iter().map(|&(x, _)| x).collect();
    let weights = lagrange_weights_at_zero(&xs)?;

    Some(
        points
            .iter()
            .zip(&weights)
            .fold(Gf256::ZERO, |acc, (&(_, y), &w)| acc + y * w),
    )
}
