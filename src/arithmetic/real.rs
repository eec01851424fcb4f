//! Arbitrary-precision real numbers
//!
//! `Real` wraps an MPFR float (via `rug`). There is no process-wide precision:
//! every value is created through a [`Precision`] context, so the precision
//! used by a run is fixed once when the context is built and then threaded to
//! every factory that produces a `Real`.
//!
//! Rounding is round-to-nearest for every construction and every operation.
//! Results of binary operators carry the larger of the two operand precisions,
//! compound assignments keep the precision of the left operand.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign};

use rug::Float;
use thiserror::Error;

/// Precision used when nothing else is configured (bits of significand)
pub const DEFAULT_PRECISION: u32 = 160;

/// Smallest precision a run may be configured with
pub const MIN_PRECISION: u32 = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RealError {
    #[error("invalid numeral {input:?}: {reason}")]
    InvalidNumeral { input: String, reason: String },

    #[error("precision of {bits} bits outside supported range [{min}, {max}]")]
    Precision { bits: u32, min: u32, max: u32 },
}

/// Construction context for [`Real`] values
///
/// Holds the number of significand bits. Build it once at startup and pass it
/// (it is `Copy`) to everything that creates numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precision(u32);

impl Precision {
    pub fn new(bits: u32) -> Result<Self, RealError> {
        let max = rug::float::prec_max();
        if !(MIN_PRECISION..=max).contains(&bits) {
            return Err(RealError::Precision { bits, min: MIN_PRECISION, max });
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn zero(self) -> Real {
        Real(Float::new(self.0))
    }

    /// Parse a decimal numeral such as `"12.34"`, `"-7"` or `"1.32712440018E+20"`
    pub fn parse(self, numeral: &str) -> Result<Real, RealError> {
        let trimmed = numeral.trim();
        if trimmed.is_empty() {
            return Err(RealError::InvalidNumeral {
                input: numeral.to_string(),
                reason: "empty string".to_string(),
            });
        }
        let parsed = Float::parse(trimmed).map_err(|e| RealError::InvalidNumeral {
            input: numeral.to_string(),
            reason: e.to_string(),
        })?;
        let value = Float::with_val(self.0, parsed);
        // MPFR also reads "nan", "inf" and "@inf@"
        if !value.is_finite() {
            return Err(RealError::InvalidNumeral {
                input: numeral.to_string(),
                reason: "not a finite number".to_string(),
            });
        }
        Ok(Real(value))
    }

    pub fn int(self, value: i64) -> Real {
        Real(Float::with_val(self.0, value))
    }

    pub fn size(self, value: usize) -> Real {
        Real(Float::with_val(self.0, value))
    }

    /// Copy a native MPFR value into this context's precision
    pub fn float(self, value: &Float) -> Real {
        Real(Float::with_val(self.0, value))
    }

    /// Copy an existing `Real` into this context's precision
    pub fn real(self, value: &Real) -> Real {
        self.float(&value.0)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(DEFAULT_PRECISION)
    }
}

/// An arbitrary-precision real number
#[derive(Clone, PartialEq, PartialOrd)]
pub struct Real(Float);

impl Real {
    /// Precision of this value in bits
    pub fn precision(&self) -> u32 {
        self.0.prec()
    }

    pub fn as_float(&self) -> &Float {
        &self.0
    }

    pub fn into_float(self) -> Float {
        self.0
    }

    pub fn is_one(&self) -> bool {
        self.0 == 1
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    pub fn is_sign_negative(&self) -> bool {
        self.0.is_sign_negative()
    }

    /// Total comparison; NaN sorts as equal to everything
    pub fn total_cmp(&self, other: &Real) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }

    /// x := |x|
    pub fn abs_mut(&mut self) {
        self.0.abs_mut();
    }

    /// x := x²
    pub fn sqr_mut(&mut self) {
        self.0.square_mut();
    }

    /// x := x³
    pub fn cube_mut(&mut self) {
        let x = self.0.clone();
        self.0 *= &x;
        self.0 *= &x;
    }

    /// x := √x
    pub fn sqrt_mut(&mut self) {
        self.0.sqrt_mut();
    }

    /// x := x/2, exact
    pub fn halve_mut(&mut self) {
        self.0 /= 2;
    }

    /// x := 1/x, signed infinity for zero
    pub fn inv_mut(&mut self) {
        self.0.recip_mut();
    }

    /// Round to the nearest integer; saturates at the `i64` bounds, NaN gives 0
    pub fn to_i64(&self) -> i64 {
        if self.0.is_nan() {
            return 0;
        }
        match self.0.to_integer() {
            Some(i) => i.to_i64().unwrap_or(if i.cmp0() == Ordering::Less {
                i64::MIN
            } else {
                i64::MAX
            }),
            None if self.0.is_sign_negative() => i64::MIN,
            None => i64::MAX,
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64()
    }
}

impl Default for Real {
    fn default() -> Self {
        Precision::default().zero()
    }
}

impl From<Float> for Real {
    fn from(value: Float) -> Self {
        Real(value)
    }
}

impl fmt::Debug for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Real({}, {} bits)", self.render_str("%.20Rg"), self.precision())
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_str("%.20Rf"))
    }
}

/// Square root, trigonometry and friends
///
/// Implemented once, by [`Real`]; the free functions below forward to it so
/// formulas can be written the way they appear on paper.
pub trait Elementary: Sized {
    fn abs(&self) -> Self;
    fn sqr(&self) -> Self;
    fn sqrt(&self) -> Self;
    fn sin(&self) -> Self;
    fn cos(&self) -> Self;
    /// Angle of the point `(x, self)` from the positive x-axis, in `(-π, π]`
    fn atan2(&self, x: &Self) -> Self;
}

impl Elementary for Real {
    fn abs(&self) -> Self {
        let mut r = self.clone();
        r.abs_mut();
        r
    }

    fn sqr(&self) -> Self {
        Real(Float::with_val(self.0.prec(), self.0.square_ref()))
    }

    fn sqrt(&self) -> Self {
        Real(Float::with_val(self.0.prec(), self.0.sqrt_ref()))
    }

    fn sin(&self) -> Self {
        Real(Float::with_val(self.0.prec(), self.0.sin_ref()))
    }

    fn cos(&self) -> Self {
        Real(Float::with_val(self.0.prec(), self.0.cos_ref()))
    }

    fn atan2(&self, x: &Self) -> Self {
        let prec = self.0.prec().max(x.0.prec());
        Real(Float::with_val(prec, self.0.atan2_ref(&x.0)))
    }
}

pub fn sqrt<T: Elementary>(x: &T) -> T {
    x.sqrt()
}

pub fn sin<T: Elementary>(x: &T) -> T {
    x.sin()
}

pub fn cos<T: Elementary>(x: &T) -> T {
    x.cos()
}

pub fn atan2<T: Elementary>(y: &T, x: &T) -> T {
    y.atan2(x)
}

macro_rules! binary_op {
    ($Op:ident, $op_fn:ident, $OpAssign:ident, $op_assign_fn:ident, $op:tt, $op_assign:tt) => {
        impl $Op<&Real> for &Real {
            type Output = Real;
            fn $op_fn(self, rhs: &Real) -> Real {
                let prec = self.0.prec().max(rhs.0.prec());
                Real(Float::with_val(prec, &self.0 $op &rhs.0))
            }
        }

        impl $Op<Real> for Real {
            type Output = Real;
            fn $op_fn(self, rhs: Real) -> Real {
                (&self).$op_fn(&rhs)
            }
        }

        impl $Op<&Real> for Real {
            type Output = Real;
            fn $op_fn(self, rhs: &Real) -> Real {
                (&self).$op_fn(rhs)
            }
        }

        impl $Op<Real> for &Real {
            type Output = Real;
            fn $op_fn(self, rhs: Real) -> Real {
                self.$op_fn(&rhs)
            }
        }

        impl $OpAssign<&Real> for Real {
            fn $op_assign_fn(&mut self, rhs: &Real) {
                self.0 $op_assign &rhs.0;
            }
        }

        impl $OpAssign<Real> for Real {
            fn $op_assign_fn(&mut self, rhs: Real) {
                self.0 $op_assign &rhs.0;
            }
        }
    };
}

binary_op!(Add, add, AddAssign, add_assign, +, +=);
binary_op!(Sub, sub, SubAssign, sub_assign, -, -=);
binary_op!(Mul, mul, MulAssign, mul_assign, *, *=);
binary_op!(Div, div, DivAssign, div_assign, /, /=);
binary_op!(Rem, rem, RemAssign, rem_assign, %, %=);

impl Neg for Real {
    type Output = Real;
    fn neg(self) -> Real {
        Real(-self.0)
    }
}

impl Neg for &Real {
    type Output = Real;
    fn neg(self) -> Real {
        Real(Float::with_val(self.0.prec(), -&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Precision {
        Precision::default()
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(ctx().parse("12.3x"), Err(RealError::InvalidNumeral { .. })));
        assert!(matches!(ctx().parse(""), Err(RealError::InvalidNumeral { .. })));
        assert!(ctx().parse(" 1.32712440018E+20 ").is_ok());
    }

    #[test]
    fn parse_rejects_non_finite_values() {
        for text in ["nan", "NaN", "inf", "-inf", "infinity", "@nan@", "@inf@"] {
            assert!(matches!(ctx().parse(text), Err(RealError::InvalidNumeral { .. })), "{text}");
        }
    }

    #[test]
    fn precision_bounds() {
        assert!(Precision::new(31).is_err());
        assert_eq!(Precision::new(32).map(Precision::bits), Ok(32));
    }

    #[test]
    fn precision_is_not_retroactive() {
        let low = Precision::new(32).unwrap().parse("0.1").unwrap();
        let high = Precision::new(256).unwrap().parse("0.1").unwrap();
        assert_eq!(low.precision(), 32);
        assert_eq!(high.precision(), 256);
        assert_ne!(low, high);
        // mixed operands take the wider precision
        assert_eq!((&low + &high).precision(), 256);
        let mut acc = low.clone();
        acc += &high;
        assert_eq!(acc.precision(), 32);
    }

    #[test]
    fn in_place_helpers() {
        let c = ctx();
        let mut x = c.int(-3);
        x.abs_mut();
        assert_eq!(x, c.int(3));
        x.cube_mut();
        assert_eq!(x, c.int(27));
        x.inv_mut();
        assert_eq!(x * c.int(27), c.int(1));

        let mut y = c.int(16);
        y.sqrt_mut();
        assert_eq!(y, c.int(4));
        y.sqr_mut();
        assert_eq!(y, c.int(16));
    }

    #[test]
    fn remainder_keeps_dividend_sign() {
        let c = ctx();
        assert_eq!(c.int(7) % c.int(3), c.int(1));
        assert_eq!(c.int(-7) % c.int(3), c.int(-1));
    }

    #[test]
    fn reciprocal_of_zero_is_infinite() {
        let mut z = ctx().zero();
        z.inv_mut();
        assert!(!z.is_finite());
        assert!(!z.is_sign_negative());
    }

    #[test]
    fn conversions_round_to_nearest() {
        let c = ctx();
        assert_eq!(c.parse("2.5000001").unwrap().to_i64(), 3);
        assert_eq!(c.parse("-2.4").unwrap().to_i64(), -2);
        assert_eq!(c.parse("1E+40").unwrap().to_i64(), i64::MAX);
        assert_eq!(c.parse("0.25").unwrap().to_f64(), 0.25);
    }

    #[test]
    fn atan2_quadrants() {
        let c = ctx();
        let one = c.int(1);
        let minus_one = c.int(-1);
        let zero = c.zero();
        let pi = atan2(&zero, &minus_one).to_f64();
        assert!((pi - std::f64::consts::PI).abs() < 1e-15);
        assert!((atan2(&one, &zero).to_f64() - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert!(atan2(&minus_one, &one).to_f64() < 0.0);
    }

    #[test]
    fn pythagorean_identity() {
        let c = ctx();
        let phi = c.parse("0.7").unwrap();
        let check = sin(&phi).sqr() + cos(&phi).sqr() - c.int(1);
        assert!(check.abs() < c.parse("1E-45").unwrap());
    }
}
