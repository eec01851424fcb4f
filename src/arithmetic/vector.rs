//! Planar vectors over [`Real`]
//!
//! `Vector2` is a plain value: the operators produce new vectors, the compound
//! forms (`+=`, `*=`, ...) update in place.
//!
//! Equality is component-wise. Ordering by length is explicit through
//! [`Vector2::cmp_magnitude`], so two antipodal vectors of the same length are
//! neither shorter nor longer than each other while still being unequal.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::real::{Elementary, Precision, Real};

/// `f64` planar vector used for diagnostics and window classification
pub type NVec2 = nalgebra::Vector2<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Vector2 {
    pub x: Real,
    pub y: Real,
}

impl Vector2 {
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    pub fn zeros(ctx: Precision) -> Self {
        Self { x: ctx.zero(), y: ctx.zero() }
    }

    /// Dot product
    pub fn dot(&self, other: &Vector2) -> Real {
        &self.x * &other.x + &self.y * &other.y
    }

    /// Squared length
    pub fn sqr(&self) -> Real {
        self.x.sqr() + self.y.sqr()
    }

    /// Euclidean length
    pub fn norm(&self) -> Real {
        self.sqr().sqrt()
    }

    /// Compare lengths only (|a| < |b| iff a² < b²)
    pub fn cmp_magnitude(&self, other: &Vector2) -> Ordering {
        self.sqr().total_cmp(&other.sqr())
    }

    pub fn shorter_than(&self, other: &Vector2) -> bool {
        self.cmp_magnitude(other) == Ordering::Less
    }

    pub fn longer_than(&self, other: &Vector2) -> bool {
        self.cmp_magnitude(other) == Ordering::Greater
    }

    /// v := v/2, exact
    pub fn halve_mut(&mut self) {
        self.x.halve_mut();
        self.y.halve_mut();
    }

    /// Lossy `f64` projection
    pub fn to_f64(&self) -> NVec2 {
        NVec2::new(self.x.to_f64(), self.y.to_f64())
    }
}

impl Add<&Vector2> for &Vector2 {
    type Output = Vector2;
    fn add(self, rhs: &Vector2) -> Vector2 {
        Vector2::new(&self.x + &rhs.x, &self.y + &rhs.y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, rhs: Vector2) -> Vector2 {
        &self + &rhs
    }
}

impl Sub<&Vector2> for &Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: &Vector2) -> Vector2 {
        Vector2::new(&self.x - &rhs.x, &self.y - &rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: Vector2) -> Vector2 {
        &self - &rhs
    }
}

impl AddAssign<&Vector2> for Vector2 {
    fn add_assign(&mut self, rhs: &Vector2) {
        self.x += &rhs.x;
        self.y += &rhs.y;
    }
}

impl SubAssign<&Vector2> for Vector2 {
    fn sub_assign(&mut self, rhs: &Vector2) {
        self.x -= &rhs.x;
        self.y -= &rhs.y;
    }
}

// scalar on the right
impl Mul<&Real> for &Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: &Real) -> Vector2 {
        Vector2::new(rhs * &self.x, rhs * &self.y)
    }
}

// scalar on the left
impl Mul<&Vector2> for &Real {
    type Output = Vector2;
    fn mul(self, rhs: &Vector2) -> Vector2 {
        rhs * self
    }
}

impl Div<&Real> for &Vector2 {
    type Output = Vector2;
    fn div(self, rhs: &Real) -> Vector2 {
        Vector2::new(&self.x / rhs, &self.y / rhs)
    }
}

impl MulAssign<&Real> for Vector2 {
    fn mul_assign(&mut self, rhs: &Real) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl DivAssign<&Real> for Vector2 {
    fn div_assign(&mut self, rhs: &Real) {
        self.x /= rhs;
        self.y /= rhs;
    }
}

impl Neg for &Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-&self.x, -&self.y)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i64, y: i64) -> Vector2 {
        let c = Precision::default();
        Vector2::new(c.int(x), c.int(y))
    }

    #[test]
    fn algebra() {
        let c = Precision::default();
        let a = v(3, 4);
        let b = v(1, -2);
        assert_eq!(&a + &b, v(4, 2));
        assert_eq!(&a - &b, v(2, 6));
        assert_eq!(&a * &c.int(2), v(6, 8));
        assert_eq!(&c.int(2) * &a, v(6, 8));
        assert_eq!(&v(6, 8) / &c.int(2), a);
        assert_eq!(a.dot(&b), c.int(-5));
        assert_eq!(a.sqr(), c.int(25));
        assert_eq!(a.norm(), c.int(5));
        assert_eq!(-&a, v(-3, -4));
    }

    #[test]
    fn compound_forms_mutate_in_place() {
        let c = Precision::default();
        let mut a = v(1, 1);
        a += &v(2, 3);
        assert_eq!(a, v(3, 4));
        a -= &v(1, 1);
        assert_eq!(a, v(2, 3));
        a *= &c.int(3);
        assert_eq!(a, v(6, 9));
        a /= &c.int(3);
        assert_eq!(a, v(2, 3));
    }

    #[test]
    fn antipodal_vectors_have_equal_magnitude_but_differ() {
        let u = v(3, 4);
        let w = v(-3, -4);
        assert_ne!(u, w);
        assert_eq!(u.cmp_magnitude(&w), Ordering::Equal);
        assert!(!u.shorter_than(&w));
        assert!(!u.longer_than(&w));
        assert!(v(0, 4).shorter_than(&w));
    }
}
