//! Immutable 2D value used for positions, sizes and speeds.
//!
//! Every operation returns a fresh value; nothing mutates in place.

use std::ops::{Add, Mul};

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };
    pub const ONE: Vector = Vector { x: 1.0, y: 1.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Vector { x, y }
    }

    /// Component-wise sum.
    #[inline]
    pub fn plus(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }

    /// Both components scaled by the same factor.
    #[inline]
    pub fn times(self, factor: f64) -> Vector {
        Vector::new(factor * self.x, factor * self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        self.plus(rhs)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        self.times(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plus_adds_components() {
        let v = Vector::new(1.0, 2.0).plus(Vector::new(3.0, -5.0));
        assert_eq!(v, Vector::new(4.0, -3.0));
    }

    #[test]
    fn times_scales_both_components() {
        assert_eq!(Vector::new(2.0, -3.0).times(-1.0), Vector::new(-2.0, 3.0));
        assert_eq!(Vector::new(2.0, 3.0).times(0.0), Vector::ZERO);
    }

    #[test]
    fn operators_match_methods() {
        let a = Vector::new(0.5, 1.5);
        let b = Vector::new(2.0, 0.25);
        assert_eq!(a + b, a.plus(b));
        assert_eq!(a * 4.0, a.times(4.0));
    }

    #[test]
    fn operands_are_left_untouched() {
        let a = Vector::new(1.0, 1.0);
        let _ = a.plus(Vector::ONE);
        let _ = a.times(10.0);
        assert_eq!(a, Vector::new(1.0, 1.0));
    }

    proptest! {
        #[test]
        fn plus_is_componentwise(ax in -1e6f64..1e6, ay in -1e6f64..1e6,
                                 bx in -1e6f64..1e6, by in -1e6f64..1e6) {
            let s = Vector::new(ax, ay).plus(Vector::new(bx, by));
            prop_assert_eq!(s, Vector::new(ax + bx, ay + by));
        }

        #[test]
        fn times_is_componentwise(x in -1e6f64..1e6, y in -1e6f64..1e6, k in -1e3f64..1e3) {
            prop_assert_eq!(Vector::new(x, y).times(k), Vector::new(k * x, k * y));
        }
    }
}
