//! Pointwise value operators.
//!
//! Operators are plain enums matched once per element; the generic
//! `operate*` methods on [`TimeSeries`](crate::TimeSeries) also accept any
//! closure, so custom operations monomorphize the same way.
//!
//! `Minimum` and `Maximum` propagate NaN: if either operand is NaN the
//! result is NaN, unlike [`f64::min`] / [`f64::max`].

use pts_core::Real;

/// Operator combining two values that share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`
    Divide,
    /// `a` raised to `b`
    Power,
    /// Smaller of the two (NaN-propagating).
    Minimum,
    /// Larger of the two (NaN-propagating).
    Maximum,
    /// `(a + b) / 2`
    Average,
    /// Keep the left operand.
    FirstValue,
    /// Keep the right operand.
    SecondValue,
}

impl BinaryOperator {
    /// Apply the operator.
    #[inline]
    pub fn apply(self, a: Real, b: Real) -> Real {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => a / b,
            Self::Power => a.powf(b),
            Self::Minimum => {
                if a.is_nan() || b.is_nan() {
                    Real::NAN
                } else {
                    a.min(b)
                }
            }
            Self::Maximum => {
                if a.is_nan() || b.is_nan() {
                    Real::NAN
                } else {
                    a.max(b)
                }
            }
            Self::Average => (a + b) / 2.0,
            Self::FirstValue => a,
            Self::SecondValue => b,
        }
    }
}

/// Operator transforming a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `-a`
    Negate,
    /// `1 / a`
    Reciprocal,
    /// Natural logarithm.
    Log,
    /// Base-10 logarithm.
    Log10,
    /// Absolute value.
    Abs,
}

impl UnaryOperator {
    /// Apply the operator.
    #[inline]
    pub fn apply(self, a: Real) -> Real {
        match self {
            Self::Negate => -a,
            Self::Reciprocal => 1.0 / a,
            Self::Log => a.ln(),
            Self::Log10 => a.log10(),
            Self::Abs => a.abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn arithmetic() {
        assert_eq!(BinaryOperator::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(BinaryOperator::Subtract.apply(2.0, 3.0), -1.0);
        assert_eq!(BinaryOperator::Multiply.apply(2.0, 3.0), 6.0);
        assert_relative_eq!(BinaryOperator::Divide.apply(2.0, 3.0), 2.0 / 3.0);
        assert_relative_eq!(BinaryOperator::Power.apply(2.0, 0.5), std::f64::consts::SQRT_2);
        assert_eq!(BinaryOperator::Average.apply(2.0, 3.0), 2.5);
    }

    #[test]
    fn selectors() {
        assert_eq!(BinaryOperator::FirstValue.apply(1.0, 2.0), 1.0);
        assert_eq!(BinaryOperator::SecondValue.apply(1.0, 2.0), 2.0);
        assert_eq!(BinaryOperator::Minimum.apply(1.0, 2.0), 1.0);
        assert_eq!(BinaryOperator::Maximum.apply(1.0, 2.0), 2.0);
    }

    #[test]
    fn min_max_propagate_nan() {
        assert!(BinaryOperator::Minimum.apply(Real::NAN, 2.0).is_nan());
        assert!(BinaryOperator::Maximum.apply(1.0, Real::NAN).is_nan());
    }

    #[test]
    fn unary() {
        assert_eq!(UnaryOperator::Negate.apply(2.0), -2.0);
        assert_eq!(UnaryOperator::Reciprocal.apply(4.0), 0.25);
        assert_relative_eq!(UnaryOperator::Log.apply(std::f64::consts::E), 1.0);
        assert_relative_eq!(UnaryOperator::Log10.apply(1000.0), 3.0);
        assert_eq!(UnaryOperator::Abs.apply(-3.5), 3.5);
    }
}
