use std::fmt;

use crate::v4l2::videodev::v4l2_fract;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Fraction used for timing settings
///
/// Frame rates (frames per second) and frame intervals (seconds per frame) are both expressed
/// as fractions; one is the [`inverse`](Fraction::inverse) of the other.
pub struct Fraction {
    pub numerator: u32,
    pub denominator: u32,
}

impl Fraction {
    /// Returns a fraction representation
    ///
    /// # Arguments
    ///
    /// * `num` - Numerator
    /// * `denom` - Denominator
    ///
    /// # Example
    ///
    /// ```
    /// use omt_capture::Fraction;
    /// let frac = Fraction::new(30, 1);
    /// ```
    pub const fn new(num: u32, denom: u32) -> Self {
        Fraction {
            numerator: num,
            denominator: denom,
        }
    }

    /// Swaps numerator and denominator
    ///
    /// A rate of 60000/1000 frames per second becomes an interval of 1000/60000 seconds.
    pub const fn inverse(self) -> Self {
        Fraction::new(self.denominator, self.numerator)
    }

    /// Whether both terms are non-zero
    pub const fn is_valid(&self) -> bool {
        self.numerator != 0 && self.denominator != 0
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl From<v4l2_fract> for Fraction {
    fn from(frac: v4l2_fract) -> Self {
        Self {
            numerator: frac.numerator,
            denominator: frac.denominator,
        }
    }
}

impl From<Fraction> for v4l2_fract {
    fn from(fraction: Fraction) -> Self {
        Self {
            numerator: fraction.numerator,
            denominator: fraction.denominator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_to_interval_and_back() {
        let rate = Fraction::new(60000, 1000);
        let interval: v4l2_fract = rate.inverse().into();
        assert_eq!(interval.numerator, 1000);
        assert_eq!(interval.denominator, 60000);

        let read_back = Fraction::from(interval).inverse();
        assert_eq!(read_back, rate);
    }

    #[test]
    fn display_and_validity() {
        assert_eq!(Fraction::new(30000, 1001).to_string(), "30000/1001");
        assert!(Fraction::new(60000, 1000).is_valid());
        assert!(!Fraction::new(0, 1).is_valid());
    }
}
