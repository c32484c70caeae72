//! Exact base-10 numbers held as scaled integers.
//!
//! Rule verdicts compare `f64` readings; arithmetic claims restate the same
//! equations with these so a claim can be rechecked without float rounding.

use std::cmp::Ordering;
use std::fmt;

/// Finest scale kept. `10^MAX_SCALE` leaves headroom in `i128` for sums.
const MAX_SCALE: u32 = 30;

fn pow10(exp: u32) -> Option<i128> {
    10i128.checked_pow(exp)
}

/// `units × 10^(-scale)`, always stored without trailing zeros so equal values compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExactDecimal {
    units: i128,
    scale: u32,
}

impl ExactDecimal {
    pub const ZERO: ExactDecimal = ExactDecimal { units: 0, scale: 0 };

    /// Parse plain or exponent notation (`-1250.50`, `1e-7`, `2.5E+3`).
    ///
    /// Thousands separators must already be stripped. Returns `None` for anything else,
    /// or for values finer than the supported scale or too large to hold.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (mantissa, exponent) = match text.find(['e', 'E']) {
            Some(at) => (&text[..at], text[at + 1..].parse::<i64>().ok()?),
            None => (text, 0),
        };
        let (negative, digits) = match mantissa.as_bytes().first()? {
            b'-' => (true, &mantissa[1..]),
            b'+' => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let frac_part = frac_part.trim_end_matches('0');

        let mut units: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            units = units.checked_mul(10)?.checked_add(i128::from(b - b'0'))?;
        }
        if negative {
            units = -units;
        }

        let scale = i64::try_from(frac_part.len()).ok()?.checked_sub(exponent)?;
        if scale < 0 {
            let widen = pow10(u32::try_from(scale.checked_neg()?).ok()?)?;
            return Some(ExactDecimal {
                units: units.checked_mul(widen)?,
                scale: 0,
            });
        }
        ExactDecimal {
            units,
            scale: u32::try_from(scale).ok()?,
        }
        .normalized()
        .bounded()
    }

    /// `0.5 × 10^(-decimals)`, the rounding half unit of a fact.
    pub fn half_unit(decimals: i32) -> Option<Self> {
        // 0.5 × 10^(-d) = 5 × 10^(-(d + 1))
        let scale = i64::from(decimals) + 1;
        if scale >= 0 {
            ExactDecimal {
                units: 5,
                scale: u32::try_from(scale).ok()?,
            }
            .bounded()
        } else {
            let widen = pow10(u32::try_from(-scale).ok()?)?;
            Some(ExactDecimal {
                units: 5i128.checked_mul(widen)?,
                scale: 0,
            })
        }
    }

    pub fn is_negative(self) -> bool {
        self.units < 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        let scale = self.scale.max(other.scale);
        let units = self.rescaled(scale)?.checked_add(other.rescaled(scale)?)?;
        Some(ExactDecimal { units, scale }.normalized())
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        let scale = self.scale.max(other.scale);
        let units = self.rescaled(scale)?.checked_sub(other.rescaled(scale)?)?;
        Some(ExactDecimal { units, scale }.normalized())
    }

    pub fn checked_abs(self) -> Option<Self> {
        Some(ExactDecimal {
            units: self.units.checked_abs()?,
            scale: self.scale,
        })
    }

    pub fn checked_cmp(self, other: Self) -> Option<Ordering> {
        let scale = self.scale.max(other.scale);
        Some(self.rescaled(scale)?.cmp(&other.rescaled(scale)?))
    }

    fn rescaled(self, scale: u32) -> Option<i128> {
        self.units.checked_mul(pow10(scale.checked_sub(self.scale)?)?)
    }

    fn normalized(mut self) -> Self {
        if self.units == 0 {
            return Self::ZERO;
        }
        while self.scale > 0 && self.units % 10 == 0 {
            self.units /= 10;
            self.scale -= 1;
        }
        self
    }

    fn bounded(self) -> Option<Self> {
        (self.scale <= MAX_SCALE).then_some(self)
    }
}

impl fmt::Display for ExactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let digits = self.units.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> ExactDecimal {
        ExactDecimal::parse(text).unwrap()
    }

    #[test]
    fn parses_plain_and_exponent_forms() {
        assert_eq!(d("1250.50").to_string(), "1250.5");
        assert_eq!(d("-0.07").to_string(), "-0.07");
        assert_eq!(d("+3").to_string(), "3");
        assert_eq!(d(".5").to_string(), "0.5");
        assert_eq!(d("1e-7").to_string(), "0.0000001");
        assert_eq!(d("2.5E+3").to_string(), "2500");
        assert_eq!(d("1e21").to_string(), "1000000000000000000000");
        assert_eq!(d("-0").to_string(), "0");
    }

    #[test]
    fn rejects_non_numbers() {
        for bad in ["", "-", ".", "1.2.3", "1,000", "NaN", "inf", "12abc", "1e", "1e400000"] {
            assert_eq!(ExactDecimal::parse(bad), None, "{bad}");
        }
    }

    #[test]
    fn equal_values_compare_equal_whatever_the_spelling() {
        assert_eq!(d("1.10"), d("1.1"));
        assert_eq!(d("100"), d("1e2"));
        assert_eq!(d("0.0"), ExactDecimal::ZERO);
    }

    #[test]
    fn sums_are_exact_where_floats_drift() {
        let lhs = d("1.1");
        let rhs = d("0.7").checked_add(d("0.3")).unwrap();
        assert_eq!(rhs, d("1"));
        let diff = lhs.checked_sub(rhs).unwrap().checked_abs().unwrap();
        assert_eq!(diff.to_string(), "0.1");
        assert_eq!(d("-4").checked_abs().unwrap(), d("4"));
    }

    #[test]
    fn half_units_follow_decimals() {
        assert_eq!(ExactDecimal::half_unit(0).unwrap().to_string(), "0.5");
        assert_eq!(ExactDecimal::half_unit(2).unwrap().to_string(), "0.005");
        assert_eq!(ExactDecimal::half_unit(-3).unwrap().to_string(), "500");
        assert_eq!(ExactDecimal::half_unit(i32::MIN), None);
        assert_eq!(ExactDecimal::half_unit(i32::MAX), None);
    }

    #[test]
    fn comparison_aligns_scales() {
        assert_eq!(d("1").checked_cmp(d("0.5")), Some(Ordering::Greater));
        assert_eq!(d("0.50").checked_cmp(d("0.5")), Some(Ordering::Equal));
        assert_eq!(d("-2").checked_cmp(d("0.001")), Some(Ordering::Less));
    }
}
