//! Numeric value kinds beyond plain doubles: decimals, complex numbers, units
//!
//! Only construction, comparison and zero tests live here. Arithmetic on
//! these kinds belongs to the dispatch table's providers.

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use crate::error::ExprError;

/// Zeros written out in plain notation before switching to an exponent.
const PLAIN_ZEROS: i64 = 21;

/// An arbitrary-precision decimal stored as `mantissa * 10^-scale`.
///
/// Values are normalized on construction (no trailing zeros in the
/// mantissa), so `1.50`, `1.5` and `15e-1` compare equal. A negative scale
/// stands for trailing integer zeros: `1e39` is mantissa 1, scale -39.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigNumber {
    mantissa: BigInt,
    scale: i64,
}

impl BigNumber {
    /// Create a decimal from a mantissa and a scale.
    pub fn new(mantissa: impl Into<BigInt>, scale: i64) -> Self {
        let mut mantissa = mantissa.into();
        if mantissa.is_zero() {
            return Self { mantissa, scale: 0 };
        }
        let ten = BigInt::from(10u8);
        let mut scale = scale;
        while (&mantissa % &ten).is_zero() {
            let Some(next) = scale.checked_sub(1) else {
                break;
            };
            mantissa = &mantissa / &ten;
            scale = next;
        }
        Self { mantissa, scale }
    }

    /// Check whether the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// The unscaled digits.
    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// Number of fractional digits; negative for trailing integer zeros.
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Lossy conversion to a double. Out-of-range magnitudes saturate to
    /// infinity or zero.
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.mantissa, -i128::from(self.scale))
            .parse()
            .unwrap_or(f64::NAN)
    }
}

impl From<i64> for BigNumber {
    fn from(n: i64) -> Self {
        BigNumber::new(n, 0)
    }
}

impl FromStr for BigNumber {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ExprError::invalid_argument(format!("invalid BigNumber literal \"{}\"", s));

        let trimmed = s.trim();
        let (mantissa_part, exponent) = match trimmed.find(['e', 'E']) {
            Some(idx) => {
                let exp: i128 = trimmed[idx + 1..].parse().map_err(|_| invalid())?;
                (&trimmed[..idx], exp)
            }
            None => (trimmed, 0),
        };

        let (negative, digits) = match mantissa_part.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa_part.strip_prefix('+').unwrap_or(mantissa_part)),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let all_digits = format!("{}{}", int_part, frac_part);
        let magnitude: BigInt = all_digits.parse().map_err(|_| invalid())?;
        let scale = i128::try_from(frac_part.len())
            .ok()
            .and_then(|len| len.checked_sub(exponent))
            .and_then(|scale| i64::try_from(scale).ok())
            .ok_or_else(invalid)?;

        Ok(BigNumber::new(if negative { -magnitude } else { magnitude }, scale))
    }
}

impl fmt::Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mantissa.sign() == Sign::Minus { "-" } else { "" };
        let digits = self.mantissa.magnitude().to_string();
        let len = digits.len() as i64;

        if self.scale < -PLAIN_ZEROS || self.scale > len + PLAIN_ZEROS {
            return write!(f, "{}{}e{}", sign, digits, -i128::from(self.scale));
        }
        if self.scale <= 0 {
            let zeros = "0".repeat(self.scale.unsigned_abs() as usize);
            return write!(f, "{}{}{}", sign, digits, zeros);
        }
        if len > self.scale {
            let (int_part, frac_part) = digits.split_at((len - self.scale) as usize);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        } else {
            let zeros = "0".repeat((self.scale - len) as usize);
            write!(f, "{}0.{}{}", sign, zeros, digits)
        }
    }
}

/// A complex number with double precision parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    /// Real part
    pub re: f64,
    /// Imaginary part
    pub im: f64,
}

impl Complex {
    /// Create a complex number.
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im == 0.0 {
            write!(f, "{}", self.re)
        } else if self.re == 0.0 {
            write!(f, "{}i", self.im)
        } else if self.im < 0.0 {
            write!(f, "{} - {}i", self.re, -self.im)
        } else {
            write!(f, "{} + {}i", self.re, self.im)
        }
    }
}

/// A quantity with a physical unit, e.g. `5 cm`.
///
/// A unit without a magnitude (plain `cm`) has `value == None`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitValue {
    /// Numeric magnitude, if any
    pub value: Option<f64>,
    /// Unit name
    pub unit: String,
}

impl UnitValue {
    /// Create a unit with a magnitude.
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            unit: unit.into(),
        }
    }

    /// Create a bare unit without magnitude.
    pub fn bare(unit: impl Into<String>) -> Self {
        Self {
            value: None,
            unit: unit.into(),
        }
    }
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{} {}", v, self.unit),
            None => write!(f, "{}", self.unit),
        }
    }
}
