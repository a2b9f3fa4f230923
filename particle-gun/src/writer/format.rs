use std::fmt::{Display, Formatter, Result};

/// Number of digits after the decimal point for every floating-point field.
pub(super) const PRECISION: usize = 16;

/// Formats a float as C's `%.16e` does: the exponent always carries a sign
/// and at least two digits, e.g. `1.2500000000000000e+02`.
pub(super) struct Scientific(pub(super) f64);

impl Display for Scientific {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let value = self.0;
        if value.is_nan() {
            return f.write_str("nan");
        }
        if value.is_infinite() {
            return f.write_str(if value < 0.0 { "-inf" } else { "inf" });
        }
        let formatted = format!("{:.*e}", PRECISION, value);
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let exponent: i32 = exponent.parse().unwrap_or_default();
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{mantissa}e{sign}{:02}", exponent.abs())
    }
}
