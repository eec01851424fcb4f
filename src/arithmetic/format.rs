//! printf-style rendering of [`Real`] values
//!
//! Formats look like the MPFR ones used throughout the output table:
//! `"%.20Rf"`, `"%5.0Rf; "`, `" %25.20RG"`. A format holds exactly one
//! directive with optional literal text around it. Supported conversions are
//! `f F e E g G`; flags `- + space 0 #`; width; precision; the `R` length
//! modifier and an optional MPFR rounding letter after it (accepted and
//! ignored, rounding is always to nearest).
//!
//! Digits are produced from the exact binary value, so `%.Nf` is exact to the
//! last printed digit (halfway cases round away from zero).

use rug::ops::Pow;
use rug::{Float, Integer, Rational};
use thiserror::Error;

use super::real::Real;

/// Text produced when a format cannot be rendered
pub const ERROR_TEXT: &str = "<error>";

/// Replaces the last character of a rendering that did not fit
pub const TRUNCATION_MARK: char = '*';

/// Largest width or precision a format may ask for
pub const MAX_FIELD: usize = 4096;

const DEFAULT_DIGITS: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("format {0:?} has no conversion directive")]
    MissingDirective(String),

    #[error("format {0:?} has more than one conversion directive")]
    MultipleDirectives(String),

    #[error("unsupported conversion {conversion:?} in format {format:?}")]
    UnsupportedConversion { format: String, conversion: char },

    #[error("format {0:?} ends inside a directive")]
    Unterminated(String),

    #[error("width or precision too large in format {0:?}")]
    Overflow(String),
}

/// Result of a bounded rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// The full rendering was longer than the bound; the last character of
    /// `text` is [`TRUNCATION_MARK`]
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Fixed,
    Scientific,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Directive {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alternate: bool,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
    upper: bool,
}

/// A parsed printf-style format for a single number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    prefix: String,
    directive: Directive,
    suffix: String,
}

impl NumberFormat {
    pub fn parse(format: &str) -> Result<Self, FormatError> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut directive = None;
        let mut chars = format.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                if directive.is_none() {
                    prefix.push(c);
                } else {
                    suffix.push(c);
                }
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                if directive.is_none() {
                    prefix.push('%');
                } else {
                    suffix.push('%');
                }
                continue;
            }
            if directive.is_some() {
                return Err(FormatError::MultipleDirectives(format.to_string()));
            }

            let mut d = Directive {
                left: false,
                plus: false,
                space: false,
                zero: false,
                alternate: false,
                width: 0,
                precision: None,
                conversion: Conversion::Fixed,
                upper: false,
            };

            while let Some(&flag) = chars.peek() {
                match flag {
                    '-' => d.left = true,
                    '+' => d.plus = true,
                    ' ' => d.space = true,
                    '0' => d.zero = true,
                    '#' => d.alternate = true,
                    _ => break,
                }
                chars.next();
            }

            d.width = read_number(&mut chars, format)?;
            if chars.peek() == Some(&'.') {
                chars.next();
                d.precision = Some(read_number(&mut chars, format)?);
            }

            if chars.peek() == Some(&'R') {
                chars.next();
                // optional rounding letter, only when a conversion follows it
                if let Some(&r) = chars.peek() {
                    if "NZUDYA".contains(r) {
                        let mut ahead = chars.clone();
                        ahead.next();
                        if ahead.peek().is_some_and(|c| "fFeEgG".contains(*c)) {
                            chars.next();
                        }
                    }
                }
            }

            let conversion = chars
                .next()
                .ok_or_else(|| FormatError::Unterminated(format.to_string()))?;
            (d.conversion, d.upper) = match conversion {
                'f' => (Conversion::Fixed, false),
                'F' => (Conversion::Fixed, true),
                'e' => (Conversion::Scientific, false),
                'E' => (Conversion::Scientific, true),
                'g' => (Conversion::General, false),
                'G' => (Conversion::General, true),
                other => {
                    return Err(FormatError::UnsupportedConversion {
                        format: format.to_string(),
                        conversion: other,
                    })
                }
            };
            directive = Some(d);
        }

        let directive = directive.ok_or_else(|| FormatError::MissingDirective(format.to_string()))?;
        Ok(Self { prefix, directive, suffix })
    }

    /// Render `value` in full
    pub fn render(&self, value: &Real) -> String {
        let d = &self.directive;
        let negative = value.is_sign_negative() && !value.as_float().is_nan();
        let body = match value.as_float().to_rational() {
            None => non_finite(value, d.upper),
            Some(exact) => {
                let magnitude = exact.abs();
                let digits = match d.conversion {
                    Conversion::Fixed => fixed(&magnitude, d.precision.unwrap_or(DEFAULT_DIGITS), d.alternate),
                    Conversion::Scientific => {
                        scientific(&magnitude, d.precision.unwrap_or(DEFAULT_DIGITS), d.alternate)
                            .map(|(mantissa, exp)| with_exponent(mantissa, exp, d.upper))
                    }
                    Conversion::General => general(&magnitude, d),
                };
                match digits {
                    Some(text) => text,
                    // decimal exponent beyond what a power of ten can hold
                    None => return ERROR_TEXT.to_string(),
                }
            }
        };

        let sign = if negative {
            "-"
        } else if d.plus {
            "+"
        } else if d.space {
            " "
        } else {
            ""
        };

        let len = sign.len() + body.len();
        let field = if d.width <= len {
            format!("{sign}{body}")
        } else if d.left {
            format!("{sign}{body}{}", " ".repeat(d.width - len))
        } else if d.zero && value.is_finite() {
            format!("{sign}{}{body}", "0".repeat(d.width - len))
        } else {
            format!("{}{sign}{body}", " ".repeat(d.width - len))
        };

        format!("{}{}{}", self.prefix, field, self.suffix)
    }

    /// Render `value` into at most `max_chars` characters
    pub fn render_bounded(&self, value: &Real, max_chars: usize) -> Rendered {
        truncate(self.render(value), max_chars)
    }
}

fn read_number<I>(chars: &mut std::iter::Peekable<I>, format: &str) -> Result<usize, FormatError>
where
    I: Iterator<Item = char>,
{
    let mut n: usize = 0;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        n = n
            .checked_mul(10)
            .and_then(|n| n.checked_add(digit as usize))
            .filter(|n| *n <= MAX_FIELD)
            .ok_or_else(|| FormatError::Overflow(format.to_string()))?;
        chars.next();
    }
    Ok(n)
}

fn truncate(text: String, max_chars: usize) -> Rendered {
    if text.chars().count() <= max_chars {
        return Rendered { text, truncated: false };
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    if max_chars > 0 {
        cut.push(TRUNCATION_MARK);
    }
    Rendered { text: cut, truncated: true }
}

fn non_finite(value: &Real, upper: bool) -> String {
    let text = if value.as_float().is_nan() { "nan" } else { "inf" };
    if upper {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}

fn pow10(exp: u32) -> Integer {
    Integer::from(10).pow(exp)
}

/// Nearest integer to `magnitude * 10^shift`, `None` if `|shift|` does not fit a `u32`
fn scaled_digits(magnitude: &Rational, shift: i64) -> Option<Integer> {
    let exp = u32::try_from(shift.unsigned_abs()).ok()?;
    let mut scaled = magnitude.clone();
    let factor = Rational::from(pow10(exp));
    if shift >= 0 {
        scaled *= factor;
    } else {
        scaled /= factor;
    }
    Some(scaled.round().into_numer_denom().0)
}

fn fixed(magnitude: &Rational, digits: usize, alternate: bool) -> Option<String> {
    let n = scaled_digits(magnitude, digits as i64)?.to_string();
    if digits == 0 {
        return Some(if alternate { format!("{n}.") } else { n });
    }
    let padded = format!("{:0>width$}", n, width = digits + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - digits);
    Some(format!("{int_part}.{frac_part}"))
}

/// Mantissa text (`d.ddd`) and decimal exponent
fn scientific(magnitude: &Rational, digits: usize, alternate: bool) -> Option<(String, i64)> {
    if *magnitude == 0 {
        return Some((fixed(magnitude, digits, alternate)?, 0));
    }

    // first guess from the binary exponent, corrected below
    let binary_exp = Float::with_val(64, magnitude).get_exp().unwrap_or(0);
    let mut exp = ((binary_exp as f64 - 1.0) * std::f64::consts::LOG10_2).floor() as i64;

    let lower = pow10(digits as u32);
    let upper = pow10(digits as u32 + 1);
    let mut n = scaled_digits(magnitude, (digits as i64).checked_sub(exp)?)?;
    // the guess is off by at most one decade in either direction
    for _ in 0..4 {
        if n >= upper {
            exp += 1;
        } else if n < lower {
            exp -= 1;
        } else {
            break;
        }
        n = scaled_digits(magnitude, (digits as i64).checked_sub(exp)?)?;
    }

    let text = n.to_string();
    let (lead, rest) = text.split_at(1);
    let mantissa = if digits > 0 || alternate {
        format!("{lead}.{rest}")
    } else {
        lead.to_string()
    };
    Some((mantissa, exp))
}

fn with_exponent(mantissa: String, exp: i64, upper: bool) -> String {
    let e = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exp.unsigned_abs())
}

fn general(magnitude: &Rational, d: &Directive) -> Option<String> {
    let significant = match d.precision.unwrap_or(DEFAULT_DIGITS) {
        0 => 1,
        p => p,
    };
    let (mantissa, exp) = scientific(magnitude, significant - 1, d.alternate)?;

    if (significant as i64) > exp && exp >= -4 {
        let text = fixed(magnitude, (significant as i64 - 1 - exp) as usize, d.alternate)?;
        Some(if d.alternate { text } else { strip_fraction_zeros(text) })
    } else {
        let mantissa = if d.alternate { mantissa } else { strip_fraction_zeros(mantissa) };
        Some(with_exponent(mantissa, exp, d.upper))
    }
}

fn strip_fraction_zeros(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl Real {
    /// Render with a printf-style format, [`ERROR_TEXT`] if the format is invalid
    pub fn render_str(&self, format: &str) -> String {
        match NumberFormat::parse(format) {
            Ok(f) => f.render(self),
            Err(_) => ERROR_TEXT.to_string(),
        }
    }

    /// Render into at most `max_chars` characters
    pub fn render_bounded(&self, format: &str, max_chars: usize) -> Rendered {
        match NumberFormat::parse(format) {
            Ok(f) => f.render_bounded(self, max_chars),
            Err(_) => truncate(ERROR_TEXT.to_string(), max_chars),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::real::Precision;

    fn real(s: &str) -> Real {
        Precision::default().parse(s).unwrap()
    }

    #[test]
    fn fixed_point() {
        assert_eq!(real("12.34").render_str("%.20Rf"), "12.34000000000000000000");
        assert_eq!(real("-1").render_str("%.3Rf"), "-1.000");
        assert_eq!(real("0.0006").render_str("%.3Rf"), "0.001");
        assert_eq!(real("2.5").render_str("%.0Rf"), "3");
        assert_eq!(real("7").render_str("%5.0Rf; "), "    7; ");
        assert_eq!(real("42").render_str("; %.1Rf"), "; 42.0");
        assert_eq!(real("3.14159").render_str("%-8.2Rf|"), "3.14    |");
        assert_eq!(real("3.14159").render_str("%08.2Rf"), "00003.14");
        assert_eq!(real("3").render_str("%+.1Rf"), "+3.0");
        assert_eq!(real("3").render_str("% .1Rf"), " 3.0");
        assert_eq!(real("3").render_str("%#.0Rf"), "3.");
    }

    #[test]
    fn scientific() {
        assert_eq!(real("1.32712440018E+20").render_str("%.5Re"), "1.32712e+20");
        assert_eq!(real("0.00012345").render_str("%.2RE"), "1.23E-04");
        assert_eq!(real("9.999").render_str("%.2Re"), "1.00e+01");
        assert_eq!(real("0").render_str("%.2Re"), "0.00e+00");
        assert_eq!(real("-5").render_str("%.0Re"), "-5e+00");
    }

    #[test]
    fn general() {
        assert_eq!(real("100000").render_str("%Rg"), "100000");
        assert_eq!(real("1000000").render_str("%Rg"), "1e+06");
        assert_eq!(real("0.0001").render_str("%Rg"), "0.0001");
        assert_eq!(real("0.00001").render_str("%RG"), "1E-05");
        assert_eq!(real("1.5").render_str("%.3Rg"), "1.5");
        assert_eq!(real("1.5").render_str("%#.3Rg"), "1.50");
    }

    #[test]
    fn rounding_letter_and_percent_literal() {
        assert_eq!(real("1.25").render_str("%.1RNf%%"), "1.3%");
        assert_eq!(real("1").render_str("%.1RF"), "1.0");
    }

    #[test]
    fn non_finite_values() {
        let c = Precision::default();
        let mut inf = c.zero();
        inf.inv_mut();
        assert_eq!(inf.render_str("%.2Rf"), "inf");
        assert_eq!((-inf).render_str("%6.2RF"), "  -INF");
    }

    #[test]
    fn invalid_formats_degrade_to_error_text() {
        assert_eq!(real("1").render_str("no directive"), ERROR_TEXT);
        assert_eq!(real("1").render_str("%d"), ERROR_TEXT);
        assert_eq!(real("1").render_str("%f %f"), ERROR_TEXT);
        assert_eq!(real("1").render_str("%.2"), ERROR_TEXT);
        assert!(matches!(
            NumberFormat::parse("%Rq"),
            Err(FormatError::UnsupportedConversion { conversion: 'q', .. })
        ));
    }

    #[test]
    fn oversized_fields_are_rejected() {
        assert!(NumberFormat::parse("%.4096Rf").is_ok());
        assert!(matches!(NumberFormat::parse("%.4097Rf"), Err(FormatError::Overflow(_))));
        assert!(matches!(NumberFormat::parse("%5000Rf"), Err(FormatError::Overflow(_))));
        assert!(matches!(NumberFormat::parse("%.4294967295Rf"), Err(FormatError::Overflow(_))));
        assert_eq!(real("1").render_str("%.99999999999Rf"), ERROR_TEXT);
    }

    #[test]
    fn shift_beyond_u32_is_an_error_not_a_wrap() {
        let third = Rational::from((1, 3));
        assert!(scaled_digits(&third, i64::from(u32::MAX) + 1).is_none());
        assert!(scaled_digits(&third, -(i64::from(u32::MAX) + 1)).is_none());
        assert_eq!(scaled_digits(&third, 3), Some(Integer::from(333)));
    }

    #[test]
    fn bounded_rendering_marks_truncation() {
        let value = real("12.34");
        let full = value.render_bounded("%.4Rf", 16);
        assert_eq!(full, Rendered { text: "12.3400".to_string(), truncated: false });

        let cut = value.render_bounded("%.4Rf", 5);
        assert_eq!(cut.text, "12.3*");
        assert!(cut.truncated);

        let exact = value.render_bounded("%.4Rf", 7);
        assert!(!exact.truncated);

        assert_eq!(value.render_bounded("%.4Rf", 0).text, "");
    }
}
