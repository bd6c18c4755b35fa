//! printf-style float patterns.
//!
//! Supports `%[flags][width][.precision]verb` with flags `-`, `+`, ` `, `0`
//! and verbs `f F e E g G` (`v` behaves as `g`). A pattern holds exactly one
//! verb; any other text, including `%%`, is copied literally. Exponents are
//! written with a sign and at least two digits (`1.5e+06`).

use std::iter::Peekable;
use std::str::Chars;

/// Render `value` through `pattern`, or `None` when the pattern is unusable.
pub(crate) fn format_float(pattern: &str, value: f64) -> Option<String> {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut chars = pattern.chars().peekable();
    let mut verbs = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        let spec = Spec::parse(&mut chars)?;
        out.push_str(&spec.render(value));
        verbs += 1;
    }

    (verbs == 1).then_some(out)
}

#[derive(Debug, Default)]
struct Spec {
    minus: bool,
    plus: bool,
    space: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
    verb: char,
}

impl Spec {
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Option<Self> {
        let mut spec = Self::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '0' => spec.zero = true,
                '#' => {}
                _ => break,
            }
            chars.next();
        }

        spec.width = read_number(chars).unwrap_or(0);
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(read_number(chars).unwrap_or(0));
        }

        spec.verb = match chars.next()? {
            verb @ ('f' | 'F' | 'e' | 'E' | 'g' | 'G') => verb,
            'v' => 'g',
            _ => return None,
        };
        Some(spec)
    }

    fn render(&self, value: f64) -> String {
        let finite = value.is_finite();
        let body = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            "Inf".to_string()
        } else {
            let abs = value.abs();
            match self.verb {
                'e' | 'E' => exponent(abs, self.precision.unwrap_or(6), self.verb == 'E'),
                'g' | 'G' => general(abs, self.precision, self.verb == 'G'),
                _ => format!("{abs:.prec$}", prec = self.precision.unwrap_or(6)),
            }
        };

        let sign = if value.is_sign_negative() && !value.is_nan() {
            "-"
        } else if self.plus || value.is_infinite() {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        };

        let len = sign.len() + body.len();
        if self.width <= len {
            return format!("{sign}{body}");
        }
        let pad = self.width - len;
        if self.minus {
            format!("{sign}{body}{}", " ".repeat(pad))
        } else if self.zero && finite {
            format!("{sign}{}{body}", "0".repeat(pad))
        } else {
            format!("{}{sign}{body}", " ".repeat(pad))
        }
    }
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut number: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        number = Some(
            number
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit as usize),
        );
    }
    number
}

/// Decimal digits of a non-negative value, trailing zeros trimmed, with the
/// position of the decimal point: `value = 0.d1d2d3... * 10^point`.
fn digits(abs: f64, significant: Option<usize>) -> (Vec<u8>, i32) {
    if abs == 0.0 {
        return (Vec::new(), 0);
    }
    let text = match significant {
        Some(n) => format!("{abs:.prec$e}", prec = n.max(1) - 1),
        None => format!("{abs:e}"),
    };
    let (mantissa, exp) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let mut digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    while digits.len() > 1 && digits.last() == Some(&b'0') {
        digits.pop();
    }
    (digits, exp + 1)
}

fn exponent(abs: f64, precision: usize, upper: bool) -> String {
    let (digits, point) = digits(abs, Some(precision + 1));
    exponent_from(&digits, point, precision, upper)
}

fn exponent_from(digits: &[u8], point: i32, precision: usize, upper: bool) -> String {
    let mut out = String::new();
    out.push(digits.first().map_or('0', |&d| d as char));
    if precision > 0 {
        out.push('.');
        for i in 1..=precision {
            out.push(digits.get(i).map_or('0', |&d| d as char));
        }
    }
    let exp = if digits.is_empty() { 0 } else { point - 1 };
    out.push(if upper { 'E' } else { 'e' });
    out.push(if exp < 0 { '-' } else { '+' });
    out.push_str(&format!("{:02}", exp.unsigned_abs()));
    out
}

fn fixed_from(digits: &[u8], point: i32, precision: usize) -> String {
    let digit_at = |i: i32| -> char {
        if i < 0 {
            return '0';
        }
        digits.get(i as usize).map_or('0', |&d| d as char)
    };

    let mut out = String::new();
    if point > 0 {
        for i in 0..point {
            out.push(digit_at(i));
        }
    } else {
        out.push('0');
    }
    if precision > 0 {
        out.push('.');
        for i in 0..precision as i32 {
            out.push(digit_at(point + i));
        }
    }
    out
}

/// `%g`: exponent form for very small or large exponents, fixed otherwise.
fn general(abs: f64, precision: Option<usize>, upper: bool) -> String {
    let precision = precision.map(|p| p.max(1));
    let (digits, point) = digits(abs, precision);
    let count = digits.len() as i32;
    let mut prec = precision.map_or(count, |p| p as i32);

    let mut eprec = prec;
    if eprec > count && count >= point {
        eprec = count;
    }
    if precision.is_none() {
        eprec = 6;
    }

    let exp = point - 1;
    if exp < -4 || exp >= eprec {
        if prec > count {
            prec = count;
        }
        return exponent_from(&digits, point, (prec - 1).max(0) as usize, upper);
    }
    if prec > point {
        prec = count;
    }
    fixed_from(&digits, point, (prec - point).max(0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(pattern: &str, value: f64) -> String {
        format_float(pattern, value).unwrap()
    }

    #[test]
    fn test_fixed_width_and_precision() {
        assert_eq!(fmt("%9.2f", 1234567890.1234567), "1234567890.12");
        assert_eq!(fmt("%9.2f", 3.14159), "     3.14");
        assert_eq!(fmt("%-8.2f|", 2.5), "2.50    |");
        assert_eq!(fmt("%08.3f", -3.14159), "-003.142");
        assert_eq!(fmt("%+.1f", 2.0), "+2.0");
        assert_eq!(fmt("%f", 1.5), "1.500000");
        assert_eq!(fmt("%.0f", 2.5), "2");
    }

    #[test]
    fn test_exponent() {
        assert_eq!(fmt("%.3e", 1234.5678), "1.235e+03");
        assert_eq!(fmt("%E", 0.00012), "1.200000E-04");
        assert_eq!(fmt("%.2e", 0.0), "0.00e+00");
    }

    #[test]
    fn test_general() {
        assert_eq!(fmt("%g", 100000.0), "100000");
        assert_eq!(fmt("%g", 1e6), "1e+06");
        assert_eq!(fmt("%g", 0.5), "0.5");
        assert_eq!(fmt("%g", 0.0), "0");
        assert_eq!(fmt("%g", 1e-5), "1e-05");
        assert_eq!(fmt("%.3g", 1234.5678), "1.23e+03");
        assert_eq!(fmt("%.3g", 0.0001234), "0.000123");
        assert_eq!(fmt("%G", 1e21), "1E+21");
    }

    #[test]
    fn test_literal_text_and_specials() {
        assert_eq!(fmt("$%.2f", 9.5), "$9.50");
        assert_eq!(fmt("%.1f%%", 42.0), "42.0%");
        assert_eq!(fmt("%f", f64::NAN), "NaN");
        assert_eq!(fmt("%5.1f", f64::INFINITY), " +Inf");
        assert_eq!(fmt("%f", f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_unusable_patterns() {
        assert!(format_float("%d", 1.0).is_none());
        assert!(format_float("no verb", 1.0).is_none());
        assert!(format_float("%f %f", 1.0).is_none());
        assert!(format_float("%.2", 1.0).is_none());
    }
}
