//! Number parsing for string-encoded wire scalars.
//!
//! Integers use literal-style base detection: `0x`/`0X` hex, `0o`/`0O` and a
//! bare leading `0` octal, `0b`/`0B` binary, decimal otherwise. Underscores
//! may separate digits (`1_000`, `0x_ff`).
//!
//! Floats are decimal, `inf`/`infinity`/`nan`, or hexadecimal with a
//! mandatory binary exponent (`0x1.8p1`). Hex literals are rounded straight
//! to the target width.

use crate::error::ParseFailure;

/// Parse a signed 64-bit integer. Accepts an optional `+` or `-`.
pub(crate) fn parse_int(text: &str) -> Result<i64, ParseFailure> {
    let (negative, magnitude) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let n = parse_uint(magnitude)?;
    let cutoff = 1u64 << 63;
    if negative {
        if n > cutoff {
            return Err(ParseFailure::Range);
        }
        // n == cutoff is i64::MIN
        Ok((n as i64).wrapping_neg())
    } else {
        if n >= cutoff {
            return Err(ParseFailure::Range);
        }
        Ok(n as i64)
    }
}

/// Parse an unsigned 64-bit integer. No sign is accepted.
pub(crate) fn parse_uint(text: &str) -> Result<u64, ParseFailure> {
    if text.is_empty() {
        return Err(ParseFailure::Syntax);
    }
    if text.contains('_') && !underscores_ok(text) {
        return Err(ParseFailure::Syntax);
    }
    let (radix, digits) = split_radix(text);

    let mut n: u64 = 0;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let d = c.to_digit(radix).ok_or(ParseFailure::Syntax)?;
        n = n
            .checked_mul(u64::from(radix))
            .and_then(|n| n.checked_add(u64::from(d)))
            .ok_or(ParseFailure::Range)?;
    }
    Ok(n)
}

/// Parse a float at 64-bit precision.
pub(crate) fn parse_f64(text: &str) -> Result<f64, ParseFailure> {
    let literal = float_literal(text)?;
    if let Some(hex) = HexFloat::read(&literal)? {
        return hex.to_bits(&F64_LAYOUT).map(f64::from_bits);
    }
    reject_signed_nan(&literal)?;
    let v: f64 = literal.parse().map_err(|_| ParseFailure::Syntax)?;
    if v.is_infinite() && !is_infinity(text) {
        return Err(ParseFailure::Range);
    }
    Ok(v)
}

/// Parse a float at 32-bit precision. Literals beyond `f32::MAX` are a
/// range failure even when they would fit an `f64`.
pub(crate) fn parse_f32(text: &str) -> Result<f32, ParseFailure> {
    let literal = float_literal(text)?;
    if let Some(hex) = HexFloat::read(&literal)? {
        return hex.to_bits(&F32_LAYOUT).map(|bits| f32::from_bits(bits as u32));
    }
    reject_signed_nan(&literal)?;
    let v: f32 = literal.parse().map_err(|_| ParseFailure::Syntax)?;
    if v.is_infinite() && !is_infinity(text) {
        return Err(ParseFailure::Range);
    }
    Ok(v)
}

fn reject_signed_nan(literal: &str) -> Result<(), ParseFailure> {
    match literal.strip_prefix(['+', '-']) {
        Some(rest) if rest.eq_ignore_ascii_case("nan") => Err(ParseFailure::Syntax),
        _ => Ok(()),
    }
}

/// Bit layout of an IEEE 754 binary format.
struct FloatLayout {
    mant_bits: u32,
    exp_bits: u32,
    bias: i64,
}

const F64_LAYOUT: FloatLayout = FloatLayout {
    mant_bits: 52,
    exp_bits: 11,
    bias: -1023,
};

const F32_LAYOUT: FloatLayout = FloatLayout {
    mant_bits: 23,
    exp_bits: 8,
    bias: -127,
};

/// Hex digits kept in the mantissa; later nonzero digits only set `truncated`.
const HEX_MANT_DIGITS: u32 = 16;

/// A hexadecimal float literal read as `mantissa * 2^exp`.
#[derive(Debug)]
struct HexFloat {
    negative: bool,
    mantissa: u64,
    exp: i64,
    truncated: bool,
}

impl HexFloat {
    /// `Ok(None)` when `text` has no `0x` prefix. Underscores must already be
    /// stripped.
    fn read(text: &str) -> Result<Option<Self>, ParseFailure> {
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let bytes = unsigned.as_bytes();
        if bytes.len() < 3 || bytes[0] != b'0' || bytes[1].to_ascii_lowercase() != b'x' {
            return Ok(None);
        }
        let (digits, exponent) = unsigned[2..]
            .split_once(['p', 'P'])
            .ok_or(ParseFailure::Syntax)?;

        let mut mantissa = 0u64;
        let mut kept = 0u32;
        let mut significant = 0i64;
        let mut point = None;
        // Leading zeros shift the point left instead of counting as digits.
        let mut leading_zeros = 0i64;
        let mut truncated = false;
        let mut saw_digit = false;
        for c in digits.chars() {
            if c == '.' {
                if point.is_some() {
                    return Err(ParseFailure::Syntax);
                }
                point = Some(significant);
                leading_zeros = 0;
                continue;
            }
            let d = c.to_digit(16).ok_or(ParseFailure::Syntax)?;
            saw_digit = true;
            if d == 0 && significant == 0 {
                leading_zeros += 1;
                continue;
            }
            significant += 1;
            if kept < HEX_MANT_DIGITS {
                mantissa = mantissa * 16 + u64::from(d);
                kept += 1;
            } else if d != 0 {
                truncated = true;
            }
        }
        if !saw_digit {
            return Err(ParseFailure::Syntax);
        }
        let point = match point {
            Some(p) => p - leading_zeros,
            None => significant,
        };

        let (exp_negative, exp_digits) = match exponent.as_bytes().first() {
            Some(b'-') => (true, &exponent[1..]),
            Some(b'+') => (false, &exponent[1..]),
            _ => (false, exponent),
        };
        if exp_digits.is_empty() {
            return Err(ParseFailure::Syntax);
        }
        let mut e = 0i64;
        for c in exp_digits.chars() {
            let d = c.to_digit(10).ok_or(ParseFailure::Syntax)?;
            // Anything past this already overflows or underflows every width.
            if e < 10_000 {
                e = e * 10 + i64::from(d);
            }
        }
        if exp_negative {
            e = -e;
        }

        let exp = if mantissa == 0 {
            0
        } else {
            point * 4 + e - i64::from(kept) * 4
        };
        Ok(Some(HexFloat {
            negative,
            mantissa,
            exp,
            truncated,
        }))
    }

    /// Round to `layout`, half to even. Overflow is a range failure;
    /// underflow goes through subnormals to zero.
    fn to_bits(&self, layout: &FloatLayout) -> Result<u64, ParseFailure> {
        let FloatLayout {
            mant_bits,
            exp_bits,
            bias,
        } = *layout;
        let max_exp = (1i64 << exp_bits) + bias - 2;
        let min_exp = bias + 1;
        let mut mantissa = self.mantissa;
        let mut exp = self.exp + i64::from(mant_bits);

        // Leading 1, then mant_bits bits, then a round bit and a sticky bit.
        while mantissa != 0 && mantissa >> (mant_bits + 2) == 0 {
            mantissa <<= 1;
            exp -= 1;
        }
        if self.truncated {
            mantissa |= 1;
        }
        while mantissa >> (mant_bits + 3) != 0 {
            mantissa = (mantissa >> 1) | (mantissa & 1);
            exp += 1;
        }
        while mantissa > 1 && exp < min_exp - 2 {
            mantissa = (mantissa >> 1) | (mantissa & 1);
            exp += 1;
        }

        let mut round = mantissa & 3;
        mantissa >>= 2;
        round |= mantissa & 1;
        exp += 2;
        if round == 3 {
            mantissa += 1;
            if mantissa == 1 << (mant_bits + 1) {
                mantissa >>= 1;
                exp += 1;
            }
        }
        if mantissa >> mant_bits == 0 {
            exp = bias;
        }
        if exp > max_exp {
            return Err(ParseFailure::Range);
        }

        let mut bits = mantissa & ((1 << mant_bits) - 1);
        bits |= (((exp - bias) as u64) & ((1 << exp_bits) - 1)) << mant_bits;
        if self.negative {
            bits |= 1 << (mant_bits + exp_bits);
        }
        Ok(bits)
    }
}

fn float_literal(text: &str) -> Result<String, ParseFailure> {
    if !text.contains('_') {
        return Ok(text.to_string());
    }
    if !underscores_ok(text) {
        return Err(ParseFailure::Syntax);
    }
    Ok(text.replace('_', ""))
}

fn is_infinity(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Detect the base and strip its prefix. A prefix needs at least one more
/// character after it; `"0x"` alone is octal `x`, which fails as syntax.
fn split_radix(text: &str) -> (u32, &str) {
    let bytes = text.as_bytes();
    if bytes[0] != b'0' {
        return (10, text);
    }
    if bytes.len() >= 3 {
        match bytes[1].to_ascii_lowercase() {
            b'x' => return (16, &text[2..]),
            b'o' => return (8, &text[2..]),
            b'b' => return (2, &text[2..]),
            _ => {}
        }
    }
    (8, &text[1..])
}

/// Underscores must sit between digits, or directly after a base prefix.
fn underscores_ok(text: &str) -> bool {
    #[derive(PartialEq)]
    enum Saw {
        Start,
        Digit,
        Underscore,
        Other,
    }

    let s = text.strip_prefix(['+', '-']).unwrap_or(text).as_bytes();
    let mut saw = Saw::Start;
    let mut i = 0;
    let mut hex = false;
    if s.len() >= 2 && s[0] == b'0' && matches!(s[1].to_ascii_lowercase(), b'b' | b'o' | b'x') {
        i = 2;
        saw = Saw::Digit;
        hex = s[1].to_ascii_lowercase() == b'x';
    }
    for &c in &s[i..] {
        if c.is_ascii_digit() || (hex && c.is_ascii_hexdigit()) {
            saw = Saw::Digit;
            continue;
        }
        if c == b'_' {
            if saw != Saw::Digit {
                return false;
            }
            saw = Saw::Underscore;
            continue;
        }
        if saw == Saw::Underscore {
            return false;
        }
        saw = Saw::Other;
    }
    saw != Saw::Underscore
}
