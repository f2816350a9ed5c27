//! Compound Chinese numeral decoding.
//!
//! Wenyan numerals mix weighted digits (`二十三` = 23), myriad-grouped
//! units (`一億二千萬`), a decimal-point form (`一·二三`) and a
//! fraction-unit form (`一又二分三釐` = 1.23). The decoder is a pure
//! function of the character sequence; the lexer feeds it maximal runs of
//! numeral characters.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("空數字")]
    Empty,
    #[error("非數值字符")]
    NonNumeral,
    #[error("多重負號")]
    DoubleNegative,
    #[error("負號位置錯誤")]
    MisplacedNegative,
    #[error("多重小數點")]
    DoubleDot,
    #[error("混用小數點與又")]
    DotWithAddend,
    #[error("小數點位置錯誤")]
    MisplacedDot,
    #[error("非數字")]
    NonDigit,
    #[error("多重又")]
    DoubleAddend,
    #[error("又後為空")]
    EmptyAddend,
    #[error("小數位錯序")]
    FractionOutOfOrder,
    #[error("小數位過長")]
    FractionTooLong,
    #[error("非法整數")]
    BadInteger,
    #[error("非法小數")]
    BadFraction,
    #[error("數字過大")]
    Overflow,
}

/// A decoded numeral: `INT_NUM` or `FLOAT_NUM`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoded {
    Int(i64),
    Float(f64),
}

fn digit(ch: char) -> Option<i64> {
    match ch {
        '零' | '〇' => Some(0),
        '一' => Some(1),
        '二' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

fn small_unit(ch: char) -> Option<i64> {
    match ch {
        '十' => Some(10),
        '百' => Some(100),
        '千' => Some(1000),
        _ => None,
    }
}

/// Myriad-grouped units, as powers of ten (萬進: the exponent doubles from
/// 萬 upward). Exponents past 18 cannot fit an `i64` and decode as overflow.
fn big_unit_exp(ch: char) -> Option<u32> {
    match ch {
        '萬' => Some(4),
        '億' => Some(8),
        '兆' => Some(12),
        '京' => Some(16),
        '垓' => Some(20),
        '秭' => Some(24),
        '穰' => Some(28),
        '溝' => Some(32),
        '澗' => Some(36),
        '正' => Some(40),
        '載' => Some(44),
        '極' => Some(48),
        _ => None,
    }
}

/// Fraction units: 1-based decimal place (`分` = 10⁻¹ … `漠` = 10⁻¹²).
fn fraction_place(ch: char) -> Option<usize> {
    match ch {
        '分' => Some(1),
        '釐' => Some(2),
        '毫' => Some(3),
        '絲' => Some(4),
        '忽' => Some(5),
        '微' => Some(6),
        '纖' => Some(7),
        '沙' => Some(8),
        '塵' => Some(9),
        '埃' => Some(10),
        '渺' => Some(11),
        '漠' => Some(12),
        _ => None,
    }
}

/// True for every character that may appear in a numeral run.
pub fn is_numeral(ch: char) -> bool {
    matches!(ch, '負' | '·' | '又')
        || digit(ch).is_some()
        || small_unit(ch).is_some()
        || big_unit_exp(ch).is_some()
        || fraction_place(ch).is_some()
}

/// Decode a complete numeral string.
pub fn decode(text: &str) -> Result<Decoded, NumberError> {
    let all: Vec<char> = text.chars().collect();
    let mut chars: &[char] = &all;
    if chars.is_empty() {
        return Err(NumberError::Empty);
    }
    if chars.iter().any(|&c| !is_numeral(c)) {
        return Err(NumberError::NonNumeral);
    }

    let negative = chars[0] == '負';
    if negative {
        chars = &chars[1..];
        if chars.contains(&'負') {
            return Err(NumberError::DoubleNegative);
        }
    } else if chars.contains(&'負') {
        return Err(NumberError::MisplacedNegative);
    }
    if chars.is_empty() {
        return Err(NumberError::Empty);
    }

    let value = decode_unsigned(chars)?;
    if negative {
        Ok(match value {
            Decoded::Int(n) => Decoded::Int(-n),
            Decoded::Float(f) => Decoded::Float(-f),
        })
    } else {
        Ok(value)
    }
}

fn decode_unsigned(chars: &[char]) -> Result<Decoded, NumberError> {
    if chars.contains(&'·') {
        return decode_dot_form(chars);
    }

    if chars.contains(&'又') {
        if chars.iter().filter(|&&c| c == '又').count() != 1 {
            return Err(NumberError::DoubleAddend);
        }
        let split = chars.iter().position(|&c| c == '又').unwrap();
        let (head, tail) = (&chars[..split], &chars[split + 1..]);
        if tail.is_empty() {
            return Err(NumberError::EmptyAddend);
        }
        let int_value = parse_integer(head)?;
        if tail.iter().any(|&c| fraction_place(c).is_some()) {
            let places = parse_fraction(tail)?;
            return attach_fraction(int_value, &places);
        }
        let addend = parse_integer(tail)?;
        let sum = int_value.checked_add(addend).ok_or(NumberError::Overflow)?;
        return Ok(Decoded::Int(sum));
    }

    if chars.iter().any(|&c| fraction_place(c).is_some()) {
        let places = parse_fraction(chars)?;
        return attach_fraction(0, &places);
    }

    Ok(Decoded::Int(parse_integer(chars)?))
}

/// `一·二三` style: plain digits on both sides of a single dot.
fn decode_dot_form(chars: &[char]) -> Result<Decoded, NumberError> {
    if chars.iter().filter(|&&c| c == '·').count() != 1 {
        return Err(NumberError::DoubleDot);
    }
    if chars.contains(&'又') {
        return Err(NumberError::DotWithAddend);
    }
    if chars.iter().any(|&c| c != '·' && digit(c).is_none()) {
        return Err(NumberError::NonDigit);
    }
    if chars[0] == '·' || chars[chars.len() - 1] == '·' {
        return Err(NumberError::MisplacedDot);
    }
    // Build the decimal string and let the float parser round it, so the
    // decoded value displays the way it was written.
    let split = chars.iter().position(|&c| c == '·').unwrap();
    let mut text = String::new();
    for &c in &chars[..split] {
        text.push_str(&digit(c).unwrap().to_string());
    }
    text.push('.');
    for &c in &chars[split + 1..] {
        text.push_str(&digit(c).unwrap().to_string());
    }
    let value: f64 = text.parse().map_err(|_| NumberError::NonDigit)?;
    Ok(Decoded::Float(value))
}

/// A fraction tail of all-zero places collapses to the integer part.
fn attach_fraction(int_value: i64, places: &[u8]) -> Result<Decoded, NumberError> {
    if places.iter().all(|&d| d == 0) {
        return Ok(Decoded::Int(int_value));
    }
    let mut text = format!("{}.", int_value);
    for &d in places {
        text.push_str(&d.to_string());
    }
    let value: f64 = text.parse().map_err(|_| NumberError::BadFraction)?;
    Ok(Decoded::Float(value))
}

fn parse_integer(chars: &[char]) -> Result<i64, NumberError> {
    if chars.is_empty() {
        return Ok(0);
    }
    if chars
        .iter()
        .any(|&c| fraction_place(c).is_some() || c == '·' || c == '又' || c == '負')
    {
        return Err(NumberError::BadInteger);
    }

    // Positional form: every character a plain digit (`一二三` = 123).
    if chars.iter().all(|&c| digit(c).is_some()) {
        let mut value = 0i64;
        for &c in chars {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit(c).unwrap()))
                .ok_or(NumberError::Overflow)?;
        }
        return Ok(value);
    }

    // Weighted form: digits bind the next smaller unit, units accumulate
    // per myriad section.
    let mut total = 0i64;
    let mut section = 0i64;
    let mut current = 0i64;
    let mut has_digit = false;
    for &c in chars {
        if let Some(d) = digit(c) {
            current = d;
            has_digit = true;
        } else if let Some(unit) = small_unit(c) {
            if !has_digit {
                current = 1;
            }
            section = current
                .checked_mul(unit)
                .and_then(|v| section.checked_add(v))
                .ok_or(NumberError::Overflow)?;
            current = 0;
            has_digit = false;
        } else if let Some(exp) = big_unit_exp(c) {
            if !has_digit && section == 0 {
                section = 1;
            } else {
                section = section.checked_add(current).ok_or(NumberError::Overflow)?;
            }
            let unit = 10i64.checked_pow(exp).ok_or(NumberError::Overflow)?;
            total = section
                .checked_mul(unit)
                .and_then(|v| total.checked_add(v))
                .ok_or(NumberError::Overflow)?;
            section = 0;
            current = 0;
            has_digit = false;
        } else {
            return Err(NumberError::BadInteger);
        }
    }
    total = total.checked_add(section).ok_or(NumberError::Overflow)?;
    if has_digit {
        total = total.checked_add(current).ok_or(NumberError::Overflow)?;
    }
    Ok(total)
}

/// Parse a fraction tail into per-place digits. Places must be strictly
/// increasing; unit-less digits fill consecutive places, twelve at most.
fn parse_fraction(chars: &[char]) -> Result<Vec<u8>, NumberError> {
    let mut next_place = 1usize;
    let mut places: Vec<u8> = Vec::new();
    let mut idx = 0;
    while idx < chars.len() {
        let c = chars[idx];
        if let Some(d) = digit(c) {
            if let Some(target) = chars.get(idx + 1).copied().and_then(fraction_place) {
                if target < next_place {
                    return Err(NumberError::FractionOutOfOrder);
                }
                while next_place < target {
                    places.push(0);
                    next_place += 1;
                }
                places.push(d as u8);
                next_place = target + 1;
                idx += 2;
            } else {
                if next_place > 12 {
                    return Err(NumberError::FractionTooLong);
                }
                places.push(d as u8);
                next_place += 1;
                idx += 1;
            }
        } else if let Some(target) = fraction_place(c) {
            if target < next_place {
                return Err(NumberError::FractionOutOfOrder);
            }
            while next_place < target {
                places.push(0);
                next_place += 1;
            }
            places.push(1);
            next_place = target + 1;
            idx += 1;
        } else {
            return Err(NumberError::BadFraction);
        }
    }
    Ok(places)
}
