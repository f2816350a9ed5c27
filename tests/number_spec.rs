/// Spec tests for the compound numeral decoder.
///
/// `decode` is a pure function of the character sequence; every case here
/// feeds it a complete numeral string and checks the decoded value or the
/// exact error.
use wenyan::hanzi::{decode, Decoded, NumberError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn int(src: &str) -> i64 {
    match decode(src) {
        Ok(Decoded::Int(n)) => n,
        other => panic!("expected integer for {:?}, got {:?}", src, other),
    }
}

fn float(src: &str) -> f64 {
    match decode(src) {
        Ok(Decoded::Float(f)) => f,
        other => panic!("expected float for {:?}, got {:?}", src, other),
    }
}

fn err(src: &str) -> NumberError {
    decode(src).expect_err("expected a decode error")
}

// ---------------------------------------------------------------------------
// Digits and positional form
// ---------------------------------------------------------------------------

#[test]
fn basic_digits() {
    assert_eq!(int("零"), 0);
    assert_eq!(int("〇"), 0);
    assert_eq!(int("一二三"), 123);
}

#[test]
fn single_digits() {
    assert_eq!(int("七"), 7);
    assert_eq!(int("九"), 9);
}

// ---------------------------------------------------------------------------
// Weighted units
// ---------------------------------------------------------------------------

#[test]
fn small_units() {
    assert_eq!(int("十"), 10);
    assert_eq!(int("十二"), 12);
    assert_eq!(int("二十"), 20);
    assert_eq!(int("二十一"), 21);
    assert_eq!(int("一百零二"), 102);
    assert_eq!(int("三千零五"), 3005);
}

#[test]
fn myriad_units() {
    assert_eq!(int("一萬零三"), 10_003);
    assert_eq!(int("一億二千三百四十五萬六千七百八十九"), 123_456_789);
}

#[test]
fn bare_unit_is_one() {
    assert_eq!(int("百"), 100);
    assert_eq!(int("萬"), 10_000);
}

#[test]
fn negative_integers() {
    assert_eq!(int("負二十"), -20);
    assert_eq!(int("負一"), -1);
}

// ---------------------------------------------------------------------------
// Decimal forms
// ---------------------------------------------------------------------------

#[test]
fn decimal_dot() {
    assert_eq!(float("一·二三"), 1.23);
    assert_eq!(float("零·三"), 0.3);
}

#[test]
fn fraction_units() {
    assert_eq!(float("分"), 0.1);
    assert_eq!(float("三分"), 0.3);
    assert_eq!(float("負三分"), -0.3);
    assert_eq!(float("一又二分三釐"), 1.23);
}

#[test]
fn fraction_units_skip_places() {
    // 三毫 = 0.003: the skipped 分/釐 places fill with zeros.
    assert_eq!(float("三毫"), 0.003);
}

#[test]
fn addend_without_fraction_unit_adds() {
    assert_eq!(int("一又二"), 3);
}

#[test]
fn all_zero_fraction_collapses_to_integer() {
    assert_eq!(int("一又零分"), 1);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn invalid_numbers() {
    assert_eq!(err("負負一"), NumberError::DoubleNegative);
    assert_eq!(err("一·二·三"), NumberError::DoubleDot);
    assert_eq!(err("一又"), NumberError::EmptyAddend);
    assert_eq!(err("二釐分"), NumberError::FractionOutOfOrder);
    assert_eq!(err("·三"), NumberError::MisplacedDot);
    assert_eq!(err("三·"), NumberError::MisplacedDot);
    assert_eq!(err("一又二又三"), NumberError::DoubleAddend);
}

#[test]
fn misplaced_negative() {
    assert_eq!(err("一負"), NumberError::MisplacedNegative);
}

#[test]
fn non_numeral_rejected() {
    assert_eq!(err("甲"), NumberError::NonNumeral);
    assert_eq!(err(""), NumberError::Empty);
}

#[test]
fn dot_mixed_with_addend() {
    assert_eq!(err("一·二又三"), NumberError::DotWithAddend);
}

#[test]
fn dot_with_units_rejected() {
    // Only plain digits may surround the decimal dot.
    assert_eq!(err("十·三"), NumberError::NonDigit);
}

#[test]
fn overflow_is_an_error() {
    // 垓 is 10²⁰, past what a machine integer holds.
    assert_eq!(err("一垓"), NumberError::Overflow);
}

#[test]
fn error_messages_are_stable() {
    assert_eq!(err("負負一").to_string(), "多重負號");
    assert_eq!(err("一又").to_string(), "又後為空");
    assert_eq!(err("二釐分").to_string(), "小數位錯序");
    assert_eq!(err("一垓").to_string(), "數字過大");
}
