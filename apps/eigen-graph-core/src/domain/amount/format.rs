//! Amount Formatting
//!
//! Chart-label renderings of [`AtomicAmount`] strings: scientific
//! notation, power-of-ten with superscript exponent, and compact
//! magnitude-suffix notation.
//!
//! All three formatters are total over arbitrary input: a string that is
//! not a valid amount renders as the literal `"NaN"` instead of failing,
//! because the output feeds directly into chart labels.

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use super::AtomicAmount;

/// Sentinel rendered for any unparseable amount string.
pub const NAN_LABEL: &str = "NaN";

/// Magnitude suffixes for compact notation, one per factor of 1000.
const COMPACT_SUFFIXES: [&str; 6] = ["", "K", "M", "B", "T", "Q"];

/// Unicode superscript digits, indexed by decimal digit.
const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// Render an amount string in scientific notation, e.g. `1.23e+38`.
///
/// The mantissa is rounded to two fractional digits. Zero renders as the
/// fixed literal `0.00e+0` rather than going through the general mantissa
/// path (there is no exponent for zero). Invalid input renders as `NaN`.
#[must_use]
pub fn format_scientific(value: &str) -> String {
    let Ok(amount) = value.parse::<AtomicAmount>() else {
        return NAN_LABEL.to_string();
    };
    if amount.is_zero() {
        return "0.00e+0".to_string();
    }
    let (hundredths, exponent) = mantissa_hundredths(&amount);
    format!("{}.{:02}e+{exponent}", hundredths / 100, hundredths % 100)
}

/// Render an amount string as a power of ten, e.g. `1.23 × 10³⁸`.
///
/// Zero renders as `0.00` with no exponent. Invalid input renders as
/// `NaN`.
#[must_use]
pub fn format_power_of_ten(value: &str) -> String {
    let Ok(amount) = value.parse::<AtomicAmount>() else {
        return NAN_LABEL.to_string();
    };
    if amount.is_zero() {
        return "0.00".to_string();
    }
    let (hundredths, exponent) = mantissa_hundredths(&amount);
    format!(
        "{}.{:02} × 10{}",
        hundredths / 100,
        hundredths % 100,
        superscript(exponent)
    )
}

/// Render an amount string in compact notation, e.g. `54.32K`.
///
/// The big integer is first reduced to a quotient/suffix pair by
/// big-integer division — never by casting the raw value to `f64` — so
/// the relative error stays below 0.1% at any magnitude. Four significant
/// digits are kept and trailing fractional zeros are trimmed. Zero
/// renders as `0`; invalid input renders as `NaN`.
#[must_use]
pub fn format_compact(value: &str) -> String {
    let Ok(amount) = value.parse::<AtomicAmount>() else {
        return NAN_LABEL.to_string();
    };
    if amount.is_zero() {
        return "0".to_string();
    }

    let digits = amount.decimal_digits();
    let tier = ((digits - 1) / 3).min(COMPACT_SUFFIXES.len() - 1);
    let suffix = COMPACT_SUFFIXES[tier];

    // Keep four significant digits. Above the largest suffix the integer
    // part of the quotient already carries more than four.
    let frac_digits = 4usize.saturating_sub(digits - 3 * tier).min(3);

    // quotient in units of 10^-frac_digits, rounded half-up.
    let numerator = amount.as_biguint() * BigUint::from(10u8).pow(frac_digits as u32 + 1);
    let divisor = BigUint::from(10u8).pow(3 * tier as u32);
    let scaled = (numerator / divisor + 5u8) / 10u8;

    scaled.to_u128().map_or_else(
        || {
            let approx = scaled.to_f64().unwrap_or(f64::NAN)
                / 10f64.powi(i32::try_from(frac_digits).unwrap_or(0));
            format!("{approx:.2}{suffix}")
        },
        |fixed| {
            let pow = 10u128.pow(frac_digits as u32);
            let whole = fixed / pow;
            let frac = fixed % pow;
            if frac == 0 {
                format!("{whole}{suffix}")
            } else {
                let mut frac_str = format!("{frac:0width$}", width = frac_digits);
                while frac_str.ends_with('0') {
                    frac_str.pop();
                }
                format!("{whole}.{frac_str}{suffix}")
            }
        },
    )
}

/// Mantissa (in hundredths, `100..=999`) and decimal exponent of a
/// non-zero amount, rounded half-up to two fractional digits.
///
/// A round-up that overflows the mantissa (`9.995.. -> 10.0`) carries
/// into the exponent.
fn mantissa_hundredths(amount: &AtomicAmount) -> (u32, usize) {
    let digits = amount.to_string();
    let mut exponent = digits.len() - 1;

    let mut first_four = [0u32; 4];
    for (i, slot) in first_four.iter_mut().enumerate() {
        *slot = digits
            .as_bytes()
            .get(i)
            .map_or(0, |&b| u32::from(b - b'0'));
    }

    let mut hundredths = first_four[0] * 100 + first_four[1] * 10 + first_four[2];
    if first_four[3] >= 5 {
        hundredths += 1;
    }
    if hundredths == 1000 {
        hundredths = 100;
        exponent += 1;
    }
    (hundredths, exponent)
}

/// Render a non-negative exponent with Unicode superscript digits.
fn superscript(exponent: usize) -> String {
    exponent
        .to_string()
        .bytes()
        .map(|b| SUPERSCRIPT_DIGITS[usize::from(b - b'0')])
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;

    const LARGE: &str = "123456789012345678901234567890123456789";

    #[test_case(LARGE, "1.23e+38"; "thirty nine digits")]
    #[test_case("0", "0.00e+0"; "zero literal")]
    #[test_case("5", "5.00e+0"; "single digit")]
    #[test_case("999", "9.99e+2"; "no round up")]
    #[test_case("9995", "1.00e+4"; "round up carries into exponent")]
    #[test_case("not a number", "NaN"; "invalid input")]
    fn scientific(input: &str, expected: &str) {
        assert_eq!(format_scientific(input), expected);
    }

    #[test_case(LARGE, "1.23 × 10³⁸"; "thirty nine digits")]
    #[test_case("0", "0.00"; "zero has no exponent")]
    #[test_case("5", "5.00 × 10⁰"; "single digit")]
    #[test_case("1048576", "1.05 × 10⁶"; "rounded mantissa")]
    #[test_case("not a number", "NaN"; "invalid input")]
    fn power_of_ten(input: &str, expected: &str) {
        assert_eq!(format_power_of_ten(input), expected);
    }

    #[test_case("54321", "54.32K"; "two fraction digits")]
    #[test_case("54000", "54K"; "trailing zeros trimmed")]
    #[test_case("54100", "54.1K"; "partial trim")]
    #[test_case("543", "543"; "below first suffix")]
    #[test_case("1234", "1.234K"; "four significant digits")]
    #[test_case("0", "0"; "zero")]
    #[test_case("not a number", "NaN"; "invalid input")]
    fn compact(input: &str, expected: &str) {
        assert_eq!(format_compact(input), expected);
    }

    #[test]
    fn compact_beyond_u64_range() {
        // 1.2345.. * 10^38: reduced by big-integer division, not f64 cast.
        let formatted = format_compact(LARGE);
        assert!(formatted.ends_with('Q'), "got {formatted}");
    }

    /// Parse a compact rendering back into an approximate value.
    fn parse_compact(s: &str) -> f64 {
        let tier = COMPACT_SUFFIXES
            .iter()
            .rposition(|suffix| !suffix.is_empty() && s.ends_with(suffix))
            .unwrap_or(0);
        let numeric = s.trim_end_matches(char::is_alphabetic);
        numeric.parse::<f64>().unwrap() * 1000f64.powi(i32::try_from(tier).unwrap())
    }

    proptest! {
        #[test]
        fn compact_relative_error_is_bounded(input in "[1-9][0-9]{0,38}") {
            let truth: f64 = input.parse().unwrap();
            let round_trip = parse_compact(&format_compact(&input));
            let relative_error = (truth - round_trip).abs() / truth;
            prop_assert!(
                relative_error < 0.001,
                "input {} formatted {} error {}",
                input,
                format_compact(&input),
                relative_error
            );
        }
    }
}
