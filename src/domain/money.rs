use rust_decimal::Decimal;
use thiserror::Error;

/// Amounts are exact decimals so sums never drift and no digit is lost.
pub type Amount = Decimal;

/// Largest exponent magnitude worth trying; `Decimal` holds at most 28 digits.
const MAX_EXPONENT: u64 = 64;

/// Format an amount for display.
/// Example: 50 -> "50.00", -12.3 -> "-12.30", 12.345 -> "12.345"
///
/// At least two decimal places are shown; more are kept when present.
pub fn format_amount(amount: Amount) -> String {
    let amount = amount.normalize();
    if amount.scale() <= 2 {
        format!("{:.2}", amount)
    } else {
        amount.to_string()
    }
}

/// Parse a signed decimal string, optionally in scientific notation.
/// Example: "50.00" -> 50, "12.345" -> 12.345, "-3" -> -3, "+.5" -> 0.5, "1e3" -> 1000
///
/// Digits are never truncated: input that does not fit a `Decimal` exactly
/// is rejected.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    let (mantissa, exponent) = match input.find(['e', 'E']) {
        Some(pos) => (&input[..pos], Some(&input[pos + 1..])),
        None => (input, None),
    };

    let mantissa = normalize_mantissa(mantissa)?;
    let mut amount =
        Decimal::from_str_exact(&mantissa).map_err(|_| ParseAmountError::OutOfRange)?;

    let Some(exponent) = exponent else {
        return Ok(amount);
    };

    let digits = exponent.strip_prefix(['-', '+']).unwrap_or(exponent);
    if digits.is_empty() || !is_ascii_digits(digits) {
        return Err(ParseAmountError::InvalidFormat);
    }
    let exponent: i64 = exponent
        .parse()
        .map_err(|_| ParseAmountError::OutOfRange)?;
    if exponent.unsigned_abs() > MAX_EXPONENT {
        return Err(ParseAmountError::OutOfRange);
    }

    if exponent >= 0 {
        for _ in 0..exponent {
            amount = amount
                .checked_mul(Decimal::TEN)
                .ok_or(ParseAmountError::OutOfRange)?;
        }
    } else {
        // Shifting the scale divides by a power of ten without rounding
        let scale = amount.scale() + exponent.unsigned_abs() as u32;
        amount
            .set_scale(scale)
            .map_err(|_| ParseAmountError::OutOfRange)?;
    }
    Ok(amount)
}

/// Check `[+-]digits[.digits]` and rewrite it into a form `Decimal` always
/// accepts: explicit sign dropped for `+`, missing units or fraction filled in.
fn normalize_mantissa(input: &str) -> Result<String, ParseAmountError> {
    let (negative, digits) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    let (units, fraction) = match digits.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };

    if units.is_empty() && fraction.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }
    if !is_ascii_digits(units) || !is_ascii_digits(fraction) {
        return Err(ParseAmountError::InvalidFormat);
    }

    let sign = if negative { "-" } else { "" };
    let units = if units.is_empty() { "0" } else { units };
    Ok(if fraction.is_empty() {
        format!("{}{}", sign, units)
    } else {
        format!("{}{}.{}", sign, units, fraction)
    })
}

fn is_ascii_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("invalid money format")]
    InvalidFormat,

    #[error("amount out of range")]
    OutOfRange,
}
