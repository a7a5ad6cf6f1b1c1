use serde_json::Value;

/// Coerces whatever the client sent for `quantity` into an integer of at
/// least 1, matching the dashboard input rule `max(1, parseInt(v) || 1)`.
/// Strings parse their leading decimal-digit prefix the way `parseInt`
/// does ("12abc" is 12), numbers truncate toward zero, and anything
/// unparsable or below 1 becomes 1.
pub fn sanitize_quantity(value: &Value) -> u64 {
    let parsed = match value {
        Value::Number(number) => {
            if let Some(qty) = number.as_u64() {
                Some(qty)
            } else if number.as_i64().is_some() {
                // negative integer, floors at the >= 1 clamp below
                Some(0)
            } else {
                number
                    .as_f64()
                    .filter(|f| f.is_finite() && f.trunc() >= 1.0)
                    .map(|f| f.trunc() as u64)
            }
        }
        Value::String(raw) => parse_integer_prefix(raw.trim()),
        _ => None,
    };

    match parsed {
        Some(qty) if qty >= 1 => qty,
        _ => 1,
    }
}

/// `parseInt`-style prefix parse: optional sign, then leading decimal
/// digits; trailing garbage is ignored. Negative prefixes parse to 0 so the
/// caller's clamp lifts them to 1; oversized prefixes saturate at u64::MAX.
fn parse_integer_prefix(raw: &str) -> Option<u64> {
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let prefix_len = digits.bytes().take_while(|b| b.is_ascii_digit()).count();
    if prefix_len == 0 {
        return None;
    }
    if negative {
        return Some(0);
    }

    let mut value: u64 = 0;
    for digit in digits[..prefix_len].bytes() {
        value = value
            .saturating_mul(10)
            .saturating_add(u64::from(digit - b'0'));
    }
    Some(value)
}
