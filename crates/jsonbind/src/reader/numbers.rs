use alloc::string::String;

/// Decimal digits of the whole number `literal` denotes, with its sign.
///
/// Works on the text alone, so `1.0000000000000000001` is not whole even
/// though it rounds to `1.0` as an `f64`. Returns `None` for literals with a
/// non-zero fractional part, non-finite literals, and exponents too large to
/// expand.
pub(super) fn whole_number(literal: &str) -> Option<(bool, String)> {
    let (negative, unsigned) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, literal),
    };
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], unsigned[at + 1..].parse::<i64>().ok()?),
        None => (unsigned, 0),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int.is_empty() || !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = [int, frac].concat();
    let len = i64::try_from(digits.len()).ok()?;
    let point = i64::try_from(int.len()).ok()?.checked_add(exponent)?;
    let split = usize::try_from(point.clamp(0, len)).ok()?;
    let (whole, fraction) = digits.split_at(split);
    if fraction.bytes().any(|b| b != b'0') {
        return None;
    }

    let whole = whole.trim_start_matches('0');
    if whole.is_empty() {
        return Some((negative, String::from("0")));
    }
    // past 20 digits nothing fits in 64 bits
    let padding = usize::try_from(point - len).unwrap_or(0);
    if whole.len() + padding > 20 {
        return None;
    }
    let mut out = String::with_capacity(whole.len() + padding);
    out.push_str(whole);
    out.extend(core::iter::repeat_n('0', padding));
    Some((negative, out))
}
