//! Numeric text handling for the input fields
//!
//! Parsing is lenient: the longest leading decimal literal wins and any
//! trailing text is ignored, so `"12abc"` reads as 12. Only text with no
//! numeric prefix at all (or nothing but whitespace) is "not a number".
//!
//! Formatting always produces two decimals. Rounding is whatever Rust's
//! fixed-precision formatter does with the exact binary value, which means
//! exact ties (0.125, 2.5e-3, ...) round to even.

/// Digits shown after the decimal point
pub const DECIMAL_PLACES: usize = 2;

/// Parse user-typed text into a number
///
/// Returns `None` for the not-a-number case: empty or whitespace-only text,
/// or text that does not start with a decimal literal. Accepts a leading sign,
/// `5.` and `.5` forms, an exponent (`1.5e3`) and the literal `Infinity`.
/// An incomplete exponent is dropped: `"1e"` parses as 1.
pub fn parse_input(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    leading_literal(text)?.parse::<f64>().ok()
}

/// Render a number for display in a field
///
/// NaN and infinities render as the empty string, which callers use to clear
/// the opposite field. Negative zero renders as "0.00".
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", DECIMAL_PLACES, value)
}

/// Extract the leading decimal literal of `s` in a form `f64::from_str` accepts
fn leading_literal(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut literal = String::new();
    let mut i = 0;

    match bytes.first() {
        Some(b'-') => {
            literal.push('-');
            i += 1;
        }
        Some(b'+') => i += 1,
        _ => {}
    }

    if s[i..].starts_with("Infinity") {
        literal.push_str("inf");
        return Some(literal);
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = &s[int_start..i];

    let mut frac_digits = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = &s[frac_start..j];
        i = j;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    literal.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(frac_digits);
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        let mut negative = false;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            negative = bytes[j] == b'-';
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            literal.push('e');
            if negative {
                literal.push('-');
            }
            literal.push_str(&s[exp_start..j]);
        }
    }

    Some(literal)
}
