//! Locale formatting for read-only number cells.

use crate::config::NumberFormat;

/// Formats a number with grouped thousands and trimmed fraction digits.
///
/// ```
/// use dyntable_lib::cell::format_number;
/// use dyntable_lib::config::NumberFormat;
///
/// let en = NumberFormat::default();
/// assert_eq!(format_number(1234567.891, &en), "1,234,567.891");
/// assert_eq!(format_number(-42.5, &en), "-42.5");
/// ```
pub fn format_number(n: f64, format: &NumberFormat) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.*}", format.max_fraction_digits, n.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::new();
    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    if n < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part, &format.thousands_separator));
    if !frac_part.is_empty() {
        out.push_str(&format.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}
