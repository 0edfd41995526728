use rust_decimal::Decimal;
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;
use umbral_core::Money;

use crate::source::RawCell;

/// Currency markers and whitespace (NBSP included) that may surround an
/// amount in a bank export.
fn currency_noise() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"(?i)S/\.?|US\$|\$|USD|PEN|€|\s").expect("invalid regex"))
}

/// Reads an amount from a cell at full precision. Anything that is not a
/// number yields `None`.
pub fn parse_amount(cell: &RawCell) -> Option<Money> {
    match cell {
        RawCell::Int(i) => Some(Money::from_major(*i)),
        // Shortest round-trip text of the float, so 30000.004 stays 30000.004.
        RawCell::Float(f) => Decimal::from_str(&f.to_string()).ok().map(Money::from_decimal),
        RawCell::Text(s) => parse_amount_text(s),
        RawCell::Empty | RawCell::Bool(_) | RawCell::DateSerial(_) | RawCell::Error(_) => None,
    }
}

/// Parses locale-formatted amount text such as `39,500.90`, `39.500,90`,
/// `S/ 30.000` or `(1,250.00)`.
pub fn parse_amount_text(s: &str) -> Option<Money> {
    let cleaned = currency_noise().replace_all(s, "");
    let (negative, body) = if cleaned.starts_with('(') && cleaned.ends_with(')') {
        (true, &cleaned[1..cleaned.len() - 1])
    } else if let Some(rest) = cleaned.strip_prefix('-') {
        (true, rest)
    } else {
        (false, &cleaned[..])
    };

    let normalized = normalize_separators(body)?;
    let mut dec = Decimal::from_str(&normalized).ok()?;
    if negative {
        dec = -dec;
    }
    Some(Money::from_decimal(dec))
}

/// Rewrites digits and separators into plain `1234.56` form.
fn normalize_separators(s: &str) -> Option<String> {
    if !s.chars().any(|c| c.is_ascii_digit())
        || !s.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
    {
        return None;
    }

    let decimal_sep = match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) => Some(if comma > dot { ',' } else { '.' }),
        (Some(_), None) => lone_decimal_separator(s, ','),
        (None, Some(_)) => lone_decimal_separator(s, '.'),
        (None, None) => None,
    };

    if let Some(sep) = decimal_sep {
        if s.matches(sep).count() > 1 {
            return None;
        }
    }

    Some(
        s.chars()
            .filter_map(|c| match c {
                '0'..='9' => Some(c),
                c if Some(c) == decimal_sep => Some('.'),
                _ => None,
            })
            .collect(),
    )
}

/// With only one kind of separator present, it is grouping when repeated or
/// when exactly three digits follow it.
fn lone_decimal_separator(s: &str, sep: char) -> Option<char> {
    if s.matches(sep).count() > 1 {
        return None;
    }
    let digits_after = s.len() - s.rfind(sep)? - 1;
    if digits_after == 3 {
        None
    } else {
        Some(sep)
    }
}
