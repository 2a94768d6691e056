//! Utility functions and helpers

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Insert thousands separators into the integer digits of `n`
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut result = String::new();
    let mut count = 0;
    for c in int_part.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let mut out: String = result.chars().rev().collect();
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    format!("{}{}", sign, out)
}

/// Format an amount with a fixed number of decimals, grouping and a currency symbol
pub fn format_money(amount: f64, decimal_places: usize, symbol: &str) -> String {
    let fixed = format!("{:.*}", decimal_places, amount);
    let grouped = format_number(fixed);
    if symbol.is_empty() {
        grouped
    } else {
        format!("{} {}", symbol, grouped)
    }
}

/// Generate a unique transaction ID
///
/// The ID is the current Unix time in milliseconds followed by a short hex
/// suffix taken from a random v4 UUID, e.g. `1718000000000-3f9a1c2b`.
pub fn generate_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let suffix = Uuid::new_v4().simple().to_string();

    format!("{}-{}", millis, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_format_number_groups_thousands() {
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number("-50000.25"), "-50,000.25");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(10000.0, 2, "₹"), "₹ 10,000.00");
        assert_eq!(format_money(-12.5, 2, ""), "-12.50");
        assert_eq!(format_money(0.0, 0, "$"), "$ 0");
    }

    #[test]
    fn test_generate_id_is_unique() {
        let ids: HashSet<String> = (0..500).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_generate_id_is_timestamp_prefixed() {
        let id = generate_id();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<u128>().is_ok());
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
