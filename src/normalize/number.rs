//! Numeric text helpers

/// Most decimal places an f64 can meaningfully carry
pub const MAX_PLACES: u32 = 17;

/// Round to `places` decimal places, halves away from zero.
///
/// Precision is capped at [`MAX_PLACES`]; values too large to scale are returned unchanged.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places.min(MAX_PLACES) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / factor;
    // keep -0 out of the output
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Strip trailing zeros after a decimal point, then a trailing lone point
pub fn trim_fraction(text: &str) -> &str {
    let trimmed = if text.contains('.') {
        text.trim_end_matches('0')
    } else {
        text
    };
    trimmed.trim_end_matches('.')
}

/// Whether the text carries an exponent marker
pub fn has_exponent(text: &str) -> bool {
    text.contains(['e', 'E'])
}

/// Rewrite scientific notation as a plain integer, truncating any fraction
pub fn exponent_to_integer(text: &str) -> Option<String> {
    let value: f64 = text.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated == 0.0 {
        return Some("0".to_string());
    }
    Some(format!("{:.0}", truncated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.0000005, 6), 2.000001);
        assert_eq!(round_to(2.00000049999, 6), 2.0);
        assert_eq!(round_to(-1.5, 0), -2.0);
        assert_eq!(round_to(-0.0000001, 6), 0.0);
        assert_eq!(round_to(f64::MAX, 6), f64::MAX);
    }

    #[test]
    fn test_round_to_caps_precision() {
        assert_eq!(round_to(1.5, u32::MAX), 1.5);
        assert_eq!(round_to(1.5, 3_000_000_000), 1.5);
    }

    #[test]
    fn test_trim_fraction() {
        assert_eq!(trim_fraction("12.3400"), "12.34");
        assert_eq!(trim_fraction("100.000"), "100");
        assert_eq!(trim_fraction("100"), "100");
        assert_eq!(trim_fraction("0.0"), "0");
        assert_eq!(trim_fraction("-7."), "-7");
    }

    #[test]
    fn test_exponent_to_integer() {
        assert!(has_exponent("1.2e10"));
        assert!(has_exponent("3E5"));
        assert!(!has_exponent("12.5"));
        assert_eq!(exponent_to_integer("1.2e10").as_deref(), Some("12000000000"));
        assert_eq!(exponent_to_integer("-4.75E2").as_deref(), Some("-475"));
        assert_eq!(exponent_to_integer("1e-3").as_deref(), Some("0"));
        assert_eq!(exponent_to_integer("nope"), None);
    }
}
