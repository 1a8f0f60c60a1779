//! Typed coercions for MegaCli field values.

use crate::error::CoerceError;

/// "yes" / "true" (any case) → true, anything else → false.
pub fn yes_no_bool(s: &str) -> bool {
    s.eq_ignore_ascii_case("yes") || s.eq_ignore_ascii_case("true")
}

/// "ok" (any case) → true, anything else → false.
pub fn ok_bool(s: &str) -> bool {
    s.eq_ignore_ascii_case("ok")
}

/// Plain base-10 integer.
pub fn int(s: &str) -> Result<i64, CoerceError> {
    Ok(s.trim().parse::<i64>()?)
}

/// Integer, with "N/A" standing in for -1.
pub fn int_or_na(s: &str) -> Result<i64, CoerceError> {
    if s.trim().eq_ignore_ascii_case("n/a") {
        return Ok(-1);
    }
    int(s)
}

/// Integer taken from the first space-separated token: "0 (Target Id: 0)" → 0.
pub fn leading_int(s: &str) -> Result<i64, CoerceError> {
    int(s.trim().split(' ').next().unwrap_or(""))
}

/// "<number> <unit>" with decimal units (1 KB = 1000 B) → bytes.
/// Unknown units count as bytes. Fractional bytes are truncated.
pub fn parse_bytes(s: &str) -> Result<i64, CoerceError> {
    let (size, unit) = split_pair(s)?;
    let size: f64 = size.parse()?;
    if !size.is_finite() {
        return Err(CoerceError::OutOfRange);
    }
    let multiplier: f64 = match unit {
        "PB" => 1e15,
        "TB" => 1e12,
        "GB" => 1e9,
        "MB" => 1e6,
        "KB" => 1e3,
        _    => 1.0,
    };
    let bytes = size * multiplier;
    if bytes.abs() >= i64::MAX as f64 {
        return Err(CoerceError::OutOfRange);
    }
    Ok(bytes as i64)
}

/// "<integer> <unit>" with unit in seconds/minutes/hours/days → seconds.
/// Unknown units count as seconds.
pub fn parse_duration(s: &str) -> Result<i64, CoerceError> {
    let (size, unit) = split_pair(s)?;
    let size: i64 = size.parse()?;
    let multiplier = match unit {
        "days"    => 86_400,
        "hours"   => 3_600,
        "minutes" => 60,
        "seconds" => 1,
        _         => 1,
    };
    size.checked_mul(multiplier).ok_or(CoerceError::OutOfRange)
}

fn split_pair(s: &str) -> Result<(&str, &str), CoerceError> {
    let tokens: Vec<&str> = s.split_whitespace().collect();
    match tokens.as_slice() {
        [size, unit] => Ok((size, unit)),
        _            => Err(CoerceError::TokenCount(tokens.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_no_bool() {
        assert!(yes_no_bool("Yes"));
        assert!(yes_no_bool("true"));
        assert!(yes_no_bool("TRUE"));
        assert!(!yes_no_bool("no"));
        assert!(!yes_no_bool(""));
        assert!(!yes_no_bool("yes please"));
    }

    #[test]
    fn test_ok_bool() {
        assert!(ok_bool("OK"));
        assert!(ok_bool("ok"));
        assert!(!ok_bool("High"));
        assert!(!ok_bool("31 C"));
        assert!(!ok_bool(""));
    }

    #[test]
    fn test_int_or_na() {
        assert_eq!(int_or_na("N/A").unwrap(), -1);
        assert_eq!(int_or_na("N/a").unwrap(), -1);
        assert_eq!(int_or_na("n/a").unwrap(), -1);
        assert_eq!(int_or_na("42").unwrap(), 42);
        assert!(matches!(int_or_na("abc"), Err(CoerceError::Int(_))));
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("0 (Target Id: 0)").unwrap(), 0);
        assert_eq!(leading_int("12").unwrap(), 12);
        assert!(leading_int("(Target Id: 0)").is_err());
    }

    #[test]
    fn test_parse_bytes() {
        assert_eq!(parse_bytes("1 GB").unwrap(), 1_000_000_000);
        assert_eq!(parse_bytes("2.5 MB").unwrap(), 2_500_000);
        assert_eq!(parse_bytes("10 B").unwrap(), 10);
        assert_eq!(parse_bytes("278.875 GB").unwrap(), 278_875_000_000);
        assert_eq!(parse_bytes("3 KB").unwrap(), 3_000);
        assert_eq!(parse_bytes("7 XB").unwrap(), 7);
    }

    #[test]
    fn test_parse_bytes_rejects_malformed() {
        assert_eq!(parse_bytes("1GB"), Err(CoerceError::TokenCount(1)));
        assert_eq!(parse_bytes("1 GB free"), Err(CoerceError::TokenCount(3)));
        assert!(matches!(parse_bytes("lots GB"), Err(CoerceError::Float(_))));
        assert_eq!(parse_bytes("nan GB"), Err(CoerceError::OutOfRange));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1 days").unwrap(), 86_400);
        assert_eq!(parse_duration("30 minutes").unwrap(), 1_800);
        assert_eq!(parse_duration("45 seconds").unwrap(), 45);
        assert_eq!(parse_duration("168 hours").unwrap(), 604_800);
        assert_eq!(parse_duration("5 fortnights").unwrap(), 5);
    }

    #[test]
    fn test_parse_duration_rejects_malformed() {
        assert!(matches!(parse_duration("1.5 hours"), Err(CoerceError::Int(_))));
        assert_eq!(parse_duration("soon"), Err(CoerceError::TokenCount(1)));
        assert_eq!(parse_duration(&format!("{} days", i64::MAX)), Err(CoerceError::OutOfRange));
    }
}
