use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

// A well-formed address is a road part, a comma, then a UK postcode:
// one or two letters, a digit, an optional letter or digit, optional
// whitespace, a digit, two letters.
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.*),\s*([A-Z]{1,2}[0-9][0-9A-Z]?\s*[0-9][A-Z]{2})$")
        .expect("valid address regex")
});

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("address must end with a comma followed by a UK postcode")]
    MissingPostcode,
    #[error("address has a postcode but no road part before the comma")]
    MissingRoad,
}

/// Checks that a candidate address reads as "road address, UK postcode".
pub fn validate_address(candidate: &str) -> Result<(), AddressError> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }

    let captures = ADDRESS_RE
        .captures(trimmed)
        .ok_or(AddressError::MissingPostcode)?;

    let road = captures.get(1).map_or("", |m| m.as_str()).trim();
    if road.is_empty() {
        return Err(AddressError::MissingRoad);
    }

    Ok(())
}

pub fn is_valid_address(candidate: &str) -> bool {
    validate_address(candidate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_road_and_postcode() {
        assert!(is_valid_address("123 Main Street, AB1 2CD"));
        assert!(is_valid_address("Oxford Rd, M13 9PL"));
        assert!(is_valid_address("  123 Main Street, AB1 2CD  "));
    }

    #[test]
    fn accepts_lowercase_and_compact_postcodes() {
        assert!(is_valid_address("123 Main Street, ab1 2cd"));
        assert!(is_valid_address("10 Downing Street, SW1A 2AA"));
        assert!(is_valid_address("123 Main Street,SW1A1AA"));
    }

    #[test]
    fn rejects_postcode_without_road() {
        assert!(!is_valid_address("M1 7N3"));
        assert!(!is_valid_address(", M1 7N3"));
        assert_eq!(validate_address(", AB1 2CD"), Err(AddressError::MissingRoad));
        assert_eq!(validate_address("  , AB1 2CD"), Err(AddressError::MissingRoad));
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(validate_address(""), Err(AddressError::Empty));
        assert_eq!(validate_address("   "), Err(AddressError::Empty));
    }

    #[test]
    fn rejects_missing_or_malformed_postcode() {
        assert_eq!(
            validate_address("123 Main Street"),
            Err(AddressError::MissingPostcode)
        );
        assert_eq!(
            validate_address("123 Main Street, not a postcode"),
            Err(AddressError::MissingPostcode)
        );
        assert_eq!(
            validate_address("123 Main Street, 123 456"),
            Err(AddressError::MissingPostcode)
        );
    }

    #[test]
    fn postcode_must_be_at_the_end() {
        assert_eq!(
            validate_address("123 Main Street, AB1 2CD, extra"),
            Err(AddressError::MissingPostcode)
        );
    }

    #[test]
    fn is_deterministic() {
        for _ in 0..3 {
            assert!(is_valid_address("123 Main Street, AB1 2CD"));
            assert!(!is_valid_address("M1 7N3"));
        }
    }
}
