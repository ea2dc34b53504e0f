//! Station code types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A valid operator station code.
///
/// Station codes are 2 to 8 ASCII letters (e.g. `ASD` for Amsterdam
/// Centraal, `GVC` for Den Haag Centraal). Input is accepted in any
/// case and normalized to uppercase, so any `StationCode` value is
/// canonical by construction. The uppercase form is what feeds the
/// journey-key hash, which must be stable across process restarts.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::StationCode;
///
/// let asd = StationCode::parse("asd").unwrap();
/// assert_eq!(asd.as_str(), "ASD");
///
/// // Digits and punctuation are rejected
/// assert!(StationCode::parse("A1").is_err());
///
/// // Wrong length is rejected
/// assert!(StationCode::parse("A").is_err());
/// assert!(StationCode::parse("ABCDEFGHI").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationCode(String);

impl StationCode {
    /// Parse a station code from a string.
    ///
    /// The input must be 2 to 8 ASCII letters; it is uppercased.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let s = s.trim();

        if s.len() < 2 || s.len() > 8 {
            return Err(InvalidStationCode {
                reason: "must be 2 to 8 characters",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(InvalidStationCode {
                reason: "must be ASCII letters A-Z",
            });
        }

        Ok(StationCode(s.to_ascii_uppercase()))
    }

    /// Returns the canonical (uppercase) code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for StationCode {
    type Error = InvalidStationCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        StationCode::parse(&s)
    }
}

impl From<StationCode> for String {
    fn from(code: StationCode) -> String {
        code.0
    }
}

/// A canonical station: code plus lowercase display name.
///
/// The name is lowercased at construction because all free-text label
/// matching in the directory is case-folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub code: StationCode,
    pub name: String,
}

impl Station {
    /// Create a station with a case-folded display name.
    pub fn new(code: StationCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into().trim().to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(StationCode::parse("ASD").is_ok());
        assert!(StationCode::parse("GVC").is_ok());
        assert!(StationCode::parse("UT").is_ok());
        assert!(StationCode::parse("ASDZ").is_ok());
        assert!(StationCode::parse("HRLZVTWG").is_ok());
    }

    #[test]
    fn lowercase_is_normalized() {
        let code = StationCode::parse("asd").unwrap();
        assert_eq!(code.as_str(), "ASD");
        assert_eq!(code, StationCode::parse("ASD").unwrap());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let code = StationCode::parse(" rtd ").unwrap();
        assert_eq!(code.as_str(), "RTD");
    }

    #[test]
    fn reject_wrong_length() {
        assert!(StationCode::parse("").is_err());
        assert!(StationCode::parse("A").is_err());
        assert!(StationCode::parse("ABCDEFGHI").is_err());
    }

    #[test]
    fn reject_non_letters() {
        assert!(StationCode::parse("A1").is_err());
        assert!(StationCode::parse("A-D").is_err());
        assert!(StationCode::parse("A D").is_err());
        assert!(StationCode::parse("AÖ").is_err());
    }

    #[test]
    fn display_and_debug() {
        let code = StationCode::parse("GVC").unwrap();
        assert_eq!(format!("{}", code), "GVC");
        assert_eq!(format!("{:?}", code), "StationCode(GVC)");
    }

    #[test]
    fn string_roundtrip() {
        let code = StationCode::try_from("rtd".to_string()).unwrap();
        assert_eq!(String::from(code), "RTD");
    }

    #[test]
    fn station_name_is_case_folded() {
        let station = Station::new(
            StationCode::parse("ASD").unwrap(),
            "Amsterdam Centraal",
        );
        assert_eq!(station.name, "amsterdam centraal");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for valid station code input: 2-8 ASCII letters of any case.
    fn valid_code_string() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[a-zA-Z]{2,8}").unwrap()
    }

    proptest! {
        /// Parsing normalizes to the uppercase form of the input.
        #[test]
        fn parse_normalizes(s in valid_code_string()) {
            let code = StationCode::parse(&s).unwrap();
            let upper = s.to_ascii_uppercase();
            prop_assert_eq!(code.as_str(), upper.as_str());
        }

        /// Any valid input parses.
        #[test]
        fn valid_always_parses(s in valid_code_string()) {
            prop_assert!(StationCode::parse(&s).is_ok());
        }

        /// Case variants parse to equal codes.
        #[test]
        fn case_insensitive_equality(s in valid_code_string()) {
            let upper = StationCode::parse(&s.to_ascii_uppercase()).unwrap();
            let lower = StationCode::parse(&s.to_ascii_lowercase()).unwrap();
            prop_assert_eq!(upper, lower);
        }

        /// Wrong-length strings are always rejected.
        #[test]
        fn wrong_length_rejected(s in "[A-Z]{0,1}|[A-Z]{9,16}") {
            prop_assert!(StationCode::parse(&s).is_err());
        }

        /// Strings with digits are rejected.
        #[test]
        fn digits_rejected(s in "[A-Z0-9]{2,8}".prop_filter("has digit", |s| s.chars().any(|c| c.is_ascii_digit()))) {
            prop_assert!(StationCode::parse(&s).is_err());
        }
    }
}
