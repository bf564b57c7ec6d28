use lazy_static::lazy_static;
use regex::Regex;
use serde::ser::{Error as _, Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::str::FromStr;

use super::category::PhoneCategory;
use super::PatternMatcher;
use crate::error::{PhoneError, Result};

/// Prefix prepended when rendering the international form.
pub const IT_PREFIX: &str = "+39";

const LANDLINE: &str = r"0[1-9][0-9]{4,9}";
const MOBILE: &str = r"3[1-9][0-9][0-9]{6,9}";
const TOLLFREE: &str = r"800[0-9]{6}|803[0-9]{3}";
// 892 allows both 6 and 9 digits in total, the other prefixes only 9
const PREMIUM: &str = r"892(?:[0-9]{3}|[0-9]{6})|(?:178|199|840|848|893|894|895|899)[0-9]{6}";

lazy_static! {
    // Any local number, whatever its category
    static ref LOCAL_PATTERN: Regex = anchored(&[LANDLINE, MOBILE, TOLLFREE, PREMIUM].join("|"));

    // Checked in this order when deriving the category
    static ref CATEGORY_PATTERNS: Vec<(PhoneCategory, Regex)> = vec![
        (PhoneCategory::Landline, anchored(LANDLINE)),
        (PhoneCategory::Mobile, anchored(MOBILE)),
        (PhoneCategory::TollFree, anchored(TOLLFREE)),
        (PhoneCategory::Premium, anchored(PREMIUM)),
    ];
}

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{})$", pattern)).unwrap()
}

/// Keeps digits and plus signs only.
fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| *c == '+' || c.is_ascii_digit()).collect()
}

/// Length of the international prefix marker at the start of `sanitized`.
fn prefix_len(sanitized: &str) -> Option<usize> {
    if sanitized.starts_with("+39") {
        Some(3)
    } else if sanitized.starts_with("0039") {
        Some(4)
    } else if let Some(rest) = sanitized.strip_prefix("39") {
        // A bare 39 followed by 7 to 9 digits through the end is not a prefix
        let domestic = (7..=9).contains(&rest.len()) && rest.bytes().all(|b| b.is_ascii_digit());
        (!domestic).then_some(2)
    } else {
        None
    }
}

/// Returns the canonical local digits if `sanitized` matches the grammar.
///
/// The prefixed reading is tried before the bare one, and the prefix is only
/// stripped when the remainder is itself a valid local number.
fn localize(sanitized: &str) -> Option<&str> {
    if let Some(len) = prefix_len(sanitized) {
        let local = &sanitized[len..];
        if LOCAL_PATTERN.is_match(local) {
            return Some(local);
        }
    }

    if LOCAL_PATTERN.is_match(sanitized) {
        Some(sanitized)
    } else {
        None
    }
}

/// A validated Italian phone number in canonical local form.
///
/// Two numbers are equal when both the local digits and the fax flag match,
/// so `"02 1234567"` and `"+39.02.1234567"` are the same number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber {
    digits: String,
    fax: bool,
}

impl PhoneNumber {
    pub fn new(raw: &str) -> Result<Self> {
        Self::with_fax(raw, false)
    }

    /// Builds a number, forcing its category to fax when `fax` is set.
    pub fn with_fax(raw: &str, fax: bool) -> Result<Self> {
        let sanitized = sanitize(raw);
        match localize(&sanitized) {
            Some(local) => Ok(Self {
                digits: local.to_string(),
                fax,
            }),
            None => Err(PhoneError::InvalidPhoneNumber {
                input: raw.to_string(),
            }),
        }
    }

    /// Local digits, without any international prefix.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn is_fax(&self) -> bool {
        self.fax
    }

    pub fn category(&self) -> Result<PhoneCategory> {
        if self.fax {
            return Ok(PhoneCategory::Fax);
        }

        CATEGORY_PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(&self.digits))
            .map(|(category, _)| *category)
            .ok_or_else(|| PhoneError::Internal {
                digits: self.digits.clone(),
            })
    }

    /// Local digits, or the same digits behind `+39` when `local` is false.
    pub fn render(&self, local: bool) -> String {
        if local {
            self.digits.clone()
        } else {
            format!("{}{}", IT_PREFIX, self.digits)
        }
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

impl FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self> {
        PhoneNumber::new(s)
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let category = self.category().map_err(S::Error::custom)?;
        let mut state = serializer.serialize_struct("PhoneNumber", 3)?;
        state.serialize_field("number", &self.digits)?;
        state.serialize_field("category", &category)?;
        state.serialize_field("fax", &self.fax)?;
        state.end()
    }
}

pub fn is_match(value: &str) -> bool {
    PhoneNumber::new(value).is_ok()
}

pub struct PhoneNumberMatcher {}

impl PatternMatcher for PhoneNumberMatcher {
    fn matches(&self, value: &str) -> bool {
        is_match(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category_of(raw: &str) -> PhoneCategory {
        PhoneNumber::new(raw).unwrap().category().unwrap()
    }

    #[test]
    fn test_landlines() {
        let landlines = vec![
            "021234",
            "02 1234567",
            "06-12345678",
            "(011) 1234567",
            "0123456789",
            "01234567890",
            "+39 055 123456",
            "0039 0823 123456",
        ];

        for phone in landlines {
            assert_eq!(category_of(phone), PhoneCategory::Landline, "Should be landline: {}", phone);
        }
    }

    #[test]
    fn test_mobiles() {
        let mobiles = vec![
            "347 1234567",
            "3471234567",
            "320.123.4567",
            "+39 333 1234567",
            "0039-340-1234567",
            "391234567",
            "391234567890",
            "39021234567",
        ];

        for phone in mobiles {
            assert_eq!(category_of(phone), PhoneCategory::Mobile, "Should be mobile: {}", phone);
        }
    }

    #[test]
    fn test_tollfree_and_premium() {
        assert_eq!(category_of("800 123 456"), PhoneCategory::TollFree);
        assert_eq!(category_of("803123"), PhoneCategory::TollFree);
        assert_eq!(category_of("+39 800123456"), PhoneCategory::TollFree);

        let premium = vec![
            "892123",
            "892123456",
            "178123456",
            "199 123 456",
            "840123456",
            "848123456",
            "893123456",
            "894123456",
            "895123456",
            "899123456",
        ];

        for phone in premium {
            assert_eq!(category_of(phone), PhoneCategory::Premium, "Should be premium: {}", phone);
        }
    }

    #[test]
    fn test_invalid_phones() {
        let invalid_phones = vec![
            "",
            "   ",
            "123",
            "abc",
            "01234",              // too short for a landline
            "012345678901",       // too long for a landline
            "0123",
            "30 1234567",         // mobile second digit must not be 0
            "3412345",            // too short for a mobile
            "3412345678901",      // too long for a mobile
            "80012345",           // toll free needs exactly 6 digits after 800
            "8031234",
            "89212345",
            "899 12345",
            "123456789",
            "+44 20 12345678",
            "+3",
            "02+1234567",
        ];

        for phone in invalid_phones {
            assert_eq!(
                PhoneNumber::new(phone),
                Err(PhoneError::InvalidPhoneNumber { input: phone.to_string() }),
                "Phone should be invalid: {}",
                phone
            );
        }
    }

    #[test]
    fn test_prefix_is_stripped() {
        let cases = vec![
            ("+39 02 1234567", "021234567"),
            ("0039021234567", "021234567"),
            ("+39.02.1234567", "021234567"),
            // ten digits after a bare 39 make it a prefix
            ("39 02 1234567 8", "0212345678"),
        ];

        for (raw, local) in cases {
            assert_eq!(PhoneNumber::new(raw).unwrap().digits(), local, "Wrong local form: {}", raw);
        }
    }

    #[test]
    fn test_bare_39_followed_by_seven_to_nine_digits_is_domestic() {
        // "39" + "021234567" would be a landline, but 9 trailing digits keep 39 as part of the number
        let phone = PhoneNumber::new("39021234567").unwrap();
        assert_eq!(phone.digits(), "39021234567");
        assert_eq!(phone.category().unwrap(), PhoneCategory::Mobile);
    }

    #[test]
    fn test_prefix_kept_when_remainder_invalid() {
        // stripping 39 would leave "1234567890", which is no local number
        let phone = PhoneNumber::new("391234567890").unwrap();
        assert_eq!(phone.digits(), "391234567890");
    }

    #[test]
    fn test_fax_overrides_category() {
        let phones = vec!["02 1234567", "347 1234567", "800123456", "899123456"];

        for phone in phones {
            let fax = PhoneNumber::with_fax(phone, true).unwrap();
            assert!(fax.is_fax());
            assert_eq!(fax.category().unwrap(), PhoneCategory::Fax, "Should be fax: {}", phone);
        }
    }

    #[test]
    fn test_fax_requires_valid_number() {
        assert!(PhoneNumber::with_fax("123", true).is_err());
    }

    #[test]
    fn test_render() {
        let phone = PhoneNumber::new("+39 02 1234567").unwrap();
        assert_eq!(phone.render(true), "021234567");
        assert_eq!(phone.render(false), "+39021234567");
        assert_eq!(phone.to_string(), "021234567");
    }

    #[test]
    fn test_render_round_trip() {
        let raws = vec!["02 1234567", "+39 347 1234567", "39021234567", "803123", "892123456"];

        for raw in raws {
            let phone = PhoneNumber::new(raw).unwrap();
            let reparsed = PhoneNumber::new(&phone.render(false)).unwrap();
            assert_eq!(reparsed.render(true), phone.render(true), "Round trip failed: {}", raw);
        }
    }

    #[test]
    fn test_equality() {
        let a = PhoneNumber::new("02 1234567").unwrap();
        let b = PhoneNumber::new("+39.02.1234567").unwrap();
        let c = PhoneNumber::new("0039 (02) 123-4567").unwrap();

        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(b, c);
        assert_eq!(a, c);
        assert_ne!(a, PhoneNumber::with_fax("02 1234567", true).unwrap());
    }

    #[test]
    fn test_serialize() {
        let phone: PhoneNumber = "+39 347 1234567".parse().unwrap();
        let value = serde_json::to_value(&phone).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"number": "3471234567", "category": "mobile", "fax": false})
        );
    }

    #[test]
    fn test_error_message_carries_input() {
        let err = PhoneNumber::new("call me").unwrap_err();
        assert_eq!(err.to_string(), "cannot determine the phone number type of 'call me'");
    }
}
