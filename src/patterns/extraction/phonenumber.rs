use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::patterns::phonenumber::PhoneNumber;

lazy_static! {
    // Deliberately broader than the validation grammar, it only locates candidates:
    // an optional +39/0039/39 marker, then 6 to 15 digits with short separator runs
    static ref CANDIDATE_PATTERN: Regex = Regex::new(
        r"(?:(?:\+|00)?39[\s\-.()/]?)?[0-9](?:[\s\-.()/]{0,2}[0-9]){5,14}"
    ).unwrap();
}

/// Raw substrings of `text` that look like phone numbers, in scan order.
pub fn extract_candidates(text: &str) -> Vec<&str> {
    CANDIDATE_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .collect()
}

/// All valid Italian phone numbers in `text`, deduplicated, in order of first appearance.
pub fn extract_phonenumbers(text: &str) -> Vec<PhoneNumber> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut results = PhoneSet::new();
    for candidate in extract_candidates(text) {
        match PhoneNumber::new(candidate) {
            Ok(phone) => {
                trace!(candidate, number = phone.digits(), "accepted candidate");
                results.insert(phone);
            }
            Err(err) => debug!(candidate, %err, "discarding candidate"),
        }
    }

    results.into_vec()
}

/// Insertion-ordered set of phone numbers.
///
/// A number inserted again keeps the position of its first insertion.
#[derive(Debug, Default, Clone)]
pub struct PhoneSet {
    seen: HashSet<PhoneNumber>,
    ordered: Vec<PhoneNumber>,
}

impl PhoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the number was already present.
    pub fn insert(&mut self, phone: PhoneNumber) -> bool {
        if self.seen.contains(&phone) {
            trace!(number = phone.digits(), "duplicate number");
            return false;
        }
        self.seen.insert(phone.clone());
        self.ordered.push(phone);
        true
    }

    pub fn contains(&self, phone: &PhoneNumber) -> bool {
        self.seen.contains(phone)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhoneNumber> {
        self.ordered.iter()
    }

    pub fn into_vec(self) -> Vec<PhoneNumber> {
        self.ordered
    }
}

impl Extend<PhoneNumber> for PhoneSet {
    fn extend<I: IntoIterator<Item = PhoneNumber>>(&mut self, iter: I) {
        for phone in iter {
            self.insert(phone);
        }
    }
}

impl FromIterator<PhoneNumber> for PhoneSet {
    fn from_iter<I: IntoIterator<Item = PhoneNumber>>(iter: I) -> Self {
        let mut set = PhoneSet::new();
        set.extend(iter);
        set
    }
}
