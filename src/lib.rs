pub mod error;
pub mod patterns;

pub use error::{PhoneError, Result};
pub use patterns::category::PhoneCategory;
pub use patterns::extraction::phonenumber::{extract_phonenumbers, PhoneSet};
pub use patterns::phonenumber::PhoneNumber;

use patterns::PatternMatcher;
use std::collections::HashMap;
use tracing::warn;

/// Category of `value` if it is a valid Italian phone number.
pub fn classify(value: &str) -> Option<PhoneCategory> {
    let phone = PhoneNumber::new(value).ok()?;
    match phone.category() {
        Ok(category) => Some(category),
        Err(err) => {
            warn!(%err, "phone grammars out of sync");
            None
        }
    }
}

/// Matches values that are valid phone numbers of one given category.
pub struct CategoryMatcher {
    pub category: PhoneCategory,
}

impl PatternMatcher for CategoryMatcher {
    fn matches(&self, value: &str) -> bool {
        classify(value) == Some(self.category)
    }
}

pub fn get_all_matchers() -> HashMap<String, Box<dyn PatternMatcher>> {
    let mut matchers: HashMap<String, Box<dyn PatternMatcher>> = HashMap::new();

    matchers.insert("phonenumber".to_string(), Box::new(patterns::phonenumber::PhoneNumberMatcher {}));
    // fax is never inferred from digits, so its matcher never fires
    for category in PhoneCategory::ALL {
        matchers.insert(category.to_string(), Box::new(CategoryMatcher { category }));
    }

    matchers
}
