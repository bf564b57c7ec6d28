pub mod category;
pub mod extraction;
pub mod phonenumber;

pub trait PatternMatcher {
    fn matches(&self, value: &str) -> bool;
}
