use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    /// The sanitized input does not match the Italian numbering grammar.
    #[error("cannot determine the phone number type of '{input}'")]
    InvalidPhoneNumber { input: String },
    /// A validated number matched none of the category grammars.
    #[error("validated number '{digits}' matches no phone category")]
    Internal { digits: String },
    #[error("unknown phone category: {name}")]
    UnknownCategory { name: String },
}

pub type Result<T> = std::result::Result<T, PhoneError>;
