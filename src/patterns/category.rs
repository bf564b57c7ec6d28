use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::PhoneError;

/// Kinds of Italian phone numbers.
///
/// `Fax` is never inferred from the digits: nothing distinguishes a fax line
/// from a landline, so it is only assigned through the explicit fax flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneCategory {
    /// Traditional house phone numbers
    Landline,
    /// Mobile/cell phone numbers
    Mobile,
    /// Calls to these numbers are free
    TollFree,
    /// Service numbers charged with an extra fee
    Premium,
    /// A number connected to a fax device
    Fax,
}

impl PhoneCategory {
    pub const ALL: [PhoneCategory; 5] = [
        PhoneCategory::Landline,
        PhoneCategory::Mobile,
        PhoneCategory::TollFree,
        PhoneCategory::Premium,
        PhoneCategory::Fax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhoneCategory::Landline => "landline",
            PhoneCategory::Mobile => "mobile",
            PhoneCategory::TollFree => "tollfree",
            PhoneCategory::Premium => "premium",
            PhoneCategory::Fax => "fax",
        }
    }
}

impl fmt::Display for PhoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhoneCategory {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PhoneCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| PhoneError::UnknownCategory {
                name: s.to_string(),
            })
    }
}
