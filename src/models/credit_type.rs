use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of credit a customer balance is built from.
///
/// Declaration order is the consumption priority: debits drain `GiftCard`
/// credits before `Promotion` credits before `Cash` credits. The active
/// credit queue sorts by the derived `Ord`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum CreditType {
    GiftCard,
    Promotion,
    Cash,
}

impl CreditType {
    /// Consumption priority; lower values are drained first.
    pub fn priority(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CreditType::GiftCard => "GIFTCARD",
            CreditType::Promotion => "PROMOTION",
            CreditType::Cash => "CASH",
        }
    }
}

impl fmt::Display for CreditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditType {
    type Err = CreditTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GIFTCARD" => Ok(CreditType::GiftCard),
            "PROMOTION" => Ok(CreditType::Promotion),
            "CASH" => Ok(CreditType::Cash),
            _ => Err(CreditTypeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreditTypeParseError(String);

impl fmt::Display for CreditTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown credit type: {}", self.0)
    }
}

impl std::error::Error for CreditTypeParseError {}
