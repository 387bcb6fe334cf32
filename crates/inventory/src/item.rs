use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ValueObject};

/// Validated item name (never empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    pub fn parse(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::invalid_input("Invalid item name provided"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ItemName {}

impl TryFrom<String> for ItemName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A numeric amount used for removals and low-stock thresholds.
///
/// Whole amounts compare and subtract exactly. Fractional amounts are accepted
/// wherever the original interface accepted floats.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Amount {
    Whole(i64),
    Fractional(f64),
}

impl Amount {
    /// Reject negative and non-finite amounts.
    pub fn validate(self) -> DomainResult<Self> {
        let ok = match self {
            Amount::Whole(n) => n >= 0,
            Amount::Fractional(x) => x.is_finite() && x >= 0.0,
        };
        if ok {
            Ok(self)
        } else {
            Err(DomainError::invalid_input(format!("Invalid quantity: {self}")))
        }
    }

    /// True if `quantity` is strictly below this amount.
    pub fn exceeds(self, quantity: i64) -> bool {
        match self {
            Amount::Whole(t) => quantity < t,
            Amount::Fractional(t) => (quantity as f64) < t,
        }
    }

    /// Quantity left after taking this amount from `current`.
    ///
    /// A fractional remainder is rounded up to the next whole unit, so only
    /// whole units are ever taken out of stock.
    pub(crate) fn subtract_from(self, current: i64) -> i64 {
        match self {
            Amount::Whole(n) => current.saturating_sub(n),
            Amount::Fractional(x) => {
                let remaining = current as f64 - x;
                if remaining <= 0.0 { 0 } else { remaining.ceil() as i64 }
            }
        }
    }
}

impl ValueObject for Amount {}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Whole(value)
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount::Whole(value.into())
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Amount::Whole(value.into())
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Fractional(value)
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Amount::Whole(n) => write!(f, "{n}"),
            Amount::Fractional(x) => write!(f, "{x}"),
        }
    }
}
