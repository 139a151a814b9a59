use std::iter::Sum;
use std::ops::{Add, Mul};

use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Backend user identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Food court identifier. Carts and orders are scoped to exactly one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct FoodCourtId(pub i64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct MenuItemId(pub i64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct OrderId(pub i64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct OrderItemId(pub i64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct TransactionId(pub i64);

/// Rupee amount held as whole paise.
///
/// The backend sends money as decimal strings (`"50.00"`) and occasionally as
/// bare JSON numbers; both deserialize. Serialization always produces the
/// two-decimal string form.
///
/// ```rust,ignore
/// let price: Amount = "49.50".parse()?;
/// assert_eq!(price.paise(), 4950);
/// assert_eq!(price.to_string(), "49.50");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "AmountRepr", into = "String")]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn from_paise(paise: i64) -> Self {
        Self(paise)
    }

    #[must_use]
    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees * 100)
    }

    #[must_use]
    pub const fn paise(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl std::str::FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidAmount(s.to_owned());

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty()
            || frac.len() > 2
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        let paise = whole
            .checked_mul(100)
            .and_then(|p| p.checked_add(frac))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -paise } else { paise }))
    }
}

impl TryFrom<String> for Amount {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Amount> for String {
    fn from(a: Amount) -> Self {
        a.to_string()
    }
}

/// Wire forms accepted for [`Amount`].
#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl TryFrom<AmountRepr> for Amount {
    type Error = Error;

    fn try_from(repr: AmountRepr) -> Result<Self, Self::Error> {
        match repr {
            AmountRepr::Text(s) => s.parse(),
            AmountRepr::Integer(rupees) => rupees
                .checked_mul(100)
                .map(Self)
                .ok_or_else(|| Error::InvalidAmount(rupees.to_string())),
            AmountRepr::Float(rupees) if rupees.is_finite() => {
                // f64 -> i64 casts saturate; the finite check rules out NaN.
                Ok(Self((rupees * 100.0).round() as i64))
            }
            AmountRepr::Float(rupees) => Err(Error::InvalidAmount(rupees.to_string())),
        }
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Amount {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[display("student")]
    Student,
    #[display("food_court_admin")]
    FoodCourtAdmin,
    #[display("super_admin")]
    SuperAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[display("pending")]
    Pending,
    #[display("preparing")]
    Preparing,
    #[display("ready")]
    Ready,
    #[display("completed")]
    Completed,
    #[display("cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Completed and cancelled orders no longer change.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Progress index for a four-step tracker (placed, preparing, ready,
    /// completed). Cancelled orders sit at 0.
    #[must_use]
    pub fn step(self) -> u8 {
        match self {
            Self::Pending => 1,
            Self::Preparing => 2,
            Self::Ready => 3,
            Self::Completed => 4,
            Self::Cancelled => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}
