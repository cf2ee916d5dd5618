//! Account and transaction records as delivered by the banking API

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, Result};
use crate::money;

/// Notes marker of the zero-value authorisation the bank sends when a card is added
pub const CARD_CHECK_NOTE: &str = "Active card check";

/// A merchant attached to a transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Merchant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Merchant {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// A single transaction, immutable once loaded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    /// Signed minor units; debits are negative
    pub amount: i64,
    /// ISO-8601 timestamp, e.g. `2026-10-17T09:12:44.021Z`
    pub created: String,
    #[serde(default, deserialize_with = "merchant_or_id")]
    pub merchant: Option<Merchant>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        amount: i64,
        created: impl Into<String>,
        merchant: Option<Merchant>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            created: created.into(),
            merchant,
            notes: notes.into(),
        }
    }

    pub fn merchant_id(&self) -> Option<&str> {
        self.merchant.as_ref().map(|m| m.id.as_str())
    }

    pub fn is_card_check(&self) -> bool {
        self.notes.contains(CARD_CHECK_NOTE)
    }

    /// Spend in minor units (positive for purchases, negative for refunds).
    /// An amount of `i64::MIN` has no negation and is rejected.
    pub fn spend_minor(&self) -> Result<i64> {
        self.amount.checked_neg().ok_or_else(|| {
            CoreError::malformed(&self.id, format!("amount {} out of range", self.amount))
        })
    }

    /// Calendar date of `created`: the portion before "T".
    pub fn created_date(&self) -> Result<NaiveDate> {
        let date = self.created.split('T').next().unwrap_or_default();
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            CoreError::malformed(&self.id, format!("invalid created '{}': {e}", self.created))
        })
    }
}

/// Balance snapshot for the account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountSummary {
    /// Signed minor units
    pub balance: i64,
    /// Signed minor units; spending today is negative
    pub spend_today: i64,
    #[serde(default)]
    pub currency: Option<String>,
}

impl AccountSummary {
    pub fn new(balance: i64, spend_today: i64) -> Self {
        Self {
            balance,
            spend_today,
            currency: None,
        }
    }

    /// Balance in major units, sign preserved
    pub fn balance_major(&self) -> f64 {
        money::major_from_minor(self.balance)
    }

    /// Balance for display, sign preserved
    pub fn balance_display(&self) -> String {
        money::format_minor(self.balance)
    }

    /// Today's spend for display, positive when money went out
    pub fn spend_today_display(&self) -> String {
        money::display_amount(self.spend_today)
    }
}

/// A transaction normalized for the feed
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DisplayTransaction {
    pub id: String,
    /// Major units, two decimals, spend positive
    pub amount: String,
    /// "Today", "Yesterday", or a full date
    pub date: String,
    #[serde(skip)]
    pub created_on: NaiveDate,
    #[serde(skip)]
    pub amount_minor: i64,
    pub merchant: Option<Merchant>,
    pub notes: String,
}

/// Transactions sharing one date label
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyBatch {
    pub date: String,
    pub total_spent: String,
    pub transactions: Vec<DisplayTransaction>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MerchantField {
    Expanded(Merchant),
    Id(String),
}

// Without `expand[]=merchant` the API sends a bare merchant id string.
fn merchant_or_id<'de, D>(deserializer: D) -> std::result::Result<Option<Merchant>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<MerchantField>::deserialize(deserializer)? {
        Some(MerchantField::Expanded(m)) => Some(m),
        Some(MerchantField::Id(id)) if !id.is_empty() => Some(Merchant::new(id)),
        _ => None,
    })
}
