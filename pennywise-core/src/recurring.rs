//! The configured set of merchants that bill on a regular cycle

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// One entry of `recurring_merchants.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurringMerchantEntry {
    pub merchant_id: String,
}

/// Ordered, de-duplicated merchant ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurringMerchants {
    ids: Vec<String>,
}

impl RecurringMerchants {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for id in ids {
            set.insert(id);
        }
        set
    }

    pub fn from_entries(entries: &[RecurringMerchantEntry]) -> Self {
        Self::new(entries.iter().map(|e| e.merchant_id.clone()))
    }

    pub fn to_entries(&self) -> Vec<RecurringMerchantEntry> {
        self.ids
            .iter()
            .map(|id| RecurringMerchantEntry {
                merchant_id: id.clone(),
            })
            .collect()
    }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// True when the transaction's merchant is recurring. Transactions
    /// without a merchant never are.
    pub fn matches(&self, txn: &Transaction) -> bool {
        txn.merchant_id().is_some_and(|id| self.contains(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
