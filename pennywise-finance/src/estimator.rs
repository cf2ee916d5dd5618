//! Recurring-spend estimator: projects what the configured recurring
//! merchants will charge between now and the end of the month.
//!
//! For each merchant the observed spend is spread over the span between its
//! first and last charge, and that daily rate is multiplied by the days left.

use chrono::NaiveDate;
use pennywise_core::{CoreError, RecurringMerchants, Transaction, money};
use serde::Serialize;
use tracing::debug;

/// Minimum accumulated spend (minor units) before a merchant is projected
pub const MIN_PROJECTED_SPEND: i64 = 100;

/// Per-merchant breakdown of the projection
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MerchantProjection {
    pub merchant_id: String,
    /// Positive spend observed, major units
    pub total_spent: f64,
    /// Transactions considered (refunds included)
    pub transaction_count: usize,
    /// Days between the first and last observed charge
    pub window_days: i64,
    pub contribution: f64,
}

/// Projection across all recurring merchants
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Projection {
    pub days_left: i64,
    pub merchants: Vec<MerchantProjection>,
    pub total: f64,
}

pub struct RecurringEstimator;

impl RecurringEstimator {
    /// Project recurring spend until month end.
    ///
    /// Fails with `MalformedTransaction` if a matching transaction has an
    /// unparseable `created` date.
    pub fn project<'a, I>(
        transactions: I,
        recurring: &RecurringMerchants,
        days_left: i64,
    ) -> Result<Projection, CoreError>
    where
        I: Iterator<Item = &'a Transaction> + Clone,
    {
        let mut merchants = Vec::with_capacity(recurring.len());
        for merchant_id in recurring.iter() {
            let projection = Self::project_merchant(transactions.clone(), merchant_id, days_left)?;
            debug!(
                merchant_id,
                spent = projection.total_spent,
                window_days = projection.window_days,
                contribution = projection.contribution,
                "recurring merchant projected"
            );
            merchants.push(projection);
        }

        let total = merchants.iter().map(|m| m.contribution).sum();
        Ok(Projection {
            days_left,
            merchants,
            total,
        })
    }

    fn project_merchant<'a, I>(
        transactions: I,
        merchant_id: &str,
        days_left: i64,
    ) -> Result<MerchantProjection, CoreError>
    where
        I: Iterator<Item = &'a Transaction>,
    {
        let mut spent_minor: i64 = 0;
        let mut transaction_count = 0;
        let mut window: Option<(NaiveDate, NaiveDate)> = None;

        for txn in transactions {
            if txn.is_card_check() || txn.merchant_id() != Some(merchant_id) {
                continue;
            }
            transaction_count += 1;

            let spend = txn.spend_minor()?;
            if spend > 0 {
                spent_minor = spent_minor.checked_add(spend).ok_or_else(|| {
                    CoreError::malformed(&txn.id, "recurring spend out of range")
                })?;
            }

            let date = txn.created_date()?;
            window = Some(match window {
                None => (date, date),
                Some((first, last)) => (first.min(date), last.max(date)),
            });
        }

        let window_days = window
            .map(|(first, last)| (last - first).num_days())
            .unwrap_or(0);

        let total_spent = money::major_from_minor(spent_minor);
        // zero-width window: nothing to average over
        let contribution = if spent_minor > MIN_PROJECTED_SPEND && window_days >= 1 {
            total_spent / window_days as f64 * days_left.max(0) as f64
        } else {
            0.0
        };

        Ok(MerchantProjection {
            merchant_id: merchant_id.to_string(),
            total_spent,
            transaction_count,
            window_days,
            contribution,
        })
    }
}
