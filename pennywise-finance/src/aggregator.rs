//! Transaction feed: hides recurring merchants and groups what is left into
//! date-labelled batches with a per-day spend total.

use chrono::NaiveDate;
use pennywise_core::{
    CoreError, DailyBatch, DisplayTransaction, RecurringMerchants, Transaction, date_label, money,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Order in which the date batches are emitted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BatchOrder {
    /// Newest date first
    #[default]
    #[serde(rename = "calendar-desc")]
    CalendarDescending,
    /// Labels in the order first met in the list, then reversed
    #[serde(rename = "first-seen-reversed")]
    FirstSeenReversed,
}

/// Move every recurring-merchant transaction out of `transactions`,
/// returning the removed entries in their original order. Running it again
/// on the result removes nothing.
pub fn filter_recurring(
    transactions: &mut Vec<Transaction>,
    recurring: &RecurringMerchants,
) -> Vec<Transaction> {
    let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(transactions)
        .into_iter()
        .partition(|txn| recurring.matches(txn));
    *transactions = kept;
    removed
}

/// Normalize one transaction for display.
pub fn to_display(txn: &Transaction, today: NaiveDate) -> Result<DisplayTransaction, CoreError> {
    let created_on = txn.created_date()?;
    Ok(DisplayTransaction {
        id: txn.id.clone(),
        amount: money::display_amount(txn.amount),
        date: date_label(created_on, today),
        created_on,
        amount_minor: txn.spend_minor()?,
        merchant: txn.merchant.clone(),
        notes: txn.notes.clone(),
    })
}

/// Group transactions into daily batches.
///
/// Callers are expected to have run [`filter_recurring`] first; this
/// function does not look at merchants.
pub fn batch_transactions(
    transactions: &[Transaction],
    today: NaiveDate,
    order: BatchOrder,
) -> Result<Vec<DailyBatch>, CoreError> {
    let rows = transactions
        .iter()
        .map(|txn| to_display(txn, today))
        .collect::<Result<Vec<_>, _>>()?;

    let labels = match order {
        BatchOrder::FirstSeenReversed => {
            let mut labels: Vec<&str> = Vec::new();
            for txn in &rows {
                if !labels.contains(&txn.date.as_str()) {
                    labels.push(txn.date.as_str());
                }
            }
            labels.reverse();
            labels
        }
        BatchOrder::CalendarDescending => {
            let mut dates: Vec<(NaiveDate, &str)> = Vec::new();
            for txn in &rows {
                if !dates.iter().any(|(d, _)| *d == txn.created_on) {
                    dates.push((txn.created_on, txn.date.as_str()));
                }
            }
            dates.sort_by(|a, b| b.0.cmp(&a.0));
            dates.into_iter().map(|(_, label)| label).collect()
        }
    };

    let batches = labels
        .into_iter()
        .map(|label| -> Result<DailyBatch, CoreError> {
            let batch: Vec<DisplayTransaction> =
                rows.iter().filter(|txn| txn.date == label).cloned().collect();
            Ok(DailyBatch {
                date: label.to_string(),
                total_spent: money::format_minor(spent_total(&batch)?),
                transactions: batch,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        transactions = rows.len(),
        batches = batches.len(),
        "transactions batched"
    );
    Ok(batches)
}

// refunds stay listed but don't reduce the total
fn spent_total(batch: &[DisplayTransaction]) -> Result<i64, CoreError> {
    batch
        .iter()
        .filter(|txn| txn.amount_minor > 0)
        .try_fold(0i64, |total, txn| {
            total
                .checked_add(txn.amount_minor)
                .ok_or_else(|| CoreError::malformed(&txn.id, "daily total out of range"))
        })
}
