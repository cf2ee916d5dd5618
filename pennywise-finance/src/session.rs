//! A budget session: one account snapshot, its transaction history, and the
//! figures derived from them.

use pennywise_core::{
    AccountSummary, Clock, CoreError, DailyBatch, MonthLength, RecurringMerchants, Transaction,
    money,
};
use tracing::{debug, info};

use crate::aggregator::{self, BatchOrder};
use crate::estimator::{Projection, RecurringEstimator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub month_length: MonthLength,
    pub batch_order: BatchOrder,
}

pub struct BudgetSession {
    summary: AccountSummary,
    /// Visible feed; shrinks when recurring transactions are filtered out
    transactions: Vec<Transaction>,
    /// Recurring-merchant transactions moved out of the feed
    hidden: Vec<Transaction>,
    recurring: RecurringMerchants,
    clock: Box<dyn Clock>,
    days_left: i64,
    options: SessionOptions,
}

impl BudgetSession {
    pub fn new(
        summary: AccountSummary,
        transactions: Vec<Transaction>,
        recurring: RecurringMerchants,
        clock: Box<dyn Clock>,
        options: SessionOptions,
    ) -> Self {
        let days_left = options.month_length.days_left(clock.today());
        debug!(days_left, month_length = ?options.month_length, "budget session created");
        Self {
            summary,
            transactions,
            hidden: Vec::new(),
            recurring,
            clock,
            days_left,
            options,
        }
    }

    pub fn summary(&self) -> &AccountSummary {
        &self.summary
    }

    /// Fixed when the session was created.
    pub fn days_left_this_month(&self) -> i64 {
        self.days_left
    }

    /// The visible feed.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn hidden_transactions(&self) -> &[Transaction] {
        &self.hidden
    }

    /// Projected recurring spend until month end, over the full history
    /// whether or not the feed has been filtered.
    pub fn recurring_projection(&self) -> Result<Projection, CoreError> {
        RecurringEstimator::project(
            self.transactions.iter().chain(self.hidden.iter()),
            &self.recurring,
            self.days_left,
        )
    }

    /// `balance / days_left - projection`, in major units.
    pub fn daily_budget_value(&self) -> Result<f64, CoreError> {
        if self.days_left <= 0 {
            return Err(CoreError::NoDaysLeft(self.days_left));
        }
        let per_day = self.summary.balance_major() / self.days_left as f64;
        let projection = self.recurring_projection()?;
        Ok(per_day - projection.total)
    }

    /// Daily budget as a two-decimal string.
    pub fn daily_budget(&self) -> Result<String, CoreError> {
        self.daily_budget_value().map(money::format_major)
    }

    /// Hide recurring-merchant transactions from the feed. Returns how many
    /// were newly hidden; zero on every call after the first.
    pub fn filter_recurring(&mut self) -> usize {
        let removed = aggregator::filter_recurring(&mut self.transactions, &self.recurring);
        let count = removed.len();
        self.hidden.extend(removed);
        if count > 0 {
            info!(hidden = count, "recurring transactions hidden from feed");
        }
        count
    }

    /// Filter the feed, then group it into daily batches labelled relative
    /// to the clock's current date.
    pub fn batched_transactions(&mut self) -> Result<Vec<DailyBatch>, CoreError> {
        self.filter_recurring();
        aggregator::batch_transactions(
            &self.transactions,
            self.clock.today(),
            self.options.batch_order,
        )
    }
}
