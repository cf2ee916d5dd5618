//! pennywise-core: account, transaction and merchant types plus the money
//! and calendar helpers shared by the budget engine

pub mod error;
pub mod money;
pub mod recurring;
pub mod time;
pub mod transaction;

pub use error::CoreError;
pub use recurring::{RecurringMerchantEntry, RecurringMerchants};
pub use time::{Clock, FixedClock, MonthLength, SystemClock, date_label};
pub use transaction::{
    AccountSummary, CARD_CHECK_NOTE, DailyBatch, DisplayTransaction, Merchant, Transaction,
};
