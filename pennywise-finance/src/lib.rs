//! pennywise-finance: recurring-spend estimator, daily budget, and the
//! date-batched transaction feed

pub mod aggregator;
pub mod estimator;
pub mod merchants_file;
pub mod session;

pub use aggregator::{BatchOrder, batch_transactions, filter_recurring};
pub use estimator::{MerchantProjection, Projection, RecurringEstimator};
pub use merchants_file::{load_recurring_merchants, save_recurring_merchants};
pub use session::{BudgetSession, SessionOptions};
