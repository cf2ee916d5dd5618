use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("malformed transaction {id}: {reason}")]
    MalformedTransaction { id: String, reason: String },
    #[error("no days left this month (days_left = {0})")]
    NoDaysLeft(i64),
}

impl CoreError {
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::MalformedTransaction {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
