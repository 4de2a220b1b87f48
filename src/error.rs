use thiserror::Error;

/// Caller-side contract violations. Cell contents never produce one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown grid target '{0}', expected 'submitted' or 'draft'")]
    InvalidTarget(String),

    #[error("unknown weekday '{0}', expected one of mon, tue, wed, thu, fri")]
    UnknownDay(String),

    #[error("unknown work package field '{0}'")]
    UnknownField(String),

    #[error("'{0}' is not a row id")]
    InvalidRowId(String),
}
