//! Error types for ledger operations.

use thiserror::Error;

use crate::Amount;
use crate::model::TenderId;

/// Validation failure of a ledger operation.
///
/// A failed operation never mutates the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("sale total must be positive, got {0}")]
    InvalidTotal(Amount),

    #[error("invalid amount {0}")]
    InvalidAmount(Amount),

    #[error("installments must be at least 1")]
    InvalidInstallments,

    #[error("tender of {requested} exceeds remaining balance {remaining}")]
    Overpayment { requested: Amount, remaining: Amount },

    #[error("tender {0} not found")]
    TenderNotFound(TenderId),
}
