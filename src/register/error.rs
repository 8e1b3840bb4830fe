//! Error types for checkout event processing.

use thiserror::Error;

use crate::Amount;
use crate::ledger::LedgerError;
use crate::model::SaleId;

/// Error returned by [`Register::apply`](super::Register::apply).
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("sale {0} is already open")]
    SaleAlreadyOpen(SaleId),

    #[error("sale {0} was already finalized")]
    SaleAlreadyFinalized(SaleId),

    #[error("sale {0} is not open")]
    SaleNotOpen(SaleId),

    #[error("sale {sale}: {source}")]
    Ledger {
        sale: SaleId,
        #[source]
        source: LedgerError,
    },

    #[error("sale {sale} is not settled: remaining {remaining}, change {}", fmt_change(.change))]
    NotSettled {
        sale: SaleId,
        remaining: Amount,
        change: Option<Amount>,
    },

    #[error("sale {sale}: commit failed: {reason}")]
    Commit { sale: SaleId, reason: String },
}

fn fmt_change(change: &Option<Amount>) -> String {
    change.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Returned by the [`Journal`](super::Journal) when a sale id is committed twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sale {0} already committed")]
pub struct SaleAlreadyCommitted(pub SaleId);

/// Returned when the drawer totals across finalized sales do not fit an [`Amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("drawer totals overflow")]
pub struct TotalsOverflow;
