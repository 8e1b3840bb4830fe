//! Checkout register.
//!
//! The register replays checkout events for any number of sales. Each open
//! sale owns its own [`Ledger`]; settled sales are handed to a
//! [`SaleCommitter`] and dropped. Also supports an async stream of events.

use std::collections::HashMap;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::Amount;
use crate::ledger::{Ledger, SaleCommitter};
use crate::model::{CheckoutEvent, SaleId, TenderId, TenderRequest};

mod error;
pub use error::{RegisterError, SaleAlreadyCommitted, TotalsOverflow};

mod journal;
pub use journal::{DrawerTotals, Journal};

/// Finalized-sale lookup the register uses to refuse reopening a committed sale.
pub trait CommittedSales {
    fn is_committed(&self, sale: SaleId) -> bool;
}

impl CommittedSales for Journal {
    fn is_committed(&self, sale: SaleId) -> bool {
        self.contains(sale)
    }
}

/// The checkout register.
///
/// Holds one ledger per open sale and the committer finalized sales go to.
pub struct Register<C = Journal> {
    open: HashMap<SaleId, Ledger>,
    committer: C,
}

impl Register<Journal> {
    pub fn new() -> Self {
        Self::with_committer(Journal::new())
    }
}

/// Public API
impl<C> Register<C>
where
    C: SaleCommitter + CommittedSales,
{
    pub fn with_committer(committer: C) -> Self {
        Self {
            open: HashMap::new(),
            committer,
        }
    }

    /// Run the register with the given event stream
    pub async fn run(&mut self, mut stream: impl Stream<Item = CheckoutEvent> + Unpin) {
        while let Some(event) = stream.next().await {
            // a rejected event must not stop the register, it is logged by `apply`
            let _ = self.apply(event);
        }
    }

    /// Return the ledger of an open sale
    pub fn ledger(&self, sale: SaleId) -> Option<&Ledger> {
        self.open.get(&sale)
    }

    /// Ids of the sales still open, sorted
    pub fn open_sales(&self) -> Vec<SaleId> {
        let mut sales: Vec<_> = self.open.keys().copied().collect();
        sales.sort_unstable();
        sales
    }

    pub fn committer(&self) -> &C {
        &self.committer
    }

    pub fn into_committer(self) -> C {
        self.committer
    }

    /// Apply a single event on top of the current register state
    pub fn apply(&mut self, event: CheckoutEvent) -> Result<(), RegisterError> {
        let kind = event.kind();
        let sale = event.sale();

        let result = match event {
            CheckoutEvent::Open { sale, total } => self.open_sale(sale, total),
            CheckoutEvent::Tender { sale, request } => self.apply_tender(sale, request),
            CheckoutEvent::Remove { sale, tender } => self.apply_remove(sale, tender),
            CheckoutEvent::CashReceived { sale, amount } => self.apply_cash(sale, amount),
            CheckoutEvent::Finalize { sale } => self.finalize(sale),
            CheckoutEvent::Cancel { sale } => self.cancel(sale),
        };

        self.log_result(kind, sale, &result);
        result
    }
}

/// Private API
impl<C> Register<C>
where
    C: SaleCommitter + CommittedSales,
{
    /// Small helper to log `apply` results, with the balance of sales still open
    fn log_result(&self, kind: &str, sale: SaleId, result: &Result<(), RegisterError>) {
        match (result, self.ledger(sale)) {
            (Ok(()), Some(ledger)) => {
                info!(
                    sale = %sale,
                    remaining = %ledger.remaining_balance(),
                    "{kind} applied"
                );
            }
            (Ok(()), None) => {
                info!(sale = %sale, "{kind} applied");
            }
            (Err(e), _) => {
                info!(sale = %sale, reason = %e, "{kind} skipped");
            }
        }
    }

    /// Open a ledger for a new sale:
    /// - Ensure the sale is neither open nor finalized
    /// - Ensure the total is valid
    fn open_sale(&mut self, sale: SaleId, total: Amount) -> Result<(), RegisterError> {
        if self.open.contains_key(&sale) {
            return Err(RegisterError::SaleAlreadyOpen(sale));
        }
        if self.committer.is_committed(sale) {
            return Err(RegisterError::SaleAlreadyFinalized(sale));
        }

        let ledger = Ledger::new(total).map_err(|source| RegisterError::Ledger { sale, source })?;
        self.open.insert(sale, ledger);
        Ok(())
    }

    fn ledger_mut(&mut self, sale: SaleId) -> Result<&mut Ledger, RegisterError> {
        self.open
            .get_mut(&sale)
            .ok_or(RegisterError::SaleNotOpen(sale))
    }

    fn apply_tender(&mut self, sale: SaleId, request: TenderRequest) -> Result<(), RegisterError> {
        let ledger = self.ledger_mut(sale)?;
        let applied = ledger
            .add_tender(request)
            .map_err(|source| RegisterError::Ledger { sale, source })?;

        info!(sale = %sale, tender = applied.id, remaining = %applied.remaining, "tender accepted");
        Ok(())
    }

    fn apply_remove(&mut self, sale: SaleId, tender: TenderId) -> Result<(), RegisterError> {
        let ledger = self.ledger_mut(sale)?;
        let removed = ledger
            .remove_tender(tender)
            .map_err(|source| RegisterError::Ledger { sale, source })?;

        if removed.is_cash() && ledger.cash_declared() && ledger.change_due().is_none() {
            warn!(
                sale = %sale,
                cash_received = %ledger.cash_received(),
                "last cash tender removed, declared cash is kept"
            );
        }
        Ok(())
    }

    fn apply_cash(&mut self, sale: SaleId, amount: Amount) -> Result<(), RegisterError> {
        self.ledger_mut(sale)?
            .set_cash_received(amount)
            .map_err(|source| RegisterError::Ledger { sale, source })
    }

    /// Finalize a sale:
    /// - Ensure the ledger can be finalized
    /// - Hand the settlement to the committer
    /// - Drop the ledger only once the commit succeeded
    fn finalize(&mut self, sale: SaleId) -> Result<(), RegisterError> {
        let ledger = self.ledger(sale).ok_or(RegisterError::SaleNotOpen(sale))?;
        let settlement = ledger.settlement().ok_or_else(|| RegisterError::NotSettled {
            sale,
            remaining: ledger.remaining_balance(),
            change: ledger.change_due(),
        })?;

        // the ledger stays open on failure so the caller can retry or cancel
        self.committer
            .commit(sale, &settlement)
            .map_err(|e| RegisterError::Commit {
                sale,
                reason: e.to_string(),
            })?;

        self.open.remove(&sale);
        Ok(())
    }

    fn cancel(&mut self, sale: SaleId) -> Result<(), RegisterError> {
        self.open
            .remove(&sale)
            .map(|_| ())
            .ok_or(RegisterError::SaleNotOpen(sale))
    }
}

impl Default for Register<Journal> {
    fn default() -> Self {
        Self::new()
    }
}
