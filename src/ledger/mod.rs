//! Split-payment ledger.
//!
//! A ledger covers one sale total with any number of tenders, possibly of
//! different methods. It rejects tenders that would overpay the sale, tracks
//! the physical cash handed over by the customer to compute change, and tells
//! the caller when the sale is settled. It performs no I/O and never commits
//! the sale itself.

use crate::Amount;
use crate::model::{PaymentMethod, Tender, TenderId, TenderRequest};

mod error;
pub use error::LedgerError;

mod settlement;
pub use settlement::{SaleCommitter, Settlement};

/// Result of a successful [`Ledger::add_tender`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// Identity of the new tender, used to remove it later.
    pub id: TenderId,
    /// Balance still owed after this tender.
    pub remaining: Amount,
}

/// Tenders applied against a fixed sale total.
#[derive(Debug, Clone)]
pub struct Ledger {
    total: Amount,
    tenders: Vec<Tender>,
    /// `None` until the cashier declares the cash handed over
    cash_received: Option<Amount>,
    next_id: TenderId,
}

/// Public API
impl Ledger {
    /// Create an empty ledger for a sale of `total`.
    pub fn new(total: Amount) -> Result<Self, LedgerError> {
        if !total.is_positive() {
            return Err(LedgerError::InvalidTotal(total));
        }

        Ok(Self {
            total,
            tenders: Vec::new(),
            cash_received: None,
            next_id: 1,
        })
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    /// Tenders in application order.
    pub fn tenders(&self) -> &[Tender] {
        &self.tenders
    }

    pub fn tender(&self, id: TenderId) -> Option<&Tender> {
        self.tenders.iter().find(|t| t.id == id)
    }

    /// Apply a tender:
    /// - Ensure the amount is positive
    /// - Normalize installments (credit card only, others forced to 1)
    /// - Ensure the amount does not exceed the remaining balance
    /// - Append the tender with a fresh id
    pub fn add_tender(&mut self, request: TenderRequest) -> Result<Applied, LedgerError> {
        let TenderRequest {
            method,
            amount,
            installments,
            reference,
        } = request;

        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let installments = if method.allows_installments() {
            match installments {
                Some(0) => return Err(LedgerError::InvalidInstallments),
                Some(n) => n,
                None => 1,
            }
        } else {
            1
        };

        let remaining = self.remaining_balance();
        if amount > remaining {
            return Err(LedgerError::Overpayment {
                requested: amount,
                remaining,
            });
        }

        let id = self.next_id;
        self.next_id += 1;
        self.tenders.push(Tender {
            id,
            method,
            amount,
            installments,
            reference,
        });

        Ok(Applied {
            id,
            remaining: remaining - amount,
        })
    }

    /// Remove a tender by id, returning it.
    pub fn remove_tender(&mut self, id: TenderId) -> Result<Tender, LedgerError> {
        let index = self
            .tenders
            .iter()
            .position(|t| t.id == id)
            .ok_or(LedgerError::TenderNotFound(id))?;

        // keep application order for the remaining tenders
        Ok(self.tenders.remove(index))
    }

    /// Declare the physical cash handed over by the customer.
    ///
    /// Can be called before or after the cash tender is added. Removing cash
    /// tenders does not clear it.
    pub fn set_cash_received(&mut self, amount: Amount) -> Result<(), LedgerError> {
        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount(amount));
        }

        self.cash_received = Some(amount);
        Ok(())
    }

    /// Declared cash, zero until declared.
    pub fn cash_received(&self) -> Amount {
        self.cash_received.unwrap_or_default()
    }

    pub fn cash_declared(&self) -> bool {
        self.cash_received.is_some()
    }

    /// Sum of all applied tenders.
    pub fn paid(&self) -> Amount {
        self.tenders.iter().map(|t| t.amount).sum()
    }

    /// Sum of the tenders made with `method`.
    pub fn paid_by(&self, method: PaymentMethod) -> Amount {
        paid_by(&self.tenders, method)
    }

    /// Balance still owed. Never negative as `add_tender` refuses overpayment.
    pub fn remaining_balance(&self) -> Amount {
        self.total - self.paid()
    }

    /// Change owed to the customer.
    ///
    /// `None` when there is no cash tender or no cash has been declared.
    /// Negative when the declared cash does not cover the cash tenders yet.
    pub fn change_due(&self) -> Option<Amount> {
        let cash_received = self.cash_received?;
        if !self.tenders.iter().any(Tender::is_cash) {
            return None;
        }

        Some(cash_received - self.paid_by(PaymentMethod::Cash))
    }

    /// True once the total is exactly covered and no cash is missing.
    pub fn can_finalize(&self) -> bool {
        self.remaining_balance().is_zero() && self.change_due().is_none_or(|c| !c.is_negative())
    }

    /// Snapshot for the commit-sale collaborator, only when the sale can be finalized.
    pub fn settlement(&self) -> Option<Settlement> {
        if !self.can_finalize() {
            return None;
        }

        Some(Settlement {
            total: self.total,
            tenders: self.tenders.clone(),
            cash_received: self.cash_received,
            change: self.change_due(),
        })
    }
}

/// Sum of the `tenders` made with `method`.
///
/// Bounded by the sale total, as a ledger never accepts an overpaying tender.
fn paid_by(tenders: &[Tender], method: PaymentMethod) -> Amount {
    tenders
        .iter()
        .filter(|t| t.method == method)
        .map(|t| t.amount)
        .sum()
}
