use crate::Amount;
use crate::model::{PaymentMethod, SaleId, Tender};

/// Final state of a settled ledger, handed to a [`SaleCommitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub total: Amount,
    /// Tenders in application order.
    pub tenders: Vec<Tender>,
    /// Physical cash declared by the cashier, if any.
    pub cash_received: Option<Amount>,
    /// Change owed to the customer, present only for cash sales with declared cash.
    pub change: Option<Amount>,
}

impl Settlement {
    /// Sum of the tenders made with `method`.
    pub fn paid_by(&self, method: PaymentMethod) -> Amount {
        super::paid_by(&self.tenders, method)
    }
}

/// Outbound collaborator that records a finalized sale (backend persistence, journal...).
///
/// Only called with a settlement obtained from
/// [`Ledger::settlement`](super::Ledger::settlement). Retry and rollback policy
/// on failure belongs to the caller.
pub trait SaleCommitter {
    type Error: std::error::Error;

    fn commit(&mut self, sale: SaleId, settlement: &Settlement) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tender(id: u32, method: PaymentMethod, cents: i64) -> Tender {
        Tender {
            id,
            method,
            amount: Amount::from_cents(cents),
            installments: 1,
            reference: None,
        }
    }

    #[test]
    fn paid_by_sums_per_method() {
        let settlement = Settlement {
            total: Amount::from_cents(10_000),
            tenders: vec![
                tender(1, PaymentMethod::Cash, 2000),
                tender(2, PaymentMethod::Pix, 5000),
                tender(3, PaymentMethod::Cash, 3000),
            ],
            cash_received: None,
            change: None,
        };

        assert_eq!(settlement.paid_by(PaymentMethod::Cash), Amount::from_cents(5000));
        assert_eq!(settlement.paid_by(PaymentMethod::Pix), Amount::from_cents(5000));
        assert_eq!(settlement.paid_by(PaymentMethod::DebitCard), Amount::ZERO);
    }
}
