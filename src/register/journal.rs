use std::collections::{BTreeMap, HashSet};

use crate::Amount;
use crate::ledger::{SaleCommitter, Settlement};
use crate::model::{PaymentMethod, SaleId};

use super::{SaleAlreadyCommitted, TotalsOverflow};

/// Sums over the finalized sales of a [`Journal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerTotals {
    /// Sum of the sale totals.
    pub gross: Amount,
    /// Amount collected per payment method, every method included.
    pub by_method: BTreeMap<PaymentMethod, Amount>,
    /// Change handed back to customers.
    pub change_given: Amount,
}

/// In-memory record of finalized sales, i.e. the register's cash drawer.
#[derive(Debug, Default)]
pub struct Journal {
    entries: Vec<(SaleId, Settlement)>,
    committed: HashSet<SaleId>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalized sales in commit order.
    pub fn entries(&self) -> &[(SaleId, Settlement)] {
        &self.entries
    }

    pub fn contains(&self, sale: SaleId) -> bool {
        self.committed.contains(&sale)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Totals across every finalized sale, or [`TotalsOverflow`] when they do
    /// not fit an [`Amount`].
    pub fn drawer_totals(&self) -> Result<DrawerTotals, TotalsOverflow> {
        let settlements = || self.entries.iter().map(|(_, s)| s);

        let mut by_method: BTreeMap<_, _> = PaymentMethod::ALL
            .into_iter()
            .map(|method| (method, Amount::ZERO))
            .collect();
        for tender in settlements().flat_map(|s| &s.tenders) {
            let total = by_method.entry(tender.method).or_default();
            *total = total.checked_add(tender.amount).ok_or(TotalsOverflow)?;
        }

        Ok(DrawerTotals {
            gross: Amount::checked_sum(settlements().map(|s| s.total)).ok_or(TotalsOverflow)?,
            by_method,
            change_given: Amount::checked_sum(settlements().filter_map(|s| s.change))
                .ok_or(TotalsOverflow)?,
        })
    }
}

impl SaleCommitter for Journal {
    type Error = SaleAlreadyCommitted;

    fn commit(&mut self, sale: SaleId, settlement: &Settlement) -> Result<(), Self::Error> {
        if !self.committed.insert(sale) {
            return Err(SaleAlreadyCommitted(sale));
        }
        self.entries.push((sale, settlement.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tender;

    fn settlement(tenders: &[(PaymentMethod, i64)], change: Option<i64>) -> Settlement {
        let tenders: Vec<_> = tenders
            .iter()
            .zip(1..)
            .map(|(&(method, cents), id)| Tender {
                id,
                method,
                amount: Amount::from_cents(cents),
                installments: 1,
                reference: None,
            })
            .collect();
        let total = tenders.iter().map(|t| t.amount).sum::<Amount>();
        let cash: Amount = tenders
            .iter()
            .filter(|t| t.is_cash())
            .map(|t| t.amount)
            .sum();

        Settlement {
            total,
            tenders,
            cash_received: change.map(|c| cash + Amount::from_cents(c)),
            change: change.map(Amount::from_cents),
        }
    }

    #[test]
    fn new_journal_is_empty() {
        let journal = Journal::new();
        assert!(journal.is_empty());
        let totals = journal.drawer_totals().unwrap();
        assert_eq!(totals.gross, Amount::ZERO);
        assert_eq!(totals.change_given, Amount::ZERO);
        assert_eq!(totals.by_method.len(), PaymentMethod::ALL.len());
    }

    #[test]
    fn commit_records_in_order() {
        let mut journal = Journal::new();
        journal
            .commit(2, &settlement(&[(PaymentMethod::Pix, 1000)], None))
            .unwrap();
        journal
            .commit(1, &settlement(&[(PaymentMethod::Cash, 500)], Some(0)))
            .unwrap();

        let sales: Vec<_> = journal.entries().iter().map(|(sale, _)| *sale).collect();
        assert_eq!(sales, vec![2, 1]);
        assert!(journal.contains(1));
        assert!(!journal.contains(3));
    }

    #[test]
    fn duplicate_commit_fails() {
        let mut journal = Journal::new();
        let s = settlement(&[(PaymentMethod::Pix, 1000)], None);
        journal.commit(1, &s).unwrap();

        assert_eq!(journal.commit(1, &s), Err(SaleAlreadyCommitted(1)));
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn drawer_summary() {
        let mut journal = Journal::new();
        journal
            .commit(
                1,
                &settlement(
                    &[(PaymentMethod::Cash, 6000), (PaymentMethod::CreditCard, 4000)],
                    Some(500),
                ),
            )
            .unwrap();
        journal
            .commit(
                2,
                &settlement(&[(PaymentMethod::Cash, 2000), (PaymentMethod::Pix, 1000)], None),
            )
            .unwrap();

        let totals = journal.drawer_totals().unwrap();
        let by_method = &totals.by_method;
        assert_eq!(by_method[&PaymentMethod::Cash], Amount::from_cents(8000));
        assert_eq!(by_method[&PaymentMethod::CreditCard], Amount::from_cents(4000));
        assert_eq!(by_method[&PaymentMethod::Pix], Amount::from_cents(1000));
        assert_eq!(by_method[&PaymentMethod::DebitCard], Amount::ZERO);

        assert_eq!(totals.gross, Amount::from_cents(13_000));
        assert_eq!(totals.change_given, Amount::from_cents(500));
    }

    #[test]
    fn drawer_totals_overflow_is_an_error() {
        // each sale is valid on its own, only the sum does not fit
        let half = i64::MAX / 2 + 1;
        let mut journal = Journal::new();
        journal
            .commit(1, &settlement(&[(PaymentMethod::Pix, half)], None))
            .unwrap();
        journal
            .commit(2, &settlement(&[(PaymentMethod::Pix, half)], None))
            .unwrap();

        assert_eq!(journal.drawer_totals(), Err(TotalsOverflow));
        assert_eq!(journal.len(), 2);
    }
}
