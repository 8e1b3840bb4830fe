pub mod amount;
pub mod csv;
pub mod ledger;
pub mod model;
pub mod register;

pub use amount::Amount;
pub use ledger::{Ledger, LedgerError, SaleCommitter, Settlement};
pub use model::{CheckoutEvent, PaymentMethod, SaleId, Tender, TenderId, TenderRequest};
pub use register::{Journal, Register};
