//! Core domain types for split-payment settlement.

use std::fmt;

use serde::Deserialize;

use crate::Amount;

/// Sale identifier, scoped to one register run.
pub type SaleId = u32;

/// Tender identifier, assigned by a ledger in application order.
pub type TenderId = u32;

/// Payment instruments a tender can be made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
    DigitalWallet,
}

impl PaymentMethod {
    /// Every method, in report column order.
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Pix,
        PaymentMethod::DigitalWallet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Pix => "pix",
            PaymentMethod::DigitalWallet => "digital_wallet",
        }
    }

    /// Only credit card payments can be split into installments.
    pub fn allows_installments(self) -> bool {
        self == PaymentMethod::CreditCard
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment the cashier wants to apply to a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenderRequest {
    pub method: PaymentMethod,
    pub amount: Amount,
    /// Requested installments; only honoured for credit card.
    pub installments: Option<u8>,
    /// Authorization code or any other free text.
    pub reference: Option<String>,
}

impl TenderRequest {
    pub fn new(method: PaymentMethod, amount: Amount) -> Self {
        Self {
            method,
            amount,
            installments: None,
            reference: None,
        }
    }

    pub fn with_installments(mut self, installments: u8) -> Self {
        self.installments = Some(installments);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// A tender accepted by a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tender {
    pub id: TenderId,
    pub method: PaymentMethod,
    pub amount: Amount,
    /// Always 1 unless `method` is credit card.
    pub installments: u8,
    pub reference: Option<String>,
}

impl Tender {
    pub fn is_cash(&self) -> bool {
        self.method == PaymentMethod::Cash
    }
}

/// An event of a checkout session, the input of the register.
#[derive(Debug, Clone)]
pub enum CheckoutEvent {
    /// Start a checkout for a sale with a known total.
    Open { sale: SaleId, total: Amount },
    /// Apply a payment towards the sale total.
    Tender { sale: SaleId, request: TenderRequest },
    /// Take back a previously applied tender.
    Remove { sale: SaleId, tender: TenderId },
    /// Declare the physical cash handed over by the customer.
    CashReceived { sale: SaleId, amount: Amount },
    /// Commit a settled sale.
    Finalize { sale: SaleId },
    /// Drop the checkout without committing anything.
    Cancel { sale: SaleId },
}

impl CheckoutEvent {
    pub fn sale(&self) -> SaleId {
        match self {
            CheckoutEvent::Open { sale, .. }
            | CheckoutEvent::Tender { sale, .. }
            | CheckoutEvent::Remove { sale, .. }
            | CheckoutEvent::CashReceived { sale, .. }
            | CheckoutEvent::Finalize { sale }
            | CheckoutEvent::Cancel { sale } => *sale,
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckoutEvent::Open { .. } => "open",
            CheckoutEvent::Tender { .. } => "tender",
            CheckoutEvent::Remove { .. } => "remove",
            CheckoutEvent::CashReceived { .. } => "cash",
            CheckoutEvent::Finalize { .. } => "finalize",
            CheckoutEvent::Cancel { .. } => "cancel",
        }
    }
}
