use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::Amount;
use crate::amount::ParseAmountError;
use crate::model::{CheckoutEvent, PaymentMethod, SaleId, TenderId, TenderRequest};
use crate::register::{Journal, TotalsOverflow};

/// Errors that can occur when reading events or writing the report
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open '{path}': {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized event type '{event_type}'")]
    UnrecognizedType { line: usize, event_type: String },

    #[error("line {line}: {event_type} missing {field}")]
    MissingField {
        line: usize,
        event_type: String,
        field: &'static str,
    },

    #[error("line {line}: {source}")]
    InvalidAmount {
        line: usize,
        source: ParseAmountError,
    },

    #[error("cannot write report: {0}")]
    Totals(#[from] TotalsOverflow),

    #[error("failed to write report: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush report: {0}")]
    Flush(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct InputRow {
    r#type: String,
    sale: SaleId,
    tender: Option<TenderId>,
    method: Option<PaymentMethod>,
    amount: Option<String>,
    installments: Option<u8>,
    reference: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    sale: String,
    total: String,
    cash: String,
    credit_card: String,
    debit_card: String,
    pix: String,
    digital_wallet: String,
    change: String,
}

impl OutputRow {
    fn new(
        sale: String,
        total: Amount,
        paid_by: impl Fn(PaymentMethod) -> Amount,
        change: Amount,
    ) -> Self {
        Self {
            sale,
            total: total.to_string(),
            cash: paid_by(PaymentMethod::Cash).to_string(),
            credit_card: paid_by(PaymentMethod::CreditCard).to_string(),
            debit_card: paid_by(PaymentMethod::DebitCard).to_string(),
            pix: paid_by(PaymentMethod::Pix).to_string(),
            digital_wallet: paid_by(PaymentMethod::DigitalWallet).to_string(),
            change: change.to_string(),
        }
    }
}

/// Open a csv file of checkout events and read it lazily
pub fn read_events(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<CheckoutEvent, CsvError>>, CsvError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CsvError::Open {
        path: path.display().to_string(),
        source: e.into(),
    })?;
    Ok(parse_events(file))
}

/// Read checkout events from any csv source
pub fn parse_events(
    reader: impl io::Read,
) -> impl Iterator<Item = Result<CheckoutEvent, CsvError>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            to_event(line, row)
        })
}

fn to_event(line: usize, row: InputRow) -> Result<CheckoutEvent, CsvError> {
    let sale = row.sale;
    let missing = |field| CsvError::MissingField {
        line,
        event_type: row.r#type.clone(),
        field,
    };
    let amount = || -> Result<Amount, CsvError> {
        row.amount
            .as_deref()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| missing("amount"))?
            .parse::<Amount>()
            .map_err(|source| CsvError::InvalidAmount { line, source })
    };

    match row.r#type.as_str() {
        "open" => Ok(CheckoutEvent::Open {
            sale,
            total: amount()?,
        }),
        "tender" => {
            let method = row.method.ok_or_else(|| missing("method"))?;
            let request = TenderRequest {
                method,
                amount: amount()?,
                installments: row.installments,
                reference: row.reference.clone().filter(|r| !r.is_empty()),
            };
            Ok(CheckoutEvent::Tender { sale, request })
        }
        "remove" => Ok(CheckoutEvent::Remove {
            sale,
            tender: row.tender.ok_or_else(|| missing("tender"))?,
        }),
        "cash" => Ok(CheckoutEvent::CashReceived {
            sale,
            amount: amount()?,
        }),
        "finalize" => Ok(CheckoutEvent::Finalize { sale }),
        "cancel" => Ok(CheckoutEvent::Cancel { sale }),
        other => Err(CsvError::UnrecognizedType {
            line,
            event_type: other.to_string(),
        }),
    }
}

/// Write finalized sales in commit order, followed by a `total` row for the drawer
///
/// Nothing is written when the drawer totals overflow.
pub fn write_report(journal: &Journal, writer: impl io::Write) -> Result<(), CsvError> {
    let totals = journal.drawer_totals()?;
    let mut writer = csv::Writer::from_writer(writer);

    for (sale, settlement) in journal.entries() {
        let row = OutputRow::new(
            sale.to_string(),
            settlement.total,
            |method| settlement.paid_by(method),
            settlement.change.unwrap_or_default(),
        );
        writer.serialize(&row)?;
    }

    let row = OutputRow::new(
        "total".to_string(),
        totals.gross,
        |method| totals.by_method.get(&method).copied().unwrap_or_default(),
        totals.change_given,
    );
    writer.serialize(&row)?;

    writer.flush()?;
    Ok(())
}
