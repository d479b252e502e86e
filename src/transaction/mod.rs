// Credit transfer transaction kinds.
//
// Each kind is its own struct with a validating constructor; the closed
// enum dispatches rendering exhaustively so a new kind cannot be added
// without a render arm. Version eligibility is checked at render time,
// when the enclosing message's schema version is finally known.

mod domestic;
mod foreign;
mod legacy;
mod sepa;

pub use domestic::{
    BankCreditTransfer, BankCreditTransferWithCreditorReference, BankCreditTransferWithQrr,
};
pub use foreign::ForeignCreditTransfer;
pub use legacy::{Is1CreditTransfer, Is2CreditTransfer, IsrCreditTransfer};
pub use sepa::SepaCreditTransfer;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{PaymentError, Result};
use crate::message::SchemaVersion;
use crate::money::Money;
use crate::address::PostalAddress;
use crate::xml::XmlWriter;

lazy_static! {
    static ref PURPOSE_PATTERN: Regex = Regex::new(r"^[A-Z]{4}$").unwrap();
}

/// ISO 20022 external purpose code (e.g. `AIRB`, `SALA`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurposeCode {
    code: String,
}

impl PurposeCode {
    pub fn new(code: &str) -> Result<Self> {
        if !PURPOSE_PATTERN.is_match(code) {
            return Err(PaymentError::Validation(
                "The purpose code is invalid.".to_string(),
            ));
        }

        Ok(Self {
            code: code.to_string(),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

/// A single credit transfer instruction within a payment batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Transaction {
    Bank(BankCreditTransfer),
    BankQrr(BankCreditTransferWithQrr),
    BankCreditorReference(BankCreditTransferWithCreditorReference),
    Sepa(SepaCreditTransfer),
    Foreign(ForeignCreditTransfer),
    Is1(Is1CreditTransfer),
    Is2(Is2CreditTransfer),
    Isr(IsrCreditTransfer),
}

impl Transaction {
    /// Instructed amount of this transaction.
    pub fn amount(&self) -> Money {
        match self {
            Transaction::Bank(t) => t.amount(),
            Transaction::BankQrr(t) => t.amount(),
            Transaction::BankCreditorReference(t) => t.amount(),
            Transaction::Sepa(t) => t.amount(),
            Transaction::Foreign(t) => t.amount(),
            Transaction::Is1(t) => t.amount(),
            Transaction::Is2(t) => t.amount(),
            Transaction::Isr(t) => t.amount(),
        }
    }

    pub(crate) fn is_sepa(&self) -> bool {
        matches!(self, Transaction::Sepa(_))
    }

    /// Checks that this transaction kind may appear in a message of the
    /// given schema version. Legacy IS 2-stage and ISR instructions were
    /// retired after SPS 2021.
    pub(crate) fn validate(&self, version: SchemaVersion) -> Result<()> {
        match self {
            Transaction::Is1(_) | Transaction::Is2(_) if version != SchemaVersion::Sps2021 => {
                Err(PaymentError::SchemaVersion(
                    "IS 2-stage payments can only be created until SPS 2021 version".to_string(),
                ))
            }
            Transaction::Isr(_) if version != SchemaVersion::Sps2021 => {
                Err(PaymentError::SchemaVersion(
                    "ISR payments can only be created until SPS 2021 version".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Writes the `CdtTrfTxInf` block.
    pub(crate) fn write(
        &self,
        w: &mut XmlWriter,
        within_sepa_payment: bool,
        version: SchemaVersion,
    ) -> Result<()> {
        self.validate(version)?;
        match self {
            Transaction::Bank(t) => t.write(w, version),
            Transaction::BankQrr(t) => t.write(w, version),
            Transaction::BankCreditorReference(t) => t.write(w, version),
            Transaction::Sepa(t) => t.write(w, within_sepa_payment, version),
            Transaction::Foreign(t) => t.write(w, version),
            Transaction::Is1(t) => t.write(w),
            Transaction::Is2(t) => t.write(w),
            Transaction::Isr(t) => t.write(w),
        }
    }
}

impl From<BankCreditTransfer> for Transaction {
    fn from(t: BankCreditTransfer) -> Self {
        Transaction::Bank(t)
    }
}

impl From<BankCreditTransferWithQrr> for Transaction {
    fn from(t: BankCreditTransferWithQrr) -> Self {
        Transaction::BankQrr(t)
    }
}

impl From<BankCreditTransferWithCreditorReference> for Transaction {
    fn from(t: BankCreditTransferWithCreditorReference) -> Self {
        Transaction::BankCreditorReference(t)
    }
}

impl From<SepaCreditTransfer> for Transaction {
    fn from(t: SepaCreditTransfer) -> Self {
        Transaction::Sepa(t)
    }
}

impl From<ForeignCreditTransfer> for Transaction {
    fn from(t: ForeignCreditTransfer) -> Self {
        Transaction::Foreign(t)
    }
}

impl From<Is1CreditTransfer> for Transaction {
    fn from(t: Is1CreditTransfer) -> Self {
        Transaction::Is1(t)
    }
}

impl From<Is2CreditTransfer> for Transaction {
    fn from(t: Is2CreditTransfer) -> Self {
        Transaction::Is2(t)
    }
}

impl From<IsrCreditTransfer> for Transaction {
    fn from(t: IsrCreditTransfer) -> Self {
        Transaction::Isr(t)
    }
}

// Shared CdtTrfTxInf sub-blocks, in schema order.

pub(super) fn write_payment_id(
    w: &mut XmlWriter,
    instruction_id: &str,
    end_to_end_id: &str,
) -> Result<()> {
    w.start_element("PmtId")?;
    w.text_element("InstrId", instruction_id)?;
    w.text_element("EndToEndId", end_to_end_id)?;
    w.end_element("PmtId")
}

pub(super) fn write_local_instrument(w: &mut XmlWriter, proprietary: &str) -> Result<()> {
    w.start_element("PmtTpInf")?;
    w.start_element("LclInstrm")?;
    w.text_element("Prtry", proprietary)?;
    w.end_element("LclInstrm")?;
    w.end_element("PmtTpInf")
}

pub(super) fn write_amount(w: &mut XmlWriter, amount: Money) -> Result<()> {
    w.start_element("Amt")?;
    w.text_element_with_attrs(
        "InstdAmt",
        &amount.format(),
        &[("Ccy", amount.currency().code())],
    )?;
    w.end_element("Amt")
}

pub(super) fn write_creditor(
    w: &mut XmlWriter,
    name: &str,
    address: Option<&PostalAddress>,
) -> Result<()> {
    w.start_element("Cdtr")?;
    w.text_element("Nm", name)?;
    if let Some(address) = address {
        address.write(w)?;
    }
    w.end_element("Cdtr")
}

pub(super) fn write_purpose(w: &mut XmlWriter, purpose: Option<&PurposeCode>) -> Result<()> {
    if let Some(purpose) = purpose {
        w.start_element("Purp")?;
        w.text_element("Cd", purpose.code())?;
        w.end_element("Purp")?;
    }
    Ok(())
}

pub(super) fn write_unstructured_remittance(
    w: &mut XmlWriter,
    remittance: Option<&str>,
) -> Result<()> {
    if let Some(remittance) = remittance {
        w.start_element("RmtInf")?;
        w.text_element("Ustrd", remittance)?;
        w.end_element("RmtInf")?;
    }
    Ok(())
}
