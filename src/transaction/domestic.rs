// Domestic bank credit transfers, including the QR-bill and
// creditor-reference variants.

use lazy_static::lazy_static;
use regex::Regex;

use crate::account::{check_digit_valid, CreditorReference};
use crate::address::PostalAddress;
use crate::errors::{PaymentError, Result};
use crate::iban::Iban;
use crate::institution::FinancialInstitution;
use crate::message::SchemaVersion;
use crate::money::{Currency, Money};
use crate::text;
use crate::xml::XmlWriter;

use super::{
    write_amount, write_creditor, write_payment_id, write_purpose, write_unstructured_remittance,
    PurposeCode,
};

lazy_static! {
    static ref QRR_REFERENCE: Regex = Regex::new(r"^[0-9]{27}$").unwrap();
}

/// Domestic credit transfer to an IBAN at a bank identified by BIC or IID.
#[derive(Debug, Clone, PartialEq)]
pub struct BankCreditTransfer {
    instruction_id: String,
    end_to_end_id: String,
    amount: Money,
    creditor_name: String,
    creditor_address: Option<PostalAddress>,
    creditor_iban: Iban,
    creditor_agent: FinancialInstitution,
    purpose: Option<PurposeCode>,
    remittance_information: Option<String>,
}

impl BankCreditTransfer {
    pub fn new(
        instruction_id: &str,
        end_to_end_id: &str,
        amount: Money,
        creditor_name: &str,
        creditor_address: Option<PostalAddress>,
        creditor_iban: Iban,
        creditor_agent: impl Into<FinancialInstitution>,
    ) -> Result<Self> {
        if !matches!(amount.currency(), Currency::CHF | Currency::EUR) {
            return Err(PaymentError::Validation(
                "The amount must be in CHF or EUR.".to_string(),
            ));
        }

        Ok(Self {
            instruction_id: text::assert_identifier(instruction_id)?.to_string(),
            end_to_end_id: text::assert_identifier(end_to_end_id)?.to_string(),
            amount,
            creditor_name: text::assert_text(creditor_name, 70)?.to_string(),
            creditor_address,
            creditor_iban,
            creditor_agent: creditor_agent.into(),
            purpose: None,
            remittance_information: None,
        })
    }

    pub fn set_purpose(&mut self, purpose: PurposeCode) {
        self.purpose = Some(purpose);
    }

    pub fn set_remittance_information(&mut self, remittance: &str) {
        self.remittance_information = text::sanitize_optional(remittance, 140);
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub(super) fn write(&self, w: &mut XmlWriter, version: SchemaVersion) -> Result<()> {
        w.start_element("CdtTrfTxInf")?;
        write_payment_id(w, &self.instruction_id, &self.end_to_end_id)?;
        write_amount(w, self.amount)?;
        w.start_element("CdtrAgt")?;
        self.creditor_agent.write_identification(w, version)?;
        w.end_element("CdtrAgt")?;
        write_creditor(w, &self.creditor_name, self.creditor_address.as_ref())?;
        w.start_element("CdtrAcct")?;
        self.creditor_iban.write_id(w)?;
        w.end_element("CdtrAcct")?;
        write_purpose(w, self.purpose.as_ref())?;
        write_unstructured_remittance(w, self.remittance_information.as_deref())?;
        w.end_element("CdtTrfTxInf")
    }
}

/// Credit transfer to a QR-IBAN with a QR reference.
#[derive(Debug, Clone, PartialEq)]
pub struct BankCreditTransferWithQrr {
    inner: BankCreditTransfer,
    creditor_reference: String,
}

impl BankCreditTransferWithQrr {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instruction_id: &str,
        end_to_end_id: &str,
        amount: Money,
        creditor_name: &str,
        creditor_address: Option<PostalAddress>,
        creditor_iban: Iban,
        creditor_agent: impl Into<FinancialInstitution>,
        creditor_reference: &str,
    ) -> Result<Self> {
        if !is_qr_iban(&creditor_iban) {
            return Err(PaymentError::Validation(
                "The IBAN must be a QR-IBAN.".to_string(),
            ));
        }
        if !QRR_REFERENCE.is_match(creditor_reference) || !check_digit_valid(creditor_reference) {
            return Err(PaymentError::Validation(
                "The QRR creditor reference is invalid.".to_string(),
            ));
        }

        Ok(Self {
            inner: BankCreditTransfer::new(
                instruction_id,
                end_to_end_id,
                amount,
                creditor_name,
                creditor_address,
                creditor_iban,
                creditor_agent,
            )?,
            creditor_reference: creditor_reference.to_string(),
        })
    }

    pub fn set_purpose(&mut self, purpose: PurposeCode) {
        self.inner.set_purpose(purpose);
    }

    pub fn set_remittance_information(&mut self, remittance: &str) {
        self.inner.set_remittance_information(remittance);
    }

    pub fn amount(&self) -> Money {
        self.inner.amount()
    }

    pub(super) fn write(&self, w: &mut XmlWriter, version: SchemaVersion) -> Result<()> {
        write_with_structured_reference(
            w,
            &self.inner,
            ReferenceType::Proprietary("QRR"),
            &self.creditor_reference,
            version,
        )
    }
}

/// Credit transfer with an ISO 11649 structured creditor reference.
#[derive(Debug, Clone, PartialEq)]
pub struct BankCreditTransferWithCreditorReference {
    inner: BankCreditTransfer,
    creditor_reference: CreditorReference,
}

impl BankCreditTransferWithCreditorReference {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instruction_id: &str,
        end_to_end_id: &str,
        amount: Money,
        creditor_name: &str,
        creditor_address: Option<PostalAddress>,
        creditor_iban: Iban,
        creditor_agent: impl Into<FinancialInstitution>,
        creditor_reference: &str,
    ) -> Result<Self> {
        Ok(Self {
            inner: BankCreditTransfer::new(
                instruction_id,
                end_to_end_id,
                amount,
                creditor_name,
                creditor_address,
                creditor_iban,
                creditor_agent,
            )?,
            creditor_reference: CreditorReference::new(creditor_reference)?,
        })
    }

    pub fn set_purpose(&mut self, purpose: PurposeCode) {
        self.inner.set_purpose(purpose);
    }

    pub fn set_remittance_information(&mut self, remittance: &str) {
        self.inner.set_remittance_information(remittance);
    }

    pub fn amount(&self) -> Money {
        self.inner.amount()
    }

    pub(super) fn write(&self, w: &mut XmlWriter, version: SchemaVersion) -> Result<()> {
        write_with_structured_reference(
            w,
            &self.inner,
            ReferenceType::Code("SCOR"),
            self.creditor_reference.format(),
            version,
        )
    }
}

enum ReferenceType {
    Code(&'static str),
    Proprietary(&'static str),
}

/// Like the plain bank transfer, but the remittance block carries a
/// structured creditor reference; any remittance text moves to
/// `AddtlRmtInf`.
fn write_with_structured_reference(
    w: &mut XmlWriter,
    base: &BankCreditTransfer,
    reference_type: ReferenceType,
    reference: &str,
    version: SchemaVersion,
) -> Result<()> {
    w.start_element("CdtTrfTxInf")?;
    write_payment_id(w, &base.instruction_id, &base.end_to_end_id)?;
    write_amount(w, base.amount)?;
    w.start_element("CdtrAgt")?;
    base.creditor_agent.write_identification(w, version)?;
    w.end_element("CdtrAgt")?;
    write_creditor(w, &base.creditor_name, base.creditor_address.as_ref())?;
    w.start_element("CdtrAcct")?;
    base.creditor_iban.write_id(w)?;
    w.end_element("CdtrAcct")?;
    write_purpose(w, base.purpose.as_ref())?;

    w.start_element("RmtInf")?;
    w.start_element("Strd")?;
    w.start_element("CdtrRefInf")?;
    w.start_element("Tp")?;
    w.start_element("CdOrPrtry")?;
    match reference_type {
        ReferenceType::Code(code) => w.text_element("Cd", code)?,
        ReferenceType::Proprietary(proprietary) => w.text_element("Prtry", proprietary)?,
    }
    w.end_element("CdOrPrtry")?;
    w.end_element("Tp")?;
    w.text_element("Ref", reference)?;
    w.end_element("CdtrRefInf")?;
    if let Some(remittance) = base.remittance_information.as_deref() {
        w.text_element("AddtlRmtInf", remittance)?;
    }
    w.end_element("Strd")?;
    w.end_element("RmtInf")?;
    w.end_element("CdtTrfTxInf")
}

/// QR-IBANs are Swiss or Liechtenstein IBANs whose institution
/// identification lies in the reserved 30000..=31999 range.
fn is_qr_iban(iban: &Iban) -> bool {
    if !matches!(iban.country(), "CH" | "LI") {
        return false;
    }
    match iban.normalize()[4..9].parse::<u32>() {
        Ok(iid) => (30000..=31999).contains(&iid),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::institution::Bic;

    fn chf(minor: i64) -> Money {
        Money::new(Currency::CHF, minor)
    }

    #[test]
    fn test_rejects_foreign_currency() {
        let result = BankCreditTransfer::new(
            "instr-1",
            "e2e-1",
            Money::new(Currency::GBP, 1000),
            "Muster AG",
            None,
            Iban::new("CH51 0022 5225 9529 1301 C").unwrap(),
            Bic::new("UBSWCHZH80A").unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_qrr_requires_qr_iban() {
        let result = BankCreditTransferWithQrr::new(
            "instr-1",
            "e2e-1",
            chf(1000),
            "Muster AG",
            None,
            Iban::new("CH51 0022 5225 9529 1301 C").unwrap(),
            Bic::new("UBSWCHZH80A").unwrap(),
            "210000000003139471430009017",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_qrr_reference_check_digit() {
        let qr_iban = Iban::new("CH44 3199 9123 0008 8901 2").unwrap();
        let result = BankCreditTransferWithQrr::new(
            "instr-1",
            "e2e-1",
            chf(1000),
            "Muster AG",
            None,
            qr_iban,
            Bic::new("UBSWCHZH80A").unwrap(),
            "210000000003139471430009018",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_scor_reference_rendered() {
        let iban = Iban::new("CH51 0022 5225 9529 1301 C").unwrap();
        let transfer = BankCreditTransferWithCreditorReference::new(
            "instr-1",
            "e2e-1",
            chf(1000),
            "Muster AG",
            None,
            iban,
            Bic::new("UBSWCHZH80A").unwrap(),
            "RF 72 0191 2301 0040 5JSH 0438",
        )
        .unwrap();
        let mut w = XmlWriter::new();
        transfer.write(&mut w, SchemaVersion::Sps2021).unwrap();
        let xml = w.into_string();
        assert!(xml.contains("<Cd>SCOR</Cd>"));
        assert!(xml.contains("<Ref>RF720191230100405JSH0438</Ref>"));
    }
}
