// Legacy Swiss domestic instruction types, retired after SPS 2021.
//
// IS 2-stage transfers (local instruments CH01/CH02) and ISR payment-slip
// transfers (CH03) remain constructible so older messages can still be
// produced, but rendering them into an SPS 2022 message fails.

use lazy_static::lazy_static;
use regex::Regex;

use crate::account::{check_digit_valid, IsrParticipant, PostalAccount};
use crate::address::PostalAddress;
use crate::errors::{PaymentError, Result};
use crate::iban::Iban;
use crate::money::{Currency, Money};
use crate::text;
use crate::xml::XmlWriter;

use super::{
    write_amount, write_creditor, write_local_instrument, write_payment_id, write_purpose,
    write_unstructured_remittance, PurposeCode,
};

lazy_static! {
    static ref ISR_REFERENCE: Regex = Regex::new(r"^[0-9]{1,27}$").unwrap();
}

fn assert_chf(amount: Money) -> Result<Money> {
    if amount.currency() != Currency::CHF {
        return Err(PaymentError::Validation(
            "The amount must be in CHF.".to_string(),
        ));
    }
    Ok(amount)
}

/// IS 1-stage credit transfer (CH01) to a postal giro account.
#[derive(Debug, Clone, PartialEq)]
pub struct Is1CreditTransfer {
    instruction_id: String,
    end_to_end_id: String,
    amount: Money,
    creditor_name: String,
    creditor_address: PostalAddress,
    creditor_account: PostalAccount,
    purpose: Option<PurposeCode>,
    remittance_information: Option<String>,
}

impl Is1CreditTransfer {
    pub fn new(
        instruction_id: &str,
        end_to_end_id: &str,
        amount: Money,
        creditor_name: &str,
        creditor_address: PostalAddress,
        creditor_account: PostalAccount,
    ) -> Result<Self> {
        Ok(Self {
            instruction_id: text::assert_identifier(instruction_id)?.to_string(),
            end_to_end_id: text::assert_identifier(end_to_end_id)?.to_string(),
            amount: assert_chf(amount)?,
            creditor_name: text::assert_text(creditor_name, 70)?.to_string(),
            creditor_address,
            creditor_account,
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

    pub(super) fn write(&self, w: &mut XmlWriter) -> Result<()> {
        w.start_element("CdtTrfTxInf")?;
        write_payment_id(w, &self.instruction_id, &self.end_to_end_id)?;
        write_local_instrument(w, "CH01")?;
        write_amount(w, self.amount)?;
        write_creditor(w, &self.creditor_name, Some(&self.creditor_address))?;
        w.start_element("CdtrAcct")?;
        self.creditor_account.write_id(w)?;
        w.end_element("CdtrAcct")?;
        write_purpose(w, self.purpose.as_ref())?;
        write_unstructured_remittance(w, self.remittance_information.as_deref())?;
        w.end_element("CdtTrfTxInf")
    }
}

/// IS 2-stage credit transfer (CH02) to an IBAN at a bank identified by
/// name and postal account.
#[derive(Debug, Clone, PartialEq)]
pub struct Is2CreditTransfer {
    instruction_id: String,
    end_to_end_id: String,
    amount: Money,
    creditor_name: String,
    creditor_address: PostalAddress,
    creditor_iban: Iban,
    creditor_agent_name: String,
    creditor_agent_account: PostalAccount,
    purpose: Option<PurposeCode>,
    remittance_information: Option<String>,
}

impl Is2CreditTransfer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instruction_id: &str,
        end_to_end_id: &str,
        amount: Money,
        creditor_name: &str,
        creditor_address: PostalAddress,
        creditor_iban: Iban,
        creditor_agent_name: &str,
        creditor_agent_account: PostalAccount,
    ) -> Result<Self> {
        Ok(Self {
            instruction_id: text::assert_identifier(instruction_id)?.to_string(),
            end_to_end_id: text::assert_identifier(end_to_end_id)?.to_string(),
            amount: assert_chf(amount)?,
            creditor_name: text::assert_text(creditor_name, 70)?.to_string(),
            creditor_address,
            creditor_iban,
            creditor_agent_name: text::assert_text(creditor_agent_name, 70)?.to_string(),
            creditor_agent_account,
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

    pub(super) fn write(&self, w: &mut XmlWriter) -> Result<()> {
        w.start_element("CdtTrfTxInf")?;
        write_payment_id(w, &self.instruction_id, &self.end_to_end_id)?;
        write_local_instrument(w, "CH02")?;
        write_amount(w, self.amount)?;
        w.start_element("CdtrAgt")?;
        w.start_element("FinInstnId")?;
        w.text_element("Nm", &self.creditor_agent_name)?;
        w.start_element("Othr")?;
        w.text_element("Id", &self.creditor_agent_account.format())?;
        w.end_element("Othr")?;
        w.end_element("FinInstnId")?;
        w.end_element("CdtrAgt")?;
        write_creditor(w, &self.creditor_name, Some(&self.creditor_address))?;
        w.start_element("CdtrAcct")?;
        self.creditor_iban.write_id(w)?;
        w.end_element("CdtrAcct")?;
        write_purpose(w, self.purpose.as_ref())?;
        write_unstructured_remittance(w, self.remittance_information.as_deref())?;
        w.end_element("CdtTrfTxInf")
    }
}

/// ISR payment-slip credit transfer (CH03).
///
/// The creditor is addressed by ISR participant number; the ISR reference
/// travels as structured remittance information. Creditor name and
/// address are optional details some banks require for screening.
#[derive(Debug, Clone, PartialEq)]
pub struct IsrCreditTransfer {
    instruction_id: String,
    end_to_end_id: String,
    amount: Money,
    creditor_account: IsrParticipant,
    creditor_reference: String,
    creditor_name: Option<String>,
    creditor_address: Option<PostalAddress>,
}

impl IsrCreditTransfer {
    pub fn new(
        instruction_id: &str,
        end_to_end_id: &str,
        amount: Money,
        creditor_account: IsrParticipant,
        creditor_reference: &str,
    ) -> Result<Self> {
        if !ISR_REFERENCE.is_match(creditor_reference) || !check_digit_valid(creditor_reference) {
            return Err(PaymentError::Validation(
                "The ISR creditor reference is invalid.".to_string(),
            ));
        }

        Ok(Self {
            instruction_id: text::assert_identifier(instruction_id)?.to_string(),
            end_to_end_id: text::assert_identifier(end_to_end_id)?.to_string(),
            amount: assert_chf(amount)?,
            creditor_account,
            creditor_reference: creditor_reference.to_string(),
            creditor_name: None,
            creditor_address: None,
        })
    }

    pub fn set_creditor_details(&mut self, name: &str, address: PostalAddress) -> Result<()> {
        self.creditor_name = Some(text::assert_text(name, 70)?.to_string());
        self.creditor_address = Some(address);
        Ok(())
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub(super) fn write(&self, w: &mut XmlWriter) -> Result<()> {
        w.start_element("CdtTrfTxInf")?;
        write_payment_id(w, &self.instruction_id, &self.end_to_end_id)?;
        write_local_instrument(w, "CH03")?;
        write_amount(w, self.amount)?;
        if let Some(name) = &self.creditor_name {
            write_creditor(w, name, self.creditor_address.as_ref())?;
        }
        w.start_element("CdtrAcct")?;
        self.creditor_account.write_id(w)?;
        w.end_element("CdtrAcct")?;
        w.start_element("RmtInf")?;
        w.start_element("Strd")?;
        w.start_element("CdtrRefInf")?;
        w.text_element("Ref", &self.creditor_reference)?;
        w.end_element("CdtrRefInf")?;
        w.end_element("Strd")?;
        w.end_element("RmtInf")?;
        w.end_element("CdtTrfTxInf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is1_requires_chf() {
        let result = Is1CreditTransfer::new(
            "instr-101",
            "e2e-101",
            Money::new(Currency::EUR, 30000),
            "Finanzverwaltung Stadt Musterhausen",
            PostalAddress::structured(Some("Altstadt"), Some("1a"), "4998", "Muserhausen", "CH")
                .unwrap(),
            PostalAccount::new("80-5928-4").unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_isr_reference_check_digit() {
        let participant = IsrParticipant::new("01-1439-8").unwrap();
        let result = IsrCreditTransfer::new(
            "instr-110",
            "e2e-110",
            Money::new(Currency::CHF, 20000),
            participant,
            "210000000003139471430009016",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_isr_renders_reference() {
        let transfer = IsrCreditTransfer::new(
            "instr-110",
            "e2e-110",
            Money::new(Currency::CHF, 20000),
            IsrParticipant::new("01-1439-8").unwrap(),
            "210000000003139471430009017",
        )
        .unwrap();
        let mut w = XmlWriter::new();
        transfer.write(&mut w).unwrap();
        let xml = w.into_string();
        assert!(xml.contains("<Prtry>CH03</Prtry>"));
        assert!(xml.contains("<CdtrAcct><Id><Othr><Id>010014398</Id></Othr></Id></CdtrAcct>"));
        assert!(xml.contains("<Ref>210000000003139471430009017</Ref>"));
        assert!(!xml.contains("<Cdtr>"));
    }
}
