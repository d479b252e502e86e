// SEPA credit transfers.

use crate::address::PostalAddress;
use crate::errors::{PaymentError, Result};
use crate::iban::Iban;
use crate::institution::{Bic, FinancialInstitution};
use crate::message::SchemaVersion;
use crate::money::{Currency, Money};
use crate::text;
use crate::xml::XmlWriter;

use super::{
    write_amount, write_creditor, write_payment_id, write_purpose, write_unstructured_remittance,
    PurposeCode,
};

/// EUR credit transfer under the SEPA scheme.
///
/// The creditor agent must be identified by BIC. Charges are always
/// shared at service level (`SLEV`).
#[derive(Debug, Clone, PartialEq)]
pub struct SepaCreditTransfer {
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

impl SepaCreditTransfer {
    pub fn new(
        instruction_id: &str,
        end_to_end_id: &str,
        amount: Money,
        creditor_name: &str,
        creditor_address: Option<PostalAddress>,
        creditor_iban: Iban,
        creditor_agent: Bic,
    ) -> Result<Self> {
        if amount.currency() != Currency::EUR {
            return Err(PaymentError::Validation(
                "The amount must be in EUR.".to_string(),
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

    pub(super) fn write(
        &self,
        w: &mut XmlWriter,
        within_sepa_payment: bool,
        version: SchemaVersion,
    ) -> Result<()> {
        w.start_element("CdtTrfTxInf")?;
        write_payment_id(w, &self.instruction_id, &self.end_to_end_id)?;
        // the service level moves to the payment level when the whole
        // batch is a SEPA batch
        if !within_sepa_payment {
            w.start_element("PmtTpInf")?;
            w.start_element("SvcLvl")?;
            w.text_element("Cd", "SEPA")?;
            w.end_element("SvcLvl")?;
            w.end_element("PmtTpInf")?;
        }
        write_amount(w, self.amount)?;
        w.text_element("ChrgBr", "SLEV")?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_eur_amount() {
        let result = SepaCreditTransfer::new(
            "instr-1",
            "e2e-1",
            Money::new(Currency::CHF, 10000),
            "Bau Muster AG",
            None,
            Iban::new("DE22 2665 0001 9311 6826 12").unwrap(),
            Bic::new("NOLADE21EMS").unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_service_level_placement() {
        let transfer = SepaCreditTransfer::new(
            "instr-1",
            "e2e-1",
            Money::new(Currency::EUR, 10000),
            "Bau Muster AG",
            None,
            Iban::new("DE22 2665 0001 9311 6826 12").unwrap(),
            Bic::new("NOLADE21EMS").unwrap(),
        )
        .unwrap();

        let mut w = XmlWriter::new();
        transfer.write(&mut w, false, SchemaVersion::Sps2021).unwrap();
        assert!(w.into_string().contains("<SvcLvl><Cd>SEPA</Cd></SvcLvl>"));

        let mut w = XmlWriter::new();
        transfer.write(&mut w, true, SchemaVersion::Sps2021).unwrap();
        assert!(!w.into_string().contains("<SvcLvl>"));
    }
}
