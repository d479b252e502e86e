// Credit transfers to foreign creditors.

use crate::account::AccountReference;
use crate::address::PostalAddress;
use crate::errors::Result;
use crate::institution::{Bic, FinancialInstitution};
use crate::message::SchemaVersion;
use crate::money::Money;
use crate::text;
use crate::xml::XmlWriter;

use super::{
    write_amount, write_creditor, write_payment_id, write_purpose, write_unstructured_remittance,
    PurposeCode,
};

/// Credit transfer in any currency to a creditor abroad.
///
/// The creditor account may be an IBAN or a free-form account number, and
/// the creditor agent any institution identification. An intermediary
/// agent can be routed through when the creditor's bank is not reachable
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignCreditTransfer {
    instruction_id: String,
    end_to_end_id: String,
    amount: Money,
    creditor_name: String,
    creditor_address: Option<PostalAddress>,
    creditor_account: AccountReference,
    creditor_agent: FinancialInstitution,
    intermediary_agent: Option<Bic>,
    purpose: Option<PurposeCode>,
    remittance_information: Option<String>,
}

impl ForeignCreditTransfer {
    pub fn new(
        instruction_id: &str,
        end_to_end_id: &str,
        amount: Money,
        creditor_name: &str,
        creditor_address: Option<PostalAddress>,
        creditor_account: impl Into<AccountReference>,
        creditor_agent: impl Into<FinancialInstitution>,
    ) -> Result<Self> {
        Ok(Self {
            instruction_id: text::assert_identifier(instruction_id)?.to_string(),
            end_to_end_id: text::assert_identifier(end_to_end_id)?.to_string(),
            amount,
            creditor_name: text::assert_text(creditor_name, 70)?.to_string(),
            creditor_address,
            creditor_account: creditor_account.into(),
            creditor_agent: creditor_agent.into(),
            intermediary_agent: None,
            purpose: None,
            remittance_information: None,
        })
    }

    pub fn set_intermediary_agent(&mut self, agent: Bic) {
        self.intermediary_agent = Some(agent);
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
        if let Some(agent) = &self.intermediary_agent {
            w.start_element("IntrmyAgt1")?;
            FinancialInstitution::from(agent.clone()).write_identification(w, version)?;
            w.end_element("IntrmyAgt1")?;
        }
        w.start_element("CdtrAgt")?;
        self.creditor_agent.write_identification(w, version)?;
        w.end_element("CdtrAgt")?;
        write_creditor(w, &self.creditor_name, self.creditor_address.as_ref())?;
        w.start_element("CdtrAcct")?;
        self.creditor_account.write_id(w)?;
        w.end_element("CdtrAcct")?;
        write_purpose(w, self.purpose.as_ref())?;
        write_unstructured_remittance(w, self.remittance_information.as_deref())?;
        w.end_element("CdtTrfTxInf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::GeneralAccount;
    use crate::institution::FinancialInstitutionAddress;
    use crate::money::Currency;

    #[test]
    fn test_general_account_and_intermediary() {
        let address =
            PostalAddress::unstructured(Some("Pachecolaan 44"), Some("1000 Brussel"), "BE").unwrap();
        let mut transfer = ForeignCreditTransfer::new(
            "instr-013",
            "e2e-013",
            Money::new(Currency::GBP, 4500),
            "United Development Belgium SA/NV",
            Some(PostalAddress::unstructured(Some("Oostjachtpark 187"), Some("6743 Buzenol"), "BE").unwrap()),
            GeneralAccount::new("123-4567890-78").unwrap(),
            FinancialInstitutionAddress::new("Belfius Bank", address).unwrap(),
        )
        .unwrap();
        transfer.set_intermediary_agent(Bic::new("SWHQBEBB").unwrap());

        let mut w = XmlWriter::new();
        transfer.write(&mut w, SchemaVersion::Sps2021).unwrap();
        let xml = w.into_string();
        assert!(xml.contains("<IntrmyAgt1><FinInstnId><BIC>SWHQBEBB</BIC></FinInstnId></IntrmyAgt1>"));
        assert!(xml.contains("<CdtrAcct><Id><Othr><Id>123-4567890-78</Id></Othr></Id></CdtrAcct>"));
    }
}
