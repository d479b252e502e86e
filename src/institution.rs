// Financial institution identification.

use lazy_static::lazy_static;
use regex::Regex;

use crate::address::PostalAddress;
use crate::errors::{PaymentError, Result};
use crate::iban::Iban;
use crate::message::SchemaVersion;
use crate::text;
use crate::xml::XmlWriter;

lazy_static! {
    static ref BIC_PATTERN: Regex =
        Regex::new(r"^[A-Z]{6}[A-Z2-9][A-NP-Z0-9]([A-Z0-9]{3})?$").unwrap();
    static ref IID_PATTERN: Regex = Regex::new(r"^[0-9]{3,5}$").unwrap();
}

/// Business Identifier Code (SWIFT address) of a financial institution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bic {
    bic: String,
}

impl Bic {
    pub fn new(bic: &str) -> Result<Self> {
        if !BIC_PATTERN.is_match(bic) {
            return Err(PaymentError::Validation(
                "BIC is not properly formatted.".to_string(),
            ));
        }

        Ok(Self {
            bic: bic.to_string(),
        })
    }

    pub fn format(&self) -> &str {
        &self.bic
    }

    // pain.001.001.03 names the element BIC, pain.001.001.09 names it BICFI
    fn element_name(version: SchemaVersion) -> &'static str {
        match version {
            SchemaVersion::Sps2021 => "BIC",
            SchemaVersion::Sps2022 => "BICFI",
        }
    }
}

/// Swiss institution identification number (bank clearing number).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iid {
    iid: String,
}

impl Iid {
    pub fn new(iid: &str) -> Result<Self> {
        if !IID_PATTERN.is_match(iid) {
            return Err(PaymentError::Validation(
                "IID is not properly formatted.".to_string(),
            ));
        }

        Ok(Self {
            iid: iid.to_string(),
        })
    }

    /// Derives the IID from the bank-code segment of a Swiss or
    /// Liechtenstein IBAN.
    pub fn from_iban(iban: &Iban) -> Result<Self> {
        if !matches!(iban.country(), "CH" | "LI") {
            return Err(PaymentError::Validation(
                "IID can only be extracted from Swiss and Liechtenstein IBANs.".to_string(),
            ));
        }

        Self::new(iban.normalize()[4..9].trim_start_matches('0'))
    }

    pub fn format(&self) -> &str {
        &self.iid
    }
}

/// A financial institution without a BIC, identified by name and address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialInstitutionAddress {
    name: String,
    address: PostalAddress,
}

impl FinancialInstitutionAddress {
    pub fn new(name: &str, address: PostalAddress) -> Result<Self> {
        Ok(Self {
            name: text::assert_text(name, 70)?.to_string(),
            address,
        })
    }
}

/// Identification of a financial institution.
///
/// Wherever a bank has to be identified the message accepts any of these
/// forms; the element layout inside `FinInstnId` follows the variant and
/// only the BIC element name depends on the schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinancialInstitution {
    Bic(Bic),
    Iid(Iid),
    Address(FinancialInstitutionAddress),
}

impl FinancialInstitution {
    /// Writes the `FinInstnId` block.
    pub(crate) fn write_identification(
        &self,
        w: &mut XmlWriter,
        version: SchemaVersion,
    ) -> Result<()> {
        w.start_element("FinInstnId")?;
        match self {
            FinancialInstitution::Bic(bic) => {
                w.text_element(Bic::element_name(version), bic.format())?;
            }
            FinancialInstitution::Iid(iid) => {
                w.start_element("ClrSysMmbId")?;
                w.start_element("ClrSysId")?;
                w.text_element("Cd", "CHBCC")?;
                w.end_element("ClrSysId")?;
                w.text_element("MmbId", iid.format())?;
                w.end_element("ClrSysMmbId")?;
            }
            FinancialInstitution::Address(institution) => {
                w.text_element("Nm", &institution.name)?;
                institution.address.write(w)?;
            }
        }
        w.end_element("FinInstnId")
    }
}

impl From<Bic> for FinancialInstitution {
    fn from(bic: Bic) -> Self {
        FinancialInstitution::Bic(bic)
    }
}

impl From<Iid> for FinancialInstitution {
    fn from(iid: Iid) -> Self {
        FinancialInstitution::Iid(iid)
    }
}

impl From<FinancialInstitutionAddress> for FinancialInstitution {
    fn from(address: FinancialInstitutionAddress) -> Self {
        FinancialInstitution::Address(address)
    }
}
