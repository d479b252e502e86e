// Swiss account and creditor reference types.

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{PaymentError, Result};
use crate::iban::Iban;
use crate::text;
use crate::xml::XmlWriter;

lazy_static! {
    static ref POSTAL_ACCOUNT: Regex = Regex::new(r"^([0-9]{2})-([1-9][0-9]{0,5})-([0-9])$").unwrap();
    static ref ISR_PARTICIPANT_DASHED: Regex =
        Regex::new(r"^(0[13])-([1-9][0-9]{0,5})-([0-9])$").unwrap();
    static ref ISR_PARTICIPANT_COMPACT: Regex = Regex::new(r"^0[13][0-9]{7}$").unwrap();
    static ref CREDITOR_REFERENCE: Regex = Regex::new(r"^RF[0-9]{2}[0-9A-Z]{1,21}$").unwrap();
}

/// Recursive modulo-10 check digit used by Swiss postal account numbers
/// and ISR references. The last digit is the check digit.
pub(crate) fn check_digit_valid(digits: &str) -> bool {
    const TABLE: [usize; 10] = [0, 9, 4, 6, 8, 2, 7, 1, 3, 5];

    let bytes = digits.as_bytes();
    let (body, check) = match bytes.split_last() {
        Some((check, body)) => (body, check),
        None => return false,
    };
    let mut carry = 0;
    for b in body {
        carry = TABLE[(carry + (b - b'0') as usize) % 10];
    }
    (10 - carry) % 10 == (check - b'0') as usize
}

/// Swiss postal giro account number (`NN-NNNNNN-C`).
///
/// Stored as nine digits with the middle part zero-padded; the check
/// digit is verified at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalAccount {
    number: String,
}

impl PostalAccount {
    pub fn new(postal_account: &str) -> Result<Self> {
        let captures = POSTAL_ACCOUNT.captures(postal_account).ok_or_else(|| {
            PaymentError::Validation("Postal account number is not properly formatted.".to_string())
        })?;
        let number = format!("{}{:0>6}{}", &captures[1], &captures[2], &captures[3]);
        if !check_digit_valid(&number) {
            return Err(PaymentError::Validation(
                "Postal account number has an invalid check digit.".to_string(),
            ));
        }

        Ok(Self { number })
    }

    /// Dashed form with leading zeros of the middle part trimmed.
    pub fn format(&self) -> String {
        format!(
            "{}-{}-{}",
            &self.number[..2],
            self.number[2..8].trim_start_matches('0'),
            &self.number[8..]
        )
    }

    pub(crate) fn write_id(&self, w: &mut XmlWriter) -> Result<()> {
        write_other_id(w, &self.format())
    }
}

/// ISR participant number of the `01`/`03` scheme.
///
/// Accepted either as nine compact digits or in the dashed form; kept as
/// nine digits. The check digit is verified at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsrParticipant {
    number: String,
}

impl IsrParticipant {
    pub fn new(number: &str) -> Result<Self> {
        let expanded = if let Some(captures) = ISR_PARTICIPANT_DASHED.captures(number) {
            format!("{}{:0>6}{}", &captures[1], &captures[2], &captures[3])
        } else if ISR_PARTICIPANT_COMPACT.is_match(number) {
            number.to_string()
        } else {
            return Err(PaymentError::Validation(
                "ISR participant number is not properly formatted.".to_string(),
            ));
        };
        if !check_digit_valid(&expanded) {
            return Err(PaymentError::Validation(
                "ISR participant number has an invalid check digit.".to_string(),
            ));
        }

        Ok(Self { number: expanded })
    }

    /// Dashed form with leading zeros of the middle part trimmed.
    pub fn format(&self) -> String {
        format!(
            "{}-{}-{}",
            &self.number[..2],
            self.number[2..8].trim_start_matches('0'),
            &self.number[8..]
        )
    }

    pub(crate) fn write_id(&self, w: &mut XmlWriter) -> Result<()> {
        write_other_id(w, &self.number)
    }
}

/// Free-form account identifier for accounts without an IBAN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralAccount {
    account: String,
}

impl GeneralAccount {
    pub fn new(account: &str) -> Result<Self> {
        let account = text::assert_swift(account, 34)?;

        Ok(Self {
            account: account.to_string(),
        })
    }

    pub fn format(&self) -> &str {
        &self.account
    }

    pub(crate) fn write_id(&self, w: &mut XmlWriter) -> Result<()> {
        write_other_id(w, &self.account)
    }
}

/// ISO 11649 structured creditor reference (`RFnn…`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditorReference {
    reference: String,
}

impl CreditorReference {
    pub fn new(reference: &str) -> Result<Self> {
        let cleaned: String = reference
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if !CREDITOR_REFERENCE.is_match(&cleaned) {
            return Err(PaymentError::Validation(
                "The creditor reference is invalid.".to_string(),
            ));
        }

        Ok(Self { reference: cleaned })
    }

    pub fn format(&self) -> &str {
        &self.reference
    }
}

/// Creditor account reference for transfers that accept either form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountReference {
    Iban(Iban),
    General(GeneralAccount),
}

impl AccountReference {
    pub(crate) fn write_id(&self, w: &mut XmlWriter) -> Result<()> {
        match self {
            AccountReference::Iban(iban) => iban.write_id(w),
            AccountReference::General(account) => account.write_id(w),
        }
    }
}

impl From<Iban> for AccountReference {
    fn from(iban: Iban) -> Self {
        AccountReference::Iban(iban)
    }
}

impl From<GeneralAccount> for AccountReference {
    fn from(account: GeneralAccount) -> Self {
        AccountReference::General(account)
    }
}

/// `Id > Othr > Id` block shared by all non-IBAN account references.
fn write_other_id(w: &mut XmlWriter, id: &str) -> Result<()> {
    w.start_element("Id")?;
    w.start_element("Othr")?;
    w.text_element("Id", id)?;
    w.end_element("Othr")?;
    w.end_element("Id")
}
