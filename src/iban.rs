// IBAN value type.

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{PaymentError, Result};
use crate::xml::XmlWriter;

lazy_static! {
    static ref IBAN_STRUCTURE: Regex = Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]{1,30}$").unwrap();
}

/// International Bank Account Number.
///
/// Validated once at construction: spaces are stripped, letters
/// uppercased, then the structure and the ISO 7064 mod-97 checksum are
/// checked. The compact form is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iban {
    iban: String,
}

impl Iban {
    pub fn new(iban: &str) -> Result<Self> {
        let cleaned: String = iban
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if !IBAN_STRUCTURE.is_match(&cleaned) {
            return Err(PaymentError::Validation(
                "IBAN is not properly formatted.".to_string(),
            ));
        }
        if mod97(&cleaned) != 1 {
            return Err(PaymentError::Validation(
                "IBAN has an invalid checksum.".to_string(),
            ));
        }

        Ok(Self { iban: cleaned })
    }

    /// Two-letter country code.
    pub fn country(&self) -> &str {
        &self.iban[..2]
    }

    /// Compact form without spaces, as used in the XML.
    pub fn normalize(&self) -> &str {
        &self.iban
    }

    /// Human-readable form in groups of four.
    pub fn format(&self) -> String {
        self.iban
            .as_bytes()
            .chunks(4)
            .map(|chunk| std::str::from_utf8(chunk).expect("IBAN is ASCII"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Writes the `Id` block of a cash account.
    pub(crate) fn write_id(&self, w: &mut XmlWriter) -> Result<()> {
        w.start_element("Id")?;
        w.text_element("IBAN", self.normalize())?;
        w.end_element("Id")
    }
}

/// Iterative mod-97 over the rearranged IBAN with letters mapped to 10..35.
fn mod97(iban: &str) -> u32 {
    let rearranged = format!("{}{}", &iban[4..], &iban[..4]);
    let mut remainder: u32 = 0;
    for c in rearranged.chars() {
        remainder = match c {
            '0'..='9' => (remainder * 10 + (c as u32 - '0' as u32)) % 97,
            _ => (remainder * 100 + (c as u32 - 'A' as u32 + 10)) % 97,
        };
    }
    remainder
}
