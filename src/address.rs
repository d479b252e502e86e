// Postal addresses.

use crate::errors::Result;
use crate::text;
use crate::xml::XmlWriter;

/// A creditor or debtor postal address.
///
/// The structured form carries discrete street/number/postcode/town
/// fields; the unstructured form carries up to two free address lines.
/// Both are sanitized field by field at construction and render their own
/// `PstlAdr` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostalAddress {
    Structured {
        street: Option<String>,
        building_no: Option<String>,
        post_code: String,
        town: String,
        country: String,
    },
    Unstructured {
        lines: Vec<String>,
        country: String,
    },
}

impl PostalAddress {
    pub fn structured(
        street: Option<&str>,
        building_no: Option<&str>,
        post_code: &str,
        town: &str,
        country: &str,
    ) -> Result<Self> {
        Ok(PostalAddress::Structured {
            street: street.and_then(|s| text::sanitize_optional(s, 70)),
            building_no: building_no.and_then(|s| text::sanitize_optional(s, 16)),
            post_code: text::sanitize(post_code, 16),
            town: text::sanitize(town, 35),
            country: text::assert_country_code(country)?.to_string(),
        })
    }

    pub fn unstructured(line1: Option<&str>, line2: Option<&str>, country: &str) -> Result<Self> {
        let lines = [line1, line2]
            .into_iter()
            .flatten()
            .filter_map(|line| text::sanitize_optional(line, 70))
            .collect();

        Ok(PostalAddress::Unstructured {
            lines,
            country: text::assert_country_code(country)?.to_string(),
        })
    }

    pub(crate) fn write(&self, w: &mut XmlWriter) -> Result<()> {
        w.start_element("PstlAdr")?;
        match self {
            PostalAddress::Structured {
                street,
                building_no,
                post_code,
                town,
                country,
            } => {
                if let Some(street) = street {
                    w.text_element("StrtNm", street)?;
                }
                if let Some(building_no) = building_no {
                    w.text_element("BldgNb", building_no)?;
                }
                w.text_element("PstCd", post_code)?;
                w.text_element("TwnNm", town)?;
                w.text_element("Ctry", country)?;
            }
            PostalAddress::Unstructured { lines, country } => {
                w.text_element("Ctry", country)?;
                for line in lines {
                    w.text_element("AdrLine", line)?;
                }
            }
        }
        w.end_element("PstlAdr")
    }
}
