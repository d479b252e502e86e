//! pain.001 message assembly for the Swiss Payment Standards.
//!
//! Builds ISO 20022 Customer Credit Transfer Initiation documents for the
//! SPS 2021 and SPS 2022 schema generations from one validated model.
//! Value types (identifiers, amounts, addresses) validate at construction;
//! rules that depend on the chosen schema generation or on batch-level
//! settings are enforced when the document is rendered.
//!
//! ```
//! use payment_initiation::{
//!     BankCreditTransfer, Bic, Currency, CustomerCreditTransfer, Iban, Money,
//!     PaymentInformation, SchemaVersion,
//! };
//!
//! # fn main() -> payment_initiation::Result<()> {
//! let mut message =
//!     CustomerCreditTransfer::new("message-001", "Muster AG", SchemaVersion::Sps2022)?;
//! let mut payment = PaymentInformation::new(
//!     "payment-001",
//!     "Muster AG",
//!     Bic::new("ZKBKCHZZ80A")?,
//!     Iban::new("CH6600700110000204481")?,
//! )?;
//! payment.add_transaction(BankCreditTransfer::new(
//!     "instr-001",
//!     "e2e-001",
//!     Money::new(Currency::CHF, 130000),
//!     "Muster Transport AG",
//!     None,
//!     Iban::new("CH51 0022 5225 9529 1301 C")?,
//!     Bic::new("UBSWCHZH80A")?,
//! )?);
//! message.add_payment(payment);
//!
//! let xml = message.as_xml()?;
//! # assert!(xml.contains("<NbOfTxs>1</NbOfTxs>"));
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod address;
pub mod errors;
pub mod iban;
pub mod institution;
pub mod message;
pub mod money;
pub mod payment;
pub mod text;
pub mod transaction;

mod xml;

// Re-exports
pub use account::{AccountReference, CreditorReference, GeneralAccount, IsrParticipant, PostalAccount};
pub use address::PostalAddress;
pub use errors::{PaymentError, Result};
pub use iban::Iban;
pub use institution::{Bic, FinancialInstitution, FinancialInstitutionAddress, Iid};
pub use message::{CustomerCreditTransfer, SchemaVersion, SoftwareInfo};
pub use money::{AggregateMoney, Currency, Money};
pub use payment::{CategoryPurposeCode, NotificationInstruction, PaymentInformation};
pub use transaction::{
    BankCreditTransfer, BankCreditTransferWithCreditorReference, BankCreditTransferWithQrr,
    ForeignCreditTransfer, Is1CreditTransfer, Is2CreditTransfer, IsrCreditTransfer, PurposeCode,
    SepaCreditTransfer, Transaction,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
