// Payment batches: one debtor, one execution date, many transactions.

use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::errors::{PaymentError, Result};
use crate::iban::Iban;
use crate::institution::FinancialInstitution;
use crate::message::SchemaVersion;
use crate::money::AggregateMoney;
use crate::text;
use crate::transaction::Transaction;
use crate::xml::XmlWriter;

lazy_static! {
    static ref CATEGORY_PURPOSE_PATTERN: Regex = Regex::new(r"^[A-Z]{4}$").unwrap();
}

/// Coded reason classifying a whole payment batch (e.g. `SALA`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPurposeCode {
    code: String,
}

impl CategoryPurposeCode {
    pub fn new(code: &str) -> Result<Self> {
        if !CATEGORY_PURPOSE_PATTERN.is_match(code) {
            return Err(PaymentError::Validation(
                "The category purpose code is invalid.".to_string(),
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

/// Instruction controlling whether and how the bank sends debit advice
/// for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationInstruction {
    /// NOA, no advice
    NoAdvice,
    /// SIA, single advice per transaction
    SingleAdvice,
    /// CND, collective advice without details
    CollectiveNoDetails,
    /// CWD, collective advice with details
    CollectiveWithDetails,
}

impl NotificationInstruction {
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "NOA" => Ok(NotificationInstruction::NoAdvice),
            "SIA" => Ok(NotificationInstruction::SingleAdvice),
            "CND" => Ok(NotificationInstruction::CollectiveNoDetails),
            "CWD" => Ok(NotificationInstruction::CollectiveWithDetails),
            _ => Err(PaymentError::Validation(
                "The notification instruction is not valid. It must be one of the following: NOA, SIA, CND or CWD"
                    .to_string(),
            )),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            NotificationInstruction::NoAdvice => "NOA",
            NotificationInstruction::SingleAdvice => "SIA",
            NotificationInstruction::CollectiveNoDetails => "CND",
            NotificationInstruction::CollectiveWithDetails => "CWD",
        }
    }

    /// Collective advices require batch booking; a single advice per
    /// transaction requires bookings per transaction.
    pub fn check_against_batch_booking(&self, batch_booking: bool) -> bool {
        if batch_booking {
            matches!(
                self,
                NotificationInstruction::NoAdvice
                    | NotificationInstruction::CollectiveNoDetails
                    | NotificationInstruction::CollectiveWithDetails
            )
        } else {
            matches!(
                self,
                NotificationInstruction::NoAdvice | NotificationInstruction::SingleAdvice
            )
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaymentFlavor {
    Standard,
    Sepa,
}

/// A batch of credit transfer transactions sharing one debtor and one
/// execution date.
///
/// Transactions are rendered in insertion order. The batch-booking flag
/// and the notification instruction may be set in any order, so their
/// mutual consistency is only checked at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInformation {
    id: String,
    debtor_name: String,
    debtor_agent: FinancialInstitution,
    debtor_iban: Iban,
    execution_date: NaiveDate,
    batch_booking: bool,
    category_purpose: Option<CategoryPurposeCode>,
    notification_instruction: Option<NotificationInstruction>,
    flavor: PaymentFlavor,
    transactions: Vec<Transaction>,
}

impl PaymentInformation {
    pub fn new(
        id: &str,
        debtor_name: &str,
        debtor_agent: impl Into<FinancialInstitution>,
        debtor_iban: Iban,
    ) -> Result<Self> {
        Self::with_flavor(id, debtor_name, debtor_agent, debtor_iban, PaymentFlavor::Standard)
    }

    /// A SEPA-only batch: the SEPA service level is announced at batch
    /// level and every contained transaction must be a SEPA transfer.
    pub fn sepa(
        id: &str,
        debtor_name: &str,
        debtor_agent: impl Into<FinancialInstitution>,
        debtor_iban: Iban,
    ) -> Result<Self> {
        Self::with_flavor(id, debtor_name, debtor_agent, debtor_iban, PaymentFlavor::Sepa)
    }

    fn with_flavor(
        id: &str,
        debtor_name: &str,
        debtor_agent: impl Into<FinancialInstitution>,
        debtor_iban: Iban,
        flavor: PaymentFlavor,
    ) -> Result<Self> {
        Ok(Self {
            id: text::assert_identifier(id)?.to_string(),
            debtor_name: text::assert_text(debtor_name, 70)?.to_string(),
            debtor_agent: debtor_agent.into(),
            debtor_iban,
            execution_date: Local::now().date_naive(),
            batch_booking: true,
            category_purpose: None,
            notification_instruction: None,
            flavor,
            transactions: Vec::new(),
        })
    }

    /// Appends a transaction. No cross-validation happens here; version
    /// eligibility and advice compatibility are checked when rendering.
    pub fn add_transaction(&mut self, transaction: impl Into<Transaction>) {
        self.transactions.push(transaction.into());
    }

    pub fn set_execution_date(&mut self, date: NaiveDate) {
        self.execution_date = date;
    }

    pub fn set_batch_booking(&mut self, batch_booking: bool) {
        self.batch_booking = batch_booking;
    }

    pub fn set_category_purpose(&mut self, category_purpose: CategoryPurposeCode) {
        self.category_purpose = Some(category_purpose);
    }

    pub fn set_notification_instruction(&mut self, instruction: NotificationInstruction) {
        self.notification_instruction = Some(instruction);
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Sum of all transaction amounts, across currencies.
    pub fn transaction_sum(&self) -> AggregateMoney {
        self.transactions
            .iter()
            .fold(AggregateMoney::zero(), |sum, transaction| {
                sum.plus(transaction.amount())
            })
    }

    fn check_batch_rules(&self) -> Result<()> {
        if let Some(instruction) = self.notification_instruction {
            if self.flavor == PaymentFlavor::Sepa {
                return Err(PaymentError::BusinessRule(
                    "A SEPA payment does not permit a notification instruction.".to_string(),
                ));
            }
            if !instruction.check_against_batch_booking(self.batch_booking) {
                return Err(PaymentError::BusinessRule(format!(
                    "The notification instruction {} is not allowed when batch booking is {}.",
                    instruction.code(),
                    self.batch_booking
                )));
            }
        }
        if self.flavor == PaymentFlavor::Sepa && self.transactions.iter().any(|t| !t.is_sepa()) {
            return Err(PaymentError::BusinessRule(
                "A SEPA payment only permits SEPA credit transfers.".to_string(),
            ));
        }
        Ok(())
    }

    fn has_payment_type_information(&self) -> bool {
        self.flavor == PaymentFlavor::Sepa
            || self.notification_instruction.is_some()
            || self.category_purpose.is_some()
    }

    /// Writes the `PmtInf` block.
    pub(crate) fn write(&self, w: &mut XmlWriter, version: SchemaVersion) -> Result<()> {
        self.check_batch_rules()?;
        for transaction in &self.transactions {
            transaction.validate(version)?;
        }
        debug!(
            payment = %self.id,
            transactions = self.transactions.len(),
            "rendering payment batch"
        );

        w.start_element("PmtInf")?;
        w.text_element("PmtInfId", &self.id)?;
        w.text_element("PmtMtd", "TRF")?;
        w.text_element("BtchBookg", if self.batch_booking { "true" } else { "false" })?;
        if self.has_payment_type_information() {
            w.start_element("PmtTpInf")?;
            if self.flavor == PaymentFlavor::Sepa {
                w.start_element("SvcLvl")?;
                w.text_element("Cd", "SEPA")?;
                w.end_element("SvcLvl")?;
            } else if let Some(instruction) = self.notification_instruction {
                w.start_element("SvcLvl")?;
                w.text_element("Prtry", instruction.code())?;
                w.end_element("SvcLvl")?;
            }
            if let Some(category_purpose) = &self.category_purpose {
                w.start_element("CtgyPurp")?;
                w.text_element("Cd", category_purpose.code())?;
                w.end_element("CtgyPurp")?;
            }
            w.end_element("PmtTpInf")?;
        }
        match version {
            SchemaVersion::Sps2021 => {
                w.text_element("ReqdExctnDt", &self.execution_date.format("%Y-%m-%d").to_string())?;
            }
            SchemaVersion::Sps2022 => {
                w.start_element("ReqdExctnDt")?;
                w.text_element("Dt", &self.execution_date.format("%Y-%m-%d").to_string())?;
                w.end_element("ReqdExctnDt")?;
            }
        }
        w.start_element("Dbtr")?;
        w.text_element("Nm", &self.debtor_name)?;
        w.end_element("Dbtr")?;
        w.start_element("DbtrAcct")?;
        self.debtor_iban.write_id(w)?;
        w.end_element("DbtrAcct")?;
        w.start_element("DbtrAgt")?;
        self.debtor_agent.write_identification(w, version)?;
        w.end_element("DbtrAgt")?;

        let within_sepa_payment = self.flavor == PaymentFlavor::Sepa;
        for transaction in &self.transactions {
            transaction.write(w, within_sepa_payment, version)?;
        }
        w.end_element("PmtInf")
    }
}
